//! WebSocket transport between the controller and the game server.
//!
//! A background task owns the socket. The controller talks to it through
//! two unbounded channels: outbound [`ClientMessage`]s and inbound
//! [`TransportEvent`]s, which it drains once per tick.

use caro_game::{ClientMessage, ConnectionError, MessageSink};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle and data events produced by the socket task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Opened,
    /// One inbound text frame.
    Message(String),
    /// Peer closed the socket.
    Closed,
    /// Connecting or reading failed.
    Failed(String),
}

/// [`MessageSink`] that hands messages to the socket task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<ClientMessage>,
}

impl ChannelSink {
    /// Wraps an outbound channel.
    pub fn new(tx: UnboundedSender<ClientMessage>) -> Self {
        Self { tx }
    }
}

impl MessageSink for ChannelSink {
    fn send(&mut self, message: &ClientMessage) -> Result<(), ConnectionError> {
        self.tx
            .send(message.clone())
            .map_err(|_| ConnectionError::new("Outbound channel closed"))
    }
}

/// Handle to one connection attempt.
#[derive(Debug)]
pub struct Connection {
    events: UnboundedReceiver<TransportEvent>,
    outbound: UnboundedSender<ClientMessage>,
    task: Option<JoinHandle<()>>,
}

impl Connection {
    /// Spawns a task connecting to `url`. Must run inside a tokio runtime.
    #[instrument]
    pub fn open(url: &str) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(url.to_string(), event_tx, outbound_rx));
        Self {
            events: event_rx,
            outbound: outbound_tx,
            task: Some(task),
        }
    }

    /// Builds a connection over existing channels, with no socket task.
    pub fn from_channels(
        events: UnboundedReceiver<TransportEvent>,
        outbound: UnboundedSender<ClientMessage>,
    ) -> Self {
        Self {
            events,
            outbound,
            task: None,
        }
    }

    /// Sink feeding this connection's outbound queue.
    pub fn sink(&self) -> ChannelSink {
        ChannelSink::new(self.outbound.clone())
    }

    /// Next pending event, without waiting.
    pub fn try_next(&mut self) -> Option<TransportEvent> {
        self.events.try_recv().ok()
    }

    /// Stops the socket task. Pending events are discarded.
    #[instrument(skip(self))]
    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Aborting socket task");
            task.abort();
        }
        self.events.close();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

#[instrument(skip(events, outbound))]
async fn run_socket(
    url: String,
    events: UnboundedSender<TransportEvent>,
    mut outbound: UnboundedReceiver<ClientMessage>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            error!(error = %e, "WebSocket connect failed");
            let _ = events.send(TransportEvent::Failed(e.to_string()));
            return;
        }
    };
    info!("WebSocket connected");
    if events.send(TransportEvent::Opened).is_err() {
        return;
    }

    let (mut write, mut read) = stream.split();
    loop {
        tokio::select! {
            next = outbound.recv() => {
                let Some(message) = next else {
                    debug!("Outbound channel dropped, closing socket");
                    let _ = write.close().await;
                    return;
                };
                let text = match message.encode() {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "Skipping unencodable message");
                        continue;
                    }
                };
                debug!(%text, "Sending frame");
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    error!(error = %e, "WebSocket send failed");
                    let _ = events.send(TransportEvent::Failed(e.to_string()));
                    return;
                }
            }
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    debug!(text = %text, "Received frame");
                    if events.send(TransportEvent::Message(text.to_string())).is_err() {
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("WebSocket closed by peer");
                    let _ = events.send(TransportEvent::Closed);
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = %e, "WebSocket read failed");
                    let _ = events.send(TransportEvent::Failed(e.to_string()));
                    return;
                }
            }
        }
    }
}

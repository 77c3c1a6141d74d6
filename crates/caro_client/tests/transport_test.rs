//! Tests for the WebSocket transport against a local server.

use caro_client::{Connection, TransportEvent};
use caro_game::{ClientMessage, GameMode, MessageSink};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::{Instant, sleep};
use tokio_tungstenite::{accept_async, tungstenite::Message};

const ASSIGNMENT: &str = r#"{"type":"player_assignment","player":"X"}"#;

async fn next_event(connection: &mut Connection) -> TransportEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = connection.try_next() {
            return event;
        }
        assert!(Instant::now() < deadline, "Timed out waiting for transport event");
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_socket_lifecycle_and_outbound_frames() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Bind");
    let addr = listener.local_addr().expect("Local addr");

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("Accept");
        let mut ws = accept_async(stream).await.expect("Handshake");
        ws.send(Message::Text(ASSIGNMENT.into())).await.expect("Send");
        let frame = ws.next().await.expect("Frame").expect("Valid frame");
        ws.close(None).await.expect("Close");
        frame
    });

    let mut connection = Connection::open(&format!("ws://{}", addr));
    assert_eq!(next_event(&mut connection).await, TransportEvent::Opened);
    assert_eq!(
        next_event(&mut connection).await,
        TransportEvent::Message(ASSIGNMENT.to_string())
    );

    let announce = ClientMessage::game_mode(GameMode::VsComputer);
    connection.sink().send(&announce).expect("Queue message");

    let frame = server.await.expect("Server task");
    assert!(frame.is_text());
    assert_eq!(
        frame.to_text().expect("Text frame"),
        announce.encode().expect("Encodable")
    );

    assert_eq!(next_event(&mut connection).await, TransportEvent::Closed);
}

#[tokio::test]
async fn test_refused_connection_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Bind");
    let addr = listener.local_addr().expect("Local addr");
    drop(listener);

    let mut connection = Connection::open(&format!("ws://{}", addr));
    let event = next_event(&mut connection).await;
    assert!(
        matches!(event, TransportEvent::Failed(_)),
        "expected failure, got {event:?}"
    );
}

#[tokio::test]
async fn test_closed_connection_rejects_sends() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Bind");
    let addr = listener.local_addr().expect("Local addr");
    drop(listener);

    let mut connection = Connection::open(&format!("ws://{}", addr));
    let mut sink = connection.sink();
    connection.close();
    drop(connection);

    // The aborted task dropped its receiver; give the runtime a moment.
    sleep(Duration::from_millis(50)).await;
    assert!(sink.send(&ClientMessage::reset()).is_err());
}

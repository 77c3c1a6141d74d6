//! Protocol adapter: turns peer messages into session transitions and
//! render events, and guards local intent before it goes out.

use tracing::{debug, info, instrument, warn};

use crate::error::{BoardError, ConnectionError, IllegalInput, ProtocolError, ProtocolErrorKind};
use crate::message::{ClientMessage, MessageKind, MoveNotice, ServerMessage, WinNotice};
use crate::presenter::{Presenter, RenderEvent};
use crate::session::{PhaseChange, Session};
use crate::types::{Cell, ConnectionStatus, Coord, Phase};

/// Outbound half of a connection. Sends are fire-and-forget.
pub trait MessageSink {
    /// Queues `message` for the peer.
    fn send(&mut self, message: &ClientMessage) -> Result<(), ConnectionError>;
}

/// Collects messages in memory. Used for tests and dry runs.
impl MessageSink for Vec<ClientMessage> {
    fn send(&mut self, message: &ClientMessage) -> Result<(), ConnectionError> {
        self.push(message.clone());
        Ok(())
    }
}

/// Outcome of a local move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The move went out to the peer.
    Sent,
    /// The guard blocked the move; nothing was sent.
    Ignored(IllegalInput),
}

/// Result of handling one inbound message.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// Message changed the session.
    Applied {
        /// Which message was applied.
        kind: MessageKind,
        /// Phase change, if any.
        transition: Option<PhaseChange>,
        /// Visual changes for the presentation layer.
        events: Vec<RenderEvent>,
    },
    /// Message was dropped without touching the session.
    Dropped(ProtocolError),
}

impl Dispatch {
    /// Render events carried by an applied message.
    pub fn events(&self) -> &[RenderEvent] {
        match self {
            Dispatch::Applied { events, .. } => events,
            Dispatch::Dropped(_) => &[],
        }
    }

    /// Phase change carried by an applied message.
    pub fn transition(&self) -> Option<PhaseChange> {
        match self {
            Dispatch::Applied { transition, .. } => *transition,
            Dispatch::Dropped(_) => None,
        }
    }

    /// Returns true if the message was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Dispatch::Applied { .. })
    }

    /// Feeds every render event to `presenter`, in order.
    pub fn apply_to<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        for event in self.events() {
            event.apply_to(presenter);
        }
    }
}

type Applied = (Option<PhaseChange>, Vec<RenderEvent>);

/// Connection-scoped translator between the wire protocol and a [`Session`].
///
/// A new adapter is built for every connection; dropping it ends the
/// connection's influence on any session.
#[derive(Debug)]
pub struct ProtocolAdapter<S> {
    sink: S,
    announced: bool,
    closed: bool,
}

impl<S: MessageSink> ProtocolAdapter<S> {
    /// Creates an adapter that writes to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            announced: false,
            closed: false,
        }
    }

    /// Outbound sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Stops inbound processing for this connection.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Marks the session connected and announces the chosen mode.
    ///
    /// # Errors
    ///
    /// Propagates a failed send of the announcement.
    #[instrument(skip(self, session), fields(phase = %session.phase()))]
    pub fn connection_opened(
        &mut self,
        session: &mut Session,
    ) -> Result<Vec<RenderEvent>, ConnectionError> {
        if let Err(err) = session.connection_opened() {
            warn!(error = %err, "Ignoring connection open");
            return Ok(Vec::new());
        }
        info!("Connection opened");
        self.announce_mode(session)?;
        Ok(vec![RenderEvent::ConnectionStatus(
            session.connection().clone(),
        )])
    }

    /// Sends the `game_mode` announcement, at most once per connection.
    ///
    /// Returns true if a message was sent.
    ///
    /// # Errors
    ///
    /// Propagates a failed send.
    #[instrument(skip(self, session))]
    pub fn announce_mode(&mut self, session: &Session) -> Result<bool, ConnectionError> {
        if self.announced || self.closed {
            return Ok(false);
        }
        let Some(mode) = session.mode() else {
            debug!("No mode selected, nothing to announce");
            return Ok(false);
        };
        self.sink.send(&ClientMessage::game_mode(mode))?;
        self.announced = true;
        info!(%mode, "Announced game mode");
        Ok(true)
    }

    /// Records a closed or failed channel and stops inbound processing.
    #[instrument(skip(self, session), fields(phase = %session.phase()))]
    pub fn connection_lost(
        &mut self,
        session: &mut Session,
        status: ConnectionStatus,
    ) -> Vec<RenderEvent> {
        self.closed = true;
        match session.connection_lost(status) {
            Ok(()) => vec![RenderEvent::ConnectionStatus(session.connection().clone())],
            Err(err) => {
                debug!(error = %err, "Connection loss after leaving the game");
                Vec::new()
            }
        }
    }

    /// Sends a move if the local guard allows it.
    ///
    /// # Errors
    ///
    /// Propagates a failed send. A blocked move is not an error.
    #[instrument(skip(self, session), fields(phase = %session.phase()))]
    pub fn submit_move(
        &mut self,
        session: &Session,
        coord: Coord,
    ) -> Result<Submission, ConnectionError> {
        if self.closed {
            debug!(%coord, "Ignoring move on closed connection");
            return Ok(Submission::Ignored(IllegalInput::Disconnected));
        }
        if let Err(reason) = session.check_move(coord) {
            debug!(%coord, %reason, "Ignoring illegal local move");
            return Ok(Submission::Ignored(reason));
        }
        self.sink.send(&ClientMessage::move_to(coord))?;
        info!(%coord, "Move submitted");
        Ok(Submission::Sent)
    }

    /// Clears the board locally and asks the peer to restart.
    ///
    /// Returns `None` when no game is running or the connection is down.
    ///
    /// # Errors
    ///
    /// Propagates a failed send; the board is left untouched in that case.
    #[instrument(skip(self, session), fields(phase = %session.phase()))]
    pub fn request_reset(
        &mut self,
        session: &mut Session,
    ) -> Result<Option<Dispatch>, ConnectionError> {
        let in_game = matches!(session.phase(), Phase::Playing | Phase::GameOver);
        if self.closed || !in_game || !session.connection().is_connected() {
            debug!("Ignoring reset request");
            return Ok(None);
        }
        self.sink.send(&ClientMessage::reset())?;
        let transition = match session.reset() {
            Ok(change) => change,
            Err(err) => {
                warn!(error = %err, "Local reset refused");
                return Ok(None);
            }
        };
        info!("Reset requested");
        Ok(Some(Dispatch::Applied {
            kind: MessageKind::Reset,
            transition,
            events: vec![RenderEvent::BoardCleared],
        }))
    }

    /// Decodes and applies one inbound text frame.
    ///
    /// Malformed, out-of-phase or contradictory messages are dropped and
    /// leave the session untouched.
    #[instrument(skip(self, session, text), fields(phase = %session.phase()))]
    pub fn handle_inbound(&mut self, session: &mut Session, text: &str) -> Dispatch {
        if self.closed {
            debug!("Dropping message received after close");
            return Dispatch::Dropped(ProtocolError::new(ProtocolErrorKind::ConnectionClosed));
        }

        let message = match ServerMessage::decode(text) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "Dropping undecodable message");
                return Dispatch::Dropped(err);
            }
        };

        let kind = message.kind();
        match Self::apply(session, message) {
            Ok((transition, events)) => {
                debug!(%kind, events = events.len(), "Message applied");
                Dispatch::Applied {
                    kind,
                    transition,
                    events,
                }
            }
            Err(err) => {
                warn!(%kind, error = %err, "Dropping message");
                Dispatch::Dropped(err)
            }
        }
    }

    fn apply(session: &mut Session, message: ServerMessage) -> Result<Applied, ProtocolError> {
        match message {
            ServerMessage::PlayerAssignment { player } => {
                session.assign_identity(player)?;
                Ok((None, vec![RenderEvent::IdentityAssigned(player)]))
            }
            ServerMessage::TurnUpdate { current_player } => {
                let change = session.update_turn(current_player)?;
                Ok((change, vec![RenderEvent::TurnChanged(current_player)]))
            }
            ServerMessage::Move(notice) => Ok((None, Self::apply_move(session, &notice)?)),
            ServerMessage::Win(notice) => Self::apply_win(session, &notice),
            ServerMessage::Reset => {
                let change = session.reset()?;
                Ok((change, vec![RenderEvent::BoardCleared]))
            }
        }
    }

    /// Checks that `last_move` names a cell that will hold a piece once
    /// `placed` (if any) has been applied.
    fn check_last_move(
        session: &Session,
        last_move: Option<Coord>,
        placed: Option<Coord>,
    ) -> Result<(), ProtocolError> {
        let (Some(target), Some(board)) = (last_move, session.board()) else {
            return Ok(());
        };
        match board.get(target) {
            None => Err(BoardError::OutOfBounds {
                row: target.row,
                col: target.col,
                size: board.size(),
            }
            .into()),
            Some(Cell::Empty) if placed != Some(target) => Err(BoardError::Unoccupied {
                row: target.row,
                col: target.col,
            }
            .into()),
            Some(_) => Ok(()),
        }
    }

    /// Clears the previous last-move marker. Winning cells keep their look,
    /// so no `ClearHighlight` is emitted for them.
    fn clear_previous_highlight(
        session: &mut Session,
        also_winning: &[Coord],
        events: &mut Vec<RenderEvent>,
    ) {
        let Some(board) = session.board_mut() else {
            return;
        };
        if let Some(prev) = board.clear_last_move() {
            if board.is_winning(prev) || also_winning.contains(&prev) {
                debug!(%prev, "Previous last move is a winning cell, keeping its look");
            } else {
                events.push(RenderEvent::ClearHighlight(prev));
            }
        }
    }

    fn highlight(
        session: &mut Session,
        last_move: Option<Coord>,
        events: &mut Vec<RenderEvent>,
    ) -> Result<(), ProtocolError> {
        if let (Some(target), Some(board)) = (last_move, session.board_mut()) {
            board.set_last_move(target)?;
            events.push(RenderEvent::Highlight(target));
        }
        Ok(())
    }

    fn apply_move(
        session: &mut Session,
        notice: &MoveNotice,
    ) -> Result<Vec<RenderEvent>, ProtocolError> {
        session.expect_playing("move")?;
        let board = session
            .board()
            .ok_or_else(|| ProtocolError::new(ProtocolErrorKind::Rejected("no board".into())))?;
        board.check_place(notice.at)?;
        Self::check_last_move(session, notice.last_move, Some(notice.at))?;

        let mut events = Vec::new();
        Self::clear_previous_highlight(session, &[], &mut events);
        if let Some(board) = session.board_mut() {
            board.place(notice.at, notice.player)?;
        }
        events.push(RenderEvent::CellChanged {
            at: notice.at,
            symbol: notice.player,
        });
        Self::highlight(session, notice.last_move, &mut events)?;
        Ok(events)
    }

    fn apply_win(session: &mut Session, notice: &WinNotice) -> Result<Applied, ProtocolError> {
        session.expect_playing("win")?;
        let board = session
            .board()
            .ok_or_else(|| ProtocolError::new(ProtocolErrorKind::Rejected("no board".into())))?;

        if let Some(outside) = notice.winning_cells.iter().find(|c| !board.contains(**c)) {
            return Err(BoardError::OutOfBounds {
                row: outside.row,
                col: outside.col,
                size: board.size(),
            }
            .into());
        }

        // The final cell may already hold the winner's piece if the peer
        // also sent it as a move.
        let place = match notice.at {
            None => None,
            Some(at) => match board.get(at) {
                Some(Cell::Occupied(existing)) if existing == notice.player => None,
                _ => {
                    board.check_place(at)?;
                    Some(at)
                }
            },
        };
        Self::check_last_move(session, notice.last_move, place)?;

        let mut events = Vec::new();
        Self::clear_previous_highlight(session, &notice.winning_cells, &mut events);
        if let (Some(at), Some(board)) = (place, session.board_mut()) {
            board.place(at, notice.player)?;
            events.push(RenderEvent::CellChanged {
                at,
                symbol: notice.player,
            });
        }
        Self::highlight(session, notice.last_move, &mut events)?;
        if let Some(board) = session.board_mut() {
            for cell in &notice.winning_cells {
                board.mark_winning(*cell)?;
            }
        }
        let change = session.finish(notice.player)?;
        info!(winner = %notice.player, cells = notice.winning_cells.len(), "Game over");
        events.push(RenderEvent::Win {
            winner: notice.player,
            cells: notice.winning_cells.clone(),
        });
        Ok((Some(change), events))
    }
}

//! Error types for the board, the session and the protocol adapter.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::types::Phase;

/// Rejected board mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Coordinates fall outside the grid.
    #[display("Cell ({}, {}) is outside the {}x{} board", row, col, size, size)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Board dimension.
        size: usize,
    },

    /// Target cell already holds a piece.
    #[display("Cell ({}, {}) is already occupied", row, col)]
    AlreadyOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// Last-move marker requested for a cell with no piece.
    #[display("Cell ({}, {}) is empty", row, col)]
    Unoccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}

/// Session event that does not fit the current phase or board.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// Event arrived in a phase that does not accept it.
    #[display("{} is not valid while in phase {}", event, phase)]
    UnexpectedPhase {
        /// Phase at the time of the event.
        phase: Phase,
        /// Name of the rejected event.
        event: &'static str,
    },

    /// Board refused the mutation.
    #[display("{}", _0)]
    Board(BoardError),
}

impl std::error::Error for SessionError {}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        SessionError::Board(err)
    }
}

/// Why an inbound message was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ProtocolErrorKind {
    /// Payload is not a JSON object of the expected shape.
    #[display("malformed message: {}", _0)]
    Malformed(String),

    /// A field the message kind needs is absent.
    #[display("missing field `{}`", _0)]
    MissingField(&'static str),

    /// Well-formed message that the session or board refused.
    #[display("rejected: {}", _0)]
    Rejected(String),

    /// Message arrived after the connection was closed.
    #[display("connection already closed")]
    ConnectionClosed,
}

/// Inbound message that could not be applied. Dropped and logged.
#[derive(Debug, Clone, Display, Error)]
#[display("Protocol error: {} at {}:{}", kind, file, line)]
pub struct ProtocolError {
    /// What went wrong.
    pub kind: ProtocolErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProtocolError {
    /// Creates a new protocol error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: ProtocolErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(ProtocolErrorKind::Malformed(err.to_string()))
    }
}

impl From<SessionError> for ProtocolError {
    #[track_caller]
    fn from(err: SessionError) -> Self {
        Self::new(ProtocolErrorKind::Rejected(err.to_string()))
    }
}

impl From<BoardError> for ProtocolError {
    #[track_caller]
    fn from(err: BoardError) -> Self {
        Self::new(ProtocolErrorKind::Rejected(err.to_string()))
    }
}

/// Transport failure. Shown to the user as a persistent status.
#[derive(Debug, Clone, Display, Error)]
#[display("Connection error: {} at {}:{}", message, file, line)]
pub struct ConnectionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConnectionError {
    /// Creates a new connection error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Why a local move request was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IllegalInput {
    /// No game is running.
    #[display("game is not in progress")]
    NotPlaying,
    /// The channel to the peer is not open.
    #[display("not connected")]
    Disconnected,
    /// The peer has not assigned a symbol or a turn yet.
    #[display("waiting for the server to assign players")]
    Unassigned,
    /// The other player is to move.
    #[display("not your turn")]
    NotYourTurn,
    /// Coordinates fall outside the board.
    #[display("cell is off the board")]
    OutOfBounds,
    /// Target cell already holds a piece.
    #[display("cell is occupied")]
    Occupied,
}

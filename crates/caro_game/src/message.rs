//! JSON wire messages exchanged with the authoritative peer.
//!
//! Outbound moves carry no `type` field, and inbound messages without a
//! recognized `type` that carry `row`, `col` and `player` are moves. Both
//! follow the peer's older untyped format, which is still in use.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ProtocolError, ProtocolErrorKind};
use crate::types::{Coord, GameMode, Symbol};

/// Message sent from this client to the peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    /// Typed control message (`game_mode`, `reset`).
    Control(ControlMessage),
    /// Bare move submission: `{"row": r, "col": c}`.
    Move(Coord),
}

/// Typed client messages, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Announces the chosen mode right after the channel opens.
    GameMode {
        /// Selected mode.
        mode: GameMode,
    },
    /// Asks the peer to restart the current game.
    Reset,
}

impl ClientMessage {
    /// Mode announcement.
    pub fn game_mode(mode: GameMode) -> Self {
        ClientMessage::Control(ControlMessage::GameMode { mode })
    }

    /// Restart request.
    pub fn reset() -> Self {
        ClientMessage::Control(ControlMessage::Reset)
    }

    /// Move submission.
    pub fn move_to(coord: Coord) -> Self {
        ClientMessage::Move(coord)
    }

    /// Serializes to the JSON text frame.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A confirmed placement announced by the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveNotice {
    /// Where the piece went.
    pub at: Coord,
    /// Whose piece it is.
    pub player: Symbol,
    /// Cell to highlight as the most recent move.
    pub last_move: Option<Coord>,
}

/// Game-ending announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinNotice {
    /// Final placement, when the peer includes it.
    pub at: Option<Coord>,
    /// Winner's symbol.
    pub player: Symbol,
    /// Cells forming the winning line.
    pub winning_cells: Vec<Coord>,
    /// Cell to highlight as the most recent move.
    pub last_move: Option<Coord>,
}

/// Message received from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `player_assignment`: the symbol this client plays.
    PlayerAssignment {
        /// Assigned symbol.
        player: Symbol,
    },
    /// `turn_update`: whose turn it is now.
    TurnUpdate {
        /// Symbol to move.
        current_player: Symbol,
    },
    /// `move`, or an untyped legacy move.
    Move(MoveNotice),
    /// `win`.
    Win(WinNotice),
    /// `reset`.
    Reset,
}

/// Discriminant of a [`ServerMessage`], for logs and dispatch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    /// Symbol assignment.
    PlayerAssignment,
    /// Turn change.
    TurnUpdate,
    /// Placement.
    Move,
    /// Game end.
    Win,
    /// Restart.
    Reset,
}

/// Every field any inbound message may carry.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    row: Option<usize>,
    col: Option<usize>,
    player: Option<Symbol>,
    current_player: Option<Symbol>,
    winning_cells: Option<Vec<Coord>>,
    last_move: Option<Coord>,
}

impl Envelope {
    fn coord(&self) -> Option<Coord> {
        Some(Coord::new(self.row?, self.col?))
    }

    #[track_caller]
    fn require<T>(value: Option<T>, field: &'static str) -> Result<T, ProtocolError> {
        value.ok_or_else(|| ProtocolError::new(ProtocolErrorKind::MissingField(field)))
    }

    fn into_move(self) -> Result<ServerMessage, ProtocolError> {
        let row = Self::require(self.row, "row")?;
        let col = Self::require(self.col, "col")?;
        let player = Self::require(self.player, "player")?;
        Ok(ServerMessage::Move(MoveNotice {
            at: Coord::new(row, col),
            player,
            last_move: self.last_move,
        }))
    }

    fn into_win(self) -> Result<ServerMessage, ProtocolError> {
        let at = self.coord();
        let player = Self::require(self.player, "player")?;
        Ok(ServerMessage::Win(WinNotice {
            at,
            player,
            winning_cells: self.winning_cells.unwrap_or_default(),
            last_move: self.last_move,
        }))
    }
}

impl ServerMessage {
    /// Parses one inbound text frame.
    ///
    /// # Errors
    ///
    /// `Malformed` when the text is not a JSON object of the expected shape
    /// (including unknown symbols or negative coordinates), `MissingField`
    /// when a field required by the message kind is absent.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(text)?;

        match envelope.kind.as_deref() {
            Some("player_assignment") => Ok(ServerMessage::PlayerAssignment {
                player: Envelope::require(envelope.player, "player")?,
            }),
            Some("turn_update") => Ok(ServerMessage::TurnUpdate {
                current_player: Envelope::require(envelope.current_player, "current_player")?,
            }),
            Some("reset") => Ok(ServerMessage::Reset),
            Some("move") => envelope.into_move(),
            Some("win") => envelope.into_win(),
            other => {
                debug!(kind = ?other, "Unrecognized type, decoding as untyped move");
                envelope.into_move()
            }
        }
    }

    /// Discriminant of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            ServerMessage::PlayerAssignment { .. } => MessageKind::PlayerAssignment,
            ServerMessage::TurnUpdate { .. } => MessageKind::TurnUpdate,
            ServerMessage::Move(_) => MessageKind::Move,
            ServerMessage::Win(_) => MessageKind::Win,
            ServerMessage::Reset => MessageKind::Reset,
        }
    }
}

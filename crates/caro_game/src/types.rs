//! Core domain types shared by the board, the session and the wire protocol.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player marker placed on the board.
///
/// The peer assigns one symbol to each connected client; `X` moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Symbol {
    /// First player.
    X,
    /// Second player (the computer in [`GameMode::VsComputer`]).
    O,
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell holds a confirmed piece.
    Occupied(Symbol),
}

/// Row/column address of a cell. Serialized as `{"row": r, "col": c}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Coord {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Who the local player faces. Chosen once per session from the menu,
/// which lists modes in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Two humans, each on their own client.
    #[strum(serialize = "two_player")]
    TwoPlayer,
    /// One human against the peer's computer opponent.
    #[strum(serialize = "vs_computer")]
    VsComputer,
}

impl GameMode {
    /// Human-readable label for menus and the status bar.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            GameMode::TwoPlayer => "Two players",
            GameMode::VsComputer => "Versus computer",
        }
    }
}

/// Lifecycle phase of a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum Phase {
    /// Mode selection; no connection, no board.
    #[default]
    Menu,
    /// Mode chosen, waiting for the peer to hand out turns.
    Connecting,
    /// Game running.
    Playing,
    /// A win was announced; input frozen until reset or exit.
    GameOver,
}

/// Health of the connection to the peer, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No connection exists (menu).
    #[default]
    Idle,
    /// Channel is being opened.
    Connecting,
    /// Channel is open.
    Connected,
    /// Peer closed the channel.
    Disconnected,
    /// Transport failed.
    Failed(String),
}

impl ConnectionStatus {
    /// Returns true while the channel can carry messages.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Returns true once the channel is gone for good.
    pub fn is_lost(&self) -> bool {
        matches!(self, ConnectionStatus::Disconnected | ConnectionStatus::Failed(_))
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Idle => write!(f, "Not connected"),
            ConnectionStatus::Connecting => write!(f, "Connecting..."),
            ConnectionStatus::Connected => write!(f, "Connected to server"),
            ConnectionStatus::Disconnected => write!(f, "Lost connection to server"),
            ConnectionStatus::Failed(reason) => write!(f, "Connection error: {}", reason),
        }
    }
}

/// Visual category of a cell. `Winning` wins over `LastMove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellMark {
    /// No highlight.
    #[default]
    Plain,
    /// Most recently confirmed placement.
    LastMove,
    /// Part of the announced winning line.
    Winning,
}

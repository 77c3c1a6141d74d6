//! Caro game core - client-side state for server-authoritative five-in-a-row
//!
//! The peer owns the rules: it validates moves, detects wins and hands out
//! turns. This crate keeps the client's view of that state consistent with
//! what the peer broadcasts.
//!
//! # Architecture
//!
//! - **Board**: 15x15 grid of confirmed placements, last-move and winning marks
//! - **Session**: lifecycle `Menu -> Connecting -> Playing -> GameOver`,
//!   identity and turn tracking
//! - **Adapter**: inbound dispatch into session transitions and render
//!   events, guarded outbound moves
//!
//! # Example
//!
//! ```
//! use caro_game::{ClientMessage, Coord, GameMode, ProtocolAdapter, Session, Submission};
//!
//! let mut session = Session::new();
//! session.select_mode(GameMode::VsComputer).unwrap();
//!
//! let mut adapter = ProtocolAdapter::new(Vec::<ClientMessage>::new());
//! adapter.connection_opened(&mut session).unwrap();
//! adapter.handle_inbound(&mut session, r#"{"type":"player_assignment","player":"X"}"#);
//! adapter.handle_inbound(&mut session, r#"{"type":"turn_update","current_player":"X"}"#);
//!
//! let sent = adapter.submit_move(&session, Coord::new(7, 7)).unwrap();
//! assert_eq!(sent, Submission::Sent);
//! assert_eq!(adapter.sink().len(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
mod board;
mod error;
mod message;
mod presenter;
mod session;
mod types;

// Crate-level exports - Board model
pub use board::{BOARD_SIZE, Board};

// Crate-level exports - Session state machine
pub use session::{PhaseChange, Session};

// Crate-level exports - Wire protocol
pub use message::{ClientMessage, ControlMessage, MessageKind, MoveNotice, ServerMessage, WinNotice};

// Crate-level exports - Protocol adapter
pub use adapter::{Dispatch, MessageSink, ProtocolAdapter, Submission};

// Crate-level exports - Presentation contract
pub use presenter::{Presenter, RenderEvent};

// Crate-level exports - Errors
pub use error::{
    BoardError, ConnectionError, IllegalInput, ProtocolError, ProtocolErrorKind, SessionError,
};

// Crate-level exports - Domain types
pub use types::{Cell, CellMark, ConnectionStatus, Coord, GameMode, Phase, Symbol};

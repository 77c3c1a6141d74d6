//! Terminal client for server-authoritative five-in-a-row.
//!
//! Wires the [`caro_game`] session engine to a WebSocket transport and a
//! ratatui front end:
//!
//! - [`Connection`] runs the socket on a background task and exchanges
//!   [`TransportEvent`]s and outbound messages over channels.
//! - [`App`] owns the session and applies user [`Intent`]s and transport
//!   events on the UI task.
//! - [`draw`] renders the current state; [`intent_for`] maps keys to intents.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod cli;
mod config;
mod input;
mod transport;
mod ui;

// Crate-level exports - Controller
pub use app::{App, BoardView, Connector, Intent};

// Crate-level exports - Command line and configuration
pub use cli::{Cli, Command, ModeArg};
pub use config::{ClientConfig, ConfigError, SERVER_URL_ENV};

// Crate-level exports - Input and rendering
pub use input::{intent_for, menu_mode, move_cursor};
pub use ui::draw;

// Crate-level exports - Transport
pub use transport::{ChannelSink, Connection, TransportEvent};

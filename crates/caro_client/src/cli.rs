//! Command-line interface for the caro client.

use caro_game::GameMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Caro - five-in-a-row against a remote game server
#[derive(Parser, Debug)]
#[command(name = "caro")]
#[command(about = "Terminal client for server-authoritative five-in-a-row", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client config file
    #[arg(short, long, global = true, default_value = "caro.toml")]
    pub config: PathBuf,

    /// Log file (overrides config)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the terminal UI and play
    Play {
        /// Game server WebSocket URL (overrides config and environment)
        #[arg(long)]
        server_url: Option<String>,

        /// Start this mode immediately instead of showing the menu
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Game mode as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Two humans on separate clients
    TwoPlayer,
    /// Play against the server's computer opponent
    VsComputer,
}

impl From<ModeArg> for GameMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::TwoPlayer => GameMode::TwoPlayer,
            ModeArg::VsComputer => GameMode::VsComputer,
        }
    }
}

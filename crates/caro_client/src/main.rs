//! Caro - terminal client entry point.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use caro_client::{App, ClientConfig, Cli, Command, Intent, draw, intent_for};
use caro_game::BOARD_SIZE;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, path::Path, time::Duration};
use tracing::{error, info, instrument};

const DEFAULT_FILTER: &str = "info,caro_client=debug,caro_game=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Play {
        server_url: None,
        mode: None,
    });

    let mut config = ClientConfig::load(&cli.config)?.with_log_file(cli.log_file.clone());
    if let Command::Play { server_url, mode } = &command {
        config = config
            .with_server_url(server_url.clone())
            .with_default_mode(mode.map(Into::into));
    }

    match command {
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Play { .. } => {
            init_tracing(config.log_file())?;
            run_tui(config).await
        }
    }
}

/// Sends tracing output to a file so it does not corrupt the TUI.
fn init_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Run the terminal client until the user quits.
async fn run_tui(config: ClientConfig) -> Result<()> {
    info!(server_url = %config.server_url(), "Starting caro client");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_websocket(config.server_url().clone());
    if let Some(mode) = *config.default_mode() {
        app.handle_intent(Intent::ModeChosen(mode));
    }

    let res = run_loop(&mut terminal, &mut app, Duration::from_millis(*config.tick_ms()));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Client loop error");
    }
    info!("Caro client stopped");
    res
}

/// Draws, drains transport events and handles input until quit.
///
/// Blocks in `event::poll` for up to one tick; the socket task runs on
/// the runtime's worker threads meanwhile.
#[instrument(skip_all)]
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    loop {
        app.pump();
        terminal.draw(|f| draw(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let session = app.session();
                    let size = session.board().map_or(BOARD_SIZE, |b| b.size());
                    let dialog_open = app.view().dialog().is_some();
                    if let Some(intent) =
                        intent_for(key.code, session.phase(), app.cursor(), size, dialog_open)
                    {
                        app.handle_intent(intent);
                    }
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

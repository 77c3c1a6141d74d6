//! Application controller.
//!
//! Owns the [`Session`], the per-connection [`ProtocolAdapter`] and the
//! [`BoardView`]. UI intents and transport events both funnel through here,
//! so all state changes happen on the UI task.

use crate::transport::{ChannelSink, Connection, TransportEvent};
use caro_game::{
    ConnectionError, ConnectionStatus, Coord, Dispatch, GameMode, Phase, Presenter,
    ProtocolAdapter, RenderEvent, Session, Submission, Symbol,
};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

/// User intents produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start a game in the given mode (menu only).
    ModeChosen(GameMode),
    /// Try to place a stone.
    CellClicked(Coord),
    /// Move the board cursor.
    MoveCursor(Coord),
    /// Ask for a new game.
    ResetRequested,
    /// Leave the game and return to the menu.
    ExitRequested,
    /// Close the game-over dialog.
    DismissDialog,
    /// Quit the program.
    Quit,
}

/// Builds a connection for a server URL.
pub type Connector = Box<dyn FnMut(&str) -> Connection + Send>;

/// Presentation state that is not derivable from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct BoardView {
    /// Connection status line.
    status: String,
    /// Latest notice shown under the board.
    notice: String,
    /// Game-over dialog text, if open.
    dialog: Option<String>,
}

impl BoardView {
    /// Returns to the initial state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Closes the game-over dialog.
    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = notice.into();
    }
}

impl Presenter for BoardView {
    fn on_cell_changed(&mut self, at: Coord, symbol: Symbol) {
        self.notice = format!("{} played {}", symbol, at);
    }

    // Cell styling is drawn from `Board::cell_mark` on every frame.
    fn on_highlight(&mut self, _at: Coord) {}

    fn on_clear_highlight(&mut self, _at: Coord) {}

    fn on_win(&mut self, winner: Symbol, _cells: &[Coord]) {
        self.dialog = Some(format!("Player {} wins!", winner));
        self.notice = format!("Game over: {} wins", winner);
    }

    fn on_connection_status(&mut self, status: &ConnectionStatus) {
        self.status = status.to_string();
    }

    fn on_identity(&mut self, symbol: Symbol) {
        self.notice = format!("You are playing {}", symbol);
    }

    fn on_turn(&mut self, symbol: Symbol) {
        self.notice = format!("{} to move", symbol);
    }

    fn on_board_cleared(&mut self) {
        self.dialog = None;
        self.notice = "New game".to_string();
    }
}

/// Main application state.
pub struct App {
    session: Session,
    adapter: Option<ProtocolAdapter<ChannelSink>>,
    connection: Option<Connection>,
    connector: Connector,
    view: BoardView,
    cursor: Coord,
    server_url: String,
    should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("view", &self.view)
            .field("cursor", &self.cursor)
            .field("server_url", &self.server_url)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Creates an application in the menu. `connector` opens connections
    /// when a mode is chosen.
    pub fn new(server_url: impl Into<String>, connector: Connector) -> Self {
        Self {
            session: Session::new(),
            adapter: None,
            connection: None,
            connector,
            view: BoardView::default(),
            cursor: Coord::new(caro_game::BOARD_SIZE / 2, caro_game::BOARD_SIZE / 2),
            server_url: server_url.into(),
            should_quit: false,
        }
    }

    /// Creates an application that opens real WebSocket connections.
    pub fn with_websocket(server_url: impl Into<String>) -> Self {
        Self::new(server_url, Box::new(Connection::open))
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Presentation state.
    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Board cursor.
    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Server the next game connects to.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Returns true once the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies one user intent.
    #[instrument(skip(self), fields(phase = %self.session.phase()))]
    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::ModeChosen(mode) => self.start_game(mode),
            Intent::CellClicked(at) => {
                self.cursor = at;
                self.submit_move(at);
            }
            Intent::MoveCursor(at) => self.cursor = at,
            Intent::ResetRequested => self.request_reset(),
            Intent::ExitRequested => self.exit_to_menu(),
            Intent::DismissDialog => self.view.dismiss_dialog(),
            Intent::Quit => {
                info!("Quit requested");
                self.drop_connection();
                self.should_quit = true;
            }
        }
    }

    /// Drains and applies every pending transport event.
    pub fn pump(&mut self) {
        while let Some(event) = self.connection.as_mut().and_then(Connection::try_next) {
            self.handle_transport(event);
        }
    }

    /// Applies one transport event to the current session.
    #[instrument(skip(self), fields(phase = %self.session.phase()))]
    pub fn handle_transport(&mut self, event: TransportEvent) {
        let Some(adapter) = self.adapter.as_mut() else {
            debug!("No active connection, dropping transport event");
            return;
        };

        match event {
            TransportEvent::Opened => match adapter.connection_opened(&mut self.session) {
                Ok(events) => Self::present(&mut self.view, &events),
                Err(err) => self.fail(err),
            },
            TransportEvent::Message(text) => {
                let dispatch = adapter.handle_inbound(&mut self.session, &text);
                if let Dispatch::Dropped(err) = &dispatch {
                    debug!(error = %err, "Inbound message dropped");
                }
                dispatch.apply_to(&mut self.view);
            }
            TransportEvent::Closed => {
                let events = adapter.connection_lost(&mut self.session, ConnectionStatus::Disconnected);
                Self::present(&mut self.view, &events);
            }
            TransportEvent::Failed(reason) => {
                let events =
                    adapter.connection_lost(&mut self.session, ConnectionStatus::Failed(reason));
                Self::present(&mut self.view, &events);
            }
        }
    }

    fn start_game(&mut self, mode: GameMode) {
        if let Err(err) = self.session.select_mode(mode) {
            debug!(error = %err, "Ignoring mode choice");
            return;
        }
        info!(%mode, url = %self.server_url, "Starting game");
        let connection = (self.connector)(&self.server_url);
        self.adapter = Some(ProtocolAdapter::new(connection.sink()));
        self.connection = Some(connection);
        self.view.clear();
        self.view.on_connection_status(self.session.connection());
        self.view.set_notice(format!("Mode: {}", mode.label()));
    }

    fn submit_move(&mut self, at: Coord) {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        match adapter.submit_move(&self.session, at) {
            Ok(Submission::Sent) => self.view.set_notice(format!("Sent move {}", at)),
            Ok(Submission::Ignored(reason)) => debug!(%at, %reason, "Move not sent"),
            Err(err) => self.fail(err),
        }
    }

    fn request_reset(&mut self) {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        match adapter.request_reset(&mut self.session) {
            Ok(Some(dispatch)) => dispatch.apply_to(&mut self.view),
            Ok(None) => {}
            Err(err) => self.fail(err),
        }
    }

    fn exit_to_menu(&mut self) {
        self.drop_connection();
        if self.session.exit_to_menu().is_some() {
            self.view.clear();
        }
    }

    fn drop_connection(&mut self) {
        if let Some(mut adapter) = self.adapter.take() {
            adapter.close();
        }
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }

    fn fail(&mut self, err: ConnectionError) {
        warn!(error = %err, "Send failed");
        if self.session.phase() == Phase::Menu {
            return;
        }
        if let Some(adapter) = self.adapter.as_mut() {
            let events = adapter
                .connection_lost(&mut self.session, ConnectionStatus::Failed(err.message.clone()));
            Self::present(&mut self.view, &events);
        }
    }

    fn present(view: &mut BoardView, events: &[RenderEvent]) {
        for event in events {
            event.apply_to(view);
        }
    }
}

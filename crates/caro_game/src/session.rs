//! Session state machine: lifecycle phase, identity, turn and connection.

use tracing::{debug, info, instrument, warn};

use crate::board::Board;
use crate::error::{IllegalInput, SessionError};
use crate::types::{Cell, ConnectionStatus, Coord, GameMode, Phase, Symbol};

/// A phase transition taken by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    /// Phase before the event.
    pub from: Phase,
    /// Phase after the event.
    pub to: Phase,
}

/// Client-local view of one game instance.
///
/// Owned by the application controller and lent to the protocol adapter,
/// which is its only writer while a connection is live.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: Phase,
    mode: Option<GameMode>,
    local_identity: Option<Symbol>,
    active_player: Option<Symbol>,
    connection: ConnectionStatus,
    winner: Option<Symbol>,
    board: Option<Board>,
}

impl Session {
    /// Creates a session sitting in the menu.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mode chosen from the menu.
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    /// Symbol the peer assigned to this client.
    pub fn local_identity(&self) -> Option<Symbol> {
        self.local_identity
    }

    /// Symbol whose turn it is.
    pub fn active_player(&self) -> Option<Symbol> {
        self.active_player
    }

    /// Connection indicator.
    pub fn connection(&self) -> &ConnectionStatus {
        &self.connection
    }

    /// Winner of the finished game.
    pub fn winner(&self) -> Option<Symbol> {
        self.winner
    }

    /// Board of the current game; `None` in the menu.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub(crate) fn board_mut(&mut self) -> Option<&mut Board> {
        self.board.as_mut()
    }

    /// Returns true when it is this client's turn.
    pub fn is_my_turn(&self) -> bool {
        matches!(
            (self.local_identity, self.active_player),
            (Some(me), Some(active)) if me == active
        )
    }

    /// Returns true when a click on an empty cell would be sent.
    pub fn input_enabled(&self) -> bool {
        self.phase == Phase::Playing && self.connection.is_connected() && self.is_my_turn()
    }

    /// Evaluates the local move guard for `coord`.
    ///
    /// # Errors
    ///
    /// The first [`IllegalInput`] reason that blocks the move.
    pub fn check_move(&self, coord: Coord) -> Result<(), IllegalInput> {
        if self.phase != Phase::Playing {
            return Err(IllegalInput::NotPlaying);
        }
        if !self.connection.is_connected() {
            return Err(IllegalInput::Disconnected);
        }
        if self.local_identity.is_none() || self.active_player.is_none() {
            return Err(IllegalInput::Unassigned);
        }
        if !self.is_my_turn() {
            return Err(IllegalInput::NotYourTurn);
        }
        match self.board.as_ref().and_then(|b| b.get(coord)) {
            None => Err(IllegalInput::OutOfBounds),
            Some(Cell::Occupied(_)) => Err(IllegalInput::Occupied),
            Some(Cell::Empty) => Ok(()),
        }
    }

    /// Returns true when [`Session::check_move`] passes.
    pub fn can_submit(&self, coord: Coord) -> bool {
        self.check_move(coord).is_ok()
    }

    fn require(&self, allowed: &[Phase], event: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            warn!(phase = %self.phase, event, "Event not valid in current phase");
            Err(SessionError::UnexpectedPhase {
                phase: self.phase,
                event,
            })
        }
    }

    fn transition(&mut self, to: Phase) -> PhaseChange {
        let change = PhaseChange {
            from: self.phase,
            to,
        };
        if change.from != to {
            info!(from = %change.from, to = %to, "Phase transition");
        }
        self.phase = to;
        change
    }

    /// Menu → Connecting: records the mode and creates a fresh board.
    ///
    /// # Errors
    ///
    /// `UnexpectedPhase` outside the menu.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn select_mode(&mut self, mode: GameMode) -> Result<PhaseChange, SessionError> {
        self.require(&[Phase::Menu], "select_mode")?;
        self.mode = Some(mode);
        self.local_identity = None;
        self.active_player = None;
        self.winner = None;
        self.board = Some(Board::standard());
        self.connection = ConnectionStatus::Connecting;
        Ok(self.transition(Phase::Connecting))
    }

    /// Records that the channel to the peer is open.
    ///
    /// # Errors
    ///
    /// `UnexpectedPhase` unless connecting.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn connection_opened(&mut self) -> Result<(), SessionError> {
        self.require(&[Phase::Connecting], "connection_opened")?;
        self.connection = ConnectionStatus::Connected;
        Ok(())
    }

    /// Records a closed or failed channel. Disables input; phase is kept.
    ///
    /// # Errors
    ///
    /// `UnexpectedPhase` in the menu, where no channel exists.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn connection_lost(&mut self, status: ConnectionStatus) -> Result<(), SessionError> {
        if self.phase == Phase::Menu {
            return Err(SessionError::UnexpectedPhase {
                phase: self.phase,
                event: "connection_lost",
            });
        }
        warn!(%status, "Connection lost");
        self.connection = status;
        Ok(())
    }

    /// Stores the symbol assigned by the peer.
    ///
    /// # Errors
    ///
    /// `UnexpectedPhase` unless connecting or playing.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn assign_identity(&mut self, symbol: Symbol) -> Result<(), SessionError> {
        self.require(&[Phase::Connecting, Phase::Playing], "player_assignment")?;
        debug!(%symbol, "Identity assigned");
        self.local_identity = Some(symbol);
        Ok(())
    }

    /// Stores whose turn it is and enters `Playing`.
    ///
    /// # Errors
    ///
    /// `UnexpectedPhase` unless connecting or playing.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn update_turn(&mut self, symbol: Symbol) -> Result<Option<PhaseChange>, SessionError> {
        self.require(&[Phase::Connecting, Phase::Playing], "turn_update")?;
        self.active_player = Some(symbol);
        let from = self.phase;
        let change = self.transition(Phase::Playing);
        Ok((from != Phase::Playing).then_some(change))
    }

    /// Checks that a placement message may be applied now.
    pub(crate) fn expect_playing(&self, event: &'static str) -> Result<(), SessionError> {
        self.require(&[Phase::Playing], event)
    }

    /// Playing → GameOver.
    pub(crate) fn finish(&mut self, winner: Symbol) -> Result<PhaseChange, SessionError> {
        self.require(&[Phase::Playing], "win")?;
        self.winner = Some(winner);
        Ok(self.transition(Phase::GameOver))
    }

    /// Empties the board for a new game; identity and turn are kept.
    ///
    /// Playing and GameOver end in Playing. A reset while still connecting
    /// clears the board without changing phase.
    ///
    /// # Errors
    ///
    /// `UnexpectedPhase` in the menu.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn reset(&mut self) -> Result<Option<PhaseChange>, SessionError> {
        self.require(
            &[Phase::Connecting, Phase::Playing, Phase::GameOver],
            "reset",
        )?;
        if let Some(board) = self.board.as_mut() {
            board.reset();
        }
        self.winner = None;
        match self.phase {
            Phase::GameOver => Ok(Some(self.transition(Phase::Playing))),
            _ => Ok(None),
        }
    }

    /// Returns to the menu, discarding everything tied to the game.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn exit_to_menu(&mut self) -> Option<PhaseChange> {
        if self.phase == Phase::Menu {
            return None;
        }
        self.mode = None;
        self.local_identity = None;
        self.active_player = None;
        self.winner = None;
        self.board = None;
        self.connection = ConnectionStatus::Idle;
        Some(self.transition(Phase::Menu))
    }
}

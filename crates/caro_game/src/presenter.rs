//! Render events and the presentation-layer contract.

use crate::types::{ConnectionStatus, Coord, Symbol};

/// Visual change produced by a session transition.
///
/// The adapter returns these instead of calling into the UI, so the state
/// machine can be driven and inspected without a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// A piece appeared on a cell.
    CellChanged {
        /// Cell address.
        at: Coord,
        /// Piece placed.
        symbol: Symbol,
    },
    /// Cell became the last-move highlight.
    Highlight(Coord),
    /// Cell lost the last-move highlight.
    ClearHighlight(Coord),
    /// Game ended.
    Win {
        /// Winner.
        winner: Symbol,
        /// Winning line.
        cells: Vec<Coord>,
    },
    /// Connection indicator changed.
    ConnectionStatus(ConnectionStatus),
    /// The peer assigned this client's symbol.
    IdentityAssigned(Symbol),
    /// Turn passed to `Symbol`.
    TurnChanged(Symbol),
    /// Board emptied by a reset.
    BoardCleared,
}

/// Presentation collaborator fed by [`RenderEvent`]s.
pub trait Presenter {
    /// A piece was placed.
    fn on_cell_changed(&mut self, at: Coord, symbol: Symbol);

    /// Cell is now the last move.
    fn on_highlight(&mut self, at: Coord);

    /// Cell is no longer the last move.
    fn on_clear_highlight(&mut self, at: Coord);

    /// Game ended with `winner` along `cells`.
    fn on_win(&mut self, winner: Symbol, cells: &[Coord]);

    /// Connection indicator changed.
    fn on_connection_status(&mut self, status: &ConnectionStatus);

    /// Local symbol assigned.
    fn on_identity(&mut self, _symbol: Symbol) {}

    /// Turn changed.
    fn on_turn(&mut self, _symbol: Symbol) {}

    /// Board emptied.
    fn on_board_cleared(&mut self) {}
}

impl RenderEvent {
    /// Routes this event to the matching presenter callback.
    pub fn apply_to<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        match self {
            RenderEvent::CellChanged { at, symbol } => presenter.on_cell_changed(*at, *symbol),
            RenderEvent::Highlight(at) => presenter.on_highlight(*at),
            RenderEvent::ClearHighlight(at) => presenter.on_clear_highlight(*at),
            RenderEvent::Win { winner, cells } => presenter.on_win(*winner, cells),
            RenderEvent::ConnectionStatus(status) => presenter.on_connection_status(status),
            RenderEvent::IdentityAssigned(symbol) => presenter.on_identity(*symbol),
            RenderEvent::TurnChanged(symbol) => presenter.on_turn(*symbol),
            RenderEvent::BoardCleared => presenter.on_board_cleared(),
        }
    }
}

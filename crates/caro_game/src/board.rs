//! Board model: grid of confirmed placements plus highlight metadata.

use tracing::{debug, instrument};

use crate::error::BoardError;
use crate::types::{Cell, CellMark, Coord, Symbol};

/// Side length of the standard board.
pub const BOARD_SIZE: usize = 15;

/// N×N five-in-a-row board.
///
/// Cells only ever move from [`Cell::Empty`] to [`Cell::Occupied`]; the only
/// way back is [`Board::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Cells in row-major order.
    cells: Vec<Cell>,
    last_move: Option<Coord>,
    winning: Vec<Coord>,
}

impl Board {
    /// Creates an empty `size`×`size` board.
    #[instrument]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            last_move: None,
            winning: Vec::new(),
        }
    }

    /// Creates an empty 15×15 board.
    pub fn standard() -> Self {
        Self::new(BOARD_SIZE)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if `coord` lies on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    fn index(&self, coord: Coord) -> Result<usize, BoardError> {
        if self.contains(coord) {
            Ok(coord.row * self.size + coord.col)
        } else {
            Err(BoardError::OutOfBounds {
                row: coord.row,
                col: coord.col,
                size: self.size,
            })
        }
    }

    /// Gets the cell at `coord`, or `None` when off the board.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).ok().map(|i| self.cells[i])
    }

    /// Checks if the cell at `coord` is on the board and empty.
    pub fn is_empty_at(&self, coord: Coord) -> bool {
        matches!(self.get(coord), Some(Cell::Empty))
    }

    /// Checks that a piece could be placed at `coord` without mutating.
    pub fn check_place(&self, coord: Coord) -> Result<(), BoardError> {
        let idx = self.index(coord)?;
        if self.cells[idx] != Cell::Empty {
            return Err(BoardError::AlreadyOccupied {
                row: coord.row,
                col: coord.col,
            });
        }
        Ok(())
    }

    /// Places `symbol` at `coord`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for invalid coordinates, `AlreadyOccupied` if the cell
    /// holds a piece. The board is unchanged on error.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn place(&mut self, coord: Coord, symbol: Symbol) -> Result<(), BoardError> {
        self.check_place(coord)?;
        let idx = self.index(coord)?;
        self.cells[idx] = Cell::Occupied(symbol);
        debug!(%coord, %symbol, "Cell placed");
        Ok(())
    }

    /// Current last-move marker.
    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    /// Moves the last-move marker to `coord` and returns the previous marker.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for invalid coordinates, `Unoccupied` if no piece is on
    /// the cell.
    #[instrument(skip(self))]
    pub fn set_last_move(&mut self, coord: Coord) -> Result<Option<Coord>, BoardError> {
        match self.get(coord) {
            None => Err(BoardError::OutOfBounds {
                row: coord.row,
                col: coord.col,
                size: self.size,
            }),
            Some(Cell::Empty) => Err(BoardError::Unoccupied {
                row: coord.row,
                col: coord.col,
            }),
            Some(Cell::Occupied(_)) => Ok(self.last_move.replace(coord)),
        }
    }

    /// Removes the last-move marker, returning where it was.
    pub fn clear_last_move(&mut self) -> Option<Coord> {
        self.last_move.take()
    }

    /// Flags `coord` as part of the winning line.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for invalid coordinates.
    pub fn mark_winning(&mut self, coord: Coord) -> Result<(), BoardError> {
        self.index(coord)?;
        if !self.winning.contains(&coord) {
            self.winning.push(coord);
        }
        Ok(())
    }

    /// Checks if `coord` is part of the winning line.
    pub fn is_winning(&self, coord: Coord) -> bool {
        self.winning.contains(&coord)
    }

    /// Winning cells in the order they were marked.
    pub fn winning_cells(&self) -> &[Coord] {
        &self.winning
    }

    /// Visual category of the cell at `coord`.
    pub fn cell_mark(&self, coord: Coord) -> CellMark {
        if self.is_winning(coord) {
            CellMark::Winning
        } else if self.last_move == Some(coord) {
            CellMark::LastMove
        } else {
            CellMark::Plain
        }
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Empties every cell and drops all highlight metadata.
    #[instrument(skip(self), fields(occupied = self.occupied_count()))]
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = Cell::Empty);
        self.last_move = None;
        self.winning.clear();
        debug!("Board reset");
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Symbol::X) => 'X',
                    Cell::Occupied(Symbol::O) => 'O',
                })
                .collect();
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

//! Tests for the board model.

use caro_game::{BOARD_SIZE, Board, BoardError, Cell, CellMark, Coord, Symbol};

#[test]
fn test_new_board_is_empty() {
    let board = Board::standard();
    assert_eq!(board.size(), BOARD_SIZE);
    assert_eq!(board.occupied_count(), 0);
    assert_eq!(board.last_move(), None);
    assert!(board.winning_cells().is_empty());
    assert!(board.is_empty_at(Coord::new(0, 0)));
    assert!(board.is_empty_at(Coord::new(14, 14)));
}

#[test]
fn test_place_then_read_every_cell() {
    let mut board = Board::standard();
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let symbol = if (row + col) % 2 == 0 { Symbol::X } else { Symbol::O };
            board.place(Coord::new(row, col), symbol).expect("Empty cell");
            assert_eq!(board.get(Coord::new(row, col)), Some(Cell::Occupied(symbol)));
        }
    }
    assert_eq!(board.occupied_count(), BOARD_SIZE * BOARD_SIZE);
}

#[test]
fn test_place_occupied_fails_and_leaves_board_unchanged() {
    let mut board = Board::standard();
    board.place(Coord::new(3, 4), Symbol::X).unwrap();
    let before = board.clone();

    let result = board.place(Coord::new(3, 4), Symbol::O);
    assert_eq!(result, Err(BoardError::AlreadyOccupied { row: 3, col: 4 }));
    assert_eq!(board, before);
    assert_eq!(board.get(Coord::new(3, 4)), Some(Cell::Occupied(Symbol::X)));
}

#[test]
fn test_place_out_of_bounds() {
    let mut board = Board::standard();
    let result = board.place(Coord::new(15, 0), Symbol::X);
    assert!(matches!(result, Err(BoardError::OutOfBounds { row: 15, col: 0, size: 15 })));
    assert_eq!(board.get(Coord::new(0, 15)), None);
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_set_last_move_moves_marker() {
    let mut board = Board::standard();
    board.place(Coord::new(7, 7), Symbol::X).unwrap();
    board.place(Coord::new(7, 8), Symbol::O).unwrap();

    assert_eq!(board.set_last_move(Coord::new(7, 7)), Ok(None));
    assert_eq!(board.set_last_move(Coord::new(7, 8)), Ok(Some(Coord::new(7, 7))));
    assert_eq!(board.last_move(), Some(Coord::new(7, 8)));
    assert_eq!(board.cell_mark(Coord::new(7, 7)), CellMark::Plain);
    assert_eq!(board.cell_mark(Coord::new(7, 8)), CellMark::LastMove);
}

#[test]
fn test_set_last_move_requires_piece() {
    let mut board = Board::standard();
    let result = board.set_last_move(Coord::new(2, 2));
    assert_eq!(result, Err(BoardError::Unoccupied { row: 2, col: 2 }));
    assert_eq!(board.last_move(), None);
}

#[test]
fn test_winning_mark_takes_precedence() {
    let mut board = Board::standard();
    board.place(Coord::new(0, 0), Symbol::O).unwrap();
    board.set_last_move(Coord::new(0, 0)).unwrap();
    board.mark_winning(Coord::new(0, 0)).unwrap();
    board.mark_winning(Coord::new(0, 0)).unwrap();

    assert_eq!(board.cell_mark(Coord::new(0, 0)), CellMark::Winning);
    assert_eq!(board.winning_cells(), &[Coord::new(0, 0)]);
    assert!(board.mark_winning(Coord::new(0, 20)).is_err());
}

#[test]
fn test_reset_is_idempotent() {
    let mut board = Board::standard();
    board.place(Coord::new(1, 1), Symbol::X).unwrap();
    board.place(Coord::new(2, 2), Symbol::O).unwrap();
    board.set_last_move(Coord::new(2, 2)).unwrap();
    board.mark_winning(Coord::new(1, 1)).unwrap();

    board.reset();
    let once = board.clone();
    board.reset();

    assert_eq!(board, once);
    assert_eq!(board, Board::standard());
}

#[test]
fn test_display_renders_grid() {
    let mut board = Board::new(3);
    board.place(Coord::new(0, 0), Symbol::X).unwrap();
    board.place(Coord::new(1, 1), Symbol::O).unwrap();
    assert_eq!(board.to_string(), "X..\n.O.\n...");
}

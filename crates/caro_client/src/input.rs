//! Keyboard mapping to [`Intent`]s.

use crate::app::Intent;
use caro_game::{Coord, GameMode, Phase};
use crossterm::event::KeyCode;
use strum::IntoEnumIterator;

/// Moves the cursor one cell, clamped to a `size`×`size` board.
pub fn move_cursor(cursor: Coord, key: KeyCode, size: usize) -> Coord {
    let last = size.saturating_sub(1);
    match key {
        KeyCode::Up | KeyCode::Char('k') => Coord::new(cursor.row.saturating_sub(1), cursor.col),
        KeyCode::Down | KeyCode::Char('j') => Coord::new((cursor.row + 1).min(last), cursor.col),
        KeyCode::Left | KeyCode::Char('h') => Coord::new(cursor.row, cursor.col.saturating_sub(1)),
        KeyCode::Right | KeyCode::Char('l') => Coord::new(cursor.row, (cursor.col + 1).min(last)),
        _ => cursor,
    }
}

/// Mode listed under digit `c` in the menu, counting from 1.
pub fn menu_mode(c: char) -> Option<GameMode> {
    let index = c.to_digit(10)?.checked_sub(1)?;
    GameMode::iter().nth(index as usize)
}

/// Maps a key press to an intent for the current screen.
///
/// `dialog_open` routes Enter and Esc to the game-over dialog.
pub fn intent_for(
    key: KeyCode,
    phase: Phase,
    cursor: Coord,
    size: usize,
    dialog_open: bool,
) -> Option<Intent> {
    if phase == Phase::Menu {
        return match key {
            KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Quit),
            KeyCode::Char(c) => menu_mode(c).map(Intent::ModeChosen),
            _ => None,
        };
    }

    if dialog_open {
        match key {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('c') => {
                return Some(Intent::DismissDialog);
            }
            _ => {}
        }
    }

    match key {
        KeyCode::Up
        | KeyCode::Down
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Char('h' | 'j' | 'k' | 'l') => {
            Some(Intent::MoveCursor(move_cursor(cursor, key, size)))
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(Intent::CellClicked(cursor)),
        KeyCode::Char('r') => Some(Intent::ResetRequested),
        KeyCode::Char('m') | KeyCode::Esc => Some(Intent::ExitRequested),
        KeyCode::Char('q') => Some(Intent::Quit),
        _ => None,
    }
}

//! Tests for keyboard mapping.

use caro_client::{Intent, intent_for, menu_mode, move_cursor};
use caro_game::{Coord, GameMode, Phase};
use crossterm::event::KeyCode;

#[test]
fn test_cursor_moves_and_clamps_at_edges() {
    let origin = Coord::new(0, 0);
    assert_eq!(move_cursor(origin, KeyCode::Up, 15), origin);
    assert_eq!(move_cursor(origin, KeyCode::Left, 15), origin);
    assert_eq!(move_cursor(origin, KeyCode::Down, 15), Coord::new(1, 0));
    assert_eq!(move_cursor(origin, KeyCode::Right, 15), Coord::new(0, 1));

    let corner = Coord::new(14, 14);
    assert_eq!(move_cursor(corner, KeyCode::Down, 15), corner);
    assert_eq!(move_cursor(corner, KeyCode::Right, 15), corner);
    assert_eq!(move_cursor(corner, KeyCode::Char('k'), 15), Coord::new(13, 14));
}

#[test]
fn test_menu_keys_choose_modes() {
    let cursor = Coord::new(7, 7);
    assert_eq!(
        intent_for(KeyCode::Char('1'), Phase::Menu, cursor, 15, false),
        Some(Intent::ModeChosen(GameMode::TwoPlayer))
    );
    assert_eq!(
        intent_for(KeyCode::Char('2'), Phase::Menu, cursor, 15, false),
        Some(Intent::ModeChosen(GameMode::VsComputer))
    );
    assert_eq!(intent_for(KeyCode::Enter, Phase::Menu, cursor, 15, false), None);
    assert_eq!(
        intent_for(KeyCode::Char('q'), Phase::Menu, cursor, 15, false),
        Some(Intent::Quit)
    );
}

#[test]
fn test_game_keys() {
    let cursor = Coord::new(3, 4);
    assert_eq!(
        intent_for(KeyCode::Enter, Phase::Playing, cursor, 15, false),
        Some(Intent::CellClicked(cursor))
    );
    assert_eq!(
        intent_for(KeyCode::Right, Phase::Playing, cursor, 15, false),
        Some(Intent::MoveCursor(Coord::new(3, 5)))
    );
    assert_eq!(
        intent_for(KeyCode::Char('r'), Phase::GameOver, cursor, 15, false),
        Some(Intent::ResetRequested)
    );
    assert_eq!(
        intent_for(KeyCode::Char('m'), Phase::Connecting, cursor, 15, false),
        Some(Intent::ExitRequested)
    );
    assert_eq!(
        intent_for(KeyCode::Char('1'), Phase::Playing, cursor, 15, false),
        None
    );
}

#[test]
fn test_open_dialog_captures_enter_and_esc() {
    let cursor = Coord::new(7, 7);
    assert_eq!(
        intent_for(KeyCode::Enter, Phase::GameOver, cursor, 15, true),
        Some(Intent::DismissDialog)
    );
    assert_eq!(
        intent_for(KeyCode::Esc, Phase::GameOver, cursor, 15, true),
        Some(Intent::DismissDialog)
    );
    assert_eq!(
        intent_for(KeyCode::Char('r'), Phase::GameOver, cursor, 15, true),
        Some(Intent::ResetRequested)
    );
    assert_eq!(
        intent_for(KeyCode::Esc, Phase::GameOver, cursor, 15, false),
        Some(Intent::ExitRequested)
    );
}

#[test]
fn test_menu_digits_follow_mode_order() {
    assert_eq!(menu_mode('1'), Some(GameMode::TwoPlayer));
    assert_eq!(menu_mode('2'), Some(GameMode::VsComputer));
    assert_eq!(menu_mode('0'), None);
    assert_eq!(menu_mode('3'), None);
    assert_eq!(menu_mode('x'), None);
    assert_eq!(
        intent_for(KeyCode::Char('3'), Phase::Menu, Coord::new(0, 0), 15, false),
        None
    );
}

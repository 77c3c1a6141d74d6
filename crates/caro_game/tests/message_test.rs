//! Tests for wire message encoding and decoding.

use caro_game::{
    ClientMessage, Coord, GameMode, MessageKind, MoveNotice, ProtocolErrorKind, ServerMessage,
    Symbol, WinNotice,
};
use serde_json::{Value, json};

fn encoded(message: &ClientMessage) -> Value {
    serde_json::from_str(&message.encode().expect("Encodable")).expect("Valid JSON")
}

#[test]
fn test_client_messages_match_wire_format() {
    assert_eq!(
        encoded(&ClientMessage::game_mode(GameMode::TwoPlayer)),
        json!({"type": "game_mode", "mode": "two_player"})
    );
    assert_eq!(
        encoded(&ClientMessage::game_mode(GameMode::VsComputer)),
        json!({"type": "game_mode", "mode": "vs_computer"})
    );
    assert_eq!(encoded(&ClientMessage::reset()), json!({"type": "reset"}));
    assert_eq!(
        encoded(&ClientMessage::move_to(Coord::new(7, 7))),
        json!({"row": 7, "col": 7})
    );
}

#[test]
fn test_decode_assignment_and_turn() {
    let msg = ServerMessage::decode(r#"{"type":"player_assignment","player":"O"}"#).unwrap();
    assert_eq!(msg, ServerMessage::PlayerAssignment { player: Symbol::O });
    assert_eq!(msg.kind(), MessageKind::PlayerAssignment);

    let msg = ServerMessage::decode(r#"{"type":"turn_update","current_player":"X"}"#).unwrap();
    assert_eq!(msg, ServerMessage::TurnUpdate { current_player: Symbol::X });
}

#[test]
fn test_decode_move_with_last_move() {
    let text = json!({
        "type": "move", "row": 3, "col": 4, "player": "X",
        "last_move": {"row": 3, "col": 4}
    })
    .to_string();

    let msg = ServerMessage::decode(&text).unwrap();
    assert_eq!(
        msg,
        ServerMessage::Move(MoveNotice {
            at: Coord::new(3, 4),
            player: Symbol::X,
            last_move: Some(Coord::new(3, 4)),
        })
    );
}

#[test]
fn test_untyped_move_decodes_like_typed_move() {
    let legacy = ServerMessage::decode(r#"{"row":3,"col":4,"player":"X"}"#).unwrap();
    let typed = ServerMessage::decode(r#"{"type":"move","row":3,"col":4,"player":"X"}"#).unwrap();
    assert_eq!(legacy, typed);
    assert_eq!(legacy.kind(), MessageKind::Move);
}

#[test]
fn test_unknown_type_with_move_fields_is_a_move() {
    let msg = ServerMessage::decode(r#"{"type":"chat","row":1,"col":2,"player":"O"}"#).unwrap();
    assert_eq!(msg.kind(), MessageKind::Move);
}

#[test]
fn test_decode_win() {
    let text = json!({
        "type": "win", "row": 7, "col": 11, "player": "X",
        "winning_cells": [
            {"row": 7, "col": 7}, {"row": 7, "col": 8}, {"row": 7, "col": 9},
            {"row": 7, "col": 10}, {"row": 7, "col": 11}
        ]
    })
    .to_string();

    let ServerMessage::Win(WinNotice { at, player, winning_cells, last_move }) =
        ServerMessage::decode(&text).unwrap()
    else {
        panic!("Expected win");
    };
    assert_eq!(at, Some(Coord::new(7, 11)));
    assert_eq!(player, Symbol::X);
    assert_eq!(winning_cells.len(), 5);
    assert_eq!(last_move, None);
}

#[test]
fn test_win_without_position_or_cells() {
    let msg = ServerMessage::decode(r#"{"type":"win","player":"O"}"#).unwrap();
    assert_eq!(
        msg,
        ServerMessage::Win(WinNotice {
            at: None,
            player: Symbol::O,
            winning_cells: Vec::new(),
            last_move: None,
        })
    );
}

#[test]
fn test_missing_fields_are_reported() {
    let err = ServerMessage::decode(r#"{"type":"move","row":3,"player":"X"}"#).unwrap_err();
    assert_eq!(err.kind, ProtocolErrorKind::MissingField("col"));

    let err = ServerMessage::decode(r#"{"type":"turn_update"}"#).unwrap_err();
    assert_eq!(err.kind, ProtocolErrorKind::MissingField("current_player"));

    let err = ServerMessage::decode(r#"{"type":"game_mode","mode":"two_player"}"#).unwrap_err();
    assert_eq!(err.kind, ProtocolErrorKind::MissingField("row"));
}

#[test]
fn test_malformed_payloads_are_rejected() {
    for text in [
        "not json",
        "[1, 2, 3]",
        r#"{"type":"move","row":-1,"col":0,"player":"X"}"#,
        r#"{"type":"player_assignment","player":"Z"}"#,
    ] {
        let err = ServerMessage::decode(text).unwrap_err();
        assert!(
            matches!(err.kind, ProtocolErrorKind::Malformed(_)),
            "expected malformed for {text}, got {err}"
        );
    }
}

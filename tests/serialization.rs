use scachera::{Color, ExportedState, Position, PositionDescriptor, Square};

#[test]
fn exported_layout_rebuilds_the_same_position() {
    let mut pos = Position::new();
    let opening =
        [("e2", "e4"), ("c7", "c5"), ("g1", "f3"), ("d7", "d6"), ("d2", "d4"), ("c5", "d4")];
    for (from, to) in opening {
        pos.make_move(from, to).unwrap();
    }

    let exported = pos.export();
    let rebuilt = Position::from_descriptor(&pos.to_descriptor()).unwrap();

    assert_eq!(rebuilt.export().pieces, exported.pieces);
    assert_eq!(rebuilt.turn(), pos.turn());
    assert_eq!(rebuilt.to_fen(), pos.to_fen());
    assert_eq!(rebuilt.legal_moves(), pos.legal_moves());
}

#[test]
fn exported_state_has_the_documented_shape() {
    let mut pos = Position::new();
    pos.make_move("e2", "e4").unwrap();
    let json = serde_json::to_value(pos.export()).unwrap();

    assert_eq!(json["turn"], "black");
    assert_eq!(json["pieces"]["E4"], "P");
    assert_eq!(json["pieces"]["E8"], "k");
    assert_eq!(json["moves"]["G8"], serde_json::json!(["F6", "H6"]));
    assert_eq!(json["isFinished"], false);
    assert_eq!(json["checkMate"], false);
    assert_eq!(json["castling"]["whiteShort"], true);
    assert_eq!(json["counters"], serde_json::json!({ "halfMove": 0, "fullMove": 1 }));
    assert_eq!(json["enPassant"], "E3");

    let back: ExportedState = serde_json::from_value(json).unwrap();
    assert_eq!(back, pos.export());
}

#[test]
fn loader_json_builds_a_position() {
    let json = r#"{
        "pieces": { "e1": "K", "h1": "R", "e8": "k", "a7": "p" },
        "turn": "black",
        "castling": { "whiteLong": false, "blackShort": false, "blackLong": false },
        "counters": { "halfMove": 4, "fullMove": 21 }
    }"#;
    let descriptor: PositionDescriptor = serde_json::from_str(json).unwrap();
    let pos = Position::from_descriptor(&descriptor).unwrap();

    assert_eq!(pos.turn(), Color::Black);
    assert_eq!(pos.piece_at(Square::H1).map(|p| p.to_char()), Some('R'));
    assert_eq!(pos.to_fen(), "4k3/p7/8/8/8/8/8/4K2R b K - 4 21");
    assert!(pos.legal_moves().contains_key(&Square::A7));
}

//! Integration tests for the qmp-core action pipeline.
//!
//! These tests parse JSON actions through the public API, normalize them with
//! a [`ScreenGeometry`], and check the resulting commands serialize to the
//! exact QMP wire shapes.

use qmp_core::{
    encode_command, Action, Command, InputAxis, InputEvent, Point, ScreenGeometry,
    ValidationError,
};
use serde_json::{json, Value};

fn parse(value: Value) -> Action {
    Action::from_value(&value).expect("action must parse")
}

#[test]
fn test_center_move_normalizes_to_half_range() {
    // Arrange
    let geometry = ScreenGeometry::default();
    let action = parse(json!({"type": "move", "point": {"x": 640, "y": 360}}));

    // Act
    let normalized = geometry.normalize_action(&action);

    // Assert
    assert_eq!(
        normalized,
        Action::Move {
            point: Some(Point::new(16383, 16383)),
            offset: None,
        }
    );
}

#[test]
fn test_drag_path_and_move_offset_share_the_formula() {
    let geometry = ScreenGeometry::default();
    let drag = parse(json!({
        "type": "drag",
        "path": [{"x": 0, "y": 0}, {"x": 1280, "y": 720}]
    }));
    let nudge = parse(json!({"type": "move", "offset": {"x": 1280, "y": -720}}));

    let Action::Drag { path, .. } = geometry.normalize_action(&drag) else {
        panic!("drag stays a drag");
    };
    let Action::Move { offset, .. } = geometry.normalize_action(&nudge) else {
        panic!("move stays a move");
    };

    assert_eq!(path, vec![Point::new(0, 0), Point::new(32767, 32767)]);
    assert_eq!(offset, Some(Point::new(32767, -32767)));
}

#[test]
fn test_batch_with_unknown_type_fails_to_parse() {
    let batch = [
        json!({"type": "press", "keys": ["ctrl", "c"]}),
        json!({"type": "hover"}),
    ];

    let results: Vec<_> = batch.iter().map(Action::from_value).collect();

    assert!(results[0].is_ok());
    assert_eq!(
        results[1],
        Err(ValidationError::UnknownActionType("hover".to_string()))
    );
}

#[test]
fn test_input_events_command_encodes_one_line() {
    // Arrange
    let command = Command::input_events(vec![
        InputEvent::abs(InputAxis::X, 16383),
        InputEvent::abs(InputAxis::Y, 16383),
        InputEvent::button("left", true),
    ]);

    // Act
    let bytes = encode_command(&command).unwrap();

    // Assert
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
    assert_eq!(bytes.last(), Some(&b'\n'));
    let decoded: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        decoded,
        json!({
            "execute": "input-send-event",
            "arguments": {"events": [
                {"type": "abs", "data": {"axis": "x", "value": 16383}},
                {"type": "abs", "data": {"axis": "y", "value": 16383}},
                {"type": "btn", "data": {"down": true, "button": "left"}}
            ]}
        })
    );
}

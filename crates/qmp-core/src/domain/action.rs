//! Semantic UI actions.
//!
//! An [`Action`] is one human-level gesture ("click here", "type this",
//! "drag along this path").  Actions arrive as JSON objects with a `type`
//! discriminator:
//!
//! ```json
//! {"type": "click", "point": {"x": 100, "y": 200}, "button": "right"}
//! {"type": "type", "text": "Hello!"}
//! {"type": "drag", "path": [{"x": 0, "y": 0}, {"x": 50, "y": 50}], "pattern": [20]}
//! ```
//!
//! Parsing ([`Action::from_value`]) rejects unknown types and structurally
//! invalid fields.  [`Action::validate`] then checks the cross-field rules
//! that serde cannot express (a drag needs two points, a move needs a point
//! or an offset, ...).  Both run before the first byte of an action reaches
//! the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::geometry::Point;

/// Default mouse button for `click`.
pub const DEFAULT_BUTTON: &str = "left";

/// Default `wait` duration in milliseconds.
pub const DEFAULT_WAIT_MS: u64 = 1000;

/// Largest accepted scroll amount on either axis, in wheel notches.
///
/// Each notch becomes one event in a single `input-send-event` batch.
pub const MAX_SCROLL_NOTCHES: u64 = 1000;

/// Every `type` tag accepted by [`Action::from_value`], aliases included.
pub const ACTION_TYPES: &[&str] = &[
    "key-down",
    "key_down",
    "keydown",
    "key-up",
    "key_up",
    "keyup",
    "click",
    "press",
    "type",
    "scroll",
    "move",
    "drag",
    "wait",
    "screenshot",
];

/// Errors raised when an action is rejected before execution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The action is not a JSON object or has no string `type` field.
    #[error("action must be an object with a string \"type\" field")]
    MissingType,

    /// The `type` tag names no known action.
    #[error("unknown action type: {0:?}")]
    UnknownActionType(String),

    /// A field has the wrong shape or a required field is absent.
    #[error("invalid {action} action: {reason}")]
    Malformed { action: String, reason: String },

    /// A field required by the action's semantics is absent.
    #[error("{action} action requires {field}")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    /// `press` was given no keys.
    #[error("press action requires at least one key")]
    EmptyKeys,

    /// `drag` needs a start and at least one more point.
    #[error("drag path needs at least 2 points, got {len}")]
    PathTooShort { len: usize },

    /// A scroll amount exceeds [`MAX_SCROLL_NOTCHES`] on some axis.
    #[error("scroll amount exceeds {max} notches")]
    ScrollTooLarge { max: u64 },
}

/// Horizontal and vertical scroll amounts, in wheel notches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollAmount {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
}

/// One semantic UI action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Press the listed keys and leave them down.
    #[serde(alias = "key_down", alias = "keydown")]
    KeyDown {
        #[serde(default)]
        keys: Vec<String>,
    },

    /// Release the listed keys.
    #[serde(alias = "key_up", alias = "keyup")]
    KeyUp {
        #[serde(default)]
        keys: Vec<String>,
    },

    /// Click (or multi-click) a mouse button at a position.
    Click {
        point: Point,
        #[serde(default = "default_button")]
        button: String,
        /// Delays in milliseconds before each repeated click.
        #[serde(default)]
        pattern: Option<Vec<u64>>,
        #[serde(default)]
        hold_keys: Vec<String>,
    },

    /// Press a key chord (e.g. `["ctrl", "c"]`).
    Press {
        #[serde(default)]
        keys: Vec<String>,
    },

    /// Type a string character by character.
    Type { text: String },

    /// Scroll the wheel, optionally after moving to `point`.
    Scroll {
        #[serde(default)]
        point: Option<Point>,
        #[serde(default)]
        scroll: Option<ScrollAmount>,
        #[serde(default)]
        hold_keys: Vec<String>,
    },

    /// Move the pointer to `point`, or by `offset`.
    Move {
        #[serde(default)]
        point: Option<Point>,
        #[serde(default)]
        offset: Option<Point>,
    },

    /// Press the left button at `path[0]`, move through the path, release.
    Drag {
        path: Vec<Point>,
        /// Delays in milliseconds between waypoints after the first move.
        #[serde(default)]
        pattern: Option<Vec<u64>>,
        #[serde(default)]
        hold_keys: Vec<String>,
    },

    /// Pause for `time` milliseconds.
    Wait {
        #[serde(default, alias = "duration")]
        time: Option<u64>,
    },

    /// Placeholder; capture happens at the session level.
    Screenshot,
}

fn default_button() -> String {
    DEFAULT_BUTTON.to_string()
}

impl Action {
    /// Parses a JSON action object.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingType`] if there is no string `type`.
    /// - [`ValidationError::UnknownActionType`] for an unrecognized tag.
    /// - [`ValidationError::Malformed`] if a field has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingType)?;

        if !ACTION_TYPES.contains(&tag) {
            return Err(ValidationError::UnknownActionType(tag.to_string()));
        }

        serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed {
            action: tag.to_string(),
            reason: e.to_string(),
        })
    }

    /// The canonical `type` tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::KeyDown { .. } => "key-down",
            Action::KeyUp { .. } => "key-up",
            Action::Click { .. } => "click",
            Action::Press { .. } => "press",
            Action::Type { .. } => "type",
            Action::Scroll { .. } => "scroll",
            Action::Move { .. } => "move",
            Action::Drag { .. } => "drag",
            Action::Wait { .. } => "wait",
            Action::Screenshot => "screenshot",
        }
    }

    /// Checks the cross-field rules of this action.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Action::Press { keys } if keys.is_empty() => Err(ValidationError::EmptyKeys),
            Action::Scroll { scroll: None, .. } => Err(ValidationError::MissingField {
                action: "scroll",
                field: "scroll",
            }),
            Action::Scroll {
                scroll: Some(amount),
                ..
            } if amount.x.unsigned_abs() > MAX_SCROLL_NOTCHES
                || amount.y.unsigned_abs() > MAX_SCROLL_NOTCHES =>
            {
                Err(ValidationError::ScrollTooLarge {
                    max: MAX_SCROLL_NOTCHES,
                })
            }
            Action::Move {
                point: None,
                offset: None,
            } => Err(ValidationError::MissingField {
                action: "move",
                field: "point or offset",
            }),
            Action::Drag { path, .. } if path.len() < 2 => {
                Err(ValidationError::PathTooShort { len: path.len() })
            }
            _ => Ok(()),
        }
    }

    /// Returns a copy of this action with `f` applied to every `point`,
    /// `offset`, and `path` entry.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Action {
        let mut action = self.clone();
        match &mut action {
            Action::Click { point, .. } => *point = f(*point),
            Action::Scroll { point, .. } => *point = point.map(&f),
            Action::Move { point, offset } => {
                *point = point.map(&f);
                *offset = offset.map(&f);
            }
            Action::Drag { path, .. } => {
                for p in path.iter_mut() {
                    *p = f(*p);
                }
            }
            Action::KeyDown { .. }
            | Action::KeyUp { .. }
            | Action::Press { .. }
            | Action::Type { .. }
            | Action::Wait { .. }
            | Action::Screenshot => {}
        }
        action
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_click_with_defaults() {
        // Arrange
        let value = json!({"type": "click", "point": {"x": 10, "y": 20}});

        // Act
        let action = Action::from_value(&value).unwrap();

        // Assert
        assert_eq!(
            action,
            Action::Click {
                point: Point::new(10, 20),
                button: "left".to_string(),
                pattern: None,
                hold_keys: vec![],
            }
        );
    }

    #[test]
    fn test_parse_key_down_aliases() {
        for tag in ["key-down", "key_down", "keydown"] {
            let action = Action::from_value(&json!({"type": tag, "keys": ["ctrl"]})).unwrap();
            assert_eq!(action.kind(), "key-down");
        }
    }

    #[test]
    fn test_parse_wait_duration_alias() {
        let action = Action::from_value(&json!({"type": "wait", "duration": 250})).unwrap();
        assert_eq!(action, Action::Wait { time: Some(250) });
    }

    #[test]
    fn test_parse_screenshot() {
        let action = Action::from_value(&json!({"type": "screenshot"})).unwrap();
        assert_eq!(action, Action::Screenshot);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = Action::from_value(&json!({"type": "frobnicate"}));
        assert_eq!(
            result,
            Err(ValidationError::UnknownActionType("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_missing_type_is_rejected() {
        assert_eq!(
            Action::from_value(&json!({"keys": ["a"]})),
            Err(ValidationError::MissingType)
        );
        assert_eq!(
            Action::from_value(&json!("click")),
            Err(ValidationError::MissingType)
        );
    }

    #[test]
    fn test_click_without_point_is_malformed() {
        let result = Action::from_value(&json!({"type": "click"}));
        assert!(matches!(result, Err(ValidationError::Malformed { ref action, .. }) if action == "click"));
    }

    #[test]
    fn test_validate_press_requires_keys() {
        assert_eq!(
            Action::Press { keys: vec![] }.validate(),
            Err(ValidationError::EmptyKeys)
        );
    }

    #[test]
    fn test_validate_scroll_requires_amount() {
        let action = Action::Scroll {
            point: None,
            scroll: None,
            hold_keys: vec![],
        };
        assert!(matches!(
            action.validate(),
            Err(ValidationError::MissingField { field: "scroll", .. })
        ));
    }

    #[test]
    fn test_validate_scroll_bounds_each_axis() {
        let scroll = |x: i64, y: i64| Action::Scroll {
            point: None,
            scroll: Some(ScrollAmount { x, y }),
            hold_keys: vec![],
        };
        let too_large = Err(ValidationError::ScrollTooLarge {
            max: MAX_SCROLL_NOTCHES,
        });

        assert_eq!(scroll(1000, -1000).validate(), Ok(()));
        assert_eq!(scroll(1001, 0).validate(), too_large);
        assert_eq!(scroll(0, i64::MIN).validate(), too_large);
    }

    #[test]
    fn test_validate_move_requires_point_or_offset() {
        let action = Action::Move {
            point: None,
            offset: None,
        };
        assert!(action.validate().is_err());
    }

    #[test]
    fn test_validate_drag_requires_two_points() {
        let action = Action::Drag {
            path: vec![Point::new(1, 1)],
            pattern: None,
            hold_keys: vec![],
        };
        assert_eq!(action.validate(), Err(ValidationError::PathTooShort { len: 1 }));
    }

    #[test]
    fn test_map_points_touches_point_offset_and_path_only() {
        // Arrange
        let double = |p: Point| Point::new(p.x * 2, p.y * 2);
        let mv = Action::Move {
            point: Some(Point::new(1, 2)),
            offset: Some(Point::new(-3, 4)),
        };
        let drag = Action::Drag {
            path: vec![Point::new(1, 1), Point::new(2, 3)],
            pattern: Some(vec![5]),
            hold_keys: vec!["shift".to_string()],
        };
        let typed = Action::Type {
            text: "hi".to_string(),
        };

        // Act / Assert
        assert_eq!(
            mv.map_points(double),
            Action::Move {
                point: Some(Point::new(2, 4)),
                offset: Some(Point::new(-6, 8)),
            }
        );
        assert_eq!(
            drag.map_points(double),
            Action::Drag {
                path: vec![Point::new(2, 2), Point::new(4, 6)],
                pattern: Some(vec![5]),
                hold_keys: vec!["shift".to_string()],
            }
        );
        assert_eq!(typed.map_points(double), typed);
    }

    #[test]
    fn test_map_points_does_not_modify_original() {
        let original = Action::Click {
            point: Point::new(5, 5),
            button: "left".to_string(),
            pattern: None,
            hold_keys: vec![],
        };
        let _ = original.map_points(|_| Point::new(0, 0));
        assert!(matches!(original, Action::Click { point, .. } if point == Point::new(5, 5)));
    }
}

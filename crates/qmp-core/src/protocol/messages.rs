//! QMP command and input event types.
//!
//! Every request sent to the QEMU Machine Protocol socket is a JSON object of
//! the form:
//!
//! ```json
//! {"execute": "input-send-event", "arguments": {"events": [...]}}
//! ```
//!
//! Responses are arbitrary JSON objects (`{"return": {}}` on success,
//! `{"error": {...}}` on failure).  This crate does not schematize them; the
//! translator treats each one as an opaque result.
//!
//! # Input events
//!
//! `input-send-event` carries a list of [`InputEvent`]s.  QEMU applies the
//! events of one command in list order, so the order in which a gesture
//! builds its batch is part of the gesture's meaning.  Each event is
//! serialized as a `{"type": ..., "data": ...}` union:
//!
//! | Kind      | Wire `type` | `data` fields                          |
//! |-----------|-------------|----------------------------------------|
//! | key       | `key`       | `down`, `key: {type: qcode, data: sym}` |
//! | absolute  | `abs`       | `axis` (`x`/`y`), `value`              |
//! | relative  | `rel`       | `axis` (`x`/`y`), `value`              |
//! | button    | `btn`       | `down`, `button`                       |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Command names ─────────────────────────────────────────────────────────────

/// Capability negotiation; must be the first command after the greeting.
pub const CMD_QMP_CAPABILITIES: &str = "qmp_capabilities";

/// Injects a batch of low-level input events.
pub const CMD_INPUT_SEND_EVENT: &str = "input-send-event";

/// Presses a key chord (all keys down in order, then all up in reverse).
pub const CMD_SEND_KEY: &str = "send-key";

/// Writes the current display contents to a file on the host.
pub const CMD_SCREENDUMP: &str = "screendump";

// ── Command ───────────────────────────────────────────────────────────────────

/// An outbound QMP request.
///
/// `arguments` is omitted from the serialized form when it is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The QMP command name.
    pub execute: String,
    /// Command arguments, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Map<String, Value>>,
}

impl Command {
    /// Creates a command with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            execute: name.into(),
            arguments: None,
        }
    }

    /// Creates a command with the given arguments.
    ///
    /// Anything other than a non-empty JSON object is dropped, so
    /// `Command::with_arguments("query-status", json!({}))` serializes
    /// without an `arguments` field.
    pub fn with_arguments(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        };
        Self {
            execute: name.into(),
            arguments,
        }
    }

    /// The `qmp_capabilities` handshake command.
    pub fn qmp_capabilities() -> Self {
        Self::new(CMD_QMP_CAPABILITIES)
    }

    /// An `input-send-event` command carrying `events` in order.
    ///
    /// The `events` argument is always present, even when the list is empty.
    pub fn input_events(events: Vec<InputEvent>) -> Self {
        let mut arguments = Map::new();
        arguments.insert(
            "events".to_string(),
            Value::Array(events.iter().map(InputEvent::to_value).collect()),
        );
        Self {
            execute: CMD_INPUT_SEND_EVENT.to_string(),
            arguments: Some(arguments),
        }
    }

    /// A `send-key` chord command for the given qcode names.
    pub fn send_key<S: AsRef<str>>(qcodes: &[S]) -> Self {
        let keys = qcodes
            .iter()
            .map(|q| KeyValue::Qcode(q.as_ref().to_string()).to_value())
            .collect();
        let mut arguments = Map::new();
        arguments.insert("keys".to_string(), Value::Array(keys));
        Self {
            execute: CMD_SEND_KEY.to_string(),
            arguments: Some(arguments),
        }
    }

    /// A `screendump` command writing `format` to `filename` on the host.
    pub fn screendump(filename: &str, format: &str) -> Self {
        let mut arguments = Map::new();
        arguments.insert("filename".to_string(), Value::String(filename.to_string()));
        arguments.insert("format".to_string(), Value::String(format.to_string()));
        Self {
            execute: CMD_SCREENDUMP.to_string(),
            arguments: Some(arguments),
        }
    }

    /// Returns the `input-send-event` events carried by this command, decoded.
    ///
    /// Returns an empty list for any other command or if decoding fails.
    pub fn events(&self) -> Vec<InputEvent> {
        self.arguments
            .as_ref()
            .and_then(|args| args.get("events"))
            .and_then(|events| serde_json::from_value(events.clone()).ok())
            .unwrap_or_default()
    }
}

// ── Input events ──────────────────────────────────────────────────────────────

/// Pointer axis for `abs` and `rel` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputAxis {
    X,
    Y,
}

/// A key identifier inside a `key` event or a `send-key` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum KeyValue {
    /// A symbolic QKeyCode name such as `ret` or `a`.
    Qcode(String),
}

impl KeyValue {
    fn to_value(&self) -> Value {
        // Serializing a tagged string cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Payload of a `key` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEventData {
    pub down: bool,
    pub key: KeyValue,
}

/// Payload of an `abs` or `rel` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisEventData {
    pub axis: InputAxis,
    pub value: i64,
}

/// Payload of a `btn` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEventData {
    pub down: bool,
    /// QMP button name: `left`, `middle`, `right`, `wheel-up`, `wheel-down`,
    /// `wheel-left`, `wheel-right`, `side`, `extra`.
    pub button: String,
}

/// One low-level input primitive inside an `input-send-event` batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    Key(KeyEventData),
    Abs(AxisEventData),
    Rel(AxisEventData),
    Btn(ButtonEventData),
}

impl InputEvent {
    /// A key press or release for the given qcode.
    pub fn key(qcode: impl Into<String>, down: bool) -> Self {
        InputEvent::Key(KeyEventData {
            down,
            key: KeyValue::Qcode(qcode.into()),
        })
    }

    /// An absolute pointer position on one axis.
    pub fn abs(axis: InputAxis, value: i64) -> Self {
        InputEvent::Abs(AxisEventData { axis, value })
    }

    /// A relative pointer motion on one axis.
    pub fn rel(axis: InputAxis, value: i64) -> Self {
        InputEvent::Rel(AxisEventData { axis, value })
    }

    /// A mouse button press or release.
    pub fn button(name: impl Into<String>, down: bool) -> Self {
        InputEvent::Btn(ButtonEventData {
            down,
            button: name.into(),
        })
    }

    fn to_value(&self) -> Value {
        // All payloads are plain strings, booleans, and integers.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

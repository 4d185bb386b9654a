//! TranslateActionsUseCase: decomposes semantic actions into QMP exchanges.
//!
//! This use case sits at the application layer.  It owns no connection; each
//! call borrows a [`QmpChannel`] for the duration of one action, and all
//! waiting goes through an injected [`Delay`] so tests run without wall-clock
//! sleeps.
//!
//! # Gesture decomposition
//!
//! | Action       | Exchanges                                                   |
//! |--------------|-------------------------------------------------------------|
//! | `key-down`   | 1: key↓ per key                                             |
//! | `key-up`     | 1: key↑ per key                                             |
//! | `click`      | abs+hold↓, click (×1+pattern), hold↑                        |
//! | `press`      | 1: `send-key` chord                                         |
//! | `type`       | per char: 1 (shifted, 4 events) or 2 (key↓, key↑)           |
//! | `scroll`     | hold↓+abs, wheel↓ ×n, hold↑                                 |
//! | `move`       | 1: abs x/y or rel x/y                                       |
//! | `drag`       | abs+hold↓+left↓, one move per waypoint, left↑+hold↑         |
//! | `wait`       | none (sleeps)                                               |
//! | `screenshot` | none                                                        |
//!
//! Every exchange completes (response read) before the next one is written.

use std::sync::Arc;
use std::time::Duration;

use qmp_core::{
    domain::action::{ScrollAmount, DEFAULT_WAIT_MS},
    keymap::{self, KeyMapper},
    Action, Command, InputAxis, InputEvent, Point, ProtocolError, ValidationError,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Button pressed and released by `drag`.
const DRAG_BUTTON: &str = "left";

/// Errors raised by a [`QmpChannel`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The socket could not be opened.
    #[error("failed to connect to QMP socket at {path}: {source}")]
    Connect {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The greeting or `qmp_capabilities` exchange did not complete.
    #[error("QMP capability negotiation failed: {0}")]
    Handshake(String),

    /// The peer closed the stream before a complete JSON object arrived.
    #[error("connection closed before a complete JSON object was received ({buffered} bytes buffered)")]
    ConnectionClosed { buffered: usize },

    /// The read buffer grew past its bound without forming an object.
    #[error("response exceeded {limit} bytes without forming a complete JSON object")]
    ResponseTooLarge { limit: usize },

    /// A socket read or write failed.
    #[error("I/O error on QMP socket: {0}")]
    Io(#[from] std::io::Error),

    /// The command could not be encoded.
    #[error(transparent)]
    Encode(#[from] ProtocolError),
}

/// Error type for action translation.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The action was rejected before any exchange.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An exchange failed partway through the action.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// One synchronous command/response channel to the host.
///
/// Implemented by the socket transport in the infrastructure layer and by
/// recording fakes in tests.
#[cfg_attr(test, mockall::automock)]
pub trait QmpChannel {
    /// Writes `command` and blocks until its complete response is read.
    fn exchange(&mut self, command: &Command) -> Result<Value, TransportError>;
}

/// Blocking pause between timed sub-steps (click patterns, drag waypoints,
/// `wait`).
pub trait Delay: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// The responses one action produced, in exchange order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionResult {
    pub responses: Vec<Value>,
}

/// The Translate Actions use case.
pub struct ActionTranslator {
    delay: Arc<dyn Delay>,
}

impl ActionTranslator {
    /// Creates a translator that waits through `delay`.
    pub fn new(delay: Arc<dyn Delay>) -> Self {
        Self { delay }
    }

    /// Executes one (already normalized) action over `channel`.
    ///
    /// Validation runs first, so a rejected action never touches the channel.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::Validation`] for invalid actions and
    /// [`TranslateError::Transport`] if any exchange fails.  Exchanges that
    /// completed before the failure are not undone.
    pub fn execute(
        &self,
        channel: &mut dyn QmpChannel,
        action: &Action,
    ) -> Result<ActionResult, TranslateError> {
        action.validate()?;
        debug!(action = action.kind(), "translating action");

        let responses = match action {
            Action::KeyDown { keys } => vec![send(channel, key_events(keys, true))?],
            Action::KeyUp { keys } => vec![send(channel, key_events(keys, false))?],
            Action::Click {
                point,
                button,
                pattern,
                hold_keys,
            } => self.click(channel, *point, button, pattern.as_deref(), hold_keys)?,
            Action::Press { keys } => press(channel, keys)?,
            Action::Type { text } => type_text(channel, text)?,
            Action::Scroll {
                point,
                scroll,
                hold_keys,
            } => scroll_wheel(channel, *point, scroll.unwrap_or_default(), hold_keys)?,
            Action::Move { point, offset } => move_pointer(channel, *point, *offset)?,
            Action::Drag {
                path,
                pattern,
                hold_keys,
            } => self.drag(channel, path, pattern.as_deref(), hold_keys)?,
            Action::Wait { time } => {
                let ms = time.unwrap_or(DEFAULT_WAIT_MS);
                debug!(ms, "waiting");
                self.delay.sleep(Duration::from_millis(ms));
                Vec::new()
            }
            Action::Screenshot => Vec::new(),
        };

        Ok(ActionResult { responses })
    }

    /// Position + held keys, then the click pair once per pattern entry plus
    /// one, then held-key release.
    fn click(
        &self,
        channel: &mut dyn QmpChannel,
        point: Point,
        button: &str,
        pattern: Option<&[u64]>,
        hold_keys: &[String],
    ) -> Result<Vec<Value>, TransportError> {
        let button = keymap::button_name(button);
        let mut responses = Vec::new();

        let mut pre = position_events(point);
        pre.extend(key_events(hold_keys, true));
        responses.push(send(channel, pre)?);

        let click = || {
            vec![
                InputEvent::button(button, true),
                InputEvent::button(button, false),
            ]
        };
        responses.push(send(channel, click())?);
        for &delay_ms in pattern.unwrap_or_default() {
            self.delay.sleep(Duration::from_millis(delay_ms));
            responses.push(send(channel, click())?);
        }

        responses.push(send(channel, key_events(hold_keys, false))?);
        Ok(responses)
    }

    fn drag(
        &self,
        channel: &mut dyn QmpChannel,
        path: &[Point],
        pattern: Option<&[u64]>,
        hold_keys: &[String],
    ) -> Result<Vec<Value>, TransportError> {
        let mut responses = Vec::with_capacity(path.len() + 1);

        let mut start = position_events(path[0]);
        start.extend(key_events(hold_keys, true));
        start.push(InputEvent::button(DRAG_BUTTON, true));
        responses.push(send(channel, start)?);

        match pattern {
            Some(pattern) if !pattern.is_empty() => {
                responses.push(send(channel, position_events(path[1]))?);
                // path[i] waits pattern[i - 2]; waypoints past the pattern move immediately.
                for (i, &point) in path[2..].iter().enumerate() {
                    if let Some(&delay_ms) = pattern.get(i) {
                        self.delay.sleep(Duration::from_millis(delay_ms));
                    }
                    responses.push(send(channel, position_events(point))?);
                }
            }
            _ => {
                for &point in &path[1..] {
                    responses.push(send(channel, position_events(point))?);
                }
            }
        }

        let mut end = vec![InputEvent::button(DRAG_BUTTON, false)];
        end.extend(key_events(hold_keys, false));
        responses.push(send(channel, end)?);
        Ok(responses)
    }
}

// ── Stateless gestures ────────────────────────────────────────────────────────

fn press(channel: &mut dyn QmpChannel, keys: &[String]) -> Result<Vec<Value>, TransportError> {
    let qcodes: Vec<String> = keys.iter().map(|k| KeyMapper::normalize(k)).collect();
    Ok(vec![exchange(channel, &Command::send_key(&qcodes))?])
}

fn type_text(channel: &mut dyn QmpChannel, text: &str) -> Result<Vec<Value>, TransportError> {
    let mut responses = Vec::new();
    for ch in text.chars() {
        let sequence = keymap::key_press_sequence(ch);
        if keymap::requires_shift(ch) {
            responses.push(send(channel, sequence)?);
        } else {
            for event in sequence {
                responses.push(send(channel, vec![event])?);
            }
        }
    }
    Ok(responses)
}

fn scroll_wheel(
    channel: &mut dyn QmpChannel,
    point: Option<Point>,
    amount: ScrollAmount,
    hold_keys: &[String],
) -> Result<Vec<Value>, TransportError> {
    let mut pre = key_events(hold_keys, true);
    if let Some(point) = point {
        pre.extend(position_events(point));
    }

    let horizontal = if amount.x >= 0 { "wheel-right" } else { "wheel-left" };
    let vertical = if amount.y >= 0 { "wheel-down" } else { "wheel-up" };
    let wheel: Vec<InputEvent> = std::iter::repeat(horizontal)
        .take(amount.x.unsigned_abs() as usize)
        .chain(std::iter::repeat(vertical).take(amount.y.unsigned_abs() as usize))
        .map(|button| InputEvent::button(button, true))
        .collect();

    Ok(vec![
        send(channel, pre)?,
        send(channel, wheel)?,
        send(channel, key_events(hold_keys, false))?,
    ])
}

/// `point` wins over `offset`; validation guarantees one of them is set.
fn move_pointer(
    channel: &mut dyn QmpChannel,
    point: Option<Point>,
    offset: Option<Point>,
) -> Result<Vec<Value>, TransportError> {
    let events = match point {
        Some(point) => position_events(point),
        None => {
            let offset = offset.unwrap_or_default();
            vec![
                InputEvent::rel(InputAxis::X, offset.x),
                InputEvent::rel(InputAxis::Y, offset.y),
            ]
        }
    };
    Ok(vec![send(channel, events)?])
}

// ── Event helpers ─────────────────────────────────────────────────────────────

fn key_events(keys: &[String], down: bool) -> Vec<InputEvent> {
    keys.iter()
        .map(|k| InputEvent::key(KeyMapper::normalize(k), down))
        .collect()
}

fn position_events(point: Point) -> Vec<InputEvent> {
    vec![
        InputEvent::abs(InputAxis::X, point.x),
        InputEvent::abs(InputAxis::Y, point.y),
    ]
}

fn send(channel: &mut dyn QmpChannel, events: Vec<InputEvent>) -> Result<Value, TransportError> {
    exchange(channel, &Command::input_events(events))
}

fn exchange(channel: &mut dyn QmpChannel, command: &Command) -> Result<Value, TransportError> {
    let response = channel.exchange(command)?;
    if let Some(error) = response.get("error") {
        warn!(command = %command.execute, %error, "host returned an error response");
    }
    Ok(response)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Recording QMP channel for unit and integration testing.
//!
//! # Why a recording channel?
//!
//! The real [`QmpTransport`](super::QmpTransport) needs a running host on the
//! other end of a socket.  [`RecordingChannel`] stands in for it: every
//! command passed to `exchange` is appended to `commands` so assertions can
//! inspect exactly what would have been sent and in what order.  Responses
//! come from a queue of canned values, falling back to `{"return": {}}`.
//!
//! # Usage in tests
//!
//! ```ignore
//! let mut channel = RecordingChannel::new();
//! translator.execute(&mut channel, &action).unwrap();
//!
//! assert_eq!(channel.commands.len(), 3);
//! assert_eq!(channel.events()[1], vec![InputEvent::button("left", true), ...]);
//! ```
//!
//! # `fail_after`
//!
//! Set `fail_after = Some(n)` to let `n` exchanges succeed and fail every one
//! after that with [`TransportError::ConnectionClosed`].  The failing command
//! is still recorded.

use std::collections::VecDeque;

use qmp_core::{Command, InputEvent};
use serde_json::{json, Value};

use crate::application::translate_actions::{QmpChannel, TransportError};

/// A channel that records every command without touching a socket.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    /// Every command passed to `exchange`, in order.
    pub commands: Vec<Command>,
    /// Canned responses, consumed front to back.
    pub responses: VecDeque<Value>,
    /// Number of exchanges that succeed before every later one fails.
    pub fail_after: Option<usize>,
}

impl RecordingChannel {
    /// Creates a channel with no recorded commands and no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for a future exchange.
    pub fn push_response(&mut self, response: Value) {
        self.responses.push_back(response);
    }

    /// The decoded `input-send-event` batch of every recorded command.
    ///
    /// Commands of other kinds contribute an empty batch.
    pub fn events(&self) -> Vec<Vec<InputEvent>> {
        self.commands.iter().map(Command::events).collect()
    }

    /// Names of every recorded command, in order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.execute.as_str()).collect()
    }
}

impl QmpChannel for RecordingChannel {
    /// Records the command and returns the next canned response.
    fn exchange(&mut self, command: &Command) -> Result<Value, TransportError> {
        self.commands.push(command.clone());
        if matches!(self.fail_after, Some(limit) if self.commands.len() > limit) {
            return Err(TransportError::ConnectionClosed { buffered: 0 });
        }
        Ok(self
            .responses
            .pop_front()
            .unwrap_or_else(|| json!({"return": {}})))
    }
}

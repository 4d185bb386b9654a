//! RunSessionUseCase: executes action batches and captures the display.
//!
//! A [`Session`] owns one [`QmpChannel`] for its whole lifetime.  A batch
//! goes through three stages:
//!
//! 1. **Parse** (`*_json` entry points only): every JSON action is parsed and
//!    validated before the first exchange, so one bad entry rejects the whole
//!    batch with nothing sent.
//! 2. **Normalize**: pixel coordinates are rescaled into the virtual pointer
//!    range using the session's [`ScreenGeometry`].
//! 3. **Execute**: actions run strictly in order.  The first failure stops the
//!    batch; actions already executed are not undone.
//!
//! [`Session::step`] runs a batch and then always captures a screenshot.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use qmp_core::{Action, Command, ScreenGeometry, ValidationError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::translate_actions::{
    ActionResult, ActionTranslator, Delay, QmpChannel, TranslateError, TransportError,
};

/// Default host path the display is dumped to.
pub const DEFAULT_CAPTURE_PATH: &str = "/tmp/qmp-screenshot.png";

/// Default `screendump` image format.
pub const DEFAULT_CAPTURE_FORMAT: &str = "png";

/// Error type for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A batch entry could not be parsed; nothing was sent.
    #[error("action {index} is invalid: {source}")]
    Parse {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// A batch entry failed while executing.
    #[error("action {index} ({kind}) failed: {source}")]
    Action {
        index: usize,
        kind: &'static str,
        #[source]
        source: TranslateError,
    },

    /// The `screendump` exchange failed.
    #[error("screendump exchange failed: {0}")]
    Capture(#[source] TransportError),

    /// The host answered `screendump` with an error.
    #[error("host rejected screendump: {0}")]
    CaptureRejected(Value),

    /// The dumped image could not be read back.
    #[error("failed to read screenshot at {path}: {source}")]
    ReadCapture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub geometry: ScreenGeometry,
    /// Where the host writes the screendump; must be readable locally.
    pub capture_path: PathBuf,
    pub capture_format: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            geometry: ScreenGeometry::default(),
            capture_path: PathBuf::from(DEFAULT_CAPTURE_PATH),
            capture_format: DEFAULT_CAPTURE_FORMAT.to_string(),
        }
    }
}

/// The screenshot half of a step result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Base64 (standard alphabet, padded) of the captured image file.
    pub screenshot: String,
}

/// What [`Session::step`] returns: `{"observation": {"screenshot": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutput {
    pub observation: Observation,
}

/// Parses a batch of JSON action objects.
///
/// # Errors
///
/// Returns [`SessionError::Parse`] naming the first entry that fails.
pub fn parse_actions(values: &[Value]) -> Result<Vec<Action>, SessionError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let action =
                Action::from_value(value).map_err(|source| SessionError::Parse { index, source })?;
            action
                .validate()
                .map_err(|source| SessionError::Parse { index, source })?;
            Ok(action)
        })
        .collect()
}

/// The Run Session use case.
pub struct Session<C: QmpChannel> {
    channel: C,
    translator: ActionTranslator,
    settings: SessionSettings,
}

impl<C: QmpChannel> Session<C> {
    /// Creates a session over `channel` that waits through `delay`.
    pub fn new(channel: C, settings: SessionSettings, delay: Arc<dyn Delay>) -> Self {
        Self {
            channel,
            translator: ActionTranslator::new(delay),
            settings,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Returns normalized copies of `actions`.
    pub fn normalize(&self, actions: &[Action]) -> Vec<Action> {
        actions
            .iter()
            .map(|a| self.settings.geometry.normalize_action(a))
            .collect()
    }

    /// Normalizes and executes `actions` in order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Action`] for the first action that fails.
    pub fn run(&mut self, actions: &[Action]) -> Result<Vec<ActionResult>, SessionError> {
        let normalized = self.normalize(actions);
        info!(count = normalized.len(), "running action batch");

        let mut results = Vec::with_capacity(normalized.len());
        for (index, action) in normalized.iter().enumerate() {
            let result = self
                .translator
                .execute(&mut self.channel, action)
                .map_err(|source| SessionError::Action {
                    index,
                    kind: action.kind(),
                    source,
                })?;
            results.push(result);
        }
        Ok(results)
    }

    /// Parses the whole batch, then runs it.
    ///
    /// # Errors
    ///
    /// [`SessionError::Parse`] if any entry is invalid (no exchange happens),
    /// otherwise as [`Session::run`].
    pub fn run_json(&mut self, values: &[Value]) -> Result<Vec<ActionResult>, SessionError> {
        let actions = parse_actions(values)?;
        self.run(&actions)
    }

    /// Dumps the display on the host and returns the file's bytes as base64.
    ///
    /// # Errors
    ///
    /// [`SessionError::Capture`] if the exchange fails,
    /// [`SessionError::CaptureRejected`] if the host answers with an error,
    /// [`SessionError::ReadCapture`] if the file cannot be read.
    pub fn capture(&mut self) -> Result<String, SessionError> {
        let path = &self.settings.capture_path;
        let command = Command::screendump(&path.to_string_lossy(), &self.settings.capture_format);
        let response = self
            .channel
            .exchange(&command)
            .map_err(SessionError::Capture)?;
        if let Some(error) = response.get("error") {
            return Err(SessionError::CaptureRejected(error.clone()));
        }

        let bytes = fs::read(path).map_err(|source| SessionError::ReadCapture {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read screendump");
        Ok(STANDARD.encode(bytes))
    }

    /// Runs `actions`, then captures.
    ///
    /// # Errors
    ///
    /// As [`Session::run`] and [`Session::capture`].
    pub fn step(&mut self, actions: &[Action]) -> Result<StepOutput, SessionError> {
        self.run(actions)?;
        Ok(StepOutput {
            observation: Observation {
                screenshot: self.capture()?,
            },
        })
    }

    /// Parses the whole batch, then steps.
    ///
    /// # Errors
    ///
    /// As [`Session::run_json`] and [`Session::capture`].
    pub fn step_json(&mut self, values: &[Value]) -> Result<StepOutput, SessionError> {
        let actions = parse_actions(values)?;
        self.step(&actions)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

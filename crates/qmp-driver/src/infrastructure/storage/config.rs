//! TOML-based configuration for the driver.
//!
//! Resolved from, in order:
//! 1. An explicit path (`--config` / `QMP_CONFIG`), which must exist.
//! 2. `$XDG_CONFIG_HOME/qmp-driver/config.toml`, else
//!    `~/.config/qmp-driver/config.toml`; a missing file here means defaults.
//!
//! ```toml
//! [qmp]
//! socket_path = "/tmp/qmp-sock"
//! max_response_bytes = 1048576
//!
//! [capture]
//! path = "/tmp/qmp-screenshot.png"
//! format = "png"
//!
//! [screen]
//! width = 1280
//! height = 720
//! vptr_max = 32767
//!
//! [driver]
//! log_level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]`, and every section is
//! `#[serde(default)]`, so a partial file (or an empty one) is valid and
//! fills the gaps from the built-in defaults.

use std::path::{Path, PathBuf};

use qmp_core::domain::geometry::{
    DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_VPTR_MAX,
};
use qmp_core::{GeometryError, ScreenGeometry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::session::{SessionSettings, DEFAULT_CAPTURE_FORMAT, DEFAULT_CAPTURE_PATH};
use crate::infrastructure::transport::DEFAULT_MAX_RESPONSE_BYTES;

/// Default QMP socket path.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/qmp-sock";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The `[screen]` section describes an impossible screen.
    #[error("invalid [screen] section: {0}")]
    Geometry(#[from] GeometryError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level driver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DriverConfig {
    #[serde(default)]
    pub qmp: QmpConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub driver: GeneralConfig,
}

/// Socket settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QmpConfig {
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    /// Bound on buffered response bytes before the connection is abandoned.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

/// Where and how `screendump` writes the display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    #[serde(default = "default_capture_path")]
    pub path: PathBuf,
    /// Any format the host's `screendump` accepts (`png`, `ppm`).
    #[serde(default = "default_capture_format")]
    pub format: String,
}

/// Logical screen used for coordinate normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub width: u32,
    #[serde(default = "default_screen_height")]
    pub height: u32,
    #[serde(default = "default_vptr_max")]
    pub vptr_max: u32,
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}
fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}
fn default_capture_path() -> PathBuf {
    PathBuf::from(DEFAULT_CAPTURE_PATH)
}
fn default_capture_format() -> String {
    DEFAULT_CAPTURE_FORMAT.to_string()
}
fn default_screen_width() -> u32 {
    DEFAULT_SCREEN_WIDTH
}
fn default_screen_height() -> u32 {
    DEFAULT_SCREEN_HEIGHT
}
fn default_vptr_max() -> u32 {
    DEFAULT_VPTR_MAX
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for QmpConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            path: default_capture_path(),
            format: default_capture_format(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
            vptr_max: default_vptr_max(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl DriverConfig {
    /// Builds the session settings this config describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Geometry`] if width or height is zero.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        Ok(SessionSettings {
            geometry: ScreenGeometry::new(
                self.screen.width,
                self.screen.height,
                self.screen.vptr_max,
            )?,
            capture_path: self.capture.path.clone(),
            capture_format: self.capture.format.clone(),
        })
    }

    /// Renders the config as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Resolves the default config file path from the environment.
///
/// Returns `None` when neither `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("qmp-driver").join(CONFIG_FILE_NAME))
}

/// Parses config TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed.
pub fn parse_config(content: &str) -> Result<DriverConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the driver config.
///
/// With `explicit` set, that file must exist.  Otherwise the default location
/// is tried and a missing file yields `DriverConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(explicit: Option<&Path>) -> Result<DriverConfig, ConfigError> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        return parse_config(&content);
    }

    let Some(path) = default_config_path() else {
        return Ok(DriverConfig::default());
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DriverConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

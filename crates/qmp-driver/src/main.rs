//! QMP console driver: entry point.
//!
//! Connects to a virtual machine's QMP socket and drives its console: runs
//! a batch of UI actions and captures the display, or sends one raw command.
//!
//! # Usage
//!
//! ```text
//! qmp-driver [OPTIONS] <COMMAND>
//!
//! Commands:
//!   step        Run an action batch (JSON array) and print the observation
//!   screenshot  Capture the display and print it base64-encoded
//!   exec        Send an arbitrary QMP command and print its response
//!   sendkey     Send a key chord such as ctrl-alt-delete
//!   config      Print the effective configuration as TOML
//!
//! Options:
//!   --config <PATH>            Config file [env: QMP_CONFIG]
//!   --socket <PATH>            QMP socket [env: QMP_SOCKET]
//!   --screenshot-path <PATH>   screendump target [env: QMP_SCREENSHOT_PATH]
//!   --width <PX> --height <PX> Logical screen size for coordinates
//! ```
//!
//! Command-line values win over the config file, which wins over the
//! built-in defaults.  Logs go to stderr; stdout carries only the command's
//! JSON result.
//!
//! # Example
//!
//! ```text
//! $ echo '[{"type":"click","point":{"x":640,"y":360}},{"type":"type","text":"Hi!"}]' \
//!     | qmp-driver --socket /run/vm/qmp.sock step
//! {"observation":{"screenshot":"iVBORw0KGgo..."}}
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use qmp_core::{Command, KeyMapper};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use qmp_driver::application::session::Session;
use qmp_driver::application::translate_actions::QmpChannel;
use qmp_driver::infrastructure::clock::ThreadDelay;
use qmp_driver::infrastructure::storage::config::{load_config, DriverConfig};
use qmp_driver::infrastructure::transport::QmpTransport;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Drives VM console input and display capture over a QMP socket.
#[derive(Debug, Parser)]
#[command(name = "qmp-driver", version)]
struct Cli {
    /// Config file; must exist when given.
    #[arg(long, env = "QMP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// QMP Unix socket path.
    #[arg(long, env = "QMP_SOCKET", global = true)]
    socket: Option<PathBuf>,

    /// Host path `screendump` writes to and the driver reads back.
    #[arg(long, env = "QMP_SCREENSHOT_PATH", global = true)]
    screenshot_path: Option<PathBuf>,

    /// Logical screen width that action coordinates refer to.
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Logical screen height that action coordinates refer to.
    #[arg(long, global = true)]
    height: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run an action batch, then capture.
    Step {
        /// File holding a JSON array of actions; `-` reads stdin.
        #[arg(long, short, default_value = "-")]
        actions: PathBuf,
    },

    /// Capture the display only.
    Screenshot,

    /// Send one QMP command by name.
    Exec {
        /// Command name, e.g. `query-status`.
        name: String,

        /// Arguments as a JSON object.
        #[arg(long)]
        args: Option<String>,
    },

    /// Send a key chord, keys joined by `-` (e.g. `ctrl-alt-delete`).
    Sendkey { combo: String },

    /// Print the effective configuration.
    Config,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded config.
    fn apply_overrides(&self, config: &mut DriverConfig) {
        if let Some(socket) = &self.socket {
            config.qmp.socket_path = socket.clone();
        }
        if let Some(path) = &self.screenshot_path {
            config.capture.path = path.clone();
        }
        if let Some(width) = self.width {
            config.screen.width = width;
        }
        if let Some(height) = self.height {
            config.screen.height = height;
        }
    }
}

/// Splits a `-`-joined chord into normalized key names.
fn parse_combo(combo: &str) -> Vec<String> {
    combo
        .split('-')
        .filter(|k| !k.is_empty())
        .map(KeyMapper::normalize)
        .collect()
}

/// Reads an action batch from `path` (`-` for stdin).
///
/// A single JSON object is accepted as a one-action batch.
fn read_actions(path: &Path) -> anyhow::Result<Vec<Value>> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read actions from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read actions from {}", path.display()))?
    };

    let value: Value = serde_json::from_str(&text).context("actions are not valid JSON")?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

fn connect(config: &DriverConfig) -> anyhow::Result<QmpTransport> {
    QmpTransport::connect(&config.qmp.socket_path, config.qmp.max_response_bytes)
        .with_context(|| format!("QMP connection to {} failed", config.qmp.socket_path.display()))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut config);

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.driver.log_level)),
        )
        .init();

    match cli.command {
        Commands::Step { actions } => {
            let batch = read_actions(&actions)?;
            let settings = config.session_settings()?;
            let mut session = Session::new(connect(&config)?, settings, Arc::new(ThreadDelay));
            let output = session.step_json(&batch)?;
            info!(actions = batch.len(), "step complete");
            println!("{}", serde_json::to_string(&output)?);
        }
        Commands::Screenshot => {
            let settings = config.session_settings()?;
            let mut session = Session::new(connect(&config)?, settings, Arc::new(ThreadDelay));
            let screenshot = session.capture()?;
            println!("{}", json!({ "screenshot": screenshot }));
        }
        Commands::Exec { name, args } => {
            let arguments = match args {
                Some(text) => serde_json::from_str(&text).context("--args must be a JSON object")?,
                None => Value::Null,
            };
            let response = connect(&config)?.execute(&name, arguments)?;
            println!("{response}");
        }
        Commands::Sendkey { combo } => {
            let keys = parse_combo(&combo);
            anyhow::ensure!(!keys.is_empty(), "empty key combo: {combo:?}");
            let response = connect(&config)?.exchange(&Command::send_key(&keys))?;
            println!("{response}");
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Storage infrastructure: the driver's TOML configuration file.
//!
//! The `config` sub-module resolves the config file location, parses it, and
//! falls back to built-in defaults when no file exists.

pub mod config;

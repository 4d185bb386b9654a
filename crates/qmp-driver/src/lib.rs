//! qmp-driver library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does qmp-driver do? (for beginners)
//!
//! A virtual machine's host process (QEMU) exposes a control socket that
//! speaks QMP: one JSON command in, one JSON response out.  Among other
//! things it can inject keyboard and mouse events into the guest and dump
//! the guest's display to an image file.
//!
//! This crate turns human-level gestures into those commands:
//!
//! 1. Connects to the socket and negotiates capabilities
//!    ([`infrastructure::transport`]).
//! 2. Parses and validates a batch of JSON actions, then rescales their pixel
//!    coordinates into the virtual pointer range
//!    ([`application::session`]).
//! 3. Decomposes each action into ordered, timed `input-send-event` or
//!    `send-key` exchanges ([`application::translate_actions`]).
//! 4. Asks the host for a `screendump` and returns the image base64-encoded.

/// Application layer: use cases for the driver.
pub mod application;

/// Infrastructure layer: socket transport, delays, and configuration.
pub mod infrastructure;

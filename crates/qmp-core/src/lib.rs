//! # qmp-core
//!
//! Shared library for the QMP driver containing the QMP command model and
//! JSON codec, the semantic action model, coordinate normalization, and key
//! symbol translation tables.
//!
//! It has no dependencies on sockets, files, or clocks.
//!
//! # Architecture overview (for beginners)
//!
//! QEMU exposes a control socket that speaks QMP, the QEMU Machine Protocol:
//! newline-terminated JSON commands in, JSON responses out.  Among many other
//! things it can inject keyboard and mouse input into the guest and dump the
//! guest display to an image file.  The driver built on this crate turns
//! human-level gestures into those low-level commands.
//!
//! - **`protocol`** – The shape of QMP commands and input events, and the
//!   incremental decoder that finds complete JSON objects in a byte stream.
//!
//! - **`domain`** – The [`Action`] union (click, type, drag, ...) with its
//!   validation rules, and [`ScreenGeometry`], which maps screen pixels onto
//!   QEMU's fixed absolute-pointer range.
//!
//! - **`keymap`** – Translation from human key names and characters to QMP
//!   `qcode` names, including which characters need Shift.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::action::{Action, ScrollAmount, ValidationError};
pub use domain::geometry::{GeometryError, Point, ScreenGeometry};
pub use keymap::KeyMapper;
pub use protocol::codec::{decode_object, encode_command, ProtocolError};
pub use protocol::messages::{Command, InputAxis, InputEvent};

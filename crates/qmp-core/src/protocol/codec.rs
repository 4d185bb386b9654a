//! Line-oriented JSON codec for QMP.
//!
//! Wire format: each command is one JSON object followed by `\n`.  Responses
//! are JSON objects, normally newline-terminated, but a single socket read may
//! return half an object or more than one object.
//!
//! # Incremental decoding (for beginners)
//!
//! A Unix stream socket has no message boundaries.  The transport therefore
//! appends every chunk it reads to a buffer and calls [`decode_object`] after
//! each read.  The decoder reports one of three outcomes:
//!
//! - `Ok(Some((value, consumed)))` – a complete object sits at the front of
//!   the buffer; `consumed` bytes can be drained.
//! - `Ok(None)` – the buffer holds only whitespace or the prefix of an object;
//!   read more bytes.
//! - `Err(_)` – the buffer cannot be the prefix of any JSON object.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::messages::Command;

/// Errors that can occur during command encoding or response decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The command could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(String),

    /// The bytes at the front of the buffer are not valid JSON.
    #[error("malformed JSON from peer: {0}")]
    MalformedJson(String),

    /// A complete JSON value was decoded but it is not an object.
    #[error("expected a JSON object, got: {0}")]
    NotAnObject(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`Command`] as one line of JSON terminated by `\n`.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use qmp_core::protocol::{encode_command, Command};
///
/// let bytes = encode_command(&Command::qmp_capabilities()).unwrap();
/// assert_eq!(bytes, b"{\"execute\":\"qmp_capabilities\"}\n");
/// ```
pub fn encode_command(command: &Command) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes =
        serde_json::to_vec(command).map_err(|e| ProtocolError::Encode(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decodes one JSON object from the beginning of `bytes`.
///
/// Leading whitespace is skipped.  On success returns the object and the
/// number of bytes consumed, so the caller can drain them and keep whatever
/// follows for the next call.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedJson`] if the buffer is not a valid JSON
/// prefix, or [`ProtocolError::NotAnObject`] if the first value is a scalar
/// or array.
///
/// # Examples
///
/// ```rust
/// use qmp_core::protocol::decode_object;
///
/// assert_eq!(decode_object(b"{\"ret").unwrap(), None);
///
/// let (value, used) = decode_object(b"{\"return\": {}}\r\n").unwrap().unwrap();
/// assert!(value.get("return").is_some());
/// assert_eq!(used, 14);
/// ```
pub fn decode_object(bytes: &[u8]) -> Result<Option<(Value, usize)>, ProtocolError> {
    let mut stream = serde_json::Deserializer::from_slice(bytes).into_iter::<Value>();
    match stream.next() {
        None => Ok(None),
        Some(Ok(value)) => {
            if !value.is_object() {
                return Err(ProtocolError::NotAnObject(value.to_string()));
            }
            Ok(Some((value, stream.byte_offset())))
        }
        Some(Err(e)) if e.is_eof() => Ok(None),
        Some(Err(e)) => Err(ProtocolError::MalformedJson(e.to_string())),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

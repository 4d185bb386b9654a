//! QMP socket transport.
//!
//! [`QmpTransport`] owns one byte stream to the host (a Unix socket in
//! production, any `Read + Write` in tests) and implements
//! [`QmpChannel`]: write one command line, block until one complete JSON
//! object has been read back.
//!
//! # Connection lifecycle (for beginners)
//!
//! ```text
//! connect() ──► read greeting ──► send qmp_capabilities ──► read response
//!                                                                │
//!        ┌───────────────────────────────────────────────────────┘
//!        ▼
//!   exchange(cmd) ──► write line ──► read until one object ──► return
//!        ▲                                                      │
//!        └──────────────────────────────────────────────────────┘
//! ```
//!
//! The host refuses every command until capabilities have been negotiated, so
//! a transport that fails the handshake is never handed out.
//!
//! # Partial reads
//!
//! The stream has no message boundaries.  Bytes are read in
//! [`READ_CHUNK_SIZE`] chunks into a buffer which is decoded whenever a
//! read could have completed an object.  Whatever follows a complete object stays in the buffer for the
//! next exchange.  The buffer is bounded by `max_response_bytes`; a peer that
//! streams garbage without ever completing an object gets
//! [`TransportError::ResponseTooLarge`] rather than unbounded memory.

pub mod mock;

use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use qmp_core::{decode_object, encode_command, Command};
use serde_json::Value;
use tracing::{debug, info, trace};

use crate::application::translate_actions::{QmpChannel, TransportError};

/// Number of bytes requested per socket read.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Default bound on buffered, not-yet-decoded response bytes (1 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// A negotiated QMP connection.
pub struct QmpTransport<S = UnixStream> {
    stream: S,
    buffer: Vec<u8>,
    max_response_bytes: usize,
    greeting: Value,
}

impl QmpTransport<UnixStream> {
    /// Connects to the QMP Unix socket at `path` and negotiates capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the socket cannot be opened, or
    /// [`TransportError::Handshake`] if negotiation fails.
    pub fn connect(path: impl AsRef<Path>, max_response_bytes: usize) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|source| TransportError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        info!(socket = %path.display(), "connected to QMP socket");
        Self::handshake(stream, max_response_bytes)
    }
}

impl<S: Read + Write> QmpTransport<S> {
    /// Reads the greeting from `stream` and negotiates capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Handshake`] if the greeting cannot be read,
    /// the capabilities exchange fails, or the host answers it with an error.
    pub fn handshake(stream: S, max_response_bytes: usize) -> Result<Self, TransportError> {
        let mut transport = Self {
            stream,
            buffer: Vec::new(),
            max_response_bytes,
            greeting: Value::Null,
        };

        transport.greeting = transport
            .read_object()
            .map_err(|e| TransportError::Handshake(format!("reading greeting: {e}")))?;
        debug!(greeting = %transport.greeting, "received QMP greeting");

        let response = transport
            .exchange(&Command::qmp_capabilities())
            .map_err(|e| TransportError::Handshake(format!("qmp_capabilities: {e}")))?;
        if let Some(error) = response.get("error") {
            return Err(TransportError::Handshake(format!(
                "qmp_capabilities rejected: {error}"
            )));
        }

        info!("QMP capabilities negotiated");
        Ok(transport)
    }

    /// The greeting object the host sent on connect.
    pub fn greeting(&self) -> &Value {
        &self.greeting
    }

    /// Sends an arbitrary command by name and returns its response.
    ///
    /// `arguments` that are not a non-empty JSON object are omitted.
    ///
    /// # Errors
    ///
    /// See [`QmpChannel::exchange`].
    pub fn execute(&mut self, name: &str, arguments: Value) -> Result<Value, TransportError> {
        self.exchange(&Command::with_arguments(name, arguments))
    }

    /// Consumes the transport and returns the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Reads until one complete object sits at the front of the buffer.
    ///
    /// Reads are capped so the buffer never holds more than
    /// `max_response_bytes`.  An object can only end at `}`, so the buffer is
    /// re-decoded only when a read brought one in.
    fn read_object(&mut self) -> Result<Value, TransportError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut may_complete = true;
        loop {
            if may_complete {
                match decode_object(&self.buffer) {
                    Ok(Some((value, consumed))) => {
                        self.buffer.drain(..consumed);
                        return Ok(value);
                    }
                    Ok(None) => {}
                    Err(e) => trace!(buffered = self.buffer.len(), error = %e, "buffer does not decode yet"),
                }
            }

            let room = self.max_response_bytes.saturating_sub(self.buffer.len());
            if room == 0 {
                return Err(TransportError::ResponseTooLarge {
                    limit: self.max_response_bytes,
                });
            }

            let want = room.min(READ_CHUNK_SIZE);
            let n = match self.stream.read(&mut chunk[..want]) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                return Err(TransportError::ConnectionClosed {
                    buffered: self.buffer.len(),
                });
            }
            may_complete = chunk[..n].contains(&b'}');
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}

impl<S: Read + Write> QmpChannel for QmpTransport<S> {
    fn exchange(&mut self, command: &Command) -> Result<Value, TransportError> {
        let line = encode_command(command)?;
        debug!(command = %command.execute, bytes = line.len(), "sending QMP command");
        self.stream.write_all(&line)?;
        self.stream.flush()?;

        let response = self.read_object()?;
        debug!(command = %command.execute, %response, "received QMP response");
        Ok(response)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

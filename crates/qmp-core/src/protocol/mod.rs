//! Protocol module containing QMP command types and the JSON codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_object, encode_command, ProtocolError};
pub use messages::*;

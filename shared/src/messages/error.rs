use thiserror::Error;

use syncnet_serde::SerdeErr;

use crate::world::component::field_value::FIELD_KIND_TYPE_NAME;

/// Errors that can occur while encoding or decoding sync messages
///
/// SECURITY: decoding processes untrusted network data. Every malformed
/// input maps to one of these variants instead of a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The frame ended before the message was complete
    #[error("Truncated frame: the message ends before all of its fields were read")]
    Truncated,

    /// The length prefix declares more bytes than the decoder accepts
    #[error("Frame declares {length} bytes which exceeds the limit of {max} bytes. The stream cannot be resynchronized")]
    FrameTooLarge { length: u32, max: u32 },

    /// A frame with a zero length prefix carries no message kind
    #[error("Empty frame: length prefix is zero")]
    EmptyFrame,

    /// The message kind byte is not Create, Update or Destroy
    #[error("Unknown message kind {kind}. This may indicate a malformed or malicious frame")]
    UnknownMessageKind { kind: u8 },

    /// A field value starts with an unassigned kind byte
    #[error("Unknown field value kind {kind}")]
    UnknownValueKind { kind: u8 },

    /// A value was read in full but is not valid for its type
    #[error("Invalid {type_name} value {value}")]
    InvalidValue {
        type_name: &'static str,
        value: u64,
    },

    /// The frame holds bytes after the end of its message
    #[error("Frame has {count} trailing bytes after the end of the message")]
    TrailingBytes { count: usize },

    /// A message carries more values than the count byte can express
    #[error("Cannot encode {count} values in one message (maximum {max})")]
    TooManyValues { count: usize, max: usize },
}

impl CodecError {
    /// Whether the decoder can carry on at the next frame boundary
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CodecError::FrameTooLarge { .. })
    }
}

impl From<SerdeErr> for CodecError {
    fn from(error: SerdeErr) -> Self {
        match error {
            SerdeErr::UnexpectedEnd { .. } => CodecError::Truncated,
            SerdeErr::InvalidValue { type_name, value } if type_name == FIELD_KIND_TYPE_NAME => {
                CodecError::UnknownValueKind {
                    kind: u8::try_from(value).unwrap_or(u8::MAX),
                }
            }
            SerdeErr::InvalidValue { type_name, value } => {
                CodecError::InvalidValue { type_name, value }
            }
        }
    }
}

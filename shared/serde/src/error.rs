use thiserror::Error;

/// Errors produced while reading values out of a byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before the value was complete
    #[error("Unexpected end of stream: needed {needed} more bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// The bytes were read but do not form a valid value of the type
    #[error("Invalid {type_name} value: {value}")]
    InvalidValue {
        type_name: &'static str,
        value: u64,
    },
}

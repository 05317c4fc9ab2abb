use thiserror::Error;

/// Errors that can occur while sending or receiving on a Link
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// No Transport has been assigned to the Link yet
    #[error("Link has no transport assigned")]
    NoTransport,

    /// The Transport has errored or been closed by either side
    #[error("Link transport is not connected")]
    NotConnected,

    /// The Link was flagged as unusable and will never carry traffic again
    #[error("Link is unusable: {reason}")]
    Unusable { reason: String },

    /// A frame exceeded the configured size limit
    #[error("Frame of {length} bytes exceeds the Link limit of {max} bytes")]
    FrameTooLarge { length: usize, max: u32 },
}

use crate::constants::DEFAULT_MAX_FRAME_BYTES;

/// Contains Config properties which will be used by a Link
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Largest payload a single Link frame may carry. Outgoing payloads above
    /// this are refused and an incoming frame above it makes the Link unusable.
    pub max_frame_bytes: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

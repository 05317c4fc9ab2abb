use crate::types::ChannelId;

/// Channel Synchronizers use unless configured otherwise
pub const DEFAULT_SYNC_CHANNEL: ChannelId = 200;

/// Largest payload a single Link frame or codec frame may declare
pub const DEFAULT_MAX_FRAME_BYTES: u32 = 1 << 20;

/// Fields per object; indices run from 0 to `MAX_FIELD_COUNT - 1`
pub const MAX_FIELD_COUNT: usize = 255;

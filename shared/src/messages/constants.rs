// Codec frame layout

/// Bytes taken by the big-endian length prefix in front of every frame
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Largest number of values a single Create or Update can carry
pub const MAX_VALUES_PER_MESSAGE: usize = u8::MAX as usize;

use std::default::Default;

use syncnet_shared::{ChannelId, DEFAULT_SYNC_CHANNEL};

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Link channel that sync traffic is written to. Must match the
    /// channel configured on every client.
    pub channel: ChannelId,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_SYNC_CHANNEL,
        }
    }
}

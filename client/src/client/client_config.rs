use std::default::Default;

use syncnet_shared::{ChannelId, DEFAULT_SYNC_CHANNEL};

/// Contains Config properties which will be used by the Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Link channel that sync traffic is read from. Must match the channel
    /// configured on the server.
    pub channel: ChannelId,
    /// When a server Link is dropped, destroy every object that server
    /// created. Otherwise those objects stay, frozen at their last state.
    pub destroy_objects_on_disconnect: bool,
    /// Queue a `ReplicaEvent` for everything `update` does. The queue only
    /// empties through `take_events`, so leave this off unless events are
    /// drained every tick.
    pub record_events: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_SYNC_CHANNEL,
            destroy_objects_on_disconnect: false,
            record_events: false,
        }
    }
}

use syncnet_shared::{FieldIndex, LinkId, ObjectId, SyncError, TypeTag};

/// Something that happened to the replica during `update`
#[derive(Debug, Clone, PartialEq)]
pub enum ReplicaEvent {
    /// A server announced an object and it was materialized locally
    Created {
        object_id: ObjectId,
        type_tag: TypeTag,
    },
    /// Remote values were applied to these fields
    Updated {
        object_id: ObjectId,
        fields: Vec<FieldIndex>,
    },
    /// The object was handed to its destructor and removed
    Destroyed {
        object_id: ObjectId,
        type_tag: TypeTag,
    },
    /// The server Link disconnected and was dropped
    ServerDisconnected(LinkId),
    /// Traffic from a server could not be applied
    Error { link_id: LinkId, error: SyncError },
}

/// Events gathered since the last `take_events`. A disabled queue drops
/// every push.
pub(crate) struct ReplicaEvents {
    enabled: bool,
    events: Vec<ReplicaEvent>,
}

impl ReplicaEvents {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: ReplicaEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn take(&mut self) -> Vec<ReplicaEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

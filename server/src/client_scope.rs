use std::collections::HashSet;

use syncnet_shared::ObjectId;

/// The objects one client has been told exist.
/// Starts empty; a reconnecting client gets a fresh scope and therefore a
/// full Create burst.
#[derive(Default)]
pub(crate) struct ClientScope {
    known: HashSet<ObjectId>,
}

impl ClientScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn knows(&self, object_id: &ObjectId) -> bool {
        self.known.contains(object_id)
    }

    pub fn learn(&mut self, object_id: ObjectId) {
        self.known.insert(object_id);
    }

    /// Returns true if the object was known
    pub fn forget(&mut self, object_id: &ObjectId) -> bool {
        self.known.remove(object_id)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }
}

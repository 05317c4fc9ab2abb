use std::fmt;

use crate::{
    types::ObjectId,
    world::component::{error::ObjectError, property_mutate::PropertyMutator},
};

/// Identity half of a replicated object.
///
/// Holds the id assigned by the owning Synchronizer and the mutator its
/// Properties report to. Identity is never copied: cloning a SyncedObject
/// yields a fresh, unbound identity, and two SyncedObjects always compare
/// equal so that equality of the enclosing type is decided by its field
/// values alone.
pub struct SyncedObject {
    object_id: Option<ObjectId>,
    mutator: PropertyMutator,
}

impl SyncedObject {
    pub fn new() -> Self {
        Self {
            object_id: None,
            mutator: PropertyMutator::new(),
        }
    }

    /// Id assigned by a Synchronizer, `None` until one takes ownership
    pub fn object_id(&self) -> Option<ObjectId> {
        self.object_id
    }

    /// Binds the object to `object_id`. Called by Synchronizers only
    pub fn assign_id(&mut self, object_id: ObjectId) -> Result<(), ObjectError> {
        if let Some(existing) = self.object_id {
            return Err(ObjectError::IdAlreadyAssigned { existing });
        }
        self.object_id = Some(object_id);
        Ok(())
    }

    pub fn mutator(&self) -> &PropertyMutator {
        &self.mutator
    }

    pub fn field_count(&self) -> usize {
        self.mutator.field_count()
    }

    pub fn is_dirty(&self) -> bool {
        self.mutator.any_mutated()
    }

    pub fn clear_dirty(&self) {
        self.mutator.clear();
    }
}

impl Default for SyncedObject {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SyncedObject {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl PartialEq for SyncedObject {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for SyncedObject {}

impl fmt::Debug for SyncedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncedObject")
            .field("object_id", &self.object_id)
            .field("field_count", &self.field_count())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

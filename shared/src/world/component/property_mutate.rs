use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    constants::MAX_FIELD_COUNT,
    types::FieldIndex,
    world::component::{diff_mask::DiffMask, error::PropertyError},
};

/// Shared slot an object's Properties register into and report mutations to.
///
/// Every Property holds a clone of its owner's mutator, so moving the owner
/// around in memory never leaves a Property pointing at a stale location.
#[derive(Clone)]
pub struct PropertyMutator {
    state: Arc<RwLock<MutatorState>>,
}

struct MutatorState {
    field_count: usize,
    diff_mask: DiffMask,
}

impl PropertyMutator {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MutatorState {
                field_count: 0,
                diff_mask: DiffMask::new(),
            })),
        }
    }

    // The mask only ever holds plain data, so a poisoned lock is still usable
    fn read(&self) -> RwLockReadGuard<'_, MutatorState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MutatorState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserves the next field index in declaration order
    pub fn register_field(&self) -> Result<FieldIndex, PropertyError> {
        let mut state = self.write();
        let too_many = PropertyError::TooManyFields {
            max: MAX_FIELD_COUNT,
        };
        if state.field_count >= MAX_FIELD_COUNT {
            return Err(too_many);
        }
        let index = FieldIndex::try_from(state.field_count).map_err(|_| too_many)?;
        state.field_count += 1;
        Ok(index)
    }

    pub fn field_count(&self) -> usize {
        self.read().field_count
    }

    pub fn mutate(&self, property_index: FieldIndex) {
        self.write().diff_mask.set_bit(property_index, true);
    }

    pub fn is_mutated(&self, property_index: FieldIndex) -> bool {
        self.read().diff_mask.bit(property_index)
    }

    pub fn any_mutated(&self) -> bool {
        !self.read().diff_mask.is_clear()
    }

    pub fn clear(&self) {
        self.write().diff_mask.clear();
    }

    /// Whether two handles report into the same owner
    pub fn same_owner(&self, other: &PropertyMutator) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for PropertyMutator {
    fn default() -> Self {
        Self::new()
    }
}

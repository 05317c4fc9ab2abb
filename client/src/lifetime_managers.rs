use std::collections::HashMap;

use syncnet_shared::{ObjectId, Replicate, TypeTag};

pub(crate) type Factory = Box<dyn FnMut(ObjectId) -> Box<dyn Replicate> + Send>;
pub(crate) type Destructor = Box<dyn FnMut(Box<dyn Replicate>) + Send>;

pub(crate) struct LifetimeManagers {
    factory: Factory,
    destructor: Destructor,
}

/// Per-type constructors and destructors for replicated objects, keyed by
/// the type tag carried in Create messages
#[derive(Default)]
pub(crate) struct LifetimeManagerRegistry {
    managers: HashMap<TypeTag, LifetimeManagers>,
}

impl LifetimeManagerRegistry {
    /// Registers managers for `type_tag`, returning true if an earlier
    /// registration was replaced
    pub fn insert(&mut self, type_tag: TypeTag, factory: Factory, destructor: Destructor) -> bool {
        self.managers
            .insert(type_tag, LifetimeManagers { factory, destructor })
            .is_some()
    }

    pub fn contains(&self, type_tag: &TypeTag) -> bool {
        self.managers.contains_key(type_tag)
    }

    /// `None` if nothing is registered for the tag
    pub fn construct(&mut self, type_tag: &TypeTag, object_id: ObjectId) -> Option<Box<dyn Replicate>> {
        let managers = self.managers.get_mut(type_tag)?;
        Some((managers.factory)(object_id))
    }

    /// Hands the object to its destructor. Objects of an unregistered tag
    /// are dropped.
    pub fn destroy(&mut self, type_tag: &TypeTag, object: Box<dyn Replicate>) {
        match self.managers.get_mut(type_tag) {
            Some(managers) => (managers.destructor)(object),
            None => drop(object),
        }
    }
}

use std::collections::{btree_map, BTreeMap};

use crate::{types::ObjectId, world::component::replicate::Replicate};

/// Registry of the objects a Synchronizer owns, keyed by id.
/// Iteration is in id order, which keeps broadcast order stable.
#[derive(Default)]
pub struct ObjectStore {
    objects: BTreeMap<ObjectId, Box<dyn Replicate>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.objects.contains_key(object_id)
    }

    /// Inserts an object, handing back whatever was stored under the id before
    pub fn insert(
        &mut self,
        object_id: ObjectId,
        object: Box<dyn Replicate>,
    ) -> Option<Box<dyn Replicate>> {
        self.objects.insert(object_id, object)
    }

    pub fn remove(&mut self, object_id: &ObjectId) -> Option<Box<dyn Replicate>> {
        self.objects.remove(object_id)
    }

    pub fn get(&self, object_id: &ObjectId) -> Option<&dyn Replicate> {
        self.objects.get(object_id).map(|object| &**object)
    }

    pub fn get_mut(&mut self, object_id: &ObjectId) -> Option<&mut dyn Replicate> {
        match self.objects.get_mut(object_id) {
            Some(object) => Some(&mut **object),
            None => None,
        }
    }

    /// Typed access; `None` if the id is unknown or holds another type
    pub fn get_typed<R: Replicate>(&self, object_id: &ObjectId) -> Option<&R> {
        self.get(object_id)?.as_any().downcast_ref::<R>()
    }

    pub fn get_typed_mut<R: Replicate>(&mut self, object_id: &ObjectId) -> Option<&mut R> {
        self.get_mut(object_id)?.as_any_mut().downcast_mut::<R>()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.objects.iter(),
        }
    }

    /// Every object of type `R`, in id order
    pub fn iter_typed<R: Replicate>(&self) -> impl Iterator<Item = (ObjectId, &R)> {
        self.iter()
            .filter_map(|(object_id, object)| {
                object.as_any().downcast_ref::<R>().map(|typed| (object_id, typed))
            })
    }

    pub fn clear_dirty(&self) {
        for object in self.objects.values() {
            object.clear_dirty();
        }
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, ObjectId, Box<dyn Replicate>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (ObjectId, &'a dyn Replicate);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(object_id, object)| (*object_id, &**object))
    }
}

use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use crate::{
    types::FieldIndex,
    world::component::{
        error::PropertyError,
        field_value::{FieldKind, FieldType, FieldValue},
        property_mutate::PropertyMutator,
        synced_object::SyncedObject,
    },
};

/// Object-safe view of a Property, used by the engine to walk an object's
/// fields without knowing their concrete types
pub trait FieldCell {
    fn index(&self) -> FieldIndex;

    fn kind(&self) -> FieldKind;

    fn value(&self) -> FieldValue;

    fn is_dirty(&self) -> bool;

    /// Stores a value received from a remote host. Does not mark the cell
    /// dirty, so the value is not echoed back out
    fn apply_remote(&mut self, value: FieldValue) -> Result<(), PropertyError>;
}

/// A field of a replicated object whose writes are tracked for broadcast.
///
/// A Property belongs to the position it was registered at inside its owner:
/// it can be neither cloned nor rebound. Copying an object means building
/// fresh Properties against a fresh [`SyncedObject`] and copying values over.
pub struct Property<T: FieldType> {
    inner: T,
    index: FieldIndex,
    mutator: PropertyMutator,
}

impl<T: FieldType> Property<T> {
    /// Registers a new Property as the next field of `owner`
    ///
    /// # Panics
    ///
    /// Panics if `owner` already has the maximum number of fields.
    /// Consider using `try_new` for non-panicking error handling.
    pub fn new(owner: &SyncedObject, value: T) -> Self {
        Self::try_new(owner, value).expect("too many Properties registered on one object")
    }

    /// Try to register a new Property as the next field of `owner`
    pub fn try_new(owner: &SyncedObject, value: T) -> Result<Self, PropertyError> {
        let mutator = owner.mutator().clone();
        let index = mutator.register_field()?;
        Ok(Self {
            inner: value,
            index,
            mutator,
        })
    }

    pub fn get(&self) -> T {
        self.inner
    }

    /// Stores `value` and queues the field for the next broadcast
    pub fn set(&mut self, value: T) {
        self.inner = value;
        self.mutate();
    }

    pub fn index(&self) -> FieldIndex {
        self.index
    }

    pub fn is_dirty(&self) -> bool {
        self.mutator.is_mutated(self.index)
    }

    /// Whether this Property reports into `owner`
    pub fn belongs_to(&self, owner: &SyncedObject) -> bool {
        self.mutator.same_owner(owner.mutator())
    }

    fn mutate(&mut self) {
        self.mutator.mutate(self.index);
    }
}

impl<T: FieldType> FieldCell for Property<T> {
    fn index(&self) -> FieldIndex {
        self.index
    }

    fn kind(&self) -> FieldKind {
        T::KIND
    }

    fn value(&self) -> FieldValue {
        self.inner.into_value()
    }

    fn is_dirty(&self) -> bool {
        Property::is_dirty(self)
    }

    fn apply_remote(&mut self, value: FieldValue) -> Result<(), PropertyError> {
        let Some(inner) = T::from_value(value) else {
            return Err(PropertyError::TypeMismatch {
                expected: T::KIND,
                found: value.kind(),
            });
        };
        self.inner = inner;
        Ok(())
    }
}

// Reading through the Property is free, writing through it assumes the
// value will change and queues it for update
impl<T: FieldType> Deref for Property<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: FieldType> DerefMut for Property<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.mutate();
        &mut self.inner
    }
}

// Equality is on the contained value only

impl<T: FieldType> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: FieldType> PartialEq<T> for Property<T> {
    fn eq(&self, other: &T) -> bool {
        self.inner == *other
    }
}

impl<T: FieldType + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("index", &self.index)
            .field("value", &self.inner)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

impl<T: FieldType + fmt::Display> fmt::Display for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

pub type SyncedBool = Property<bool>;
pub type SyncedU8 = Property<u8>;
pub type SyncedI8 = Property<i8>;
pub type SyncedU16 = Property<u16>;
pub type SyncedI16 = Property<i16>;
pub type SyncedU32 = Property<u32>;
pub type SyncedI32 = Property<i32>;
pub type SyncedU64 = Property<u64>;
pub type SyncedI64 = Property<i64>;
pub type SyncedF32 = Property<f32>;
pub type SyncedF64 = Property<f64>;

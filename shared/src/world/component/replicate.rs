use std::any::Any;

use crate::{
    types::{FieldIndex, ObjectId, TypeTag},
    world::component::{
        error::{ObjectError, PropertyError},
        field_value::FieldValue,
        property::FieldCell,
        synced_object::SyncedObject,
    },
};

/// Downcasting support for replicated objects held as `dyn Replicate`
pub trait ReplicateAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Replicate> ReplicateAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// An application type whose fields are kept in sync across hosts.
///
/// Implementors embed a [`SyncedObject`] and construct every
/// [`Property`](crate::Property) against it, in declaration order:
///
/// ```
/// use syncnet_shared::{FieldCell, Property, Replicate, SyncedObject, TypeTag};
///
/// #[derive(PartialEq, Debug)]
/// struct Coordinate {
///     base: SyncedObject,
///     x: Property<f32>,
///     y: Property<f32>,
/// }
///
/// impl Coordinate {
///     const TYPE_TAG: TypeTag = TypeTag::new(0x1337);
///
///     fn new(x: f32, y: f32) -> Self {
///         let base = SyncedObject::new();
///         let x = Property::new(&base, x);
///         let y = Property::new(&base, y);
///         Self { base, x, y }
///     }
/// }
///
/// impl Replicate for Coordinate {
///     fn type_tag(&self) -> TypeTag {
///         Self::TYPE_TAG
///     }
///     fn synced_object(&self) -> &SyncedObject {
///         &self.base
///     }
///     fn synced_object_mut(&mut self) -> &mut SyncedObject {
///         &mut self.base
///     }
///     fn fields(&self) -> Vec<&dyn FieldCell> {
///         vec![&self.x, &self.y]
///     }
///     fn fields_mut(&mut self) -> Vec<&mut dyn FieldCell> {
///         vec![&mut self.x, &mut self.y]
///     }
/// }
/// ```
pub trait Replicate: ReplicateAny + Send + Sync {
    /// Class-level tag, identical on every host for this type
    fn type_tag(&self) -> TypeTag;

    fn synced_object(&self) -> &SyncedObject;

    fn synced_object_mut(&mut self) -> &mut SyncedObject;

    /// Every Property of the object
    fn fields(&self) -> Vec<&dyn FieldCell>;

    fn fields_mut(&mut self) -> Vec<&mut dyn FieldCell>;

    fn object_id(&self) -> Option<ObjectId> {
        self.synced_object().object_id()
    }

    /// True iff any field changed since the last `clear_dirty`
    fn is_dirty(&self) -> bool {
        self.synced_object().is_dirty()
    }

    fn field_count(&self) -> usize {
        self.fields().len()
    }

    /// Current value of every field, ordered by field index
    fn field_values(&self) -> Vec<FieldValue> {
        let mut fields = self.fields();
        fields.sort_by_key(|field| field.index());
        fields.iter().map(|field| field.value()).collect()
    }

    /// Calls `visit` with the index and value of every dirty field, in index order
    fn for_each_dirty_field(&self, visit: &mut dyn FnMut(FieldIndex, FieldValue)) {
        let mut fields = self.fields();
        fields.sort_by_key(|field| field.index());
        for field in fields {
            if field.is_dirty() {
                visit(field.index(), field.value());
            }
        }
    }

    fn clear_dirty(&self) {
        self.synced_object().clear_dirty();
    }

    /// Checks that `value` could be applied to field `index`, without
    /// writing anything
    fn validate_remote(&self, index: FieldIndex, value: &FieldValue) -> Result<(), ObjectError> {
        let fields = self.fields();
        let Some(field) = fields.iter().find(|field| field.index() == index) else {
            return Err(ObjectError::FieldIndexOutOfRange {
                index,
                field_count: fields.len(),
            });
        };
        if field.kind() != value.kind() {
            return Err(ObjectError::FieldTypeMismatch {
                index,
                expected: field.kind(),
                found: value.kind(),
            });
        }
        Ok(())
    }

    /// Stores a value received from a remote host without marking it dirty
    fn apply_remote(&mut self, index: FieldIndex, value: FieldValue) -> Result<(), ObjectError> {
        let field_count = self.field_count();
        let Some(field) = self
            .fields_mut()
            .into_iter()
            .find(|field| field.index() == index)
        else {
            return Err(ObjectError::FieldIndexOutOfRange { index, field_count });
        };
        field.apply_remote(value).map_err(|error| match error {
            PropertyError::TypeMismatch { expected, found } => ObjectError::FieldTypeMismatch {
                index,
                expected,
                found,
            },
            PropertyError::TooManyFields { .. } => ObjectError::FieldIndexOutOfRange {
                index,
                field_count,
            },
        })
    }
}

use thiserror::Error;

use crate::{world::component::field_value::FieldKind, FieldIndex, ObjectId};

/// Errors that can occur while constructing or writing a Property
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The owning object already registered the maximum number of fields
    #[error("Cannot register more than {max} Properties on one object")]
    TooManyFields { max: usize },

    /// A remote value of the wrong scalar kind was applied to the Property
    #[error("Property holds {expected} values but received a {found} value")]
    TypeMismatch {
        expected: FieldKind,
        found: FieldKind,
    },
}

/// Errors raised by replicated objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// An incoming field index is past the end of the object's layout.
    /// Usually the two hosts were built with different versions of the type
    #[error("Field index {index} is out of range for an object with {field_count} fields")]
    FieldIndexOutOfRange { index: FieldIndex, field_count: usize },

    /// An incoming value does not match the declared type of the field
    #[error("Field {index} holds {expected} values but received a {found} value")]
    FieldTypeMismatch {
        index: FieldIndex,
        expected: FieldKind,
        found: FieldKind,
    },

    /// Object ids are assigned once, by the Synchronizer that takes ownership
    #[error("Object is already bound to id {existing}")]
    IdAlreadyAssigned { existing: ObjectId },
}

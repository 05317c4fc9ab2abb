use thiserror::Error;

use crate::{
    connection::error::LinkError, messages::error::CodecError,
    world::component::error::ObjectError, world::component::field_value::FieldKind, FieldIndex,
    ObjectId, TypeTag,
};

/// Failures a Synchronizer reports while applying traffic from one peer.
/// None of them is fatal to the process; the worst case drops the peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A frame from the peer could not be decoded
    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] CodecError),

    /// A Create named a type that has no registered lifetime managers
    #[error("No lifetime managers registered for type tag {type_tag}")]
    UnknownTypeTag { type_tag: TypeTag },

    /// A message addressed a field the local type does not declare.
    /// The hosts disagree on the type's layout
    #[error("Field index {index} is out of range for object {object_id} with {field_count} fields")]
    FieldIndexOutOfRange {
        object_id: ObjectId,
        index: FieldIndex,
        field_count: usize,
    },

    #[error("Field {index} of object {object_id} holds {expected} values but received a {found} value")]
    FieldTypeMismatch {
        object_id: ObjectId,
        index: FieldIndex,
        expected: FieldKind,
        found: FieldKind,
    },

    /// An Update or Destroy arrived for an object that does not exist
    #[error("Object {object_id} not found")]
    ObjectNotFound { object_id: ObjectId },

    /// A Create arrived for an object id that is already live
    #[error("Object {object_id} already exists")]
    DuplicateObject { object_id: ObjectId },

    /// Every object id is held by a live or pending-destroy object
    #[error("No free object ids remain")]
    ObjectIdsExhausted,

    #[error("Link error: {0}")]
    Link(#[from] LinkError),
}

impl SyncError {
    /// Attaches the object id to an error raised by the object itself
    pub fn from_object_error(object_id: ObjectId, error: ObjectError) -> Self {
        match error {
            ObjectError::FieldIndexOutOfRange { index, field_count } => {
                SyncError::FieldIndexOutOfRange {
                    object_id,
                    index,
                    field_count,
                }
            }
            ObjectError::FieldTypeMismatch {
                index,
                expected,
                found,
            } => SyncError::FieldTypeMismatch {
                object_id,
                index,
                expected,
                found,
            },
            ObjectError::IdAlreadyAssigned { .. } => SyncError::DuplicateObject { object_id },
        }
    }

    /// Whether the Link that produced this error can no longer be trusted
    pub fn is_link_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::MalformedMessage(_) | SyncError::UnknownTypeTag { .. } | SyncError::Link(_)
        )
    }
}

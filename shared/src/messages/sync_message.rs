use std::fmt;

use crate::{
    types::{FieldIndex, ObjectId, TypeTag},
    world::component::field_value::FieldValue,
};

/// The three things an authoritative host tells its replicas
#[derive(Clone, Debug, PartialEq)]
pub enum SyncMessage {
    /// The object now exists; seed it with these values, ordered by field index
    Create {
        object_id: ObjectId,
        type_tag: TypeTag,
        values: Vec<FieldValue>,
    },
    /// Apply these field values to an existing object
    Update {
        object_id: ObjectId,
        fields: Vec<(FieldIndex, FieldValue)>,
    },
    /// The object no longer exists
    Destroy { object_id: ObjectId },
}

impl SyncMessage {
    pub fn object_id(&self) -> ObjectId {
        match self {
            SyncMessage::Create { object_id, .. } => *object_id,
            SyncMessage::Update { object_id, .. } => *object_id,
            SyncMessage::Destroy { object_id } => *object_id,
        }
    }

    pub fn get_type(&self) -> SyncMessageType {
        match self {
            SyncMessage::Create { .. } => SyncMessageType::Create,
            SyncMessage::Update { .. } => SyncMessageType::Update,
            SyncMessage::Destroy { .. } => SyncMessageType::Destroy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncMessageType {
    Create,
    Update,
    Destroy,
}

impl SyncMessageType {
    pub fn to_u8(self) -> u8 {
        match self {
            SyncMessageType::Create => 1,
            SyncMessageType::Update => 2,
            SyncMessageType::Destroy => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(SyncMessageType::Create),
            2 => Some(SyncMessageType::Update),
            3 => Some(SyncMessageType::Destroy),
            _ => None,
        }
    }
}

impl fmt::Display for SyncMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncMessageType::Create => "Create",
            SyncMessageType::Update => "Update",
            SyncMessageType::Destroy => "Destroy",
        };
        f.write_str(name)
    }
}

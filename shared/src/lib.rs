//! # Syncnet Shared
//! Common functionality shared between syncnet-server & syncnet-client crates:
//! tracked fields, replicable objects, the sync message codec, and Links.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use syncnet_serde::{
    ByteCounter, ByteReader, ByteWrite, ByteWriter, ConstByteLength, Serde, SerdeErr,
};

mod connection;
mod constants;
mod messages;
mod synchronizer;
mod types;
mod world;

pub use connection::{
    error::LinkError, link::Link, link_config::LinkConfig, transport::Transport,
};
pub use constants::{DEFAULT_MAX_FRAME_BYTES, DEFAULT_SYNC_CHANNEL, MAX_FIELD_COUNT};
pub use messages::{
    decoder::{decode_frame, decode_messages, MessageDecoder},
    encoder::{encode_message, MessageEncoder},
    error::CodecError,
    sync_message::{SyncMessage, SyncMessageType},
};
pub use synchronizer::{error::SyncError, link_set::LinkSet};
pub use types::{ChannelId, FieldIndex, LinkId, ObjectId, TypeTag};
pub use world::{
    component::{
        diff_mask::DiffMask,
        error::{ObjectError, PropertyError},
        field_value::{FieldKind, FieldType, FieldValue},
        property::{
            FieldCell, Property, SyncedBool, SyncedF32, SyncedF64, SyncedI16, SyncedI32,
            SyncedI64, SyncedI8, SyncedU16, SyncedU32, SyncedU64, SyncedU8,
        },
        property_mutate::PropertyMutator,
        replicate::{Replicate, ReplicateAny},
        synced_object::SyncedObject,
    },
    object_store::ObjectStore,
};

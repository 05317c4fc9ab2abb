//! # Syncnet Client
//! The replica side of syncnet: mirrors the objects an authoritative server
//! broadcasts, building and releasing them through application-registered
//! lifetime managers.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use syncnet_shared::{
        FieldCell, FieldIndex, FieldValue, Link, LinkConfig, LinkId, ObjectId, Property,
        Replicate, SyncError, SyncedObject, Transport, TypeTag,
    };
}

mod client;
mod events;
mod lifetime_managers;

pub use client::{ClientConfig, SynchronizerClient};
pub use events::ReplicaEvent;

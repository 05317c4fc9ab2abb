//! # Syncnet Server
//! The authoritative side of syncnet: owns replicated objects and broadcasts
//! their creation, field changes and destruction to every connected client
//! Link.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use syncnet_shared::{
        FieldCell, FieldValue, Link, LinkConfig, LinkId, ObjectId, Property, Replicate,
        SyncError, SyncedObject, Transport, TypeTag,
    };
}

mod client_scope;
mod server;

pub use server::{ServerConfig, SynchronizerServer};

//! # Syncnet Serde
//! Byte-aligned serialization primitives for the syncnet wire protocol.
//! Every multi-byte number is written in network (big-endian) order so that
//! hosts of any endianness agree on the encoding.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_counter;
mod byte_reader;
mod byte_writer;
mod error;
mod integer;
mod number;
mod serde;

pub use byte_counter::ByteCounter;
pub use byte_reader::ByteReader;
pub use byte_writer::{ByteWrite, ByteWriter};
pub use error::SerdeErr;
pub use serde::{ConstByteLength, Serde};

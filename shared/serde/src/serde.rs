use crate::{byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr};

/// A type that can be written to and read back from a byte stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into the outgoing stream
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Reads a value out of the incoming stream
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Number of bytes `ser` will write for this value
    fn byte_length(&self) -> usize;
}

/// Implemented by types whose encoding always has the same width
pub trait ConstByteLength {
    fn const_byte_length() -> usize;
}

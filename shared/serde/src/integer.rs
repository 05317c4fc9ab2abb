use crate::{
    byte_reader::ByteReader,
    byte_writer::ByteWrite,
    error::SerdeErr,
    serde::{ConstByteLength, Serde},
};

// Fixed-width integers, written big-endian

macro_rules! impl_serde_for_integer {
    ($($int:ty),* $(,)?) => {
        $(
            impl Serde for $int {
                fn ser(&self, writer: &mut dyn ByteWrite) {
                    writer.write_bytes(&self.to_be_bytes());
                }

                fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                    let bytes = reader.read_array::<{ std::mem::size_of::<$int>() }>()?;
                    Ok(<$int>::from_be_bytes(bytes))
                }

                fn byte_length(&self) -> usize {
                    std::mem::size_of::<$int>()
                }
            }

            impl ConstByteLength for $int {
                fn const_byte_length() -> usize {
                    std::mem::size_of::<$int>()
                }
            }
        )*
    };
}

impl_serde_for_integer!(u8, i8, u16, i16, u32, i32, u64, i64);

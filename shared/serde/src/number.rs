use crate::{
    byte_reader::ByteReader,
    byte_writer::ByteWrite,
    error::SerdeErr,
    serde::{ConstByteLength, Serde},
};

// Floats travel as their IEEE-754 bit patterns, so NaN payloads survive

impl Serde for f32 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.to_bits().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(f32::from_bits(u32::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        4
    }
}

impl ConstByteLength for f32 {
    fn const_byte_length() -> usize {
        4
    }
}

impl Serde for f64 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.to_bits().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(f64::from_bits(u64::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        8
    }
}

impl ConstByteLength for f64 {
    fn const_byte_length() -> usize {
        8
    }
}

// Bools take a whole byte; anything other than 0 or 1 is rejected

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SerdeErr::InvalidValue {
                type_name: "bool",
                value: u64::from(other),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}

use std::fmt;

use syncnet_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

/// Wire kind of a scalar field value; written as the first byte of every value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl FieldKind {
    pub fn to_u8(self) -> u8 {
        match self {
            FieldKind::Bool => 0,
            FieldKind::U8 => 1,
            FieldKind::I8 => 2,
            FieldKind::U16 => 3,
            FieldKind::I16 => 4,
            FieldKind::U32 => 5,
            FieldKind::I32 => 6,
            FieldKind::U64 => 7,
            FieldKind::I64 => 8,
            FieldKind::F32 => 9,
            FieldKind::F64 => 10,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        let kind = match value {
            0 => FieldKind::Bool,
            1 => FieldKind::U8,
            2 => FieldKind::I8,
            3 => FieldKind::U16,
            4 => FieldKind::I16,
            5 => FieldKind::U32,
            6 => FieldKind::I32,
            7 => FieldKind::U64,
            8 => FieldKind::I64,
            9 => FieldKind::F32,
            10 => FieldKind::F64,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::U8 => "u8",
            FieldKind::I8 => "i8",
            FieldKind::U16 => "u16",
            FieldKind::I16 => "i16",
            FieldKind::U32 => "u32",
            FieldKind::I32 => "i32",
            FieldKind::U64 => "u64",
            FieldKind::I64 => "i64",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
        }
    }

    /// Width of the payload that follows the kind byte
    pub fn payload_length(self) -> usize {
        match self {
            FieldKind::Bool | FieldKind::U8 | FieldKind::I8 => 1,
            FieldKind::U16 | FieldKind::I16 => 2,
            FieldKind::U32 | FieldKind::I32 | FieldKind::F32 => 4,
            FieldKind::U64 | FieldKind::I64 | FieldKind::F64 => 8,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A self-describing scalar, the unit in which field state crosses the wire
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::U8(_) => FieldKind::U8,
            FieldValue::I8(_) => FieldKind::I8,
            FieldValue::U16(_) => FieldKind::U16,
            FieldValue::I16(_) => FieldKind::I16,
            FieldValue::U32(_) => FieldKind::U32,
            FieldValue::I32(_) => FieldKind::I32,
            FieldValue::U64(_) => FieldKind::U64,
            FieldValue::I64(_) => FieldKind::I64,
            FieldValue::F32(_) => FieldKind::F32,
            FieldValue::F64(_) => FieldKind::F64,
        }
    }
}

impl Serde for FieldValue {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.kind().to_u8());
        match self {
            FieldValue::Bool(value) => value.ser(writer),
            FieldValue::U8(value) => value.ser(writer),
            FieldValue::I8(value) => value.ser(writer),
            FieldValue::U16(value) => value.ser(writer),
            FieldValue::I16(value) => value.ser(writer),
            FieldValue::U32(value) => value.ser(writer),
            FieldValue::I32(value) => value.ser(writer),
            FieldValue::U64(value) => value.ser(writer),
            FieldValue::I64(value) => value.ser(writer),
            FieldValue::F32(value) => value.ser(writer),
            FieldValue::F64(value) => value.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let kind_byte = reader.read_byte()?;
        let Some(kind) = FieldKind::from_u8(kind_byte) else {
            return Err(SerdeErr::InvalidValue {
                type_name: FIELD_KIND_TYPE_NAME,
                value: u64::from(kind_byte),
            });
        };
        let value = match kind {
            FieldKind::Bool => FieldValue::Bool(bool::de(reader)?),
            FieldKind::U8 => FieldValue::U8(u8::de(reader)?),
            FieldKind::I8 => FieldValue::I8(i8::de(reader)?),
            FieldKind::U16 => FieldValue::U16(u16::de(reader)?),
            FieldKind::I16 => FieldValue::I16(i16::de(reader)?),
            FieldKind::U32 => FieldValue::U32(u32::de(reader)?),
            FieldKind::I32 => FieldValue::I32(i32::de(reader)?),
            FieldKind::U64 => FieldValue::U64(u64::de(reader)?),
            FieldKind::I64 => FieldValue::I64(i64::de(reader)?),
            FieldKind::F32 => FieldValue::F32(f32::de(reader)?),
            FieldKind::F64 => FieldValue::F64(f64::de(reader)?),
        };
        Ok(value)
    }

    fn byte_length(&self) -> usize {
        1 + self.kind().payload_length()
    }
}

/// `type_name` reported when a value starts with an unassigned kind byte
pub(crate) const FIELD_KIND_TYPE_NAME: &str = "field kind";

/// A scalar that can live inside a Property
pub trait FieldType: Copy + PartialEq + Send + Sync + ConstByteLength + 'static {
    const KIND: FieldKind;

    fn into_value(self) -> FieldValue;

    fn from_value(value: FieldValue) -> Option<Self>;
}

macro_rules! impl_field_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$variant;

                fn into_value(self) -> FieldValue {
                    FieldValue::$variant(self)
                }

                fn from_value(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_field_type!(
    bool => Bool,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
);

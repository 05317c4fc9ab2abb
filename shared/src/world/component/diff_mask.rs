use std::fmt;

use crate::types::FieldIndex;

/// One bit per field of an object; a set bit means the field changed since
/// it was last broadcast
#[derive(Clone, PartialEq, Eq, Default)]
pub struct DiffMask {
    mask: Vec<u8>,
}

impl DiffMask {
    pub fn new() -> Self {
        Self { mask: Vec::new() }
    }

    pub fn bit(&self, index: FieldIndex) -> bool {
        let byte_index = usize::from(index / 8);
        let adjusted_index = index % 8;
        match self.mask.get(byte_index) {
            Some(byte) => byte & (1 << adjusted_index) != 0,
            None => false,
        }
    }

    pub fn set_bit(&mut self, index: FieldIndex, value: bool) {
        let byte_index = usize::from(index / 8);
        let adjusted_index = index % 8;
        if byte_index >= self.mask.len() {
            if !value {
                return;
            }
            self.mask.resize(byte_index + 1, 0);
        }
        let byte = &mut self.mask[byte_index];
        if value {
            *byte |= 1 << adjusted_index;
        } else {
            *byte &= !(1 << adjusted_index);
        }
    }

    pub fn clear(&mut self) {
        for byte in self.mask.iter_mut() {
            *byte = 0;
        }
    }

    pub fn is_clear(&self) -> bool {
        self.mask.iter().all(|byte| *byte == 0)
    }
}

impl fmt::Debug for DiffMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiffMask(")?;
        for byte in self.mask.iter().rev() {
            write!(f, "{:08b}", byte)?;
        }
        write!(f, ")")
    }
}

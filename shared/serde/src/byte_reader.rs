use crate::error::SerdeErr;

/// Cursor over an incoming byte slice
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    pub fn peek_byte(&self) -> Result<u8, SerdeErr> {
        self.buffer
            .get(self.position)
            .copied()
            .ok_or(SerdeErr::UnexpectedEnd {
                needed: 1,
                remaining: 0,
            })
    }

    /// Borrows the next `count` bytes and advances past them
    pub fn read_slice(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                remaining,
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..self.position])
    }

    /// Reads exactly `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let slice = self.read_slice(N)?;
        let mut output = [0u8; N];
        output.copy_from_slice(slice);
        Ok(output)
    }
}

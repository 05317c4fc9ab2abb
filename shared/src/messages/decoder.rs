use syncnet_serde::{ByteReader, Serde};

use crate::{
    constants::DEFAULT_MAX_FRAME_BYTES,
    messages::{
        constants::LENGTH_PREFIX_BYTES,
        error::CodecError,
        sync_message::{SyncMessage, SyncMessageType},
    },
    types::{ObjectId, TypeTag},
    world::component::field_value::FieldValue,
};

/// Reassembles sync messages from a byte stream that may deliver frames
/// split or concatenated arbitrarily.
///
/// A malformed frame whose length prefix is sane is skipped, leaving the
/// decoder at the next frame boundary. A length prefix above the limit
/// means the boundaries can no longer be trusted: the decoder drops its
/// buffer and refuses further input.
pub struct MessageDecoder {
    buffer: Vec<u8>,
    max_frame_bytes: u32,
    unrecoverable: bool,
}

impl MessageDecoder {
    pub fn new(max_frame_bytes: u32) -> Self {
        Self {
            buffer: Vec::new(),
            max_frame_bytes,
            unrecoverable: false,
        }
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        if self.unrecoverable {
            return;
        }
        self.buffer.extend_from_slice(bytes);
    }

    /// Bytes held back because they do not yet form a complete frame
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_unrecoverable(&self) -> bool {
        self.unrecoverable
    }

    /// Next complete message, or `None` if more bytes are needed
    pub fn next_message(&mut self) -> Option<Result<SyncMessage, CodecError>> {
        if self.unrecoverable || self.buffer.len() < LENGTH_PREFIX_BYTES {
            return None;
        }

        let mut reader = ByteReader::new(&self.buffer);
        let length = match u32::de(&mut reader) {
            Ok(length) => length,
            Err(error) => return Some(Err(error.into())),
        };

        if length > self.max_frame_bytes {
            self.unrecoverable = true;
            self.buffer.clear();
            return Some(Err(CodecError::FrameTooLarge {
                length,
                max: self.max_frame_bytes,
            }));
        }

        // u32 always fits in usize on the platforms we build for
        let frame_end = LENGTH_PREFIX_BYTES + length as usize;
        if self.buffer.len() < frame_end {
            return None;
        }

        let result = decode_frame(&self.buffer[LENGTH_PREFIX_BYTES..frame_end]);
        self.buffer.drain(..frame_end);
        Some(result)
    }
}

impl Default for MessageDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl Iterator for MessageDecoder {
    type Item = Result<SyncMessage, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_message()
    }
}

/// Decodes a buffer that must hold whole frames only.
/// A partial frame at the end is reported as `Truncated`.
pub fn decode_messages(bytes: &[u8]) -> Result<Vec<SyncMessage>, CodecError> {
    let mut decoder = MessageDecoder::default();
    decoder.push_bytes(bytes);

    let mut messages = Vec::new();
    while let Some(result) = decoder.next_message() {
        messages.push(result?);
    }
    if decoder.buffered_len() > 0 {
        return Err(CodecError::Truncated);
    }
    Ok(messages)
}

/// Decodes the bytes after a length prefix: kind byte and body, which must
/// be consumed exactly
pub fn decode_frame(frame: &[u8]) -> Result<SyncMessage, CodecError> {
    let mut reader = ByteReader::new(frame);

    if reader.is_empty() {
        return Err(CodecError::EmptyFrame);
    }
    let kind = reader.read_byte()?;
    let Some(message_type) = SyncMessageType::from_u8(kind) else {
        return Err(CodecError::UnknownMessageKind { kind });
    };

    let message = match message_type {
        SyncMessageType::Create => {
            let object_id = ObjectId::new(u32::de(&mut reader)?);
            let type_tag = TypeTag::new(u32::de(&mut reader)?);
            let count = reader.read_byte()?;
            let mut values = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                values.push(FieldValue::de(&mut reader)?);
            }
            SyncMessage::Create {
                object_id,
                type_tag,
                values,
            }
        }
        SyncMessageType::Update => {
            let object_id = ObjectId::new(u32::de(&mut reader)?);
            let count = reader.read_byte()?;
            let mut fields = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                let index = reader.read_byte()?;
                let value = FieldValue::de(&mut reader)?;
                fields.push((index, value));
            }
            SyncMessage::Update { object_id, fields }
        }
        SyncMessageType::Destroy => SyncMessage::Destroy {
            object_id: ObjectId::new(u32::de(&mut reader)?),
        },
    };

    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes {
            count: reader.remaining(),
        });
    }
    Ok(message)
}

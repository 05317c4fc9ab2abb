use syncnet_serde::{ByteCounter, ByteWrite, ByteWriter, Serde};

use crate::messages::{
    constants::MAX_VALUES_PER_MESSAGE, error::CodecError, sync_message::SyncMessage,
};

/// Writes sync messages as back-to-back, length-prefixed frames
pub struct MessageEncoder {
    writer: ByteWriter,
    message_count: usize,
}

impl MessageEncoder {
    pub fn new() -> Self {
        Self {
            writer: ByteWriter::new(),
            message_count: 0,
        }
    }

    /// Appends one frame for `message`. Nothing is written if the message
    /// cannot be encoded
    pub fn encode(&mut self, message: &SyncMessage) -> Result<(), CodecError> {
        check_value_count(message)?;

        let mut counter = ByteCounter::new();
        write_frame_body(message, &mut counter);
        let Ok(length) = u32::try_from(counter.count()) else {
            return Err(CodecError::FrameTooLarge {
                length: u32::MAX,
                max: u32::MAX,
            });
        };

        length.ser(&mut self.writer);
        write_frame_body(message, &mut self.writer);
        self.message_count += 1;
        Ok(())
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    pub fn is_empty(&self) -> bool {
        self.message_count == 0
    }

    pub fn bytes_written(&self) -> usize {
        self.writer.bytes_written()
    }

    /// Hands back every frame written so far and resets the encoder
    pub fn take_bytes(&mut self) -> Vec<u8> {
        self.message_count = 0;
        self.writer.take_bytes()
    }
}

impl Default for MessageEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encodes a single message into its own frame
pub fn encode_message(message: &SyncMessage) -> Result<Vec<u8>, CodecError> {
    let mut encoder = MessageEncoder::new();
    encoder.encode(message)?;
    Ok(encoder.take_bytes())
}

fn check_value_count(message: &SyncMessage) -> Result<(), CodecError> {
    let count = match message {
        SyncMessage::Create { values, .. } => values.len(),
        SyncMessage::Update { fields, .. } => fields.len(),
        SyncMessage::Destroy { .. } => 0,
    };
    if count > MAX_VALUES_PER_MESSAGE {
        return Err(CodecError::TooManyValues {
            count,
            max: MAX_VALUES_PER_MESSAGE,
        });
    }
    Ok(())
}

// Kind byte followed by the body. Counts were validated by the caller.
fn write_frame_body(message: &SyncMessage, writer: &mut dyn ByteWrite) {
    writer.write_byte(message.get_type().to_u8());
    match message {
        SyncMessage::Create {
            object_id,
            type_tag,
            values,
        } => {
            object_id.to_u32().ser(writer);
            type_tag.to_u32().ser(writer);
            write_count(values.len(), writer);
            for value in values {
                value.ser(writer);
            }
        }
        SyncMessage::Update { object_id, fields } => {
            object_id.to_u32().ser(writer);
            write_count(fields.len(), writer);
            for (index, value) in fields {
                index.ser(writer);
                value.ser(writer);
            }
        }
        SyncMessage::Destroy { object_id } => {
            object_id.to_u32().ser(writer);
        }
    }
}

fn write_count(count: usize, writer: &mut dyn ByteWrite) {
    writer.write_byte(u8::try_from(count).unwrap_or(u8::MAX));
}

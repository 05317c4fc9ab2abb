use syncnet_shared::{encode_message, ByteWrite, ByteWriter, ChannelId, Serde, SyncMessage};

/// Wraps `payload` the way a Link frames it on the wire
pub fn link_frame(channel: ChannelId, payload: &[u8]) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    channel.ser(&mut writer);
    let length = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    length.ser(&mut writer);
    writer.write_bytes(payload);
    writer.to_bytes()
}

/// A Link frame on `channel` carrying one encoded sync message
pub fn sync_frame(channel: ChannelId, message: &SyncMessage) -> Vec<u8> {
    let payload = encode_message(message).unwrap_or_default();
    link_frame(channel, &payload)
}

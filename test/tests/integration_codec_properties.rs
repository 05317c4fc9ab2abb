//! Property tests for the sync message codec

use proptest::prelude::*;

use syncnet_shared::{
    decode_messages, encode_message, FieldValue, MessageDecoder, MessageEncoder, ObjectId,
    SyncMessage, TypeTag,
};

fn field_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<bool>().prop_map(FieldValue::Bool),
        any::<u8>().prop_map(FieldValue::U8),
        any::<i8>().prop_map(FieldValue::I8),
        any::<u16>().prop_map(FieldValue::U16),
        any::<i16>().prop_map(FieldValue::I16),
        any::<u32>().prop_map(FieldValue::U32),
        any::<i32>().prop_map(FieldValue::I32),
        any::<u64>().prop_map(FieldValue::U64),
        any::<i64>().prop_map(FieldValue::I64),
        (-1.0e9f32..1.0e9f32).prop_map(FieldValue::F32),
        (-1.0e18f64..1.0e18f64).prop_map(FieldValue::F64),
    ]
}

fn sync_message() -> impl Strategy<Value = SyncMessage> {
    prop_oneof![
        (any::<u32>(), any::<u32>(), prop::collection::vec(field_value(), 0..16)).prop_map(
            |(object_id, type_tag, values)| SyncMessage::Create {
                object_id: ObjectId::new(object_id),
                type_tag: TypeTag::new(type_tag),
                values,
            }
        ),
        (
            any::<u32>(),
            prop::collection::vec((any::<u8>(), field_value()), 0..16)
        )
            .prop_map(|(object_id, fields)| SyncMessage::Update {
                object_id: ObjectId::new(object_id),
                fields,
            }),
        any::<u32>().prop_map(|object_id| SyncMessage::Destroy {
            object_id: ObjectId::new(object_id),
        }),
    ]
}

proptest! {
    #[test]
    fn single_message_round_trip(message in sync_message()) {
        let bytes = encode_message(&message).expect("encodable");
        prop_assert_eq!(decode_messages(&bytes), Ok(vec![message]));
    }

    #[test]
    fn stream_split_anywhere_decodes_in_order(
        messages in prop::collection::vec(sync_message(), 1..8),
        split_points in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let mut encoder = MessageEncoder::new();
        for message in &messages {
            encoder.encode(message).expect("encodable");
        }
        let bytes = encoder.take_bytes();

        let mut cuts: Vec<usize> = split_points.iter().map(|index| index.index(bytes.len())).collect();
        cuts.push(bytes.len());
        cuts.sort_unstable();

        let mut decoder = MessageDecoder::default();
        let mut decoded = Vec::new();
        let mut start = 0;
        for cut in cuts {
            decoder.push_bytes(&bytes[start..cut]);
            start = cut;
            while let Some(result) = decoder.next_message() {
                decoded.push(result.expect("valid stream"));
            }
        }

        prop_assert_eq!(decoded, messages);
        prop_assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut decoder = MessageDecoder::new(256);
        decoder.push_bytes(&bytes);
        // Every call consumes a frame or stops, so this terminates
        while decoder.next_message().is_some() {}
        let _ = decode_messages(&bytes);
    }
}

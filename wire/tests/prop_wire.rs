use bitstream::{BitSet, ByteReader, ByteWriter};
use proptest::prelude::*;
use schema::{Category, Layouts};
use wire::{
    decode_batch, decode_mask, encode_mask, read_packed_guid, write_packed_guid, Block,
    BlockDecoder, Limits, Movement, MovementPayload, Position, UpdateBatch, Values,
};

proptest! {
    #[test]
    fn prop_mask_roundtrip_within_count(
        count in 1usize..=198,
        bits in prop::collection::vec(any::<prop::sample::Index>(), 0..40),
    ) {
        let mut mask = BitSet::new(count);
        for bit in bits {
            mask.set(bit.index(count)).unwrap();
        }
        let mut writer = ByteWriter::new();
        encode_mask(&mask, &mut writer);
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_mask(&mut reader, &Limits::default(), Some(count)).unwrap();
        prop_assert_eq!(decoded, mask);
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_packed_guid_roundtrip(guid in any::<u64>()) {
        let mut writer = ByteWriter::new();
        write_packed_guid(&mut writer, guid);
        let bytes = writer.finish();
        prop_assert_eq!(bytes.len(), wire::packed_guid_len(guid));
        let mut reader = ByteReader::new(&bytes);
        prop_assert_eq!(read_packed_guid(&mut reader).unwrap(), guid);
    }

    #[test]
    fn prop_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut decoder = BlockDecoder::new(Limits::for_testing());
        let _ = decode_batch(&data, &mut decoder);
        let mut reader = ByteReader::new(&data);
        let _ = decoder.decode(&mut reader);
    }
}

#[test]
fn batch_of_create_then_values_decodes_in_order() {
    let layouts = Layouts::standard();
    let corpse = layouts.get(Category::Corpse);

    let mut create_values = Values::new(corpse.slot_count());
    create_values.insert(0, 0x44).unwrap();
    create_values.insert(2, u32::from(Category::Corpse.tag())).unwrap();
    let create = Block::Create {
        full: true,
        guid: 0x44,
        category: Category::Corpse,
        movement: Movement {
            payload: MovementPayload::Stationary(Position::new(-8913.2, 554.6, 93.9, 0.0)),
            low_guid: Some(0x44),
            ..Movement::default()
        },
        values: create_values,
    };
    let mut update_values = Values::new(corpse.slot_count());
    update_values.insert(34, 1).unwrap();
    let update = Block::Values {
        guid: 0x44,
        values: update_values,
    };

    let mut batch = UpdateBatch::new();
    batch.push_block(&create.to_bytes());
    batch.push_block(&update.to_bytes());

    let mut decoder = BlockDecoder::new(Limits::default());
    let decoded = decode_batch(&batch.encode(), &mut decoder).unwrap();
    assert_eq!(decoded.blocks, vec![create, update]);
    assert!(decoded.out_of_range.is_empty());
}

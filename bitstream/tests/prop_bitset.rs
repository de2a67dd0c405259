use bitstream::{BitSet, ByteReader, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    U16(u16),
    U32(u32),
    I32(i32),
    U64(u64),
    F32(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<u16>().prop_map(Op::U16),
        any::<u32>().prop_map(Op::U32),
        any::<i32>().prop_map(Op::I32),
        any::<u64>().prop_map(Op::U64),
        any::<u32>().prop_map(Op::F32),
    ]
}

proptest! {
    #[test]
    fn prop_byte_ops_read_back(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = ByteWriter::new();
        for op in &ops {
            match op {
                Op::U8(v) => writer.write_u8(*v),
                Op::U16(v) => writer.write_u16(*v),
                Op::U32(v) => writer.write_u32(*v),
                Op::I32(v) => writer.write_i32(*v),
                Op::U64(v) => writer.write_u64(*v),
                Op::F32(bits) => writer.write_f32(f32::from_bits(*bits)),
            }
        }
        let bytes = writer.finish();

        let mut reader = ByteReader::new(&bytes);
        for op in &ops {
            match op {
                Op::U8(v) => prop_assert_eq!(reader.read_u8().unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(reader.read_u16().unwrap(), *v),
                Op::U32(v) => prop_assert_eq!(reader.read_u32().unwrap(), *v),
                Op::I32(v) => prop_assert_eq!(reader.read_i32().unwrap(), *v),
                Op::U64(v) => prop_assert_eq!(reader.read_u64().unwrap(), *v),
                Op::F32(bits) => prop_assert_eq!(reader.read_f32().unwrap().to_bits(), *bits),
            }
        }
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_bitset_matches_model(
        len in 1usize..300,
        indexes in prop::collection::vec(0usize..300, 0..64),
    ) {
        let mut bits = BitSet::new(len);
        let mut model = std::collections::BTreeSet::new();
        for idx in indexes {
            let result = bits.set(idx);
            if idx < len {
                prop_assert_eq!(result.unwrap(), model.insert(idx));
            } else {
                prop_assert!(result.is_err());
            }
        }
        let ones: Vec<usize> = bits.iter_ones().collect();
        let expected: Vec<usize> = model.iter().copied().collect();
        prop_assert_eq!(&ones, &expected);
        prop_assert_eq!(bits.count_ones(), model.len());
        prop_assert_eq!(bits.highest_set(), model.iter().next_back().copied());

        let rebuilt = BitSet::from_words(len, bits.words()).unwrap();
        prop_assert_eq!(rebuilt, bits);
    }

    #[test]
    fn prop_truncated_reads_never_panic(data in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut reader = ByteReader::new(&data);
        while reader.read_u32().is_ok() {}
        prop_assert!(reader.remaining() < 4);
        let _ = reader.read_u64();
        let _ = reader.read_bytes(usize::MAX);
    }
}

use proptest::prelude::*;
use schema::Lane;

fn lane_strategy() -> impl Strategy<Value = Lane> {
    prop_oneof![
        Just(Lane::WORD),
        (0u32..4).prop_map(Lane::byte),
        (0u32..2).prop_map(Lane::half),
    ]
}

proptest! {
    #[test]
    fn prop_insert_then_extract(lane in lane_strategy(), word in any::<u32>(), value in any::<u32>()) {
        let updated = lane.insert(word, value);
        prop_assert_eq!(lane.extract(updated), value & (lane.mask() >> lane.shift()));
        // Bits outside the lane are untouched.
        prop_assert_eq!(updated & !lane.mask(), word & !lane.mask());
    }

    #[test]
    fn prop_reinserting_extracted_is_identity(lane in lane_strategy(), word in any::<u32>()) {
        prop_assert_eq!(lane.insert(word, lane.extract(word)), word);
    }

    #[test]
    fn prop_disjoint_byte_lanes_commute(
        a in 0u32..4,
        b in 0u32..4,
        word in any::<u32>(),
        x in any::<u8>(),
        y in any::<u8>(),
    ) {
        prop_assume!(a != b);
        let (la, lb) = (Lane::byte(a), Lane::byte(b));
        let ab = lb.insert(la.insert(word, u32::from(x)), u32::from(y));
        let ba = la.insert(lb.insert(word, u32::from(y)), u32::from(x));
        prop_assert_eq!(ab, ba);
        prop_assert_eq!(la.extract(ab), u32::from(x));
        prop_assert_eq!(lb.extract(ab), u32::from(y));
    }
}

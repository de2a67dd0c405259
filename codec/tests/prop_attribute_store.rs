use codec::{Entity, HighGuid, ObjectGuid};
use proptest::prelude::*;
use schema::slots::unit;
use schema::{Category, Layouts};

fn creature() -> Entity {
    let layouts = Layouts::standard();
    let mut entity = Entity::new(
        ObjectGuid::new(HighGuid::Unit, 1, 1),
        layouts.get(Category::Unit),
    );
    entity.add_to_world();
    entity
}

proptest! {
    #[test]
    fn rewriting_current_values_never_dirties(
        writes in prop::collection::vec((0u16..unit::END, any::<u32>()), 0..64)
    ) {
        let mut entity = creature();
        for (slot, value) in &writes {
            entity.set_u32(*slot, *value);
        }
        entity.clear_dirty();
        for (slot, _) in &writes {
            let current = entity.get_u32(*slot);
            prop_assert!(!entity.set_u32(*slot, current));
        }
        prop_assert!(!entity.has_pending());
        prop_assert!(entity.dirty().is_clear());
    }

    #[test]
    fn dirty_iff_pending(
        writes in prop::collection::vec((0u16..unit::END, any::<u32>()), 0..64)
    ) {
        let mut entity = creature();
        let before = entity.slots().to_vec();
        for (slot, value) in &writes {
            entity.set_u32(*slot, *value);
        }
        prop_assert_eq!(entity.has_pending(), !entity.dirty().is_clear());
        for (index, word) in entity.slots().iter().enumerate() {
            if before[index] != *word {
                prop_assert!(entity.dirty().get(index));
            }
        }
    }
}

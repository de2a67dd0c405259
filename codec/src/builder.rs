//! Lifecycle block builder.

use bitstream::BitSet;
use schema::motion::living;
use schema::{Layouts, MotionKind, MoveFlags};
use wire::{Block, BlockKind, LivingMotion, Movement, MovementPayload, Values};

use crate::entity::Entity;
use crate::filter::{Phase, VisibilityFilter};
use crate::observer::ObserverView;
use crate::rules::VisibilityRules;
use crate::types::ObjectGuid;

/// A finished, immutable block addressed to one observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlock {
    kind: BlockKind,
    entity: ObjectGuid,
    bytes: Box<[u8]>,
}

impl EncodedBlock {
    fn new(block: &Block) -> Self {
        let bytes = block.to_bytes().into_boxed_slice();
        tracing::trace!(
            kind = block.kind().name(),
            guid = block.guid(),
            len = bytes.len(),
            "block built"
        );
        Self {
            kind: block.kind(),
            entity: ObjectGuid::from_raw(block.guid()),
            bytes,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// The entity the block describes.
    #[must_use]
    pub const fn entity(&self) -> ObjectGuid {
        self.entity
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn into_bytes(self) -> Box<[u8]> {
        self.bytes
    }
}

/// Assembles creation, value-update, movement and destroy blocks.
///
/// The builder never decides ordering; the distributor only asks for a
/// value-update or movement block after the observer received the creation
/// block.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    layouts: Layouts,
    filter: VisibilityFilter,
}

impl BlockBuilder {
    #[must_use]
    pub fn new(layouts: Layouts, rules: VisibilityRules) -> Self {
        let filter = VisibilityFilter::new(&layouts, rules);
        Self { layouts, filter }
    }

    #[must_use]
    pub const fn layouts(&self) -> &Layouts {
        &self.layouts
    }

    #[must_use]
    pub const fn filter(&self) -> &VisibilityFilter {
        &self.filter
    }

    /// Creation block: every non-zero slot outside the motion region, plus
    /// forced fields, through the creation override set.
    ///
    /// Freshly spawned entities of spawnable categories use `CREATE_FULL`.
    pub fn create(&self, subject: &Entity, observer: &dyn ObserverView) -> EncodedBlock {
        let mask = self.non_default_mask(subject);
        let values = self.filtered(Phase::Create, subject, observer, mask);
        EncodedBlock::new(&Block::Create {
            full: subject.is_fresh() && subject.category().is_spawnable(),
            guid: subject.guid().raw(),
            category: subject.category(),
            movement: movement_of(subject, observer),
            values,
        })
    }

    /// Value-update block over the dirty slots outside the motion region.
    ///
    /// Returns `None` when only motion slots (or nothing) changed.
    pub fn values(&self, subject: &Entity, observer: &dyn ObserverView) -> Option<EncodedBlock> {
        if !subject.has_dirty_values() {
            return None;
        }
        let mut mask = self.checked_mask(subject, subject.dirty().clone());
        if let Some(region) = subject.motion_region() {
            for slot in region.start..region.end() {
                let _ = mask.clear(usize::from(slot));
            }
        }
        let values = self.filtered(Phase::Update, subject, observer, mask);
        Some(EncodedBlock::new(&Block::Values {
            guid: subject.guid().raw(),
            values,
        }))
    }

    /// Value-update block carrying every non-zero slot, used to resend the
    /// full state to an observer that already knows the entity.
    pub fn forced_values(&self, subject: &Entity, observer: &dyn ObserverView) -> EncodedBlock {
        let mask = self.non_default_mask(subject);
        let values = self.filtered(Phase::Update, subject, observer, mask);
        EncodedBlock::new(&Block::Values {
            guid: subject.guid().raw(),
            values,
        })
    }

    /// Movement block; `None` for categories without a position.
    pub fn movement(&self, subject: &Entity, observer: &dyn ObserverView) -> Option<EncodedBlock> {
        if !subject.category().is_positional() {
            return None;
        }
        Some(EncodedBlock::new(&Block::Movement {
            guid: subject.guid().raw(),
            movement: movement_of(subject, observer),
        }))
    }

    /// Destroy block; the identifier is written in full.
    pub fn destroy(&self, guid: ObjectGuid, animated: bool) -> EncodedBlock {
        EncodedBlock::new(&Block::Destroy {
            guid: guid.raw(),
            animated,
        })
    }

    fn non_default_mask(&self, subject: &Entity) -> BitSet {
        let mut mask = self.checked_mask(subject, BitSet::new(subject.slot_count()));
        for (index, word) in subject.slots().iter().enumerate() {
            if *word != 0 && !subject.in_motion(index) {
                let _ = mask.set(index);
            }
        }
        mask
    }

    /// Fails fast when `mask` does not span the category's attribute count.
    fn checked_mask(&self, subject: &Entity, mask: BitSet) -> BitSet {
        let expected = self.layouts.get(subject.category()).slot_count();
        if mask.bit_len() != expected || subject.slot_count() != expected {
            tracing::error!(
                guid = %subject.guid(),
                category = %subject.category(),
                expected,
                actual = mask.bit_len(),
                "update mask length does not match the category layout"
            );
            panic!(
                "update mask of {} bits for {} ({expected} slots)",
                mask.bit_len(),
                subject.category()
            );
        }
        mask
    }

    fn filtered(
        &self,
        phase: Phase,
        subject: &Entity,
        observer: &dyn ObserverView,
        mut mask: BitSet,
    ) -> Values {
        for slot in self.filter.forced_slots(phase, subject) {
            let _ = mask.set(usize::from(slot));
        }
        let words = mask
            .iter_ones()
            .filter_map(|index| u16::try_from(index).ok())
            .map(|slot| self.filter.value(phase, subject, observer, slot))
            .collect::<Vec<_>>();
        match Values::from_parts(mask, words) {
            Ok(values) => values,
            Err(err) => {
                tracing::error!(guid = %subject.guid(), %err, "values sub-block mismatch");
                panic!("values sub-block mismatch: {err}");
            }
        }
    }
}

/// Movement sub-block of `subject` as seen by `observer`.
pub fn movement_of(subject: &Entity, observer: &dyn ObserverView) -> Movement {
    let facts = subject.facts();
    let payload = match subject.motion_region() {
        None => MovementPayload::None,
        Some(region) => {
            let position = subject.position().unwrap_or_default();
            match region.kind {
                MotionKind::Living => {
                    let mut speeds = [0.0; living::SPEED_COUNT];
                    for (index, speed) in speeds.iter_mut().enumerate() {
                        *speed = subject.speed(index);
                    }
                    MovementPayload::Living(LivingMotion {
                        move_flags: MoveFlags::from_raw(subject.move_flags()),
                        time: facts.move_time,
                        position,
                        fall_time: facts.fall_time,
                        speeds,
                        curve: subject.curve().cloned(),
                    })
                }
                MotionKind::Stationary => MovementPayload::Stationary(position),
            }
        }
    };
    let is_living = subject.category().is_living();
    Movement {
        is_self: observer.guid() == subject.guid(),
        payload,
        low_guid: (!is_living).then(|| subject.guid().low()),
        attacking_target: if is_living {
            facts.target.map(ObjectGuid::raw)
        } else {
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ObserverProfile;
    use crate::types::{class, race, HighGuid};
    use bitstream::ByteReader;
    use schema::slots::{item, object, unit};
    use schema::{Category, UpdateFlags};
    use wire::{BlockDecoder, Limits, Position};

    fn builder() -> BlockBuilder {
        BlockBuilder::new(Layouts::standard(), VisibilityRules::default())
    }

    fn viewer() -> ObserverProfile {
        ObserverProfile::new(ObjectGuid::new(HighGuid::Player, 0, 1), race::HUMAN, class::MAGE)
    }

    fn creature() -> Entity {
        let layouts = Layouts::standard();
        let mut entity = Entity::new(
            ObjectGuid::new(HighGuid::Unit, 448, 7),
            layouts.get(Category::Unit),
        );
        entity.set_u32(unit::HEALTH, 100);
        entity.set_u32(unit::MAX_HEALTH, 100);
        entity.set_position(Position::new(10.0, 20.0, 5.0, 0.5));
        entity.add_to_world();
        entity
    }

    fn decode(decoder: &mut BlockDecoder, block: &EncodedBlock) -> Block {
        let mut reader = ByteReader::new(block.bytes());
        let decoded = decoder.decode(&mut reader).unwrap();
        assert!(reader.is_empty());
        decoded
    }

    #[test]
    fn create_carries_non_default_slots_and_movement() {
        let builder = builder();
        let npc = creature();
        let block = builder.create(&npc, &viewer());
        assert_eq!(block.kind(), BlockKind::CreateFull);
        assert_eq!(block.entity(), npc.guid());

        let mut decoder = BlockDecoder::new(Limits::default());
        let Block::Create {
            full,
            category,
            movement,
            values,
            ..
        } = decode(&mut decoder, &block)
        else {
            panic!("expected a creation block");
        };
        assert!(full);
        assert_eq!(category, Category::Unit);
        assert_eq!(values.get(usize::from(unit::HEALTH)), Some(100));
        assert_eq!(values.get(usize::from(object::ENTRY)), Some(448));
        assert_eq!(values.get(usize::from(unit::MOTION + living::X)), None);
        assert!((movement.position().unwrap().x - 10.0).abs() < f32::EPSILON);
        assert!(movement.update_flags().contains(UpdateFlags::LIVING));
        assert!(!movement.update_flags().contains(UpdateFlags::LOW_GUID));
    }

    #[test]
    fn create_after_spawn_reveal_is_plain() {
        let builder = builder();
        let mut npc = creature();
        npc.clear_fresh();
        assert_eq!(builder.create(&npc, &viewer()).kind(), BlockKind::Create);
    }

    #[test]
    fn items_never_create_full() {
        let layouts = Layouts::standard();
        let mut sword = Entity::new(
            ObjectGuid::new(HighGuid::Item, 0, 3),
            layouts.get(Category::Item),
        );
        sword.set_u32(item::STACK_COUNT, 1);
        sword.add_to_world();
        let builder = builder();
        let block = builder.create(&sword, &viewer());
        assert_eq!(block.kind(), BlockKind::Create);
        assert!(builder.movement(&sword, &viewer()).is_none());

        let mut decoder = BlockDecoder::new(Limits::default());
        let Block::Create { movement, .. } = decode(&mut decoder, &block) else {
            panic!("expected a creation block");
        };
        assert_eq!(movement.payload, MovementPayload::None);
        assert_eq!(movement.low_guid, Some(3));
    }

    #[test]
    fn values_only_for_dirty_non_motion_slots() {
        let builder = builder();
        let mut npc = creature();
        assert!(builder.values(&npc, &viewer()).is_none());

        npc.set_position(Position::new(12.0, 20.0, 5.0, 0.5));
        assert!(builder.values(&npc, &viewer()).is_none());

        npc.set_u32(unit::HEALTH, 80);
        let block = builder.values(&npc, &viewer()).unwrap();
        let mut decoder = BlockDecoder::new(Limits::default());
        decode(&mut decoder, &builder.create(&npc, &viewer()));
        let Block::Values { values, .. } = decode(&mut decoder, &block) else {
            panic!("expected a values block");
        };
        assert_eq!(values.iter().collect::<Vec<_>>(), vec![(usize::from(unit::HEALTH), 80)]);
    }

    #[test]
    fn movement_block_flags() {
        let builder = builder();
        let mut npc = creature();
        let target = ObjectGuid::new(HighGuid::Player, 0, 9);
        npc.facts_mut().target = Some(target);
        let self_view = ObserverProfile::new(npc.guid(), race::HUMAN, class::MAGE);

        let mut decoder = BlockDecoder::new(Limits::default());
        let block = builder.movement(&npc, &self_view).unwrap();
        let Block::Movement { movement, .. } = decode(&mut decoder, &block) else {
            panic!("expected a movement block");
        };
        let flags = movement.update_flags();
        assert!(flags.contains(UpdateFlags::SELF | UpdateFlags::LIVING));
        assert!(flags.contains(UpdateFlags::HAS_ATTACKING_TARGET));
        assert_eq!(movement.attacking_target, Some(target.raw()));
    }

    #[test]
    fn forced_values_resend_everything() {
        let builder = builder();
        let npc = creature();
        let block = builder.forced_values(&npc, &viewer());
        assert_eq!(block.kind(), BlockKind::Values);
        let mut decoder = BlockDecoder::new(Limits::default());
        decode(&mut decoder, &builder.create(&npc, &viewer()));
        let Block::Values { values, .. } = decode(&mut decoder, &block) else {
            panic!("expected a values block");
        };
        assert!(values.get(usize::from(unit::MAX_HEALTH)).is_some());
        assert!(values.get(usize::from(object::GUID)).is_some());
    }

    #[test]
    fn destroy_block_is_fixed_size() {
        let guid = ObjectGuid::new(HighGuid::Unit, 1, 1);
        let block = builder().destroy(guid, true);
        assert_eq!(block.kind(), BlockKind::Destroy);
        assert_eq!(block.len(), wire::DESTROY_BLOCK_SIZE);
        assert_eq!(block.into_bytes()[1..9], guid.raw().to_le_bytes());
    }
}

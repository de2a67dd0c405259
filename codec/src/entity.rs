//! Attribute store: typed slot array, per-slot dirty bitmap, pending flag.

use bitstream::BitSet;
use schema::motion::living;
use schema::slots::object;
use schema::{Category, Lane, Layout, MotionKind, MotionRegion, Slot};
use wire::{MotionCurve, Position};

use crate::facts::SubjectFacts;
use crate::types::ObjectGuid;

/// A replicated entity.
///
/// Every write goes through a setter that compares the new word with the old
/// one bitwise. A real change marks the slot dirty and raises the pending
/// flag; a no-op write leaves both untouched. The dirty bitmap is non-empty
/// exactly when the pending flag is set.
///
/// Slot indexes outside the category's attribute count are programming
/// errors and panic after logging at `error` level.
#[derive(Debug, Clone)]
pub struct Entity {
    guid: ObjectGuid,
    category: Category,
    slots: Box<[u32]>,
    dirty: BitSet,
    motion: Option<MotionRegion>,
    in_world: bool,
    pending: bool,
    fresh: bool,
    facts: SubjectFacts,
    curve: Option<MotionCurve>,
}

impl Entity {
    /// Allocates a zeroed slot array for `layout` and fills the object header
    /// (identifier, type mask, template entry, scale 1.0).
    ///
    /// Header writes count as construction and are discarded when the entity
    /// enters the world.
    #[must_use]
    pub fn new(guid: ObjectGuid, layout: &Layout) -> Self {
        let count = layout.slot_count();
        let mut entity = Self {
            guid,
            category: layout.category(),
            slots: vec![0; count].into_boxed_slice(),
            dirty: BitSet::new(count),
            motion: layout.motion(),
            in_world: false,
            pending: false,
            fresh: true,
            facts: SubjectFacts::default(),
            curve: None,
        };
        entity.set_u64(object::GUID, guid.raw());
        entity.set_u32(object::TYPE, layout.category().type_mask());
        if let Some(entry) = guid.entry() {
            entity.set_u32(object::ENTRY, entry);
        }
        entity.set_f32(object::SCALE_X, 1.0);
        entity
    }

    #[must_use]
    pub const fn guid(&self) -> ObjectGuid {
        self.guid
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Raw slot words, in slot order.
    #[must_use]
    pub fn slots(&self) -> &[u32] {
        &self.slots
    }

    #[must_use]
    pub const fn motion_region(&self) -> Option<MotionRegion> {
        self.motion
    }

    fn index(&self, slot: Slot) -> usize {
        let index = usize::from(slot);
        if index >= self.slots.len() {
            tracing::error!(
                guid = %self.guid,
                category = %self.category,
                slot,
                count = self.slots.len(),
                "slot index out of range"
            );
            panic!(
                "slot {slot} out of range for {} ({} slots)",
                self.category,
                self.slots.len()
            );
        }
        index
    }

    fn mark(&mut self, index: usize) {
        if self.dirty.set(index).is_ok() {
            self.pending = true;
        }
    }

    fn write(&mut self, slot: Slot, word: u32) -> bool {
        let index = self.index(slot);
        if self.slots[index] == word {
            return false;
        }
        self.slots[index] = word;
        self.mark(index);
        true
    }

    // Reads

    #[must_use]
    pub fn get_u32(&self, slot: Slot) -> u32 {
        self.slots[self.index(slot)]
    }

    #[must_use]
    pub fn get_i32(&self, slot: Slot) -> i32 {
        self.get_u32(slot) as i32
    }

    #[must_use]
    pub fn get_f32(&self, slot: Slot) -> f32 {
        f32::from_bits(self.get_u32(slot))
    }

    /// Two-slot value, low word first.
    #[must_use]
    pub fn get_u64(&self, slot: Slot) -> u64 {
        let low = u64::from(self.get_u32(slot));
        let high = u64::from(self.get_u32(slot + 1));
        (high << 32) | low
    }

    #[must_use]
    pub fn get_lane(&self, slot: Slot, lane: Lane) -> u32 {
        lane.extract(self.get_u32(slot))
    }

    #[must_use]
    pub fn has_flags(&self, slot: Slot, lane: Lane, bits: u32) -> bool {
        let bits = lane.insert(0, bits);
        self.get_u32(slot) & bits == bits
    }

    // Writes

    /// Writes a word; returns whether the slot changed.
    pub fn set_u32(&mut self, slot: Slot, value: u32) -> bool {
        self.write(slot, value)
    }

    pub fn set_i32(&mut self, slot: Slot, value: i32) -> bool {
        self.write(slot, value as u32)
    }

    /// Writes a float; compared by bit pattern, so `-0.0` differs from `0.0`.
    pub fn set_f32(&mut self, slot: Slot, value: f32) -> bool {
        self.write(slot, value.to_bits())
    }

    /// Writes a two-slot value, low word first.
    pub fn set_u64(&mut self, slot: Slot, value: u64) -> bool {
        let low = self.write(slot, value as u32);
        let high = self.write(slot + 1, (value >> 32) as u32);
        low || high
    }

    /// Sets `bits` within `lane`.
    pub fn set_flags(&mut self, slot: Slot, lane: Lane, bits: u32) -> bool {
        let word = self.get_u32(slot);
        self.write(slot, word | lane.insert(0, bits))
    }

    /// Clears `bits` within `lane`.
    pub fn clear_flags(&mut self, slot: Slot, lane: Lane, bits: u32) -> bool {
        let word = self.get_u32(slot);
        self.write(slot, word & !lane.insert(0, bits))
    }

    pub fn toggle_flags(&mut self, slot: Slot, lane: Lane, bits: u32, on: bool) -> bool {
        if on {
            self.set_flags(slot, lane, bits)
        } else {
            self.clear_flags(slot, lane, bits)
        }
    }

    /// Replaces the sub-field `lane` with `value`.
    pub fn set_lane(&mut self, slot: Slot, lane: Lane, value: u32) -> bool {
        let word = self.get_u32(slot);
        self.write(slot, lane.insert(word, value))
    }

    /// Adds `delta`, saturating at zero and `u32::MAX`.
    pub fn apply_mod_u32(&mut self, slot: Slot, delta: i32) -> bool {
        let current = self.get_u32(slot);
        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta.unsigned_abs())
        };
        self.write(slot, next)
    }

    pub fn apply_mod_i32(&mut self, slot: Slot, delta: i32) -> bool {
        let next = self.get_i32(slot).wrapping_add(delta);
        self.set_i32(slot, next)
    }

    pub fn apply_mod_f32(&mut self, slot: Slot, delta: f32) -> bool {
        let next = self.get_f32(slot) + delta;
        self.set_f32(slot, next)
    }

    /// Adds `delta`, clamping the result at zero.
    pub fn apply_mod_positive_f32(&mut self, slot: Slot, delta: f32) -> bool {
        let next = (self.get_f32(slot) + delta).max(0.0);
        self.set_f32(slot, next)
    }

    /// Writes a stat; negative values are stored as zero.
    pub fn set_stat_i32(&mut self, slot: Slot, value: i32) -> bool {
        self.set_i32(slot, value.max(0))
    }

    pub fn set_stat_f32(&mut self, slot: Slot, value: f32) -> bool {
        self.set_f32(slot, value.max(0.0))
    }

    /// Marks `slot` dirty without changing it.
    ///
    /// Used when an input of a per-observer value changed outside the slot
    /// array, such as tap ownership or loot permission.
    pub fn force_update(&mut self, slot: Slot) {
        let index = self.index(slot);
        self.mark(index);
    }

    // Motion

    fn region(&self) -> MotionRegion {
        match self.motion {
            Some(region) => region,
            None => {
                tracing::error!(
                    guid = %self.guid,
                    category = %self.category,
                    "category has no motion region"
                );
                panic!("{} has no motion region", self.category);
            }
        }
    }

    fn living_region(&self) -> MotionRegion {
        let region = self.region();
        if region.kind != MotionKind::Living {
            tracing::error!(
                guid = %self.guid,
                category = %self.category,
                "kinematic state written on a stationary category"
            );
            panic!("{} is not a living category", self.category);
        }
        region
    }

    /// Current position, for positional categories.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        let region = self.motion?;
        let x = region.x();
        Some(Position::new(
            self.get_f32(x),
            self.get_f32(x + 1),
            self.get_f32(x + 2),
            self.get_f32(x + 3),
        ))
    }

    /// Moves the entity; only changed coordinates are marked dirty.
    pub fn set_position(&mut self, position: Position) -> bool {
        let x = self.region().x();
        let mut changed = self.set_f32(x, position.x);
        changed |= self.set_f32(x + 1, position.y);
        changed |= self.set_f32(x + 2, position.z);
        changed |= self.set_f32(x + 3, position.orientation);
        changed
    }

    /// Sets speed `index` (walk, run, run-back, swim, swim-back, flight,
    /// flight-back, turn rate, pitch rate).
    pub fn set_speed(&mut self, index: usize, speed: f32) -> bool {
        assert!(index < living::SPEED_COUNT, "speed index {index} out of range");
        let region = self.living_region();
        let offset = living::SPEED_WALK + index as Slot;
        self.set_f32(region.slot(offset), speed)
    }

    #[must_use]
    pub fn speed(&self, index: usize) -> f32 {
        assert!(index < living::SPEED_COUNT, "speed index {index} out of range");
        let region = self.living_region();
        self.get_f32(region.slot(living::SPEED_WALK + index as Slot))
    }

    pub fn set_move_flags(&mut self, flags: u32) -> bool {
        let region = self.living_region();
        self.set_u32(region.slot(living::MOVE_FLAGS), flags)
    }

    #[must_use]
    pub fn move_flags(&self) -> u32 {
        let region = self.living_region();
        self.get_u32(region.slot(living::MOVE_FLAGS))
    }

    #[must_use]
    pub const fn curve(&self) -> Option<&MotionCurve> {
        self.curve.as_ref()
    }

    /// Installs or removes the active motion curve of a living entity.
    ///
    /// Any change marks the movement flags slot dirty so the next flush
    /// carries a movement block.
    pub fn set_curve(&mut self, curve: Option<MotionCurve>) -> bool {
        let region = self.living_region();
        if self.curve == curve {
            return false;
        }
        self.curve = curve;
        self.force_update(region.slot(living::MOVE_FLAGS));
        true
    }

    // Facts

    #[must_use]
    pub const fn facts(&self) -> &SubjectFacts {
        &self.facts
    }

    /// Mutable facts; no slot is marked dirty.
    pub fn facts_mut(&mut self) -> &mut SubjectFacts {
        &mut self.facts
    }

    /// Updates facts and marks `refresh` dirty so aware observers get the
    /// recomputed per-observer values.
    pub fn update_facts<F>(&mut self, refresh: &[Slot], update: F)
    where
        F: FnOnce(&mut SubjectFacts),
    {
        update(&mut self.facts);
        for slot in refresh {
            self.force_update(*slot);
        }
    }

    // Lifecycle and dirty state

    #[must_use]
    pub const fn is_in_world(&self) -> bool {
        self.in_world
    }

    /// Enters the world, discarding construction-time dirty state.
    pub fn add_to_world(&mut self) {
        self.in_world = true;
        self.clear_dirty();
    }

    /// Leaves the world, discarding pending changes.
    pub fn remove_from_world(&mut self) {
        self.in_world = false;
        self.clear_dirty();
    }

    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub const fn dirty(&self) -> &BitSet {
        &self.dirty
    }

    #[must_use]
    pub fn is_dirty(&self, slot: Slot) -> bool {
        self.dirty.get(usize::from(slot))
    }

    /// Whether any slot of the motion region is dirty.
    #[must_use]
    pub fn has_dirty_motion(&self) -> bool {
        self.motion.is_some_and(|region| {
            (region.start..region.end()).any(|slot| self.dirty.get(usize::from(slot)))
        })
    }

    /// Whether any slot outside the motion region is dirty.
    #[must_use]
    pub fn has_dirty_values(&self) -> bool {
        self.dirty.iter_ones().any(|index| !self.in_motion(index))
    }

    pub(crate) fn in_motion(&self, index: usize) -> bool {
        match (self.motion, Slot::try_from(index)) {
            (Some(region), Ok(slot)) => region.contains(slot),
            _ => false,
        }
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear_all();
        self.pending = false;
    }

    /// Freshly spawned entities reveal with `CREATE_FULL`.
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn clear_fresh(&mut self) {
        self.fresh = false;
    }
}

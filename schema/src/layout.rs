//! Per-category attribute layouts.

use crate::error::{SchemaError, SchemaResult};
use crate::motion::{living, MotionKind, MotionRegion};
use crate::slots::{container, corpse, dynamic_object, gameobject, item, object, player, unit};
use crate::{Category, Slot};

/// Interpretation of a slot's 32-bit backing word.
///
/// Fixed per (category, slot); reinterpretation is never dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotKind {
    Int,
    #[default]
    UInt,
    Float,
    /// Stored as a float, sent as an unsigned integer truncated toward zero
    /// (negative values become 0).
    FloatAsUInt,
}

impl SlotKind {
    /// Returns `true` if the backing word holds `f32` bits.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::FloatAsUInt)
    }
}

/// Slot table of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    category: Category,
    kinds: Box<[SlotKind]>,
    motion: Option<MotionRegion>,
}

impl Layout {
    /// Starts a layout of `count` slots, all `UInt` by default.
    #[must_use]
    pub fn builder(category: Category, count: Slot) -> LayoutBuilder {
        LayoutBuilder {
            category,
            count,
            ranges: Vec::new(),
            motion: None,
        }
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Attribute count of the category.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.kinds.len()
    }

    /// Kind of `slot`, or `None` past the attribute count.
    #[must_use]
    pub fn kind(&self, slot: Slot) -> Option<SlotKind> {
        self.kinds.get(usize::from(slot)).copied()
    }

    #[must_use]
    pub const fn motion(&self) -> Option<MotionRegion> {
        self.motion
    }

    /// Returns `true` if `slot` carries positional state.
    #[must_use]
    pub fn is_motion_slot(&self, slot: Slot) -> bool {
        self.motion.is_some_and(|region| region.contains(slot))
    }

    /// Checks the category/motion invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let category = self.category;
        if self.kinds.is_empty() {
            return Err(SchemaError::EmptyLayout { category });
        }
        match (category.is_positional(), self.motion) {
            (true, None) => return Err(SchemaError::MissingMotionRegion { category }),
            (false, Some(_)) => return Err(SchemaError::UnexpectedMotionRegion { category }),
            (true, Some(region)) => {
                if usize::from(region.end()) > self.kinds.len() {
                    return Err(SchemaError::MotionRegionOutOfRange {
                        category,
                        start: region.start,
                        len: region.kind.slot_count(),
                        count: slot_count_u16(self.kinds.len()),
                    });
                }
                let living = region.kind == MotionKind::Living;
                if living != category.is_living() {
                    return Err(SchemaError::MotionKindMismatch { category });
                }
            }
            (false, None) => {}
        }
        Ok(())
    }
}

fn slot_count_u16(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

/// Builder for [`Layout`].
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    category: Category,
    count: Slot,
    ranges: Vec<(Slot, Slot, SlotKind)>,
    motion: Option<MotionRegion>,
}

impl LayoutBuilder {
    /// Marks `len` slots starting at `start` with `kind`.
    #[must_use]
    pub fn kinds(mut self, start: Slot, len: Slot, kind: SlotKind) -> Self {
        self.ranges.push((start, len, kind));
        self
    }

    /// Marks a single slot with `kind`.
    #[must_use]
    pub fn kind(self, slot: Slot, kind: SlotKind) -> Self {
        self.kinds(slot, 1, kind)
    }

    /// Declares the motion region. Its slot kinds are implied by `kind`.
    #[must_use]
    pub fn motion(mut self, start: Slot, kind: MotionKind) -> Self {
        self.motion = Some(MotionRegion::new(start, kind));
        self
    }

    /// Builds the layout after validation.
    pub fn build(self) -> SchemaResult<Layout> {
        for &(start, len, _) in &self.ranges {
            let end = u32::from(start) + u32::from(len);
            if end > u32::from(self.count) {
                return Err(SchemaError::SlotOutOfRange {
                    category: self.category,
                    slot: start.saturating_add(len.saturating_sub(1)),
                    count: self.count,
                });
            }
        }
        if let Some(region) = self.motion {
            if u32::from(region.start) + u32::from(region.kind.slot_count())
                > u32::from(self.count)
            {
                return Err(SchemaError::MotionRegionOutOfRange {
                    category: self.category,
                    start: region.start,
                    len: region.kind.slot_count(),
                    count: self.count,
                });
            }
        }
        let layout = self.assemble();
        layout.validate()?;
        Ok(layout)
    }

    /// Builds without range checks; callers must pass in-range slots.
    fn assemble(self) -> Layout {
        let mut kinds = vec![SlotKind::UInt; usize::from(self.count)];
        for (start, len, kind) in self.ranges {
            let start = usize::from(start);
            kinds[start..start + usize::from(len)].fill(kind);
        }
        if let Some(region) = self.motion {
            let start = usize::from(region.start);
            let end = usize::from(region.end());
            kinds[start..end].fill(SlotKind::Float);
            if region.kind == MotionKind::Living {
                kinds[start + usize::from(living::MOVE_FLAGS)] = SlotKind::UInt;
            }
        }
        Layout {
            category: self.category,
            kinds: kinds.into_boxed_slice(),
            motion: self.motion,
        }
    }
}

/// One layout per category, indexed by tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layouts {
    layouts: Vec<Layout>,
}

impl Layouts {
    /// Creates a table from one layout per category.
    pub fn new(layouts: Vec<Layout>) -> SchemaResult<Self> {
        let mut slots: Vec<Option<Layout>> = vec![None; Category::ALL.len()];
        for layout in layouts {
            layout.validate()?;
            let entry = &mut slots[layout.category.index()];
            if entry.is_some() {
                return Err(SchemaError::DuplicateCategory {
                    category: layout.category,
                });
            }
            *entry = Some(layout);
        }
        let layouts = slots
            .into_iter()
            .zip(Category::ALL)
            .map(|(layout, category)| layout.ok_or(SchemaError::MissingCategory { category }))
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(Self { layouts })
    }

    /// The built-in slot tables.
    #[must_use]
    pub fn standard() -> Self {
        let layouts = Category::ALL
            .into_iter()
            .map(|category| standard_builder(category).assemble())
            .collect();
        Self { layouts }
    }

    /// Layout of `category`.
    #[must_use]
    pub fn get(&self, category: Category) -> &Layout {
        &self.layouts[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.iter()
    }
}

impl Default for Layouts {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_builder(category: Category) -> LayoutBuilder {
    let header = |count| Layout::builder(category, count).kind(object::SCALE_X, SlotKind::Float);
    match category {
        Category::Item => header(item::END),
        Category::Container => header(container::END),
        Category::Unit => unit_kinds(header(unit::END)),
        Category::Player => unit_kinds(header(player::END)),
        Category::GameObject => header(gameobject::END)
            .kinds(gameobject::PARENT_ROTATION, 4, SlotKind::Float)
            .motion(gameobject::MOTION, MotionKind::Stationary),
        Category::DynamicObject => header(dynamic_object::END)
            .kind(dynamic_object::RADIUS, SlotKind::Float)
            .motion(dynamic_object::MOTION, MotionKind::Stationary),
        Category::Corpse => header(corpse::END).motion(corpse::MOTION, MotionKind::Stationary),
    }
}

fn unit_kinds(builder: LayoutBuilder) -> LayoutBuilder {
    use SlotKind::{Float, FloatAsUInt, Int};

    builder
        .kinds(unit::BASE_ATTACK_TIME, 2, FloatAsUInt)
        .kind(unit::RANGED_ATTACK_TIME, FloatAsUInt)
        .kind(unit::BOUNDING_RADIUS, Float)
        .kind(unit::COMBAT_REACH, Float)
        .kinds(unit::MIN_DAMAGE, 4, Float)
        .kind(unit::MOD_CAST_SPEED, Float)
        .kinds(unit::STAT0, unit::STAT_COUNT, Int)
        .kinds(unit::POS_STAT0, unit::STAT_COUNT, FloatAsUInt)
        .kinds(unit::NEG_STAT0, unit::STAT_COUNT, FloatAsUInt)
        .kinds(
            unit::RESISTANCE_BUFF_MODS_POSITIVE,
            unit::RESISTANCE_COUNT * 2,
            FloatAsUInt,
        )
        .kind(unit::ATTACK_POWER, Int)
        .kind(unit::ATTACK_POWER_MODS, Int)
        .kind(unit::ATTACK_POWER_MULTIPLIER, Float)
        .kind(unit::RANGED_ATTACK_POWER, Int)
        .kind(unit::RANGED_ATTACK_POWER_MODS, Int)
        .kind(unit::RANGED_ATTACK_POWER_MULTIPLIER, Float)
        .kinds(unit::MIN_RANGED_DAMAGE, 2, Float)
        .kinds(unit::POWER_COST_MODIFIER, unit::RESISTANCE_COUNT, Int)
        .kinds(unit::POWER_COST_MULTIPLIER, unit::RESISTANCE_COUNT, Float)
        .kind(unit::MAX_HEALTH_MODIFIER, Float)
        .kind(unit::HOVER_HEIGHT, Float)
        .motion(unit::MOTION, MotionKind::Living)
}

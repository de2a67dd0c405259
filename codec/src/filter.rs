//! Per-observer value transformation.
//!
//! Every category carries two override sets, one applied while building a
//! creation block and one while building a value-update block. A set maps a
//! slot to a [`Rule`]; slots without a rule are emitted verbatim.

use schema::slots::{corpse, gameobject, unit};
use schema::{
    AuraState, Category, DynamicFlags, GoDynamicFlags, Lane, Layouts, NpcFlags, Slot, SlotKind,
    UnitFlags,
};

use crate::entity::Entity;
use crate::facts::{GameObjectKind, SubjectFacts};
use crate::observer::ObserverView;
use crate::rules::VisibilityRules;
use crate::types::{class, race, ObjectGuid, Team};

/// Which override set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Create,
    Update,
}

impl Phase {
    const fn index(self) -> usize {
        match self {
            Self::Create => 0,
            Self::Update => 1,
        }
    }
}

/// A per-observer transformation of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Creature capability flags masked by the observer's eligibility.
    NpcFlags,
    /// Current health, a percentage under restricted vitals visibility.
    Health,
    /// Maximum health, 100 under restricted vitals visibility.
    MaxHealth,
    /// Combat statistic zeroed under restricted stats visibility.
    StatFog,
    /// Float stored, unsigned integer on the wire.
    FloatAsUInt,
    /// "Not selectable" hidden from game masters.
    UnitFlags,
    /// Per-caster aura states; the slot is always emitted while one is held.
    AuraState,
    /// Loot, tap, empathy and tracking flags.
    DynamicFlags,
    /// Cross-allegiance faction stand-in.
    FactionTemplate,
    /// Game-object activation state; always emitted for interactive objects.
    GoDynamic,
    /// Verbatim, but always emitted alongside `GoDynamic` in updates.
    GoBytes,
    /// Cross-allegiance corpse race rewrite.
    CorpseBytes,
}

/// Slots zeroed under restricted stats visibility. Float slots sent as
/// integers (attack times, stat buffs, resistance buff mods) are never
/// zeroed, even where they fall inside these ranges.
const STAT_FOG_SLOTS: &[(Slot, Slot)] = &[
    (unit::MIN_DAMAGE, unit::MAX_OFFHAND_DAMAGE + 1),
    (unit::STAT0, unit::STAT0 + unit::STAT_COUNT),
    (unit::RESISTANCES, unit::RESISTANCES + unit::RESISTANCE_COUNT),
    (unit::BASE_HEALTH, unit::BASE_HEALTH + 1),
    (unit::ATTACK_POWER, unit::MAX_RANGED_DAMAGE + 1),
    (unit::POWER_COST_MODIFIER, unit::MAX_HEALTH_MODIFIER + 1),
];

/// Override sets for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CategoryOverrides {
    phases: [Box<[Option<Rule>]>; 2],
}

impl CategoryOverrides {
    fn empty(slot_count: usize) -> Self {
        Self {
            phases: [
                vec![None; slot_count].into_boxed_slice(),
                vec![None; slot_count].into_boxed_slice(),
            ],
        }
    }

    fn set(&mut self, slot: Slot, rule: Rule) {
        for phase in &mut self.phases {
            phase[usize::from(slot)] = Some(rule);
        }
    }

    fn set_phase(&mut self, phase: Phase, slot: Slot, rule: Rule) {
        self.phases[phase.index()][usize::from(slot)] = Some(rule);
    }
}

/// The override table: (category, phase, slot) to [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overrides {
    categories: Vec<CategoryOverrides>,
}

impl Overrides {
    /// Builds the standard table for `layouts`.
    #[must_use]
    pub fn standard(layouts: &Layouts) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| {
                let layout = layouts.get(*category);
                let mut overrides = CategoryOverrides::empty(layout.slot_count());
                match category {
                    Category::Unit | Category::Player => {
                        for &(start, end) in STAT_FOG_SLOTS {
                            for slot in start..end {
                                overrides.set(slot, Rule::StatFog);
                            }
                        }
                        for slot in 0..layout.slot_count() {
                            let Ok(slot) = Slot::try_from(slot) else { break };
                            if layout.kind(slot) == Some(SlotKind::FloatAsUInt) {
                                overrides.set(slot, Rule::FloatAsUInt);
                            }
                        }
                        overrides.set(unit::HEALTH, Rule::Health);
                        overrides.set(unit::MAX_HEALTH, Rule::MaxHealth);
                        overrides.set(unit::FLAGS, Rule::UnitFlags);
                        overrides.set(unit::AURA_STATE, Rule::AuraState);
                        overrides.set(unit::DYNAMIC_FLAGS, Rule::DynamicFlags);
                        if *category == Category::Unit {
                            overrides.set(unit::NPC_FLAGS, Rule::NpcFlags);
                        } else {
                            overrides.set(unit::FACTION_TEMPLATE, Rule::FactionTemplate);
                        }
                    }
                    Category::GameObject => {
                        overrides.set(gameobject::DYNAMIC, Rule::GoDynamic);
                        overrides.set_phase(Phase::Update, gameobject::BYTES_1, Rule::GoBytes);
                    }
                    Category::Corpse => overrides.set(corpse::BYTES_1, Rule::CorpseBytes),
                    Category::Item | Category::Container | Category::DynamicObject => {}
                }
                overrides
            })
            .collect();
        Self { categories }
    }

    /// Rule for `slot` of `category` in `phase`, if any.
    #[must_use]
    pub fn rule(&self, category: Category, phase: Phase, slot: Slot) -> Option<Rule> {
        self.categories[category.index()].phases[phase.index()]
            .get(usize::from(slot))
            .copied()
            .flatten()
    }

    fn rules(&self, category: Category, phase: Phase) -> impl Iterator<Item = (Slot, Rule)> + '_ {
        self.categories[category.index()].phases[phase.index()]
            .iter()
            .enumerate()
            .filter_map(|(slot, rule)| Some((Slot::try_from(slot).ok()?, (*rule)?)))
    }
}

/// Computes the value each observer sees.
///
/// Pure: the result depends only on the subject's slots and facts, the
/// observer context and the rules.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    overrides: Overrides,
    rules: VisibilityRules,
}

impl VisibilityFilter {
    #[must_use]
    pub fn new(layouts: &Layouts, rules: VisibilityRules) -> Self {
        Self {
            overrides: Overrides::standard(layouts),
            rules,
        }
    }

    #[must_use]
    pub const fn rules(&self) -> &VisibilityRules {
        &self.rules
    }

    #[must_use]
    pub const fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Slots that must be emitted in `phase` whether or not they changed.
    pub fn forced_slots<'a>(
        &'a self,
        phase: Phase,
        subject: &'a Entity,
    ) -> impl Iterator<Item = Slot> + 'a {
        self.overrides
            .rules(subject.category(), phase)
            .filter(move |(slot, rule)| is_forced(*rule, subject, *slot))
            .map(|(slot, _)| slot)
    }

    /// The word `observer` sees in `slot` of `subject`.
    pub fn value(
        &self,
        phase: Phase,
        subject: &Entity,
        observer: &dyn ObserverView,
        slot: Slot,
    ) -> u32 {
        let raw = subject.get_u32(slot);
        match self.overrides.rule(subject.category(), phase, slot) {
            None => raw,
            Some(rule) => self.apply(rule, raw, subject, observer),
        }
    }

    fn apply(&self, rule: Rule, raw: u32, subject: &Entity, observer: &dyn ObserverView) -> u32 {
        match rule {
            Rule::NpcFlags => npc_flags(raw, subject, observer),
            Rule::Health => {
                if self.exact_health(subject, observer) {
                    raw
                } else {
                    health_percent(raw, subject.get_u32(unit::MAX_HEALTH))
                }
            }
            Rule::MaxHealth => {
                if self.exact_health(subject, observer) {
                    raw
                } else {
                    100
                }
            }
            Rule::StatFog => {
                if self
                    .rules
                    .sees_exact(self.rules.fog_of_war_stats, observer, subject)
                {
                    raw
                } else {
                    0
                }
            }
            Rule::FloatAsUInt => float_as_uint(raw),
            Rule::UnitFlags => {
                let flags = UnitFlags::from_raw(raw);
                if observer.is_game_master() {
                    flags.without(UnitFlags::NOT_SELECTABLE).raw()
                } else {
                    flags.raw()
                }
            }
            Rule::AuraState => {
                let state = AuraState::from_raw(raw);
                if state.intersects(AuraState::PER_CASTER)
                    && !subject.facts().aura_state_casters.contains(&observer.guid())
                {
                    state.without(AuraState::PER_CASTER).raw()
                } else {
                    state.raw()
                }
            }
            Rule::DynamicFlags => dynamic_flags(raw, subject.facts(), observer.guid()),
            Rule::FactionTemplate => self.faction_template(raw, subject, observer),
            Rule::GoDynamic => go_dynamic(subject, observer),
            Rule::GoBytes => raw,
            Rule::CorpseBytes => self.corpse_bytes(raw, subject, observer),
        }
    }

    fn exact_health(&self, subject: &Entity, observer: &dyn ObserverView) -> bool {
        self.rules
            .sees_exact(self.rules.fog_of_war_health, observer, subject)
    }

    fn faction_template(&self, raw: u32, subject: &Entity, observer: &dyn ObserverView) -> u32 {
        if !self.rules.cross_faction_groups
            || observer.guid() == subject.guid()
            || !observer.is_grouped_with(subject.guid())
        {
            return raw;
        }
        let subject_race = subject_race(subject);
        let (Some(subject_team), Some(observer_team)) =
            (Team::of_race(subject_race), observer.team())
        else {
            return raw;
        };
        if subject_team != observer_team && race::faction(subject_race) == Some(raw) {
            self.rules.neutral_faction(observer_team)
        } else {
            raw
        }
    }

    fn corpse_bytes(&self, raw: u32, subject: &Entity, observer: &dyn ObserverView) -> u32 {
        let owner = subject.facts().owner.unwrap_or(ObjectGuid::EMPTY);
        if !self.rules.cross_faction_groups
            || owner.is_empty()
            || owner == observer.guid()
            || !observer.is_grouped_with(owner)
        {
            return raw;
        }
        let race_lane = Lane::byte(1);
        let corpse_race = race_lane.extract(raw) as u8;
        match (Team::of_race(corpse_race), Team::of_race(observer.race())) {
            (Some(corpse_team), Some(observer_team)) if corpse_team != observer_team => {
                race_lane.insert(raw, u32::from(observer.race()))
            }
            _ => raw,
        }
    }
}

fn subject_race(subject: &Entity) -> u8 {
    subject.get_lane(unit::BYTES_0, Lane::byte(0)) as u8
}

fn is_forced(rule: Rule, subject: &Entity, slot: Slot) -> bool {
    match rule {
        Rule::AuraState => AuraState::from_raw(subject.get_u32(slot)).intersects(AuraState::PER_CASTER),
        Rule::GoDynamic | Rule::GoBytes => subject.facts().interaction.is_some(),
        _ => false,
    }
}

fn npc_flags(raw: u32, subject: &Entity, observer: &dyn ObserverView) -> u32 {
    let mut flags = NpcFlags::from_raw(raw);
    if flags.contains(NpcFlags::SPELL_CLICK) && !observer.can_see_spell_click(subject) {
        flags = flags.without(NpcFlags::SPELL_CLICK);
    }
    if flags.intersects(NpcFlags::ANY_TRAINER) && !observer.is_trainer_eligible(subject) {
        flags = flags.without(NpcFlags::ANY_TRAINER);
    }
    if flags.contains(NpcFlags::STABLE_MASTER) && observer.class() != class::HUNTER {
        flags = flags.without(NpcFlags::STABLE_MASTER);
    }
    if flags.contains(NpcFlags::FLIGHT_MASTER) && observer.has_quest_business_with(subject) {
        flags = flags.without(NpcFlags::FLIGHT_MASTER);
    }
    flags.raw()
}

/// `ceil(100 * current / max)`, 0 when `max` is 0.
fn health_percent(current: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let percent = (u64::from(current) * 100).div_ceil(u64::from(max));
    u32::try_from(percent).unwrap_or(u32::MAX)
}

/// Truncates toward zero; negatives and NaN become 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_as_uint(raw: u32) -> u32 {
    f32::from_bits(raw) as u32
}

fn dynamic_flags(raw: u32, facts: &SubjectFacts, observer: ObjectGuid) -> u32 {
    let mut flags = DynamicFlags::from_raw(raw);
    let manage_tap = if facts.alive {
        if flags.contains(DynamicFlags::SPECIAL_INFO)
            && !facts.empathy_casters.is_empty()
            && !facts.empathy_casters.contains(&observer)
        {
            flags = flags.without(DynamicFlags::SPECIAL_INFO);
        }
        flags = flags.without(DynamicFlags::LOOTABLE);
        if !facts.in_combat {
            flags = flags.without(DynamicFlags::TAPPED | DynamicFlags::TAPPED_BY_OBSERVER);
        }
        facts.in_combat
    } else {
        flags = flags.toggled(DynamicFlags::LOOTABLE, facts.looters.contains(&observer));
        true
    };
    if manage_tap {
        flags = flags
            .with(DynamicFlags::TAPPED)
            .toggled(DynamicFlags::TAPPED_BY_OBSERVER, facts.tappers.contains(&observer));
    }
    if !facts.trackers.contains(&observer) {
        flags = flags.without(DynamicFlags::TRACK_UNIT);
    }
    flags.raw()
}

fn go_dynamic(subject: &Entity, observer: &dyn ObserverView) -> u32 {
    let low = match subject.facts().interaction {
        Some(interaction)
            if observer.is_game_master() || observer.activates_for_quest(subject) =>
        {
            match interaction.kind {
                GameObjectKind::QuestGiver => GoDynamicFlags::ACTIVATE,
                GameObjectKind::Chest if interaction.loot_state.is_lootable() => {
                    GoDynamicFlags::ACTIVATE | GoDynamicFlags::SPARKLE
                }
                GameObjectKind::Generic | GameObjectKind::SpellFocus | GameObjectKind::Goober => {
                    GoDynamicFlags::ACTIVATE | GoDynamicFlags::SPARKLE
                }
                GameObjectKind::Chest | GameObjectKind::Other => 0,
            }
        }
        Some(_) => 0,
        None => return subject.get_u32(gameobject::DYNAMIC),
    };
    Lane::HIGH_HALF.insert(u32::from(low), 0xFFFF)
}

//! Non-replicated simulation facts the visibility rules read.

use std::collections::BTreeSet;

use crate::types::{ObjectGuid, Team};

/// Game-object behavior kinds that carry per-observer activation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameObjectKind {
    QuestGiver,
    Chest,
    Generic,
    SpellFocus,
    Goober,
    /// Any other interactive kind; activation shows nothing.
    Other,
}

/// Loot state of a chest-like game object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootState {
    #[default]
    NotReady,
    Ready,
    Activated,
    JustDeactivated,
}

impl LootState {
    /// Chests sparkle in these states.
    #[must_use]
    pub const fn is_lootable(self) -> bool {
        matches!(self, Self::Ready | Self::Activated)
    }
}

/// Interaction state of a game object whose `DYNAMIC` slot is per observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    pub kind: GameObjectKind,
    pub loot_state: LootState,
}

/// Facts about an entity that never reach the wire directly but shape what
/// each observer sees.
///
/// Changing a fact does not dirty any slot; use
/// [`Entity::update_facts`](crate::Entity::update_facts) to refresh the slots
/// that depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubjectFacts {
    pub alive: bool,
    pub in_combat: bool,
    pub team: Option<Team>,
    /// Observers holding a contest claim (tap).
    pub tappers: BTreeSet<ObjectGuid>,
    /// Observers permitted to loot.
    pub looters: BTreeSet<ObjectGuid>,
    /// Casters of a tracking effect on this entity.
    pub trackers: BTreeSet<ObjectGuid>,
    /// Casters of an empathy effect on this entity.
    pub empathy_casters: BTreeSet<ObjectGuid>,
    /// Casters that applied a per-caster aura state.
    pub aura_state_casters: BTreeSet<ObjectGuid>,
    /// Corpse owner.
    pub owner: Option<ObjectGuid>,
    pub interaction: Option<Interaction>,
    /// Current attack target.
    pub target: Option<ObjectGuid>,
    /// Movement clock in milliseconds.
    pub move_time: u32,
    pub fall_time: u32,
}

impl Default for SubjectFacts {
    fn default() -> Self {
        Self {
            alive: true,
            in_combat: false,
            team: None,
            tappers: BTreeSet::new(),
            looters: BTreeSet::new(),
            trackers: BTreeSet::new(),
            empathy_casters: BTreeSet::new(),
            aura_state_casters: BTreeSet::new(),
            owner: None,
            interaction: None,
            target: None,
            move_time: 0,
            fall_time: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_alive_and_idle() {
        let facts = SubjectFacts::default();
        assert!(facts.alive);
        assert!(!facts.in_combat);
        assert!(facts.tappers.is_empty());
        assert!(facts.interaction.is_none());
    }

    #[test]
    fn lootable_states() {
        assert!(LootState::Ready.is_lootable());
        assert!(LootState::Activated.is_lootable());
        assert!(!LootState::NotReady.is_lootable());
        assert!(!LootState::JustDeactivated.is_lootable());
    }
}

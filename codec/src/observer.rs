//! Observer permission context.

use std::collections::BTreeSet;

use schema::slots::object;

use crate::entity::Entity;
use crate::types::{ObjectGuid, Team};

/// What the visibility filter needs to know about the receiving observer.
///
/// The quest and gossip hooks default to "no"; an observer backed by real
/// content tables overrides them.
pub trait ObserverView {
    fn guid(&self) -> ObjectGuid;

    fn team(&self) -> Option<Team>;

    /// Race id, as in byte 0 of `unit::BYTES_0`.
    fn race(&self) -> u8;

    fn class(&self) -> u8;

    fn is_game_master(&self) -> bool;

    fn is_grouped_with(&self, other: ObjectGuid) -> bool;

    /// Whether the observer may use the subject's click interaction.
    fn can_see_spell_click(&self, _subject: &Entity) -> bool {
        false
    }

    /// Whether the subject's trainer service applies to this observer.
    fn is_trainer_eligible(&self, _subject: &Entity) -> bool {
        false
    }

    /// Whether the observer can start or complete a quest at the subject.
    fn has_quest_business_with(&self, _subject: &Entity) -> bool {
        false
    }

    /// Whether the subject game object activates for the observer's quest
    /// state.
    fn activates_for_quest(&self, _subject: &Entity) -> bool {
        false
    }
}

/// Concrete observer context keyed by template entries.
///
/// Per-subject answers come from the subject's `object::ENTRY` slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObserverProfile {
    pub guid: ObjectGuid,
    pub team: Option<Team>,
    pub race: u8,
    pub class: u8,
    pub game_master: bool,
    pub group: BTreeSet<ObjectGuid>,
    pub spell_click_entries: BTreeSet<u32>,
    pub trainer_entries: BTreeSet<u32>,
    pub quest_business_entries: BTreeSet<u32>,
    pub quest_objects: BTreeSet<u32>,
}

impl ObserverProfile {
    /// A player with no group and no quest state.
    #[must_use]
    pub fn new(guid: ObjectGuid, race: u8, class: u8) -> Self {
        Self {
            guid,
            team: Team::of_race(race),
            race,
            class,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_game_master(mut self, game_master: bool) -> Self {
        self.game_master = game_master;
        self
    }

    #[must_use]
    pub fn grouped_with(mut self, member: ObjectGuid) -> Self {
        self.group.insert(member);
        self
    }
}

impl ObserverView for ObserverProfile {
    fn guid(&self) -> ObjectGuid {
        self.guid
    }

    fn team(&self) -> Option<Team> {
        self.team
    }

    fn race(&self) -> u8 {
        self.race
    }

    fn class(&self) -> u8 {
        self.class
    }

    fn is_game_master(&self) -> bool {
        self.game_master
    }

    fn is_grouped_with(&self, other: ObjectGuid) -> bool {
        self.group.contains(&other)
    }

    fn can_see_spell_click(&self, subject: &Entity) -> bool {
        self.spell_click_entries
            .contains(&subject.get_u32(object::ENTRY))
    }

    fn is_trainer_eligible(&self, subject: &Entity) -> bool {
        self.trainer_entries.contains(&subject.get_u32(object::ENTRY))
    }

    fn has_quest_business_with(&self, subject: &Entity) -> bool {
        self.quest_business_entries
            .contains(&subject.get_u32(object::ENTRY))
    }

    fn activates_for_quest(&self, subject: &Entity) -> bool {
        self.quest_objects.contains(&subject.get_u32(object::ENTRY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{class, race, HighGuid};
    use schema::{Category, Layouts};

    #[test]
    fn profile_answers_from_entry() {
        let layouts = Layouts::standard();
        let subject = Entity::new(
            ObjectGuid::new(HighGuid::Unit, 3_149, 1),
            layouts.get(Category::Unit),
        );
        let mut observer =
            ObserverProfile::new(ObjectGuid::new(HighGuid::Player, 0, 1), race::ORC, class::HUNTER);
        assert_eq!(observer.team(), Some(Team::Horde));
        assert!(!observer.is_trainer_eligible(&subject));

        observer.trainer_entries.insert(3_149);
        assert!(observer.is_trainer_eligible(&subject));
        assert!(!observer.can_see_spell_click(&subject));
    }

    #[test]
    fn grouping_is_by_guid() {
        let a = ObjectGuid::new(HighGuid::Player, 0, 1);
        let b = ObjectGuid::new(HighGuid::Player, 0, 2);
        let observer = ObserverProfile::new(a, race::HUMAN, class::MAGE).grouped_with(b);
        assert!(observer.is_grouped_with(b));
        assert!(!observer.is_grouped_with(a));
    }
}

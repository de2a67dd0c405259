//! Visibility configuration.

use crate::entity::Entity;
use crate::observer::ObserverView;
use crate::types::Team;

/// Restricted-visibility mode for one concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FogOfWar {
    /// Everyone sees exact values.
    #[default]
    Off,
    /// Exact values only for game masters, the subject itself, group members
    /// and observers of the subject's allegiance.
    AlliesOnly,
}

/// Rules the visibility filter applies.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisibilityRules {
    /// Health shown as a percentage to non-allies.
    pub fog_of_war_health: FogOfWar,
    /// Combat statistics zeroed for non-allies.
    pub fog_of_war_stats: FogOfWar,
    /// Players of different allegiance may group.
    pub cross_faction_groups: bool,
    /// Faction shown to alliance observers for grouped horde players.
    pub alliance_neutral_faction: u32,
    /// Faction shown to horde observers for grouped alliance players.
    pub horde_neutral_faction: u32,
}

impl Default for VisibilityRules {
    fn default() -> Self {
        Self {
            fog_of_war_health: FogOfWar::Off,
            fog_of_war_stats: FogOfWar::Off,
            cross_faction_groups: false,
            alliance_neutral_faction: 1_054,
            horde_neutral_faction: 1_495,
        }
    }
}

impl VisibilityRules {
    /// Every restriction and rewrite enabled.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            fog_of_war_health: FogOfWar::AlliesOnly,
            fog_of_war_stats: FogOfWar::AlliesOnly,
            cross_faction_groups: true,
            ..Self::default()
        }
    }

    /// No restricted visibility; cross-allegiance rewrites still apply.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            cross_faction_groups: true,
            ..Self::default()
        }
    }

    /// Neutral stand-in faction for an observer of `team`.
    #[must_use]
    pub const fn neutral_faction(&self, team: Team) -> u32 {
        match team {
            Team::Alliance => self.alliance_neutral_faction,
            Team::Horde => self.horde_neutral_faction,
        }
    }

    /// Whether `observer` sees exact values of `subject` under `mode`.
    pub fn sees_exact(&self, mode: FogOfWar, observer: &dyn ObserverView, subject: &Entity) -> bool {
        match mode {
            FogOfWar::Off => true,
            FogOfWar::AlliesOnly => {
                observer.is_game_master()
                    || observer.guid() == subject.guid()
                    || observer.is_grouped_with(subject.guid())
                    || subject
                        .facts()
                        .team
                        .is_some_and(|team| observer.team() == Some(team))
            }
        }
    }
}

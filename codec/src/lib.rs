//! Attribute store, observer visibility filter and block builder for the
//! vantage replication engine.
//!
//! This crate ties together bitstream, schema and wire: game logic mutates an
//! [`Entity`], and the [`BlockBuilder`] turns its state into per-observer
//! blocks, running every value through the [`VisibilityFilter`].
//!
//! # Features
//!
//! - Typed slot access with bitwise change detection
//! - Per-slot dirty bitmap and pending-update flag
//! - Table-driven per-observer overrides, separate for creation and update
//! - Creation, value-update, movement and destroy blocks
//!
//! # Design Principles
//!
//! - **No-op writes are free** - A write that changes no bit never dirties.
//! - **Pure filtering** - Visible values depend only on subject state, observer context and rules.
//! - **Fail fast on misuse** - Bad slot indexes and mask mismatches are logged and panic.
//!
//! # Example
//!
//! ```
//! use codec::{BlockBuilder, Entity, HighGuid, ObjectGuid, ObserverProfile, VisibilityRules};
//! use schema::slots::unit;
//! use schema::{Category, Layouts};
//!
//! let layouts = Layouts::standard();
//! let mut wolf = Entity::new(ObjectGuid::new(HighGuid::Unit, 299, 1), layouts.get(Category::Unit));
//! wolf.add_to_world();
//! wolf.set_u32(unit::HEALTH, 80);
//!
//! let builder = BlockBuilder::new(layouts, VisibilityRules::default());
//! let observer = ObserverProfile::new(ObjectGuid::new(HighGuid::Player, 0, 1), 1, 1);
//! let block = builder.values(&wolf, &observer).expect("health changed");
//! assert_eq!(block.entity(), wolf.guid());
//! ```

mod builder;
mod entity;
mod facts;
mod filter;
mod observer;
mod rules;
mod types;

pub use builder::{movement_of, BlockBuilder, EncodedBlock};
pub use entity::Entity;
pub use facts::{GameObjectKind, Interaction, LootState, SubjectFacts};
pub use filter::{Overrides, Phase, Rule, VisibilityFilter};
pub use observer::{ObserverProfile, ObserverView};
pub use rules::{FogOfWar, VisibilityRules};
pub use types::{class, race, HighGuid, ObjectGuid, Team};
pub use wire::BlockKind;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = ObjectGuid::EMPTY;
        let _ = VisibilityRules::default();
        let _ = SubjectFacts::default();
        let _ = ObserverProfile::default();
        let _ = Phase::Create;
        let _ = FogOfWar::AlliesOnly;
        let _ = BlockKind::Values;
    }

    #[test]
    fn guid_usage() {
        let guid = ObjectGuid::new(HighGuid::Player, 0, 42);
        assert_eq!(guid.raw(), 42);
        assert!(guid.is_player());
    }

    #[test]
    fn rules_constructors() {
        assert_eq!(VisibilityRules::default().fog_of_war_stats, FogOfWar::Off);
        assert_eq!(VisibilityRules::for_testing().fog_of_war_stats, FogOfWar::AlliesOnly);
        assert!(VisibilityRules::unlimited().cross_faction_groups);
    }
}

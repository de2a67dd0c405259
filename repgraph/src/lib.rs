//! Broadcast distributor: decide who sees what, and when.
//!
//! This crate owns the world registry and the awareness table, and fans
//! every pending entity change out to the observers in range, turning it into
//! per-observer blocks with `codec::BlockBuilder`.
//!
//! # Design Principles
//!
//! - **Lifecycle order** - Per (entity, observer), a creation block precedes
//!   any update, and nothing follows a destroy block until the next creation.
//! - **Collaborators at the seams** - Range queries, observer lookup and
//!   delivery sit behind [`SpatialQuery`], [`ObserverDirectory`] and
//!   [`SessionSink`].
//! - **Deterministic output** - Entities and observers are visited in
//!   identifier order.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use codec::{Entity, HighGuid, ObjectGuid, ObserverProfile};
//! use repgraph::{BatchSink, Context, Distributor, RadiusQuery, ReplicationConfig, World};
//! use schema::slots::unit;
//! use schema::{Category, Layouts};
//! use wire::Position;
//!
//! let layouts = Layouts::standard();
//! let mut distributor = Distributor::new(ReplicationConfig::default(), layouts.clone());
//! let mut world = World::new();
//! let spatial = RadiusQuery::new(100.0);
//!
//! let hero = ObjectGuid::new(HighGuid::Player, 0, 1);
//! let mut directory = BTreeMap::new();
//! directory.insert(hero, ObserverProfile::new(hero, 1, 1));
//! distributor.register_observer(hero);
//!
//! let mut sink = BatchSink::new();
//! let mut ctx = Context::new(&spatial, &directory, &mut sink);
//! let mut player = Entity::new(hero, layouts.get(Category::Player));
//! player.set_position(Position::new(0.0, 0.0, 0.0, 0.0));
//! distributor.spawn(&mut world, player, &mut ctx);
//!
//! let wolf = ObjectGuid::new(HighGuid::Unit, 299, 1);
//! let mut entity = Entity::new(wolf, layouts.get(Category::Unit));
//! entity.set_position(Position::new(10.0, 0.0, 0.0, 0.0));
//! distributor.spawn(&mut world, entity, &mut ctx);
//! assert!(distributor.awareness().is_aware(hero, wolf));
//!
//! if let Some(entity) = world.get_mut(wolf) {
//!     entity.set_u32(unit::HEALTH, 80);
//! }
//! let stats = distributor.flush(&mut world, &mut ctx);
//! assert_eq!(stats.blocks(codec::BlockKind::Values), 1);
//! ```

mod awareness;
mod collab;
mod config;
mod distributor;
mod world;

pub use awareness::AwarenessTable;
pub use collab::{BatchSink, ObserverDirectory, RadiusQuery, SessionSink, SpatialQuery};
pub use config::ReplicationConfig;
pub use distributor::{Context, Distributor, FlushStats, SpawnOutcome};
pub use world::World;

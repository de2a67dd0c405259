//! Collaborator seams: spatial query, observer directory, session sink.

use std::collections::{BTreeMap, HashMap};

use codec::{EncodedBlock, Entity, ObjectGuid, ObserverProfile, ObserverView};
use schema::Category;
use wire::{Position, UpdateBatch};

use crate::world::World;

/// Answers "who is in range of whom".
///
/// The distributor treats the answers as opaque; it never caches them
/// across calls.
pub trait SpatialQuery {
    /// Observers currently in range of `entity`.
    fn observers_near(&self, world: &World, entity: &Entity) -> Vec<ObjectGuid>;

    /// Entities currently in range of `observer`.
    fn entities_near(&self, world: &World, observer: ObjectGuid) -> Vec<ObjectGuid>;
}

/// Resolves an observer identifier to its permission context.
pub trait ObserverDirectory {
    fn observer(&self, guid: ObjectGuid) -> Option<&dyn ObserverView>;
}

/// Accepts finished blocks by value.
pub trait SessionSink {
    fn deliver(&mut self, observer: ObjectGuid, block: EncodedBlock);
}

impl ObserverDirectory for BTreeMap<ObjectGuid, ObserverProfile> {
    fn observer(&self, guid: ObjectGuid) -> Option<&dyn ObserverView> {
        self.get(&guid).map(|profile| profile as &dyn ObserverView)
    }
}

impl ObserverDirectory for HashMap<ObjectGuid, ObserverProfile> {
    fn observer(&self, guid: ObjectGuid) -> Option<&dyn ObserverView> {
        self.get(&guid).map(|profile| profile as &dyn ObserverView)
    }
}

impl SessionSink for Vec<(ObjectGuid, EncodedBlock)> {
    fn deliver(&mut self, observer: ObjectGuid, block: EncodedBlock) {
        self.push((observer, block));
    }
}

/// Brute-force range check over world positions.
///
/// Observers are the in-world players; categories without a position are
/// never in range of anyone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub radius: f32,
}

impl RadiusQuery {
    #[must_use]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }

    fn in_range(&self, a: Position, b: Position) -> bool {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        let dz = a.z - b.z;
        dx * dx + dy * dy + dz * dz <= self.radius * self.radius
    }
}

impl SpatialQuery for RadiusQuery {
    fn observers_near(&self, world: &World, entity: &Entity) -> Vec<ObjectGuid> {
        let Some(origin) = entity.position() else {
            return Vec::new();
        };
        world
            .iter()
            .filter(|other| other.is_in_world() && other.category() == Category::Player)
            .filter(|other| other.position().is_some_and(|at| self.in_range(origin, at)))
            .map(Entity::guid)
            .collect()
    }

    fn entities_near(&self, world: &World, observer: ObjectGuid) -> Vec<ObjectGuid> {
        let Some(origin) = world.get(observer).and_then(Entity::position) else {
            return Vec::new();
        };
        world
            .iter()
            .filter(|other| other.is_in_world())
            .filter(|other| other.position().is_some_and(|at| self.in_range(origin, at)))
            .map(Entity::guid)
            .collect()
    }
}

/// Concatenates delivered blocks into one batch frame per observer.
#[derive(Debug, Clone, Default)]
pub struct BatchSink {
    batches: BTreeMap<ObjectGuid, UpdateBatch>,
}

impl BatchSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn batch(&self, observer: ObjectGuid) -> Option<&UpdateBatch> {
        self.batches.get(&observer)
    }

    /// Encodes and clears every non-empty batch, in observer order.
    pub fn drain(&mut self) -> Vec<(ObjectGuid, Vec<u8>)> {
        let mut frames = Vec::new();
        for (observer, batch) in &mut self.batches {
            if !batch.is_empty() {
                frames.push((*observer, batch.encode()));
                batch.clear();
            }
        }
        frames
    }
}

impl SessionSink for BatchSink {
    fn deliver(&mut self, observer: ObjectGuid, block: EncodedBlock) {
        self.batches
            .entry(observer)
            .or_default()
            .push_block(block.bytes());
    }
}

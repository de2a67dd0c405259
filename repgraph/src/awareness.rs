//! Which observer holds which entity at its client.

use std::collections::{BTreeSet, HashMap};

use codec::ObjectGuid;

/// Awareness sets, indexed both ways.
///
/// An entry means the observer has received a creation block for the entity
/// and no destroy block since.
#[derive(Debug, Clone, Default)]
pub struct AwarenessTable {
    by_observer: HashMap<ObjectGuid, BTreeSet<ObjectGuid>>,
    by_entity: HashMap<ObjectGuid, BTreeSet<ObjectGuid>>,
}

impl AwarenessTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer with an empty awareness set; idempotent.
    pub fn register(&mut self, observer: ObjectGuid) {
        self.by_observer.entry(observer).or_default();
    }

    /// Drops an observer and every awareness entry it held.
    pub fn unregister(&mut self, observer: ObjectGuid) -> BTreeSet<ObjectGuid> {
        let known = self.by_observer.remove(&observer).unwrap_or_default();
        for entity in &known {
            self.unlink_entity(*entity, observer);
        }
        known
    }

    #[must_use]
    pub fn is_registered(&self, observer: ObjectGuid) -> bool {
        self.by_observer.contains_key(&observer)
    }

    pub fn observers(&self) -> impl Iterator<Item = ObjectGuid> + '_ {
        self.by_observer.keys().copied()
    }

    /// Records awareness; returns `false` if it already existed or the
    /// observer is not registered.
    pub fn insert(&mut self, observer: ObjectGuid, entity: ObjectGuid) -> bool {
        let Some(known) = self.by_observer.get_mut(&observer) else {
            return false;
        };
        if !known.insert(entity) {
            return false;
        }
        self.by_entity.entry(entity).or_default().insert(observer);
        true
    }

    /// Revokes awareness; returns whether it existed.
    pub fn remove(&mut self, observer: ObjectGuid, entity: ObjectGuid) -> bool {
        let removed = self
            .by_observer
            .get_mut(&observer)
            .is_some_and(|known| known.remove(&entity));
        if removed {
            self.unlink_entity(entity, observer);
        }
        removed
    }

    /// Revokes every observer's awareness of `entity`, returning them.
    pub fn forget_entity(&mut self, entity: ObjectGuid) -> BTreeSet<ObjectGuid> {
        let observers = self.by_entity.remove(&entity).unwrap_or_default();
        for observer in &observers {
            if let Some(known) = self.by_observer.get_mut(observer) {
                known.remove(&entity);
            }
        }
        observers
    }

    #[must_use]
    pub fn is_aware(&self, observer: ObjectGuid, entity: ObjectGuid) -> bool {
        self.by_observer
            .get(&observer)
            .is_some_and(|known| known.contains(&entity))
    }

    /// Whether any observer still holds `entity`.
    #[must_use]
    pub fn is_referenced(&self, entity: ObjectGuid) -> bool {
        self.by_entity
            .get(&entity)
            .is_some_and(|observers| !observers.is_empty())
    }

    /// Entities `observer` is aware of, in identifier order.
    #[must_use]
    pub fn known_by(&self, observer: ObjectGuid) -> Vec<ObjectGuid> {
        self.by_observer
            .get(&observer)
            .map(|known| known.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Observers aware of `entity`, in identifier order.
    #[must_use]
    pub fn observers_of(&self, entity: ObjectGuid) -> Vec<ObjectGuid> {
        self.by_entity
            .get(&entity)
            .map(|observers| observers.iter().copied().collect())
            .unwrap_or_default()
    }

    fn unlink_entity(&mut self, entity: ObjectGuid, observer: ObjectGuid) {
        if let Some(observers) = self.by_entity.get_mut(&entity) {
            observers.remove(&observer);
            if observers.is_empty() {
                self.by_entity.remove(&entity);
            }
        }
    }
}

//! Entity registry for one region.

use std::collections::BTreeMap;

use codec::{Entity, ObjectGuid};

/// All entities of one region, keyed by identifier.
///
/// Iteration is in identifier order, which keeps flush output deterministic.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: BTreeMap<ObjectGuid, Entity>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn contains(&self, guid: ObjectGuid) -> bool {
        self.entities.contains_key(&guid)
    }

    #[must_use]
    pub fn get(&self, guid: ObjectGuid) -> Option<&Entity> {
        self.entities.get(&guid)
    }

    pub fn get_mut(&mut self, guid: ObjectGuid) -> Option<&mut Entity> {
        self.entities.get_mut(&guid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// In-world entities with a pending update, in identifier order.
    #[must_use]
    pub fn pending(&self) -> Vec<ObjectGuid> {
        self.entities
            .values()
            .filter(|entity| entity.is_in_world() && entity.has_pending())
            .map(Entity::guid)
            .collect()
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.guid(), entity)
    }

    pub(crate) fn remove(&mut self, guid: ObjectGuid) -> Option<Entity> {
        self.entities.remove(&guid)
    }
}

//! Per-tick fan-out of entity changes to aware observers.

use std::collections::BTreeSet;

use codec::{BlockBuilder, BlockKind, EncodedBlock, Entity, ObjectGuid};
use schema::{Category, Layouts};

use crate::awareness::AwarenessTable;
use crate::collab::{ObserverDirectory, SessionSink, SpatialQuery};
use crate::config::ReplicationConfig;
use crate::world::World;

/// Collaborators a distributor call needs.
pub struct Context<'a> {
    pub spatial: &'a dyn SpatialQuery,
    pub directory: &'a dyn ObserverDirectory,
    pub sink: &'a mut dyn SessionSink,
}

impl<'a> Context<'a> {
    pub fn new(
        spatial: &'a dyn SpatialQuery,
        directory: &'a dyn ObserverDirectory,
        sink: &'a mut dyn SessionSink,
    ) -> Self {
        Self {
            spatial,
            directory,
            sink,
        }
    }
}

/// Block and byte counts of one flush, per block kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub entities: usize,
    blocks: [usize; BlockKind::ALL.len()],
    bytes: [usize; BlockKind::ALL.len()],
}

impl FlushStats {
    fn record(&mut self, kind: BlockKind, len: usize) {
        let index = usize::from(kind.tag());
        self.blocks[index] += 1;
        self.bytes[index] += len;
    }

    fn deliver(&mut self, sink: &mut dyn SessionSink, observer: ObjectGuid, block: EncodedBlock) {
        self.record(block.kind(), block.len());
        sink.deliver(observer, block);
    }

    #[must_use]
    pub const fn blocks(&self, kind: BlockKind) -> usize {
        self.blocks[kind.tag() as usize]
    }

    #[must_use]
    pub const fn bytes(&self, kind: BlockKind) -> usize {
        self.bytes[kind.tag() as usize]
    }

    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.blocks.iter().sum()
    }

    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.bytes.iter().sum()
    }
}

/// Outcome of [`Distributor::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The entity entered the world and was revealed to this many observers.
    Spawned { revealed: usize },
    /// The entity cap is reached; the entity was dropped.
    CapReached,
}

/// Drives the lifecycle of every entity toward every observer.
///
/// Per (entity, observer), blocks leave in lifecycle order: a creation block
/// first, value-update and movement blocks only while the observer is aware,
/// and a destroy block that ends awareness.
#[derive(Debug, Clone)]
pub struct Distributor {
    config: ReplicationConfig,
    builder: BlockBuilder,
    awareness: AwarenessTable,
}

impl Distributor {
    #[must_use]
    pub fn new(config: ReplicationConfig, layouts: Layouts) -> Self {
        let builder = BlockBuilder::new(layouts, config.rules.clone());
        Self {
            config,
            builder,
            awareness: AwarenessTable::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ReplicationConfig {
        &self.config
    }

    #[must_use]
    pub const fn builder(&self) -> &BlockBuilder {
        &self.builder
    }

    #[must_use]
    pub const fn awareness(&self) -> &AwarenessTable {
        &self.awareness
    }

    /// Starts tracking awareness for a connected observer.
    pub fn register_observer(&mut self, observer: ObjectGuid) {
        self.awareness.register(observer);
    }

    /// Forgets a disconnected observer; nothing is sent.
    pub fn remove_observer(&mut self, observer: ObjectGuid) {
        let known = self.awareness.unregister(observer);
        tracing::debug!(%observer, released = known.len(), "observer removed");
    }

    /// Puts `entity` into the world and reveals it to every observer in
    /// range with its first creation block.
    ///
    /// Panics if any observer is still aware of the identifier.
    pub fn spawn(&mut self, world: &mut World, mut entity: Entity, ctx: &mut Context<'_>) -> SpawnOutcome {
        let guid = entity.guid();
        if self.awareness.is_referenced(guid) || world.contains(guid) {
            tracing::error!(%guid, "spawning an identifier that is still referenced");
            panic!("identifier {guid} is still referenced");
        }
        if world.len() >= self.config.max_entities {
            tracing::warn!(%guid, max = self.config.max_entities, "entity cap reached");
            return SpawnOutcome::CapReached;
        }
        entity.add_to_world();
        world.insert(entity);

        let mut revealed = 0;
        if let Some(entity) = world.get(guid) {
            for observer in self.observers_for(world, entity, ctx.spatial) {
                if self.reveal_to(entity, observer, ctx).is_some() {
                    revealed += 1;
                }
            }
        }
        if let Some(entity) = world.get_mut(guid) {
            entity.clear_fresh();
        }
        tracing::trace!(%guid, revealed, "spawned");
        SpawnOutcome::Spawned { revealed }
    }

    /// Sends a creation block for `entity` to `observer` unless it is
    /// already aware. Returns whether a block was sent.
    pub fn reveal(
        &mut self,
        world: &World,
        observer: ObjectGuid,
        entity: ObjectGuid,
        ctx: &mut Context<'_>,
    ) -> bool {
        match world.get(entity) {
            Some(subject) if subject.is_in_world() => {
                self.reveal_to(subject, observer, ctx).is_some()
            }
            _ => false,
        }
    }

    /// Sends a destroy block (no animation) to one observer leaving range.
    pub fn conceal(&mut self, observer: ObjectGuid, entity: ObjectGuid, ctx: &mut Context<'_>) -> bool {
        if !self.awareness.remove(observer, entity) {
            return false;
        }
        ctx.sink.deliver(observer, self.builder.destroy(entity, false));
        true
    }

    /// Reconciles `observer`'s awareness with what is in range now.
    pub fn refresh_observer(&mut self, world: &World, observer: ObjectGuid, ctx: &mut Context<'_>) {
        if !self.awareness.is_registered(observer) {
            return;
        }
        let mut in_range: BTreeSet<ObjectGuid> = ctx
            .spatial
            .entities_near(world, observer)
            .into_iter()
            .filter(|guid| world.get(*guid).is_some_and(Entity::is_in_world))
            .collect();
        if world.get(observer).is_some_and(Entity::is_in_world) {
            in_range.insert(observer);
        }
        for entity in self.awareness.known_by(observer) {
            if !in_range.contains(&entity) {
                self.conceal(observer, entity, ctx);
            }
        }
        for entity in in_range {
            self.reveal(world, observer, entity, ctx);
        }
    }

    /// Resends every non-zero slot of `entity` to an aware `observer`.
    pub fn force_refresh(
        &mut self,
        world: &World,
        observer: ObjectGuid,
        entity: ObjectGuid,
        ctx: &mut Context<'_>,
    ) -> bool {
        if !self.awareness.is_aware(observer, entity) {
            return false;
        }
        let directory = ctx.directory;
        let (Some(subject), Some(view)) = (world.get(entity), directory.observer(observer))
        else {
            return false;
        };
        let block = self.builder.forced_values(subject, view);
        ctx.sink.deliver(observer, block);
        true
    }

    /// Destroys `entity` for every aware observer and removes it from the
    /// world. Pending changes are discarded.
    pub fn despawn(
        &mut self,
        world: &mut World,
        entity: ObjectGuid,
        animated: bool,
        ctx: &mut Context<'_>,
    ) -> Option<Entity> {
        for observer in self.awareness.forget_entity(entity) {
            ctx.sink.deliver(observer, self.builder.destroy(entity, animated));
        }
        let mut removed = world.remove(entity)?;
        removed.remove_from_world();
        tracing::trace!(guid = %entity, "despawned");
        Some(removed)
    }

    /// Sends every pending change to the observers in range, then clears
    /// each flushed entity's dirty state once.
    pub fn flush(&mut self, world: &mut World, ctx: &mut Context<'_>) -> FlushStats {
        let mut stats = FlushStats::default();
        let directory = ctx.directory;
        for guid in world.pending() {
            let Some(entity) = world.get(guid) else {
                continue;
            };
            for observer in self.observers_for(world, entity, ctx.spatial) {
                if self.awareness.is_aware(observer, guid) {
                    let Some(view) = directory.observer(observer) else {
                        tracing::trace!(%observer, "observer context unavailable");
                        continue;
                    };
                    if let Some(block) = self.builder.values(entity, view) {
                        stats.deliver(ctx.sink, observer, block);
                    }
                    if entity.has_dirty_motion() {
                        if let Some(block) = self.builder.movement(entity, view) {
                            stats.deliver(ctx.sink, observer, block);
                        }
                    }
                } else if let Some((kind, len)) = self.reveal_to(entity, observer, ctx) {
                    stats.record(kind, len);
                }
            }
            if let Some(entity) = world.get_mut(guid) {
                entity.clear_dirty();
            }
            stats.entities += 1;
        }
        tracing::debug!(
            entities = stats.entities,
            creates = stats.blocks(BlockKind::Create) + stats.blocks(BlockKind::CreateFull),
            values = stats.blocks(BlockKind::Values),
            movements = stats.blocks(BlockKind::Movement),
            bytes = stats.total_bytes(),
            "flush complete"
        );
        stats
    }

    /// Observers in range of `entity`, plus a player itself, in identifier
    /// order.
    fn observers_for(
        &self,
        world: &World,
        entity: &Entity,
        spatial: &dyn SpatialQuery,
    ) -> BTreeSet<ObjectGuid> {
        let mut observers: BTreeSet<ObjectGuid> = spatial
            .observers_near(world, entity)
            .into_iter()
            .filter(|observer| self.awareness.is_registered(*observer))
            .collect();
        if entity.category() == Category::Player && self.awareness.is_registered(entity.guid()) {
            observers.insert(entity.guid());
        }
        observers
    }

    /// Delivers a creation block and records awareness; returns the kind and
    /// size of the sent block.
    fn reveal_to(
        &mut self,
        subject: &Entity,
        observer: ObjectGuid,
        ctx: &mut Context<'_>,
    ) -> Option<(BlockKind, usize)> {
        if !self.awareness.is_registered(observer) || self.awareness.is_aware(observer, subject.guid()) {
            return None;
        }
        let directory = ctx.directory;
        let Some(view) = directory.observer(observer) else {
            tracing::trace!(%observer, "observer context unavailable");
            return None;
        };
        let block = self.builder.create(subject, view);
        let sent = (block.kind(), block.len());
        self.awareness.insert(observer, subject.guid());
        ctx.sink.deliver(observer, block);
        Some(sent)
    }
}

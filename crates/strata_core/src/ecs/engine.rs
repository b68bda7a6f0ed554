//! # Engine
//!
//! The public facade: registers archetypes, creates and destroys
//! entities, and answers field-set queries with one [`Collector`] per
//! backing chunk.
//!
//! ## Ownership
//!
//! ```text
//! Engine
//!   archetypes: [Archetype]           each owns its chunks
//!   pools:      ChunkId -> EntityPool one per chunk that ever held a record
//!   owners:     ChunkId -> ArchetypeId
//! ```
//!
//! A chunk and its pool are always mutated together, so the chunk's byte
//! swap and the pool's handle rewrite are one step.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::query;
use super::{
    Archetype, ArchetypeId, ChunkId, Collector, Component, Entity, EntityLocation,
    FieldDescriptor, FieldId, TypeRegistry,
};
use crate::config::{EngineConfig, RegistrationPolicy};
use crate::error::{ColumnError, EngineError};
use crate::memory::{Chunk, EntityPool, FreeOutcome, MAX_FIELD_ALIGN};

/// Archetype-based entity store.
pub struct Engine {
    config: EngineConfig,
    archetypes: Vec<Archetype>,
    pools: HashMap<ChunkId, EntityPool>,
    owners: HashMap<ChunkId, ArchetypeId>,
    next_chunk: u32,
    total_entities: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            archetypes: Vec::new(),
            pools: HashMap::new(),
            owners: HashMap::new(),
            next_chunk: 0,
            total_entities: 0,
        }
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Registers a field layout, reusing an existing archetype when the
    /// [`RegistrationPolicy`] allows it.
    ///
    /// # Arguments
    ///
    /// * `pairs` - `(field id, byte size)` in layout order
    ///
    /// # Errors
    ///
    /// Layout errors from [`TypeRegistry::new`]. The layout is validated
    /// even when an existing archetype ends up being reused.
    /// [`EngineError::ChunkIdsExhausted`] if no chunk id is left for the
    /// new archetype's first chunk.
    ///
    /// Columns are laid out in `pairs` order, so a column may start off
    /// an 8-byte boundary; such layouts are accepted with a warning.
    pub fn register_archetype(
        &mut self,
        pairs: &[(FieldId, u16)],
    ) -> Result<ArchetypeId, EngineError> {
        let registry = TypeRegistry::new(pairs)?;
        let fields: Vec<FieldId> = pairs.iter().map(|&(id, _)| id).collect();

        let existing = match self.config.registration {
            RegistrationPolicy::Superset => self.archetypes.iter().find(|a| a.is_type(&fields)),
            RegistrationPolicy::Exact => self.archetypes.iter().find(|a| a.is_exact(&fields)),
        };
        if let Some(archetype) = existing {
            tracing::debug!(
                "Reusing {} for {} requested fields",
                archetype.id(),
                fields.len()
            );
            return Ok(archetype.id());
        }

        let id = ArchetypeId::new(u32::try_from(self.archetypes.len()).unwrap_or(u32::MAX));
        for field in registry.unaligned_columns(MAX_FIELD_ALIGN) {
            tracing::warn!(
                "{}: column for {} starts off a {}-byte boundary; typed views needing that alignment will fail",
                id,
                field.id,
                MAX_FIELD_ALIGN
            );
        }
        let first = Self::allocate_chunk_id(&mut self.next_chunk)?;
        let archetype = Archetype::new(id, registry, first);
        tracing::debug!(
            "Registered {}: {} fields, {} bytes per record, {} records per chunk",
            id,
            fields.len(),
            archetype.registry().total_size(),
            archetype.capacity()
        );
        self.archetypes.push(archetype);
        Ok(id)
    }

    /// Every archetype storing all of `fields`, in registration order.
    #[must_use]
    pub fn match_archetypes(&self, fields: &[FieldId]) -> Vec<&Archetype> {
        self.archetypes
            .iter()
            .filter(|archetype| archetype.is_type(fields))
            .collect()
    }

    /// Looks up an archetype.
    #[must_use]
    pub fn archetype(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(id.index())
    }

    /// All archetypes in registration order.
    #[inline]
    #[must_use]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    // ========================================================================
    // ENTITY LIFECYCLE
    // ========================================================================

    /// Creates an entity in the first archetype that stores `fields`.
    ///
    /// Under [`RegistrationPolicy::Exact`] an archetype with exactly
    /// `fields` wins over earlier superset matches. The new record's
    /// bytes are whatever its slot last held; write every field before
    /// reading it.
    ///
    /// # Errors
    ///
    /// [`EngineError::EmptyFieldSet`] or [`EngineError::NoMatchingArchetype`].
    /// [`EngineError::ChunkIdsExhausted`] if every chunk is full and no
    /// chunk id is left to grow.
    pub fn create_entity(&mut self, fields: &[FieldId]) -> Result<Entity, EngineError> {
        if fields.is_empty() {
            return Err(EngineError::EmptyFieldSet);
        }

        let Some(position) = self.select_archetype(fields) else {
            tracing::warn!("No archetype stores {} requested fields", fields.len());
            return Err(EngineError::NoMatchingArchetype {
                fields: fields.to_vec(),
            });
        };

        let next_chunk = &mut self.next_chunk;
        let archetype = &mut self.archetypes[position];
        let archetype_id = archetype.id();
        let chunk = archetype
            .find_or_grow_current_chunk(fields, || Self::allocate_chunk_id(next_chunk).ok())
            .ok_or(EngineError::ChunkIdsExhausted)?;
        let chunk_id = chunk.id();

        let pool = match self.pools.entry(chunk_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.owners.insert(chunk_id, archetype_id);
                tracing::debug!("Created entity pool for {} ({})", chunk_id, archetype_id);
                entry.insert(EntityPool::new(chunk))
            }
        };

        let entity = pool
            .allocate(chunk)
            .ok_or(EngineError::PoolExhausted { chunk: chunk_id })?;
        self.total_entities += 1;
        tracing::trace!("Created {} in {}", entity, archetype_id);
        Ok(entity)
    }

    /// Destroys an entity.
    ///
    /// # Returns
    ///
    /// `false` if the handle is null, stale or unknown. Destroying twice
    /// is a no-op, also after the pool slot was reused by a later
    /// entity: the slot generation tells the two apart.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        self.release(entity.chunk(), |pool, chunk| pool.deallocate(chunk, entity))
    }

    /// Destroys whichever entity sits at a dense index of a chunk.
    ///
    /// Returns `false` if that index holds no live entity.
    pub fn destroy_at(&mut self, chunk: ChunkId, index: u16) -> bool {
        self.release(chunk, |pool, chunk| pool.deallocate_by_index(chunk, index))
    }

    /// Destroys a batch of entities, typically collected during a query.
    ///
    /// # Returns
    ///
    /// How many were actually destroyed.
    pub fn destroy_entities<I>(&mut self, entities: I) -> usize
    where
        I: IntoIterator<Item = Entity>,
    {
        entities
            .into_iter()
            .filter(|&entity| self.destroy_entity(entity))
            .count()
    }

    fn release(
        &mut self,
        chunk_id: ChunkId,
        free: impl FnOnce(&mut EntityPool, &mut Chunk) -> Option<FreeOutcome>,
    ) -> bool {
        let Some(&archetype_id) = self.owners.get(&chunk_id) else {
            return false;
        };
        let Some(pool) = self.pools.get_mut(&chunk_id) else {
            return false;
        };
        let Some(archetype) = self.archetypes.get_mut(archetype_id.index()) else {
            return false;
        };
        let Some(chunk) = archetype.chunk_mut(chunk_id) else {
            return false;
        };

        let Some(outcome) = free(pool, chunk) else {
            return false;
        };
        let emptied = chunk.is_empty();
        self.total_entities -= 1;
        tracing::trace!("Freed slot {} of {}", outcome.freed, chunk_id);

        if emptied && self.config.prune_on_destroy {
            self.prune_archetype(archetype_id);
        }
        true
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// One collector per chunk of every archetype storing `fields`.
    ///
    /// Column views in each collector follow the order of `fields`. An
    /// empty field list yields collectors with no columns, which still
    /// expose each chunk's length and entities.
    ///
    /// # Errors
    ///
    /// [`EngineError::Column`] if a field is listed twice.
    pub fn run_query(&mut self, fields: &[FieldId]) -> Result<Vec<Collector<'_>>, EngineError> {
        let pools = &self.pools;
        let mut collectors = Vec::new();
        for archetype in self
            .archetypes
            .iter_mut()
            .filter(|archetype| archetype.is_type(fields))
        {
            collectors.extend(archetype.generate_query(fields, pools)?);
        }
        Ok(collectors)
    }

    /// Empties one chunk and its pool at once.
    ///
    /// # Returns
    ///
    /// How many entities were dropped.
    pub fn clear_query(&mut self, chunk_id: ChunkId) -> usize {
        let Some(&archetype_id) = self.owners.get(&chunk_id) else {
            return 0;
        };
        let (Some(pool), Some(chunk)) = (
            self.pools.get_mut(&chunk_id),
            self.archetypes
                .get_mut(archetype_id.index())
                .and_then(|archetype| archetype.chunk_mut(chunk_id)),
        ) else {
            return 0;
        };

        let cleared = pool.clear(chunk);
        self.total_entities -= cleared;
        tracing::debug!("Cleared {} entities from {}", cleared, chunk_id);
        cleared
    }

    /// Removes empty, non-current chunks from every archetype.
    ///
    /// Honors [`EngineConfig::prune_limit`] per archetype.
    ///
    /// # Returns
    ///
    /// How many chunks were removed.
    pub fn prune_empty_chunks(&mut self) -> usize {
        (0..self.archetypes.len())
            .map(|index| {
                let id = self.archetypes[index].id();
                self.prune_archetype(id)
            })
            .sum()
    }

    fn prune_archetype(&mut self, id: ArchetypeId) -> usize {
        let Some(archetype) = self.archetypes.get_mut(id.index()) else {
            return 0;
        };
        let removed = archetype.prune_empty_chunks(self.config.prune_limit);
        for chunk in &removed {
            self.pools.remove(chunk);
            self.owners.remove(chunk);
        }
        removed.len()
    }

    // ========================================================================
    // PER-ENTITY ACCESS
    // ========================================================================

    /// Where an entity's data currently lives.
    #[must_use]
    pub fn location(&self, entity: Entity) -> Option<EntityLocation> {
        let chunk = entity.chunk();
        let archetype = *self.owners.get(&chunk)?;
        let index = self.pools.get(&chunk)?.data_index(entity)?;
        Some(EntityLocation {
            archetype,
            chunk,
            index,
        })
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.location(entity).is_some()
    }

    /// The field layout of an entity's archetype.
    #[must_use]
    pub fn entity_fields(&self, entity: Entity) -> Option<&[FieldDescriptor]> {
        let location = self.location(entity)?;
        Some(self.archetype(location.archetype)?.registry().fields())
    }

    /// Raw bytes of one field of an entity.
    #[must_use]
    pub fn field_bytes(&self, entity: Entity, field: FieldId) -> Option<&[u8]> {
        let location = self.location(entity)?;
        self.archetypes
            .get(location.archetype.index())?
            .chunk(location.chunk)?
            .slot_bytes(location.index, field)
    }

    /// Mutable variant of [`field_bytes`](Self::field_bytes).
    pub fn field_bytes_mut(&mut self, entity: Entity, field: FieldId) -> Option<&mut [u8]> {
        let location = self.location(entity)?;
        self.archetypes
            .get_mut(location.archetype.index())?
            .chunk_mut(location.chunk)?
            .slot_bytes_mut(location.index, field)
    }

    /// Typed read of one component.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the entity is not alive or does not store `C`.
    ///
    /// # Errors
    ///
    /// A [`ColumnError`] if the stored field does not fit `C`.
    pub fn get<C: Component>(&self, entity: Entity) -> Result<Option<&C>, ColumnError> {
        self.field_bytes(entity, C::ID)
            .map(|bytes| query::read::<C>(C::ID, bytes))
            .transpose()
    }

    /// Typed mutable access to one component.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Result<Option<&mut C>, ColumnError> {
        self.field_bytes_mut(entity, C::ID)
            .map(|bytes| query::write::<C>(C::ID, bytes))
            .transpose()
    }

    /// Overwrites one component.
    ///
    /// # Returns
    ///
    /// `Ok(false)` if the entity is not alive or does not store `C`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn set<C: Component>(&mut self, entity: Entity, value: C) -> Result<bool, ColumnError> {
        match self.get_mut::<C>(entity)? {
            Some(slot) => {
                *slot = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // STATISTICS
    // ========================================================================

    /// Live entities across all archetypes.
    #[inline]
    #[must_use]
    pub const fn total_entities(&self) -> usize {
        self.total_entities
    }

    /// Chunks across all archetypes.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.archetypes
            .iter()
            .map(|archetype| archetype.chunks().len())
            .sum()
    }

    fn select_archetype(&self, fields: &[FieldId]) -> Option<usize> {
        let exact = match self.config.registration {
            RegistrationPolicy::Exact => self.archetypes.iter().position(|a| a.is_exact(fields)),
            RegistrationPolicy::Superset => None,
        };
        exact.or_else(|| self.archetypes.iter().position(|a| a.is_type(fields)))
    }

    fn allocate_chunk_id(next_chunk: &mut u32) -> Result<ChunkId, EngineError> {
        let id = ChunkId::new(*next_chunk);
        *next_chunk = next_chunk
            .checked_add(1)
            .ok_or(EngineError::ChunkIdsExhausted)?;
        Ok(id)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("archetypes", &self.archetypes.len())
            .field("chunks", &self.chunk_count())
            .field("entities", &self.total_entities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Position([f32; 3]);

    impl Component for Position {
        const ID: FieldId = FieldId::from_name("Position");
    }

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Velocity([f32; 3]);

    impl Component for Velocity {
        const ID: FieldId = FieldId::from_name("Velocity");
    }

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Mass(f32);

    impl Component for Mass {
        const ID: FieldId = FieldId::from_name("Mass");
    }

    const PV: [FieldId; 2] = [Position::ID, Velocity::ID];

    fn engine() -> Engine {
        let mut engine = Engine::new();
        engine
            .register_archetype(&[Position::field(), Velocity::field()])
            .unwrap();
        engine
    }

    #[test]
    fn test_create_requires_match() {
        let mut engine = engine();
        assert_eq!(engine.create_entity(&[]), Err(EngineError::EmptyFieldSet));
        assert_eq!(
            engine.create_entity(&[Mass::ID]),
            Err(EngineError::NoMatchingArchetype {
                fields: vec![Mass::ID]
            })
        );
        assert_eq!(engine.total_entities(), 0);
    }

    #[test]
    fn test_create_get_set() {
        let mut engine = engine();
        let entity = engine.create_entity(&PV).unwrap();

        assert!(engine.set(entity, Position([1.0, 2.0, 3.0])).unwrap());
        assert_eq!(
            engine.get::<Position>(entity).unwrap(),
            Some(&Position([1.0, 2.0, 3.0]))
        );
        assert_eq!(engine.get::<Mass>(entity).unwrap(), None);
        assert!(!engine.set(entity, Mass(1.0)).unwrap());

        engine.get_mut::<Velocity>(entity).unwrap().unwrap().0[1] = 9.0;
        assert_eq!(
            &engine.field_bytes(entity, Velocity::ID).unwrap()[4..8],
            &9.0f32.to_ne_bytes()
        );
    }

    #[test]
    fn test_destroy_keeps_other_handles_valid() {
        let mut engine = engine();
        let entities: Vec<_> = (0..5).map(|_| engine.create_entity(&PV).unwrap()).collect();
        for (i, &entity) in entities.iter().enumerate() {
            engine.set(entity, Position([i as f32; 3])).unwrap();
        }

        assert!(engine.destroy_entity(entities[1]));
        assert!(!engine.destroy_entity(entities[1]));
        assert!(!engine.destroy_entity(Entity::NULL));
        assert_eq!(engine.total_entities(), 4);

        assert_eq!(engine.location(entities[4]).unwrap().index, 1);
        for &i in &[0usize, 2, 3, 4] {
            assert_eq!(
                engine.get::<Position>(entities[i]).unwrap(),
                Some(&Position([i as f32; 3]))
            );
        }
        assert!(!engine.contains(entities[1]));
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut engine = engine();
        let a = engine.create_entity(&PV).unwrap();
        let b = engine.create_entity(&PV).unwrap();
        assert!(engine.destroy_entity(a));

        let c = engine.create_entity(&PV).unwrap();
        engine.set(c, Position([5.0; 3])).unwrap();
        assert_eq!(c.slot(), a.slot());
        assert_ne!(c, a);

        assert!(!engine.contains(a));
        assert_eq!(engine.get::<Position>(a).unwrap(), None);
        assert!(!engine.destroy_entity(a));
        assert!(engine.contains(c));
        assert!(engine.contains(b));
        assert_eq!(
            engine.get::<Position>(c).unwrap(),
            Some(&Position([5.0; 3]))
        );
        assert_eq!(engine.total_entities(), 2);
    }

    #[test]
    fn test_destroy_at_and_batch() {
        let mut engine = engine();
        let entities: Vec<_> = (0..4).map(|_| engine.create_entity(&PV).unwrap()).collect();
        let chunk = entities[0].chunk();

        assert!(engine.destroy_at(chunk, 0));
        assert!(!engine.destroy_at(chunk, 3));
        assert!(!engine.destroy_at(ChunkId::new(77), 0));
        assert_eq!(engine.destroy_entities(entities.iter().copied()), 3);
        assert_eq!(engine.total_entities(), 0);
    }

    #[test]
    fn test_registration_policies() {
        let mut superset = engine();
        let reused = superset.register_archetype(&[Position::field()]).unwrap();
        assert_eq!(reused, ArchetypeId::new(0));
        assert_eq!(superset.archetypes().len(), 1);

        let mut exact = Engine::with_config(EngineConfig {
            registration: RegistrationPolicy::Exact,
            ..EngineConfig::default()
        });
        exact
            .register_archetype(&[Position::field(), Velocity::field()])
            .unwrap();
        let narrow = exact.register_archetype(&[Position::field()]).unwrap();
        assert_eq!(narrow, ArchetypeId::new(1));
        assert_eq!(
            exact.register_archetype(&[Velocity::field(), Position::field()]),
            Ok(ArchetypeId::new(0))
        );

        let entity = exact.create_entity(&[Position::ID]).unwrap();
        assert_eq!(exact.location(entity).unwrap().archetype, narrow);
    }

    #[test]
    fn test_registration_rejects_bad_layout() {
        let mut engine = Engine::new();
        assert_eq!(
            engine.register_archetype(&[Position::field(), Position::field()]),
            Err(EngineError::DuplicateField(Position::ID))
        );
        assert_eq!(engine.register_archetype(&[]), Err(EngineError::EmptyFieldSet));
        assert!(engine.archetypes().is_empty());
    }

    #[test]
    fn test_unaligned_column_layout_is_accepted() {
        #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
        #[repr(C)]
        struct Health(u32);

        impl Component for Health {
            const ID: FieldId = FieldId::from_name("Health");
        }

        #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
        #[repr(C)]
        struct Score(u64);

        impl Component for Score {
            const ID: FieldId = FieldId::from_name("Score");
        }

        let mut engine = Engine::new();
        engine
            .register_archetype(&[Health::field(), Score::field()])
            .unwrap();
        let entity = engine.create_entity(&[Health::ID, Score::ID]).unwrap();
        assert!(engine.set(entity, Health(3)).unwrap());
        assert!(matches!(
            engine.set(entity, Score(7)),
            Err(ColumnError::Misaligned { align: 8, .. })
        ));

        let mut reordered = Engine::new();
        reordered
            .register_archetype(&[Score::field(), Health::field()])
            .unwrap();
        let entity = reordered.create_entity(&[Health::ID, Score::ID]).unwrap();
        assert!(reordered.set(entity, Score(7)).unwrap());
        assert_eq!(reordered.get::<Score>(entity).unwrap(), Some(&Score(7)));
    }

    #[test]
    fn test_chunk_ids_exhausted() {
        let mut engine = Engine::new();
        engine.next_chunk = u32::MAX - 1;
        engine.register_archetype(&[(Mass::ID, 8192)]).unwrap();

        engine.create_entity(&[Mass::ID]).unwrap();
        engine.create_entity(&[Mass::ID]).unwrap();
        assert_eq!(
            engine.create_entity(&[Mass::ID]),
            Err(EngineError::ChunkIdsExhausted)
        );
        assert_eq!(
            engine.register_archetype(&[Position::field()]),
            Err(EngineError::ChunkIdsExhausted)
        );
        assert_eq!(engine.total_entities(), 2);
        assert_eq!(engine.chunk_count(), 1);
    }

    #[test]
    fn test_run_query_views() {
        let mut engine = engine();
        for i in 0..10 {
            let entity = engine.create_entity(&PV).unwrap();
            engine.set(entity, Position([0.0; 3])).unwrap();
            engine.set(entity, Velocity([i as f32, 0.0, 0.0])).unwrap();
        }

        for mut collector in engine.run_query(&PV).unwrap() {
            let (positions, velocities) = collector.view::<(Position, Velocity)>().unwrap();
            for (p, v) in positions.iter_mut().zip(velocities.iter()) {
                p.0[0] += v.0[0] * 2.0;
            }
        }

        let mut collectors = engine.run_query(&[Position::ID]).unwrap();
        assert_eq!(collectors.len(), 1);
        let (positions,) = collectors[0].view::<(Position,)>().unwrap();
        assert_eq!(positions[9].0[0], 18.0);
        drop(collectors);

        assert!(matches!(
            engine.run_query(&[Position::ID, Position::ID]),
            Err(EngineError::Column(ColumnError::DuplicateField(_)))
        ));
    }

    #[test]
    fn test_clear_query() {
        let mut engine = engine();
        let entities: Vec<_> = (0..3).map(|_| engine.create_entity(&PV).unwrap()).collect();

        assert_eq!(engine.clear_query(entities[0].chunk()), 3);
        assert_eq!(engine.total_entities(), 0);
        assert!(entities.iter().all(|&e| !engine.contains(e)));
        assert_eq!(engine.clear_query(ChunkId::new(42)), 0);
    }

    #[test]
    fn test_prune_on_destroy() {
        let mut engine = Engine::with_config(EngineConfig {
            prune_on_destroy: true,
            ..EngineConfig::default()
        });
        engine.register_archetype(&[(Mass::ID, 8192)]).unwrap();

        let entities: Vec<_> = (0..3).map(|_| engine.create_entity(&[Mass::ID]).unwrap()).collect();
        assert_eq!(engine.chunk_count(), 2);

        engine.destroy_entity(entities[0]);
        engine.destroy_entity(entities[1]);
        // The first chunk is empty and not current.
        assert_eq!(engine.chunk_count(), 1);
        assert!(engine.contains(entities[2]));
        assert!(engine.location(entities[0]).is_none());
    }

    #[test]
    fn test_prune_empty_chunks() {
        let mut engine = Engine::new();
        engine.register_archetype(&[(Mass::ID, 8192)]).unwrap();
        let entities: Vec<_> = (0..5).map(|_| engine.create_entity(&[Mass::ID]).unwrap()).collect();
        assert_eq!(engine.chunk_count(), 3);

        engine.destroy_entities(entities[..4].iter().copied());
        assert_eq!(engine.chunk_count(), 3);
        assert_eq!(engine.prune_empty_chunks(), 2);
        assert_eq!(engine.chunk_count(), 1);
        assert_eq!(engine.total_entities(), 1);
    }
}

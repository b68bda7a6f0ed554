//! # Entity Pool
//!
//! Per-chunk handle allocator. Each entity owns a pool slot that never
//! changes while it is alive; a side table maps that slot to the record's
//! current dense index in the chunk, and is rewritten whenever the chunk
//! compacts. Every slot carries a generation that is bumped on free, so
//! stale handles stop resolving once their slot is reused.

use crate::ecs::{ChunkId, Entity};
use crate::memory::{Chunk, FreeOutcome};

/// Handle storage for exactly one [`Chunk`].
///
/// The pool never touches the chunk's bytes itself; every call that
/// changes the live range takes the chunk by `&mut` so the byte swap and
/// the index rewrite happen in one step.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool = EntityPool::new(&chunk);
///
/// let a = pool.allocate(&mut chunk)?;
/// let b = pool.allocate(&mut chunk)?;
///
/// // `b` moves into `a`'s old dense slot; its handle stays the same.
/// pool.deallocate(&mut chunk, a);
/// assert_eq!(pool.data_index(b), Some(0));
/// ```
pub struct EntityPool {
    /// The chunk this pool is bound to.
    chunk: ChunkId,
    /// Pool slot -> current dense index.
    slots: Box<[Option<u16>]>,
    /// Dense index -> pool slot.
    dense: Box<[Option<u16>]>,
    /// Pool slot -> generation of the handle currently issued for it.
    generations: Box<[u16]>,
    /// Free list - pool slots available for new handles.
    free_list: Vec<u16>,
    /// Number of live handles.
    allocated_count: usize,
    /// Total capacity.
    capacity: u16,
}

impl EntityPool {
    /// Creates a pool sized to the chunk's capacity.
    #[must_use]
    pub fn new(chunk: &Chunk) -> Self {
        let capacity = chunk.capacity();
        Self {
            chunk: chunk.id(),
            slots: vec![None; usize::from(capacity)].into_boxed_slice(),
            dense: vec![None; usize::from(capacity)].into_boxed_slice(),
            generations: vec![0; usize::from(capacity)].into_boxed_slice(),
            free_list: (0..capacity).rev().collect(),
            allocated_count: 0,
            capacity,
        }
    }

    /// Returns the bound chunk's id.
    #[inline]
    #[must_use]
    pub const fn chunk(&self) -> ChunkId {
        self.chunk
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Returns the number of live handles.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Returns the number of free pool slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Allocates a handle and a data slot for it.
    ///
    /// The handle's dense index is the chunk's live count before the call.
    ///
    /// # Returns
    ///
    /// The new entity, or `None` if the chunk is full or is not the chunk
    /// this pool was built for.
    pub fn allocate(&mut self, chunk: &mut Chunk) -> Option<Entity> {
        if chunk.id() != self.chunk {
            return None;
        }

        let slot = self.free_list.pop()?;
        let Some(index) = chunk.allocate() else {
            self.free_list.push(slot);
            return None;
        };

        self.slots[usize::from(slot)] = Some(index);
        self.dense[usize::from(index)] = Some(slot);
        self.allocated_count += 1;

        Some(self.handle(slot))
    }

    /// Frees an entity's handle and its data slot.
    ///
    /// If the chunk moved its last record into the freed slot, the moved
    /// handle is repointed before this returns.
    ///
    /// # Returns
    ///
    /// The chunk's [`FreeOutcome`], or `None` if the handle is not live in
    /// this pool. Freeing twice is a no-op, even after the slot has been
    /// handed to a new entity.
    pub fn deallocate(&mut self, chunk: &mut Chunk, entity: Entity) -> Option<FreeOutcome> {
        if chunk.id() != self.chunk {
            return None;
        }

        let slot = entity.slot();
        let index = self.data_index(entity)?;
        let outcome = chunk.free(index)?;

        self.slots[usize::from(slot)] = None;
        self.dense[usize::from(index)] = None;
        self.generations[usize::from(slot)] = self.generations[usize::from(slot)].wrapping_add(1);
        self.free_list.push(slot);
        self.allocated_count -= 1;

        if let Some(last) = outcome.moved_from {
            if let Some(moved) = self.dense[usize::from(last)].take() {
                self.slots[usize::from(moved)] = Some(outcome.freed);
                self.dense[usize::from(outcome.freed)] = Some(moved);
                tracing::trace!(
                    "{} relocated {} -> {}",
                    self.handle(moved),
                    last,
                    outcome.freed
                );
            }
        }

        Some(outcome)
    }

    /// Frees whichever entity currently sits at a dense index.
    ///
    /// No-op if that index holds no live handle.
    pub fn deallocate_by_index(&mut self, chunk: &mut Chunk, index: u16) -> Option<FreeOutcome> {
        let entity = self.entity_at(index)?;
        self.deallocate(chunk, entity)
    }

    /// Drops every handle and empties the chunk.
    ///
    /// # Returns
    ///
    /// How many handles were live.
    pub fn clear(&mut self, chunk: &mut Chunk) -> usize {
        let cleared = self.allocated_count;
        if chunk.id() == self.chunk {
            chunk.reset();
        }

        for slot in self.dense.iter().map_while(|slot| *slot) {
            let generation = &mut self.generations[usize::from(slot)];
            *generation = generation.wrapping_add(1);
        }
        self.slots.fill(None);
        self.dense.fill(None);
        self.free_list.clear();
        self.free_list.extend((0..self.capacity).rev());
        self.allocated_count = 0;

        cleared
    }

    /// Current dense index of a live entity.
    #[inline]
    #[must_use]
    pub fn data_index(&self, entity: Entity) -> Option<u16> {
        if entity.is_null() || entity.chunk() != self.chunk {
            return None;
        }
        let slot = usize::from(entity.slot());
        if *self.generations.get(slot)? != entity.generation() {
            return None;
        }
        self.slots[slot]
    }

    /// Checks if an entity is live in this pool.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.data_index(entity).is_some()
    }

    /// The entity stored at a dense index.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, index: u16) -> Option<Entity> {
        let slot = (*self.dense.get(usize::from(index))?)?;
        Some(self.handle(slot))
    }

    /// Iterates live entities in dense order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.dense
            .iter()
            .map_while(|slot| slot.map(|slot| self.handle(slot)))
    }

    fn handle(&self, slot: u16) -> Entity {
        Entity::with_generation(self.chunk, slot, self.generations[usize::from(slot)])
    }
}

impl std::fmt::Debug for EntityPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityPool")
            .field("chunk", &self.chunk)
            .field("allocated", &self.allocated_count)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{FieldId, TypeRegistry};

    const TAG: FieldId = FieldId::new(1);

    fn setup() -> (Chunk, EntityPool) {
        let registry = TypeRegistry::new(&[(TAG, 4)]).unwrap();
        let chunk = Chunk::new(ChunkId::new(3), registry.capacity(), registry.fields());
        let pool = EntityPool::new(&chunk);
        (chunk, pool)
    }

    fn write_tag(chunk: &mut Chunk, pool: &EntityPool, entity: Entity, tag: u32) {
        let index = pool.data_index(entity).unwrap();
        chunk
            .slot_bytes_mut(index, TAG)
            .unwrap()
            .copy_from_slice(&tag.to_le_bytes());
    }

    fn read_tag(chunk: &Chunk, pool: &EntityPool, entity: Entity) -> u32 {
        let index = pool.data_index(entity).unwrap();
        let bytes = chunk.slot_bytes(index, TAG).unwrap();
        u32::from_le_bytes(bytes.try_into().unwrap())
    }

    #[test]
    fn test_pool_allocate_tracks_chunk() {
        let (mut chunk, mut pool) = setup();
        assert_eq!(pool.capacity(), 4096);

        let a = pool.allocate(&mut chunk).unwrap();
        let b = pool.allocate(&mut chunk).unwrap();

        assert_eq!(a.chunk(), ChunkId::new(3));
        assert_ne!(a.slot(), b.slot());
        assert_eq!(pool.data_index(a), Some(0));
        assert_eq!(pool.data_index(b), Some(1));
        assert_eq!(chunk.len(), 2);
        assert_eq!(pool.allocated_count(), 2);
        assert_eq!(pool.free_count(), 4094);
    }

    #[test]
    fn test_pool_deallocate_repoints_moved_handle() {
        let (mut chunk, mut pool) = setup();
        let entities: Vec<_> = (0..4).map(|_| pool.allocate(&mut chunk).unwrap()).collect();
        for (tag, &entity) in entities.iter().enumerate() {
            write_tag(&mut chunk, &pool, entity, tag as u32 * 100);
        }

        let outcome = pool.deallocate(&mut chunk, entities[0]).unwrap();
        assert_eq!(outcome.moved_from, Some(3));

        assert!(!pool.contains(entities[0]));
        assert_eq!(pool.data_index(entities[3]), Some(0));
        assert_eq!(pool.entity_at(0), Some(entities[3]));
        assert_eq!(pool.entity_at(3), None);
        assert_eq!(read_tag(&chunk, &pool, entities[3]), 300);
        assert_eq!(read_tag(&chunk, &pool, entities[1]), 100);
        assert_eq!(chunk.len(), 3);
    }

    #[test]
    fn test_pool_double_free_is_noop() {
        let (mut chunk, mut pool) = setup();
        let a = pool.allocate(&mut chunk).unwrap();
        let b = pool.allocate(&mut chunk).unwrap();

        assert!(pool.deallocate(&mut chunk, a).is_some());
        assert!(pool.deallocate(&mut chunk, a).is_none());
        assert!(pool.deallocate(&mut chunk, Entity::NULL).is_none());
        assert!(pool
            .deallocate(&mut chunk, Entity::new(ChunkId::new(9), b.slot()))
            .is_none());

        assert_eq!(pool.allocated_count(), 1);
        assert_eq!(chunk.len(), 1);
        assert!(pool.contains(b));
    }

    #[test]
    fn test_pool_slot_is_stable_while_alive() {
        let (mut chunk, mut pool) = setup();
        let a = pool.allocate(&mut chunk).unwrap();
        let b = pool.allocate(&mut chunk).unwrap();
        let c = pool.allocate(&mut chunk).unwrap();

        pool.deallocate(&mut chunk, a);
        let d = pool.allocate(&mut chunk).unwrap();

        // `a`'s pool slot is the one handed back out, one generation on.
        assert_eq!(d.slot(), a.slot());
        assert_eq!(d.generation(), a.generation() + 1);
        assert_ne!(d, a);
        assert_eq!(pool.data_index(c), Some(0));
        assert_eq!(pool.data_index(b), Some(1));
        assert_eq!(pool.data_index(d), Some(2));
    }

    #[test]
    fn test_pool_stale_handle_after_reuse() {
        let (mut chunk, mut pool) = setup();
        let a = pool.allocate(&mut chunk).unwrap();
        let b = pool.allocate(&mut chunk).unwrap();

        pool.deallocate(&mut chunk, a);
        let c = pool.allocate(&mut chunk).unwrap();
        assert_eq!(c.slot(), a.slot());

        assert!(!pool.contains(a));
        assert_eq!(pool.data_index(a), None);
        assert!(pool.deallocate(&mut chunk, a).is_none());
        assert!(pool.contains(c));
        assert!(pool.contains(b));
        assert_eq!(pool.allocated_count(), 2);
        assert_eq!(chunk.len(), 2);
    }

    #[test]
    fn test_pool_clear_invalidates_handles() {
        let (mut chunk, mut pool) = setup();
        let a = pool.allocate(&mut chunk).unwrap();
        pool.clear(&mut chunk);

        let b = pool.allocate(&mut chunk).unwrap();
        assert_eq!(b.slot(), a.slot());
        assert!(!pool.contains(a));
        assert!(pool.contains(b));
    }

    #[test]
    fn test_pool_deallocate_by_index() {
        let (mut chunk, mut pool) = setup();
        let a = pool.allocate(&mut chunk).unwrap();
        let b = pool.allocate(&mut chunk).unwrap();

        assert!(pool.deallocate_by_index(&mut chunk, 5).is_none());
        assert!(pool.deallocate_by_index(&mut chunk, 0).is_some());
        assert!(!pool.contains(a));
        assert_eq!(pool.data_index(b), Some(0));
    }

    #[test]
    fn test_pool_full_chunk() {
        let registry = TypeRegistry::new(&[(TAG, 8192)]).unwrap();
        let mut chunk = Chunk::new(ChunkId::new(0), registry.capacity(), registry.fields());
        let mut pool = EntityPool::new(&chunk);

        assert!(pool.allocate(&mut chunk).is_some());
        assert!(pool.allocate(&mut chunk).is_some());
        assert!(pool.allocate(&mut chunk).is_none());
        assert_eq!(pool.allocated_count(), 2);
    }

    #[test]
    fn test_pool_clear() {
        let (mut chunk, mut pool) = setup();
        let entities: Vec<_> = (0..10).map(|_| pool.allocate(&mut chunk).unwrap()).collect();

        assert_eq!(pool.clear(&mut chunk), 10);
        assert!(chunk.is_empty());
        assert_eq!(pool.free_count(), 4096);
        assert!(entities.iter().all(|&e| !pool.contains(e)));
        assert_eq!(pool.iter().count(), 0);
    }

    #[test]
    fn test_pool_iter_dense_order() {
        let (mut chunk, mut pool) = setup();
        let a = pool.allocate(&mut chunk).unwrap();
        let b = pool.allocate(&mut chunk).unwrap();
        let c = pool.allocate(&mut chunk).unwrap();
        pool.deallocate(&mut chunk, b);

        let live: Vec<_> = pool.iter().collect();
        assert_eq!(live, vec![a, c]);
    }
}

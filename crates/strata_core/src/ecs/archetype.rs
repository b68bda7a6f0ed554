//! # Archetypes
//!
//! One archetype per unique field set. An archetype owns every chunk that
//! stores records of its layout and routes new records to a chunk with
//! room:
//!
//! ```text
//! Archetype {Position, Velocity}   capacity = 16384 / 24 = 682
//!   chunk#0  [######################]  682/682
//!   chunk#3  [#########.............]  301/682   <- current
//! ```
//!
//! Matching is by superset: an archetype answers `is_type(fields)` for
//! any subset of its own fields.

use std::collections::HashMap;
use std::fmt;

use super::{ChunkId, Collector, FieldId, TypeRegistry};
use crate::error::ColumnError;
use crate::memory::{Chunk, EntityPool};

/// Index of an archetype in its engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ArchetypeId(u32);

impl ArchetypeId {
    /// Wraps a raw archetype index.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "archetype#{}", self.0)
    }
}

/// Chunk list for one field set.
pub struct Archetype {
    id: ArchetypeId,
    registry: TypeRegistry,
    capacity: u16,
    /// Always sorted by chunk id; new chunks get increasing ids.
    chunks: Vec<Chunk>,
    /// Chunk that receives the next record.
    current: ChunkId,
}

impl Archetype {
    /// Creates an archetype with one empty chunk, marked current.
    #[must_use]
    pub fn new(id: ArchetypeId, registry: TypeRegistry, first: ChunkId) -> Self {
        let capacity = registry.capacity();
        let chunk = Chunk::new(first, capacity, registry.fields());
        Self {
            id,
            registry,
            capacity,
            chunks: vec![chunk],
            current: first,
        }
    }

    /// Returns this archetype's id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ArchetypeId {
        self.id
    }

    /// The field layout.
    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Records per chunk.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    /// The chunk that receives the next record.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> ChunkId {
        self.current
    }

    /// Checks if every requested field is stored here.
    #[inline]
    #[must_use]
    pub fn is_type(&self, fields: &[FieldId]) -> bool {
        self.registry.contains_all(fields)
    }

    /// Checks if the field sets are equal, ignoring order.
    #[inline]
    #[must_use]
    pub fn is_exact(&self, fields: &[FieldId]) -> bool {
        self.registry.is_exactly(fields)
    }

    /// Finds a chunk with a free slot, growing the chunk list if needed.
    ///
    /// Tries the current chunk, then the first non-full chunk in id
    /// order, then appends a chunk with an id from `next_id`. Whichever
    /// chunk is returned becomes current.
    ///
    /// # Returns
    ///
    /// `None` if this archetype does not store every requested field, or
    /// if a new chunk is needed and `next_id` has no id left to give.
    pub fn find_or_grow_current_chunk(
        &mut self,
        fields: &[FieldId],
        next_id: impl FnOnce() -> Option<ChunkId>,
    ) -> Option<&mut Chunk> {
        if !self.is_type(fields) {
            return None;
        }

        let position = match self.position(self.current) {
            Some(position) if !self.chunks[position].is_full() => position,
            _ => {
                if let Some(position) = self.chunks.iter().position(|chunk| !chunk.is_full()) {
                    position
                } else {
                    let id = next_id()?;
                    self.chunks
                        .push(Chunk::new(id, self.capacity, self.registry.fields()));
                    tracing::debug!(
                        "{} grew to {} chunks ({} added)",
                        self.id,
                        self.chunks.len(),
                        id
                    );
                    self.chunks.len() - 1
                }
            }
        };

        let chunk = &mut self.chunks[position];
        self.current = chunk.id();
        Some(chunk)
    }

    /// Builds one collector per chunk, in chunk id order.
    ///
    /// # Errors
    ///
    /// Propagates [`Chunk::columns_mut`] errors.
    pub fn generate_query<'a>(
        &'a mut self,
        fields: &[FieldId],
        pools: &'a HashMap<ChunkId, EntityPool>,
    ) -> Result<Vec<Collector<'a>>, ColumnError> {
        let archetype = self.id;
        self.chunks
            .iter_mut()
            .map(|chunk| {
                let id = chunk.id();
                let len = chunk.len();
                let columns = chunk.columns_mut(fields)?;
                Ok(Collector::new(archetype, id, len, columns, pools.get(&id)))
            })
            .collect()
    }

    /// Removes empty chunks other than the current one.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum chunks to remove, `None` for no limit
    ///
    /// # Returns
    ///
    /// Ids of the removed chunks.
    pub fn prune_empty_chunks(&mut self, limit: Option<usize>) -> Vec<ChunkId> {
        let limit = limit.unwrap_or(usize::MAX);
        let current = self.current;
        let mut removed = Vec::new();

        self.chunks.retain(|chunk| {
            let prune = removed.len() < limit && chunk.is_empty() && chunk.id() != current;
            if prune {
                removed.push(chunk.id());
            }
            !prune
        });

        if !removed.is_empty() {
            tracing::debug!(
                "{} pruned {} empty chunks, {} left",
                self.id,
                removed.len(),
                self.chunks.len()
            );
        }
        removed
    }

    /// Looks up a chunk by id.
    #[must_use]
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.position(id).map(|position| &self.chunks[position])
    }

    /// Mutable variant of [`chunk`](Self::chunk).
    pub fn chunk_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.position(id).map(|position| &mut self.chunks[position])
    }

    /// All chunks in id order.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Live records across every chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|chunk| usize::from(chunk.len())).sum()
    }

    /// Checks if no chunk holds a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(Chunk::is_empty)
    }

    fn position(&self, id: ChunkId) -> Option<usize> {
        self.chunks.binary_search_by_key(&id, Chunk::id).ok()
    }
}

impl fmt::Debug for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archetype")
            .field("id", &self.id)
            .field("fields", &self.registry.fields().len())
            .field("capacity", &self.capacity)
            .field("chunks", &self.chunks.len())
            .field("current", &self.current)
            .finish()
    }
}

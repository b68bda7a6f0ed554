//! # Entity Handles
//!
//! An entity is identified by the chunk it lives in and its pool slot:
//! - Upper 32 bits: owning chunk id
//! - Bits 16..32: generation of the pool slot
//! - Lower 16 bits: pool slot inside that chunk's entity pool
//!
//! The pool slot is assigned once and never changes while the entity is
//! alive. The generation is bumped every time the slot is freed, so a
//! handle kept past its entity's death never resolves to the slot's next
//! occupant. The dense data index does change under swap-compaction, so it is
//! not part of the handle; ask the engine for an [`EntityLocation`].

use std::fmt;

use super::archetype::ArchetypeId;

/// Identifier of one chunk, unique for the engine's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkId(u32);

impl ChunkId {
    /// Wraps a raw chunk id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk#{}", self.0)
    }
}

/// Handle to one live record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Null/invalid entity handle.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a first-generation handle from its chunk and pool slot.
    #[inline]
    #[must_use]
    pub const fn new(chunk: ChunkId, slot: u16) -> Self {
        Self::with_generation(chunk, slot, 0)
    }

    /// Creates a handle with an explicit slot generation.
    #[inline]
    #[must_use]
    pub const fn with_generation(chunk: ChunkId, slot: u16, generation: u16) -> Self {
        Self(((chunk.0 as u64) << 32) | ((generation as u64) << 16) | slot as u64)
    }

    /// Returns the chunk this entity was allocated in.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkId {
        ChunkId((self.0 >> 32) as u32)
    }

    /// Returns the stable pool slot.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> u16 {
        self.0 as u16
    }

    /// Returns the slot generation this handle was issued for.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Checks if this handle is null.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }

    /// Serializes to a 64-bit integer.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Deserializes from a 64-bit integer.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("entity(null)")
        } else {
            write!(
                f,
                "entity({}:{}v{})",
                self.chunk().0,
                self.slot(),
                self.generation()
            )
        }
    }
}

/// Where an entity's data currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityLocation {
    /// Owning archetype.
    pub archetype: ArchetypeId,
    /// Owning chunk.
    pub chunk: ChunkId,
    /// Current dense index inside the chunk's columns.
    pub index: u16,
}

//! # Strata Core
//!
//! Archetype-based entity storage designed for:
//! - Homogeneous records packed into fixed 16 KiB column chunks
//! - Stable entity handles that survive swap-compaction
//! - Batch processing over live, typed column views
//!
//! ## Architecture Rules
//!
//! 1. **Fixed chunks** - A chunk's buffer is allocated once and never moves
//! 2. **Structure of arrays** - Each field is a contiguous column inside the chunk
//! 3. **Dense packing** - Live records always occupy slots `0..len`
//! 4. **Checked views** - Columns are reinterpreted through `bytemuck`, never raw casts
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::{Component, Engine};
//!
//! let mut engine = Engine::new();
//! engine.register_archetype(&[Position::field(), Velocity::field()])?;
//! let entity = engine.create_entity(&[Position::ID, Velocity::ID])?;
//! engine.set(entity, Position::new(1.0, 2.0, 3.0))?;
//!
//! for mut collector in engine.run_query(&[Position::ID, Velocity::ID])? {
//!     let (positions, velocities) = collector.view::<(Position, Velocity)>()?;
//!     for (p, v) in positions.iter_mut().zip(velocities.iter()) {
//!         p.x += v.x;
//!     }
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;

pub use config::{EngineConfig, RegistrationPolicy};
pub use ecs::{
    Archetype, ArchetypeId, ChunkId, Collector, ColumnMut, ColumnSet, Component, Engine,
    Entity, EntityLocation, FieldDescriptor, FieldId, System, TypeRegistry,
};
pub use error::{ColumnError, ConfigError, EngineError};
pub use memory::{Chunk, EntityPool, FreeOutcome, CHUNK_BYTES, MAX_FIELD_ALIGN};

//! # Entity Component System
//!
//! Archetype storage over fixed column chunks.
//!
//! ## Design Philosophy
//!
//! - Records with the same field set share an archetype
//! - An archetype's records are packed into 16 KiB chunks, one column per field
//! - Entity handles are a chunk id plus a stable pool slot
//! - Queries hand out borrowed column views, never copies

mod archetype;
mod component;
mod engine;
mod entity;
mod query;
mod registry;
mod system;

pub use archetype::{Archetype, ArchetypeId};
pub use component::{Component, FieldId};
pub use engine::Engine;
pub use entity::{ChunkId, Entity, EntityLocation};
pub use query::{Collector, ColumnMut, ColumnSet};
pub use registry::{FieldDescriptor, TypeRegistry};
pub use system::System;

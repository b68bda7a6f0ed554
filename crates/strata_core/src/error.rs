//! # Error Types
//!
//! All errors that can surface from registration, entity creation and
//! column queries.
//!
//! Capacity exhaustion never appears here: a full chunk is handled by
//! growing the archetype. Freeing an unknown or already freed record is a
//! no-op reported as `false`/`None`, not an error.

use thiserror::Error;

use crate::ecs::FieldId;

/// Errors produced by the [`Engine`](crate::Engine) facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A registration or creation request named no fields.
    #[error("field set is empty")]
    EmptyFieldSet,

    /// No registered archetype carries every requested field.
    #[error("no archetype matches field set {fields:?}")]
    NoMatchingArchetype {
        /// The requested field set.
        fields: Vec<FieldId>,
    },

    /// The same field id appears twice in one registration.
    #[error("duplicate field {0} in archetype registration")]
    DuplicateField(FieldId),

    /// A field declared with a size of zero bytes.
    #[error("field {0} has zero size")]
    ZeroSizedField(FieldId),

    /// The record does not fit in a single chunk.
    #[error("record size {total_size} exceeds chunk size {limit}")]
    RecordTooLarge {
        /// Sum of all field sizes.
        total_size: u32,
        /// Chunk byte capacity.
        limit: usize,
    },

    /// A chunk selected for allocation had no free pool slot left.
    #[error("entity pool for {chunk} is exhausted")]
    PoolExhausted {
        /// The chunk whose pool refused the allocation.
        chunk: crate::ecs::ChunkId,
    },

    /// Every chunk id has been handed out.
    #[error("chunk ids exhausted")]
    ChunkIdsExhausted,

    /// Building a column view failed.
    #[error(transparent)]
    Column(#[from] ColumnError),
}

/// Errors produced when building or reinterpreting column views.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnError {
    /// The chunk has no column for this field.
    #[error("unknown field {0}")]
    UnknownField(FieldId),

    /// The same column was requested twice for mutable access.
    #[error("field {0} requested more than once")]
    DuplicateField(FieldId),

    /// The element type does not have the column's recorded size.
    #[error("requested type for field {field} is {expected} bytes, column stores {actual}-byte elements")]
    SizeMismatch {
        /// Field whose column was accessed.
        field: FieldId,
        /// Size of the requested element type.
        expected: usize,
        /// Element size recorded at registration.
        actual: usize,
    },

    /// The component type's id differs from the column's field id.
    #[error("column holds field {actual}, requested component is {expected}")]
    FieldMismatch {
        /// Id of the requested component type.
        expected: FieldId,
        /// Id of the column actually delivered.
        actual: FieldId,
    },

    /// The column start is not aligned for the requested element type.
    #[error("column for field {field} is not aligned to {align} bytes")]
    Misaligned {
        /// Field whose column was accessed.
        field: FieldId,
        /// Alignment required by the requested element type.
        align: usize,
    },

    /// A typed view asked for a different number of columns than delivered.
    #[error("expected {expected} columns, collector holds {actual}")]
    ArityMismatch {
        /// Number of element types in the view.
        expected: usize,
        /// Number of columns in the collector.
        actual: usize,
    },
}

/// Errors produced while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

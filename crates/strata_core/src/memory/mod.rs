//! # Memory Management
//!
//! Fixed-size chunk blocks and the per-chunk entity pools that hand out
//! stable handles into them.
//!
//! ## Design Philosophy
//!
//! A chunk's 16 KiB buffer is allocated once when the chunk is created:
//! - No reallocation while records live in it
//! - Allocation is a bump of the live count
//! - Removal is a per-column swap with the last live record

mod chunk;
mod pool;

pub use chunk::{Chunk, FreeOutcome, CHUNK_BYTES, MAX_FIELD_ALIGN};
pub use pool::EntityPool;

//! # Chunk
//!
//! A fixed 16 KiB block holding up to `capacity` records of one archetype
//! in column-major order:
//!
//! ```text
//! | A0 A1 A2 ... A(cap-1) | B0 B1 B2 ... B(cap-1) | C0 ... | (slack) |
//!   ^ offset(A) * cap       ^ offset(B) * cap
//! ```
//!
//! Live records always occupy slots `0..len`. Freeing slot `k` moves the
//! last live record into `k`, one column at a time, because a record's
//! fields are not contiguous.

use crate::ecs::{ChunkId, ColumnMut, FieldDescriptor, FieldId};
use crate::error::ColumnError;

/// Byte capacity of every chunk.
pub const CHUNK_BYTES: usize = 16_384;

/// Largest element alignment a typed column view can satisfy.
///
/// The buffer itself is 8-byte aligned; a column also needs its start
/// offset to be a multiple of the element alignment.
pub const MAX_FIELD_ALIGN: usize = std::mem::align_of::<u64>();

const WORDS: usize = CHUNK_BYTES / MAX_FIELD_ALIGN;

#[derive(Clone, Copy, Debug)]
struct ColumnInfo {
    size: u16,
    base: usize,
}

/// Result of freeing one slot.
///
/// When `moved_from` is set, the record previously stored at that index
/// now lives at `freed`, and any external index pointing at `moved_from`
/// must be rewritten to `freed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeOutcome {
    /// The slot that was released.
    pub freed: u16,
    /// The old index of the record that was moved into `freed`, if any.
    pub moved_from: Option<u16>,
}

/// A fixed-size column block for one archetype.
pub struct Chunk {
    id: ChunkId,
    capacity: u16,
    len: u16,
    /// Column table in registration order.
    columns: Vec<(FieldId, ColumnInfo)>,
    body: Box<[u64]>,
}

impl Chunk {
    /// Creates an empty, zeroed chunk.
    ///
    /// # Arguments
    ///
    /// * `id` - Engine-wide chunk id
    /// * `capacity` - Records per chunk, `CHUNK_BYTES / total_size`
    /// * `fields` - The archetype's field layout
    #[must_use]
    pub fn new(id: ChunkId, capacity: u16, fields: &[FieldDescriptor]) -> Self {
        let columns = fields
            .iter()
            .map(|field| {
                let info = ColumnInfo {
                    size: field.size,
                    base: usize::from(field.offset) * usize::from(capacity),
                };
                (field.id, info)
            })
            .collect();

        debug_assert!(
            fields
                .iter()
                .map(|f| usize::from(f.size) * usize::from(capacity))
                .sum::<usize>()
                <= CHUNK_BYTES,
            "layout does not fit in a chunk"
        );

        Self {
            id,
            capacity,
            len: 0,
            columns,
            body: vec![0u64; WORDS].into_boxed_slice(),
        }
    }

    /// Returns this chunk's id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ChunkId {
        self.id
    }

    /// Returns the maximum number of records.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Returns the number of live records.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u16 {
        self.len
    }

    /// Checks if no record is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Checks if every slot is live.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Claims the next slot.
    ///
    /// Bump allocation: the returned index is always the previous `len`.
    /// Holes are never reused because [`free`](Self::free) keeps the live
    /// range dense.
    ///
    /// # Returns
    ///
    /// The new slot index, or `None` if the chunk is full.
    pub fn allocate(&mut self) -> Option<u16> {
        if self.is_full() {
            return None;
        }
        let index = self.len;
        self.len += 1;
        Some(index)
    }

    /// Releases a slot, compacting the live range.
    ///
    /// Every column's bytes for the last live record are copied into
    /// `index`. The chunk does not know about entity handles; the caller
    /// must apply the returned [`FreeOutcome`] to its own indices.
    ///
    /// # Returns
    ///
    /// `None` if `index` is not a live slot.
    pub fn free(&mut self, index: u16) -> Option<FreeOutcome> {
        if index >= self.len {
            return None;
        }

        self.len -= 1;
        let last = self.len;
        if index == last {
            return Some(FreeOutcome {
                freed: index,
                moved_from: None,
            });
        }

        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.body[..]);
        for (_, column) in &self.columns {
            let size = usize::from(column.size);
            let src = column.base + size * usize::from(last);
            let dst = column.base + size * usize::from(index);
            bytes.copy_within(src..src + size, dst);
        }

        Some(FreeOutcome {
            freed: index,
            moved_from: Some(last),
        })
    }

    /// Drops every record at once.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Checks if the chunk stores a field.
    #[inline]
    #[must_use]
    pub fn has(&self, id: FieldId) -> bool {
        self.info(id).is_some()
    }

    /// Element size of a field's column.
    #[must_use]
    pub fn field_size(&self, id: FieldId) -> Option<u16> {
        self.info(id).map(|info| info.size)
    }

    /// Byte offset of a field's column from the start of the buffer.
    #[must_use]
    pub fn base_offset(&self, id: FieldId) -> Option<usize> {
        self.info(id).map(|info| info.base)
    }

    /// The live part of one column: `len * size` bytes.
    #[must_use]
    pub fn column(&self, id: FieldId) -> Option<&[u8]> {
        let info = self.info(id)?;
        let end = info.base + usize::from(info.size) * usize::from(self.len);
        Some(&self.bytes()[info.base..end])
    }

    /// Mutable variant of [`column`](Self::column).
    pub fn column_mut(&mut self, id: FieldId) -> Option<&mut [u8]> {
        let info = self.info(id)?;
        let end = info.base + usize::from(info.size) * usize::from(self.len);
        Some(&mut self.bytes_mut()[info.base..end])
    }

    /// One field of one live record.
    #[must_use]
    pub fn slot_bytes(&self, index: u16, id: FieldId) -> Option<&[u8]> {
        let range = self.slot_range(index, id)?;
        Some(&self.bytes()[range])
    }

    /// Mutable variant of [`slot_bytes`](Self::slot_bytes).
    pub fn slot_bytes_mut(&mut self, index: u16, id: FieldId) -> Option<&mut [u8]> {
        let range = self.slot_range(index, id)?;
        Some(&mut self.bytes_mut()[range])
    }

    /// Several fields of one live record, in request order.
    ///
    /// Returns `None` if the slot is not live or any field is unknown.
    #[must_use]
    pub fn slot(&self, index: u16, ids: &[FieldId]) -> Option<Vec<&[u8]>> {
        ids.iter().map(|&id| self.slot_bytes(index, id)).collect()
    }

    /// Splits the buffer into one mutable view per requested column.
    ///
    /// Views come back in request order and cover the live range only.
    ///
    /// # Errors
    ///
    /// [`ColumnError::UnknownField`] for a field this chunk does not store,
    /// [`ColumnError::DuplicateField`] if a field is requested twice.
    pub fn columns_mut(&mut self, ids: &[FieldId]) -> Result<Vec<ColumnMut<'_>>, ColumnError> {
        let len = usize::from(self.len);

        let mut spans = Vec::with_capacity(ids.len());
        for (position, &id) in ids.iter().enumerate() {
            let info = self.info(id).ok_or(ColumnError::UnknownField(id))?;
            if ids[..position].contains(&id) {
                return Err(ColumnError::DuplicateField(id));
            }
            spans.push((position, id, info));
        }
        spans.sort_unstable_by_key(|&(_, _, info)| info.base);

        let mut views: Vec<Option<ColumnMut<'_>>> = ids.iter().map(|_| None).collect();
        let mut rest: &mut [u8] = bytemuck::cast_slice_mut(&mut self.body[..]);
        let mut cursor = 0;
        for (position, id, info) in spans {
            let width = usize::from(info.size) * len;
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(info.base - cursor);
            let (bytes, tail) = tail.split_at_mut(width);
            rest = tail;
            cursor = info.base + width;
            views[position] = Some(ColumnMut::new(id, info.size, bytes));
        }

        Ok(views.into_iter().flatten().collect())
    }

    /// Field ids in registration order.
    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.columns.iter().map(|&(id, _)| id)
    }

    fn info(&self, id: FieldId) -> Option<ColumnInfo> {
        self.columns
            .iter()
            .find(|(field, _)| *field == id)
            .map(|&(_, info)| info)
    }

    fn slot_range(&self, index: u16, id: FieldId) -> Option<std::ops::Range<usize>> {
        if index >= self.len {
            return None;
        }
        let info = self.info(id)?;
        let size = usize::from(info.size);
        let start = info.base + size * usize::from(index);
        Some(start..start + size)
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.body[..])
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.body[..])
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("fields", &self.columns.len())
            .finish()
    }
}

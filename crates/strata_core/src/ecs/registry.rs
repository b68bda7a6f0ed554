//! # Type Registry
//!
//! The per-archetype field layout. Fields keep their registration order;
//! each offset is the cumulative size of every field before it. A chunk
//! scales the offset by its capacity to find where the column starts.

use crate::error::EngineError;
use crate::memory::CHUNK_BYTES;

use super::component::FieldId;

/// One field of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Field type id.
    pub id: FieldId,
    /// Size of one element in bytes.
    pub size: u16,
    /// Cumulative size of all fields registered before this one.
    pub offset: u16,
}

/// Immutable field layout of one archetype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRegistry {
    fields: Vec<FieldDescriptor>,
    total_size: u32,
}

impl TypeRegistry {
    /// Builds a layout from ordered `(id, size)` pairs.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmptyFieldSet`] if `pairs` is empty
    /// - [`EngineError::ZeroSizedField`] for a field of size zero
    /// - [`EngineError::DuplicateField`] if an id appears twice
    /// - [`EngineError::RecordTooLarge`] if one record exceeds a chunk
    pub fn new(pairs: &[(FieldId, u16)]) -> Result<Self, EngineError> {
        if pairs.is_empty() {
            return Err(EngineError::EmptyFieldSet);
        }

        for (position, &(id, size)) in pairs.iter().enumerate() {
            if size == 0 {
                return Err(EngineError::ZeroSizedField(id));
            }
            if pairs[..position].iter().any(|&(other, _)| other == id) {
                return Err(EngineError::DuplicateField(id));
            }
        }

        let total_size = pairs
            .iter()
            .fold(0u32, |sum, &(_, size)| sum.saturating_add(u32::from(size)));
        if total_size as usize > CHUNK_BYTES {
            return Err(EngineError::RecordTooLarge {
                total_size,
                limit: CHUNK_BYTES,
            });
        }

        // total_size <= CHUNK_BYTES, so every running offset fits in u16.
        let mut offset = 0u16;
        let fields = pairs
            .iter()
            .map(|&(id, size)| {
                let field = FieldDescriptor { id, size, offset };
                offset += size;
                field
            })
            .collect();

        Ok(Self { fields, total_size })
    }

    /// Checks if the layout contains a field.
    #[inline]
    #[must_use]
    pub fn has(&self, id: FieldId) -> bool {
        self.fields.iter().any(|field| field.id == id)
    }

    /// Checks if every requested id is present (superset test).
    #[must_use]
    pub fn contains_all(&self, ids: &[FieldId]) -> bool {
        ids.iter().all(|&id| self.has(id))
    }

    /// Checks if the requested ids name exactly this layout's fields.
    #[must_use]
    pub fn is_exactly(&self, ids: &[FieldId]) -> bool {
        self.contains_all(ids) && self.fields.iter().all(|field| ids.contains(&field.id))
    }

    /// Looks up one field.
    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Fields in registration order.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Bytes per record.
    #[inline]
    #[must_use]
    pub const fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Records per chunk: `CHUNK_BYTES / total_size`, at least 1.
    #[must_use]
    pub fn capacity(&self) -> u16 {
        let capacity = CHUNK_BYTES / self.total_size as usize;
        u16::try_from(capacity).unwrap_or(u16::MAX)
    }

    /// Byte offset of a field's column inside a chunk: `offset * capacity`.
    #[must_use]
    pub fn column_base(&self, id: FieldId) -> Option<usize> {
        let field = self.field(id)?;
        Some(usize::from(field.offset) * usize::from(self.capacity()))
    }

    /// Fields whose column does not start on an `align`-byte boundary.
    ///
    /// Typed views of these columns fail for any element type that needs
    /// `align` bytes; raw byte access still works.
    pub fn unaligned_columns(&self, align: usize) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        let capacity = usize::from(self.capacity());
        self.fields
            .iter()
            .filter(move |field| (usize::from(field.offset) * capacity) % align != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: FieldId = FieldId::new(1);
    const B: FieldId = FieldId::new(2);
    const C: FieldId = FieldId::new(3);
    const D: FieldId = FieldId::new(4);

    #[test]
    fn test_offsets_are_cumulative() {
        let registry = TypeRegistry::new(&[(A, 12), (B, 16), (C, 4)]).unwrap();
        let offsets: Vec<u16> = registry.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 12, 28]);
        assert_eq!(registry.total_size(), 32);
        assert_eq!(registry.capacity(), 512);
    }

    #[test]
    fn test_registration_order_is_kept() {
        let registry = TypeRegistry::new(&[(C, 4), (A, 8)]).unwrap();
        assert_eq!(registry.fields()[0].id, C);
        assert_eq!(registry.fields()[1].id, A);
        assert_eq!(registry.field(A).unwrap().offset, 4);
    }

    #[test]
    fn test_rejects_malformed_layouts() {
        assert_eq!(TypeRegistry::new(&[]), Err(EngineError::EmptyFieldSet));
        assert_eq!(
            TypeRegistry::new(&[(A, 4), (A, 8)]),
            Err(EngineError::DuplicateField(A))
        );
        assert_eq!(
            TypeRegistry::new(&[(A, 4), (B, 0)]),
            Err(EngineError::ZeroSizedField(B))
        );
        assert_eq!(
            TypeRegistry::new(&[(A, 16_000), (B, 385)]),
            Err(EngineError::RecordTooLarge {
                total_size: 16_385,
                limit: CHUNK_BYTES,
            })
        );
    }

    #[test]
    fn test_unaligned_columns() {
        // 1365 records of 12 bytes: the 8-byte column starts at 5460.
        let registry = TypeRegistry::new(&[(A, 4), (B, 8)]).unwrap();
        assert_eq!(registry.capacity(), 1365);
        assert_eq!(registry.column_base(B), Some(5460));
        let unaligned: Vec<FieldId> = registry.unaligned_columns(8).map(|f| f.id).collect();
        assert_eq!(unaligned, vec![B]);

        let reordered = TypeRegistry::new(&[(B, 8), (A, 4)]).unwrap();
        assert_eq!(reordered.unaligned_columns(8).count(), 0);
        assert_eq!(reordered.column_base(D), None);
    }

    #[test]
    fn test_full_chunk_record_fits_once() {
        let registry = TypeRegistry::new(&[(A, 16_000), (B, 384)]).unwrap();
        assert_eq!(registry.capacity(), 1);
    }

    #[test]
    fn test_superset_matching() {
        let registry = TypeRegistry::new(&[(A, 4), (B, 4), (C, 4)]).unwrap();
        assert!(registry.contains_all(&[A]));
        assert!(registry.contains_all(&[A, C]));
        assert!(registry.contains_all(&[A, B, C]));
        assert!(!registry.contains_all(&[A, D]));
    }

    #[test]
    fn test_exact_matching() {
        let registry = TypeRegistry::new(&[(A, 4), (B, 4)]).unwrap();
        assert!(registry.is_exactly(&[B, A]));
        assert!(!registry.is_exactly(&[A]));
        assert!(!registry.is_exactly(&[A, A]));
    }

    #[test]
    fn test_columns_never_overlap() {
        let layouts: [&[(FieldId, u16)]; 4] = [
            &[(A, 12), (B, 12)],
            &[(A, 1), (B, 3), (C, 64), (D, 7)],
            &[(A, 100), (B, 2)],
            &[(A, 8_000), (B, 8_000), (C, 384)],
        ];
        for pairs in layouts {
            let registry = TypeRegistry::new(pairs).unwrap();
            let capacity = usize::from(registry.capacity());
            assert!(capacity >= 1);
            assert!(capacity * registry.total_size() as usize <= CHUNK_BYTES);

            let ranges: Vec<(usize, usize)> = registry
                .fields()
                .iter()
                .map(|f| {
                    let base = usize::from(f.offset) * capacity;
                    (base, base + usize::from(f.size) * capacity)
                })
                .collect();
            for (i, a) in ranges.iter().enumerate() {
                assert!(a.1 <= CHUNK_BYTES);
                for b in &ranges[i + 1..] {
                    assert!(a.1 <= b.0 || b.1 <= a.0, "{a:?} overlaps {b:?}");
                }
            }
        }
    }
}

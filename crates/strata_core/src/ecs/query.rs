//! # Query Results
//!
//! A query returns one [`Collector`] per backing chunk. Each collector
//! holds a mutable byte view of every requested column, in request order,
//! covering exactly the chunk's live records.
//!
//! Typed access is checked: a column is cast to `&mut [C]` only if its
//! field id is `C::ID`, its element size is `size_of::<C>()` and its start
//! is aligned for `C`.

use bytemuck::{Pod, PodCastError};

use super::{ArchetypeId, ChunkId, Component, Entity, FieldId};
use crate::error::ColumnError;
use crate::memory::EntityPool;

/// Mutable view of one column's live range.
pub struct ColumnMut<'a> {
    field: FieldId,
    size: u16,
    bytes: &'a mut [u8],
}

impl<'a> ColumnMut<'a> {
    pub(crate) fn new(field: FieldId, size: u16, bytes: &'a mut [u8]) -> Self {
        Self { field, size, bytes }
    }

    /// The field stored in this column.
    #[inline]
    #[must_use]
    pub const fn field(&self) -> FieldId {
        self.field
    }

    /// Element size in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() / usize::from(self.size.max(1))
    }

    /// Checks if the column holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw column bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &*self.bytes
    }

    /// Raw mutable column bytes.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    /// Bytes of element `index`.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&[u8]> {
        let size = usize::from(self.size);
        self.bytes.get(index * size..(index + 1) * size)
    }

    /// Reinterprets the column as `&[T]`, checking only the element size.
    ///
    /// # Errors
    ///
    /// [`ColumnError::SizeMismatch`] or [`ColumnError::Misaligned`].
    pub fn as_slice<T: Pod>(&self) -> Result<&[T], ColumnError> {
        self.check_size::<T>()?;
        bytemuck::try_cast_slice(&*self.bytes).map_err(|e| self.cast_error::<T>(e))
    }

    /// Mutable variant of [`as_slice`](Self::as_slice).
    ///
    /// # Errors
    ///
    /// [`ColumnError::SizeMismatch`] or [`ColumnError::Misaligned`].
    pub fn as_slice_mut<T: Pod>(&mut self) -> Result<&mut [T], ColumnError> {
        self.check_size::<T>()?;
        let (field, size) = (self.field, self.size);
        bytemuck::try_cast_slice_mut(&mut *self.bytes).map_err(|e| cast_error::<T>(field, size, e))
    }

    /// Typed component view.
    ///
    /// # Errors
    ///
    /// [`ColumnError::FieldMismatch`] if this column is not `C`'s, plus the
    /// errors of [`as_slice`](Self::as_slice).
    pub fn component<C: Component>(&self) -> Result<&[C], ColumnError> {
        self.check_field::<C>()?;
        self.as_slice()
    }

    /// Mutable typed component view.
    ///
    /// # Errors
    ///
    /// Same as [`component`](Self::component).
    pub fn component_mut<C: Component>(&mut self) -> Result<&mut [C], ColumnError> {
        self.check_field::<C>()?;
        self.as_slice_mut()
    }

    /// Consumes the view into a typed slice with the view's full lifetime.
    ///
    /// # Errors
    ///
    /// Same as [`component`](Self::component).
    pub fn into_slice_mut<C: Component>(self) -> Result<&'a mut [C], ColumnError> {
        self.check_field::<C>()?;
        self.check_size::<C>()?;
        let (field, size) = (self.field, self.size);
        bytemuck::try_cast_slice_mut(self.bytes).map_err(|e| cast_error::<C>(field, size, e))
    }

    fn check_field<C: Component>(&self) -> Result<(), ColumnError> {
        if self.field == C::ID {
            Ok(())
        } else {
            Err(ColumnError::FieldMismatch {
                expected: C::ID,
                actual: self.field,
            })
        }
    }

    fn check_size<T>(&self) -> Result<(), ColumnError> {
        let expected = std::mem::size_of::<T>();
        if usize::from(self.size) == expected {
            Ok(())
        } else {
            Err(ColumnError::SizeMismatch {
                field: self.field,
                expected,
                actual: usize::from(self.size),
            })
        }
    }

    fn cast_error<T>(&self, error: PodCastError) -> ColumnError {
        cast_error::<T>(self.field, self.size, error)
    }
}

impl std::fmt::Debug for ColumnMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnMut")
            .field("field", &self.field)
            .field("size", &self.size)
            .field("len", &self.len())
            .finish()
    }
}

fn cast_error<T>(field: FieldId, size: u16, error: PodCastError) -> ColumnError {
    match error {
        PodCastError::TargetAlignmentGreaterAndInputNotAligned
        | PodCastError::AlignmentMismatch => ColumnError::Misaligned {
            field,
            align: std::mem::align_of::<T>(),
        },
        _ => ColumnError::SizeMismatch {
            field,
            expected: std::mem::size_of::<T>(),
            actual: usize::from(size),
        },
    }
}

/// Reads one field of one record as `C`.
pub(crate) fn read<C: Component>(field: FieldId, bytes: &[u8]) -> Result<&C, ColumnError> {
    let size = u16::try_from(bytes.len()).unwrap_or(u16::MAX);
    if field != C::ID {
        return Err(ColumnError::FieldMismatch {
            expected: C::ID,
            actual: field,
        });
    }
    bytemuck::try_from_bytes(bytes).map_err(|e| cast_error::<C>(field, size, e))
}

/// Mutable variant of [`read`].
pub(crate) fn write<C: Component>(field: FieldId, bytes: &mut [u8]) -> Result<&mut C, ColumnError> {
    let size = u16::try_from(bytes.len()).unwrap_or(u16::MAX);
    if field != C::ID {
        return Err(ColumnError::FieldMismatch {
            expected: C::ID,
            actual: field,
        });
    }
    bytemuck::try_from_bytes_mut(bytes).map_err(|e| cast_error::<C>(field, size, e))
}

/// Query result for one chunk.
///
/// Column views come back in the order the fields were requested and all
/// have exactly [`len`](Self::len) elements. A collector borrows the
/// engine, so entities cannot be created or destroyed while one is alive;
/// collect handles with [`entity`](Self::entity) and destroy them after
/// the pass.
pub struct Collector<'a> {
    archetype: ArchetypeId,
    chunk: ChunkId,
    len: u16,
    columns: Vec<ColumnMut<'a>>,
    pool: Option<&'a EntityPool>,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(
        archetype: ArchetypeId,
        chunk: ChunkId,
        len: u16,
        columns: Vec<ColumnMut<'a>>,
        pool: Option<&'a EntityPool>,
    ) -> Self {
        Self {
            archetype,
            chunk,
            len,
            columns,
            pool,
        }
    }

    /// Archetype the chunk belongs to.
    #[inline]
    #[must_use]
    pub const fn archetype(&self) -> ArchetypeId {
        self.archetype
    }

    /// The chunk these columns live in.
    #[inline]
    #[must_use]
    pub const fn chunk(&self) -> ChunkId {
        self.chunk
    }

    /// Live record count.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Checks if the chunk has no live records.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All column views in request order.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[ColumnMut<'a>] {
        &self.columns
    }

    /// Mutable column views in request order.
    #[inline]
    pub fn columns_mut(&mut self) -> &mut [ColumnMut<'a>] {
        &mut self.columns
    }

    /// Column at request position `index`.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&ColumnMut<'a>> {
        self.columns.get(index)
    }

    /// Mutable column at request position `index`.
    pub fn column_mut(&mut self, index: usize) -> Option<&mut ColumnMut<'a>> {
        self.columns.get_mut(index)
    }

    /// Entity stored at dense index `index`.
    #[must_use]
    pub fn entity(&self, index: usize) -> Option<Entity> {
        let index = u16::try_from(index).ok()?;
        if index >= self.len {
            return None;
        }
        self.pool?.entity_at(index)
    }

    /// Live entities in dense order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.len()).filter_map(|index| self.entity(index))
    }

    /// Typed, checked view of every requested column at once.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let (positions, velocities) = collector.view::<(Position, Velocity)>()?;
    /// for (p, v) in positions.iter_mut().zip(velocities.iter()) {
    ///     p.x += v.x * delta;
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// [`ColumnError::ArityMismatch`] if the set's size differs from the
    /// number of requested fields, plus any per-column cast error.
    pub fn view<S: ColumnSet>(&mut self) -> Result<S::Slices<'_>, ColumnError> {
        S::fetch(&mut self.columns)
    }
}

impl std::fmt::Debug for Collector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("archetype", &self.archetype)
            .field("chunk", &self.chunk)
            .field("len", &self.len)
            .field("columns", &self.columns)
            .finish()
    }
}

/// A tuple of components that can be borrowed from a collector together.
///
/// Implemented for tuples of one to six [`Component`] types.
pub trait ColumnSet {
    /// The borrowed slices, one per component.
    type Slices<'c>;

    /// Number of components in the set.
    const ARITY: usize;

    /// Field ids in tuple order, suitable as a query field list.
    const FIELDS: &'static [FieldId];

    /// Casts a collector's columns, in order, to the set's slices.
    ///
    /// # Errors
    ///
    /// See [`Collector::view`].
    fn fetch<'c>(columns: &'c mut [ColumnMut<'_>]) -> Result<Self::Slices<'c>, ColumnError>;
}

macro_rules! impl_column_set {
    ($arity:literal; $($name:ident),+) => {
        impl<$($name: Component),+> ColumnSet for ($($name,)+) {
            type Slices<'c> = ($(&'c mut [$name],)+);

            const ARITY: usize = $arity;

            const FIELDS: &'static [FieldId] = &[$($name::ID),+];

            fn fetch<'c>(
                columns: &'c mut [ColumnMut<'_>],
            ) -> Result<Self::Slices<'c>, ColumnError> {
                if columns.len() != Self::ARITY {
                    return Err(ColumnError::ArityMismatch {
                        expected: Self::ARITY,
                        actual: columns.len(),
                    });
                }
                let mut columns = columns.iter_mut();
                Ok(($(
                    match columns.next() {
                        Some(column) => column.component_mut::<$name>()?,
                        None => {
                            return Err(ColumnError::ArityMismatch {
                                expected: Self::ARITY,
                                actual: 0,
                            })
                        }
                    },
                )+))
            }
        }
    };
}

impl_column_set!(1; A);
impl_column_set!(2; A, B);
impl_column_set!(3; A, B, C);
impl_column_set!(4; A, B, C, D);
impl_column_set!(5; A, B, C, D, E);
impl_column_set!(6; A, B, C, D, E, F);

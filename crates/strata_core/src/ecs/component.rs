//! # Field Types
//!
//! Fields are pure data containers identified by a stable 64-bit id. The
//! storage core only ever sees `(id, size)` pairs; typed access goes
//! through the [`Component`] marker trait.

use std::fmt;

use bytemuck::{Pod, Zeroable};

/// Stable identifier of a field type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FieldId(u64);

impl FieldId {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives an id from a type name with 64-bit FNV-1a.
    ///
    /// Usable in constant context, so component impls can write
    /// `const ID: FieldId = FieldId::from_name("Position");`.
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns the id of a component type.
    #[inline]
    #[must_use]
    pub const fn of<C: Component>() -> Self {
        C::ID
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{:016x}", self.0)
    }
}

/// Marker trait for typed fields.
///
/// Components must be:
/// - `Pod`: plain old data, safe to view as bytes and back
/// - `Zeroable`: a zeroed slot is a valid value
/// - `Copy`: relocation is a bitwise copy
///
/// A column starts at `offset * capacity` bytes into its chunk, where
/// `offset` is the summed size of the fields registered before it. Typed
/// access to a column fails with
/// [`ColumnError::Misaligned`](crate::ColumnError::Misaligned) if that
/// start is not a multiple of the component's alignment, so register
/// fields in descending alignment order (8-byte types first).
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Pod, Zeroable)]
/// #[repr(C)]
/// struct Position {
///     x: f32,
///     y: f32,
///     z: f32,
/// }
///
/// impl Component for Position {
///     const ID: FieldId = FieldId::from_name("Position");
/// }
/// ```
pub trait Component: Copy + Pod + Zeroable + Send + Sync + 'static {
    /// Unique identifier for this field type.
    const ID: FieldId;

    /// The `(id, size)` pair used to register this field.
    ///
    /// Types larger than `u16::MAX` bytes report `u16::MAX`, which no
    /// registration accepts.
    #[inline]
    #[must_use]
    fn field() -> (FieldId, u16) {
        let size = u16::try_from(std::mem::size_of::<Self>()).unwrap_or(u16::MAX);
        (Self::ID, size)
    }
}

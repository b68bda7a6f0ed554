//! # Scenario Components
//!
//! Every field is stored as plain `f32` arrays so that no column needs
//! more than 4-byte alignment. Conversions to `glam` types happen at the
//! edges of each system.
//!
//! | Component | Size |
//! |-----------|------|
//! | Scale     | 12   |
//! | Rotation  | 16   |
//! | Translate | 12   |
//! | Transform | 64   |
//! | Life      | 4    |
//!
//! One record is 108 bytes, so a chunk holds 151 of them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use strata_core::{Component, FieldId};

/// Per-axis scale.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Scale(pub [f32; 3]);

impl Component for Scale {
    const ID: FieldId = FieldId::from_name("strata::Scale");
}

impl Default for Scale {
    fn default() -> Self {
        Self(Vec3::ONE.to_array())
    }
}

/// Orientation as a unit quaternion `[x, y, z, w]`.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Rotation(pub [f32; 4]);

impl Component for Rotation {
    const ID: FieldId = FieldId::from_name("strata::Rotation");
}

impl Default for Rotation {
    fn default() -> Self {
        Self(Quat::IDENTITY.to_array())
    }
}

impl Rotation {
    /// As a `glam` quaternion.
    #[inline]
    #[must_use]
    pub fn quat(self) -> Quat {
        Quat::from_array(self.0)
    }
}

/// World-space translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Translate(pub [f32; 3]);

impl Component for Translate {
    const ID: FieldId = FieldId::from_name("strata::Translate");
}

/// Composed local-to-world matrix, column-major.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform(pub [f32; 16]);

impl Component for Transform {
    const ID: FieldId = FieldId::from_name("strata::Transform");
}

impl Default for Transform {
    fn default() -> Self {
        Self(Mat4::IDENTITY.to_cols_array())
    }
}

impl Transform {
    /// As a `glam` matrix.
    #[inline]
    #[must_use]
    pub fn matrix(self) -> Mat4 {
        Mat4::from_cols_array(&self.0)
    }
}

/// Remaining lifetime in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Life(pub f32);

impl Component for Life {
    const ID: FieldId = FieldId::from_name("strata::Life");
}

/// Field ids of the scenario archetype, in registration order.
pub const FIELDS: [FieldId; 5] = [
    Scale::ID,
    Rotation::ID,
    Translate::ID,
    Transform::ID,
    Life::ID,
];

/// Registration pairs for the scenario archetype.
#[must_use]
pub fn archetype() -> [(FieldId, u16); 5] {
    [
        Scale::field(),
        Rotation::field(),
        Translate::field(),
        Transform::field(),
        Life::field(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::TypeRegistry;

    #[test]
    fn test_archetype_layout() {
        let registry = TypeRegistry::new(&archetype()).unwrap();
        assert_eq!(registry.total_size(), 108);
        assert_eq!(registry.capacity(), 151);
        assert!(registry.is_exactly(&FIELDS));
    }

    #[test]
    fn test_defaults_are_identity() {
        assert_eq!(Rotation::default().quat(), Quat::IDENTITY);
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
        assert_eq!(Scale::default(), Scale([1.0; 3]));
    }
}

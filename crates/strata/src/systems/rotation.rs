//! Constant spin about +Y.

use glam::Quat;
use strata_core::{Collector, ColumnError, ColumnSet, FieldId, System};

use crate::boxed::{BoxedEntity, BoxedId, BoxedSystem};
use crate::components::Rotation;

fn spin(rotation: &mut Rotation, step: Quat) {
    rotation.0 = (rotation.quat() * step).normalize().to_array();
}

/// Rotates every entity by `delta` radians about the Y axis.
#[derive(Debug, Default)]
pub struct RotationSystem;

impl System for RotationSystem {
    fn fields(&self) -> &[FieldId] {
        <(Rotation,)>::FIELDS
    }

    fn process(&mut self, collector: &mut Collector<'_>, delta: f32) -> Result<(), ColumnError> {
        let step = Quat::from_rotation_y(delta);
        let (rotations,) = collector.view::<(Rotation,)>()?;
        for rotation in rotations.iter_mut() {
            spin(rotation, step);
        }
        Ok(())
    }
}

impl BoxedSystem for RotationSystem {
    fn boxed_fields(&self) -> &[FieldId] {
        <(Rotation,)>::FIELDS
    }

    fn for_each(&mut self, _id: BoxedId, entity: &mut BoxedEntity, delta: f32) {
        if let Some(rotation) = entity.get_mut::<Rotation>() {
            spin(rotation, Quat::from_rotation_y(delta));
        }
    }
}

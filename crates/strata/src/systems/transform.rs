//! Transform composition.

use glam::{Mat4, Vec3};
use strata_core::{Collector, ColumnError, ColumnSet, FieldId, System};

use crate::boxed::{BoxedEntity, BoxedId, BoxedSystem};
use crate::components::{Rotation, Scale, Transform, Translate};

type Inputs = (Scale, Rotation, Translate, Transform);

fn compose(scale: &Scale, rotation: &Rotation, translate: &Translate) -> Transform {
    let matrix = Mat4::from_scale_rotation_translation(
        Vec3::from_array(scale.0),
        rotation.quat(),
        Vec3::from_array(translate.0),
    );
    Transform(matrix.to_cols_array())
}

/// Writes `translate * rotate * scale` into every [`Transform`].
#[derive(Debug, Default)]
pub struct TransformSystem;

impl System for TransformSystem {
    fn fields(&self) -> &[FieldId] {
        Inputs::FIELDS
    }

    fn process(&mut self, collector: &mut Collector<'_>, _delta: f32) -> Result<(), ColumnError> {
        let (scales, rotations, translations, transforms) = collector.view::<Inputs>()?;
        for (((scale, rotation), translate), transform) in scales
            .iter()
            .zip(rotations.iter())
            .zip(translations.iter())
            .zip(transforms.iter_mut())
        {
            *transform = compose(scale, rotation, translate);
        }
        Ok(())
    }
}

impl BoxedSystem for TransformSystem {
    fn boxed_fields(&self) -> &[FieldId] {
        Inputs::FIELDS
    }

    fn for_each(&mut self, _id: BoxedId, entity: &mut BoxedEntity, _delta: f32) {
        let (Some(&scale), Some(&rotation), Some(&translate)) = (
            entity.get::<Scale>(),
            entity.get::<Rotation>(),
            entity.get::<Translate>(),
        ) else {
            return;
        };
        if let Some(transform) = entity.get_mut::<Transform>() {
            *transform = compose(&scale, &rotation, &translate);
        }
    }
}

//! Population top-up.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::{Collector, ColumnError, Engine, EngineError, FieldId, System};

use crate::boxed::{BoxedEntity, BoxedId, BoxedSystem, BoxedWorld};
use crate::components::{Life, Rotation, Scale, Transform, Translate, FIELDS};

/// Creates entities until `max_entities` are alive.
///
/// New records start at the identity transform with a lifetime drawn
/// uniformly from `min_life..=max_life`.
pub struct CreateSystem {
    max_entities: usize,
    min_life: f32,
    max_life: f32,
    rng: ChaCha8Rng,
    created: u64,
}

impl CreateSystem {
    /// Creates the system with a seeded lifetime generator.
    #[must_use]
    pub fn new(max_entities: usize, min_life: f32, max_life: f32, seed: u64) -> Self {
        Self {
            max_entities,
            min_life,
            max_life,
            rng: ChaCha8Rng::seed_from_u64(seed),
            created: 0,
        }
    }

    /// Entities created since construction.
    #[inline]
    #[must_use]
    pub const fn created(&self) -> u64 {
        self.created
    }

    fn draw_life(&mut self) -> f32 {
        self.rng.gen_range(self.min_life..=self.max_life)
    }

    fn spawn(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        let entity = engine.create_entity(&FIELDS)?;
        let life = self.draw_life();

        engine.set(entity, Scale::default())?;
        engine.set(entity, Rotation::default())?;
        engine.set(entity, Translate::default())?;
        engine.set(entity, Transform::default())?;
        engine.set(entity, Life(life))?;

        self.created += 1;
        Ok(())
    }
}

impl System for CreateSystem {
    fn fields(&self) -> &[FieldId] {
        &FIELDS
    }

    fn process(&mut self, _collector: &mut Collector<'_>, _delta: f32) -> Result<(), ColumnError> {
        Ok(())
    }

    fn run(&mut self, engine: &mut Engine, _delta: f32) -> Result<(), EngineError> {
        let missing = self.max_entities.saturating_sub(engine.total_entities());
        for _ in 0..missing {
            self.spawn(engine)?;
        }
        if missing > 0 {
            tracing::trace!("Created {} entities", missing);
        }
        Ok(())
    }
}

impl BoxedSystem for CreateSystem {
    fn boxed_fields(&self) -> &[FieldId] {
        &FIELDS
    }

    fn for_each(&mut self, _id: BoxedId, _entity: &mut BoxedEntity, _delta: f32) {}

    fn run_boxed(&mut self, world: &mut BoxedWorld, _delta: f32) {
        let missing = self.max_entities.saturating_sub(world.len());
        for _ in 0..missing {
            let life = self.draw_life();
            world.spawn(
                BoxedEntity::new()
                    .with(Scale::default())
                    .with(Rotation::default())
                    .with(Translate::default())
                    .with(Transform::default())
                    .with(Life(life)),
            );
        }
        self.created += missing as u64;
        if missing > 0 {
            tracing::trace!("Created {} boxed entities", missing);
        }
    }
}

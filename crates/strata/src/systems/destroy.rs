//! Lifetime countdown and expiry.

use strata_core::{Collector, ColumnError, ColumnSet, Engine, EngineError, Entity, FieldId, System};

use crate::boxed::{BoxedEntity, BoxedId, BoxedSystem, BoxedWorld};
use crate::components::Life;

/// Counts a lifetime down; `true` once it has run out.
fn count_down(life: &mut Life, delta: f32) -> bool {
    life.0 -= delta;
    life.0 <= 0.0
}

/// Counts every [`Life`] down by the frame delta and destroys entities
/// whose lifetime ran out.
///
/// Destruction waits until the whole pass is done so that swap-compaction
/// never moves an unvisited record behind the cursor.
#[derive(Debug, Default)]
pub struct DestroySystem {
    expired: Vec<Entity>,
    expired_boxed: Vec<BoxedId>,
    destroyed: u64,
}

impl DestroySystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities destroyed since construction.
    #[inline]
    #[must_use]
    pub const fn destroyed(&self) -> u64 {
        self.destroyed
    }
}

impl System for DestroySystem {
    fn fields(&self) -> &[FieldId] {
        <(Life,)>::FIELDS
    }

    fn process(&mut self, collector: &mut Collector<'_>, delta: f32) -> Result<(), ColumnError> {
        let (lives,) = collector.view::<(Life,)>()?;
        let expired: Vec<usize> = lives
            .iter_mut()
            .enumerate()
            .filter_map(|(index, life)| count_down(life, delta).then_some(index))
            .collect();

        self.expired
            .extend(expired.into_iter().filter_map(|index| collector.entity(index)));
        Ok(())
    }

    fn finish(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        let count = engine.destroy_entities(self.expired.drain(..));
        self.destroyed += count as u64;
        if count > 0 {
            tracing::trace!("Destroyed {} expired entities", count);
        }
        Ok(())
    }
}

impl BoxedSystem for DestroySystem {
    fn boxed_fields(&self) -> &[FieldId] {
        <(Life,)>::FIELDS
    }

    fn for_each(&mut self, id: BoxedId, entity: &mut BoxedEntity, delta: f32) {
        if entity
            .get_mut::<Life>()
            .is_some_and(|life| count_down(life, delta))
        {
            self.expired_boxed.push(id);
        }
    }

    fn finish_boxed(&mut self, world: &mut BoxedWorld) {
        let count = self
            .expired_boxed
            .drain(..)
            .filter(|&id| world.despawn(id))
            .count();
        self.destroyed += count as u64;
        if count > 0 {
            tracing::trace!("Destroyed {} expired boxed entities", count);
        }
    }
}

//! # Systems
//!
//! A system declares the fields it needs and is handed one
//! [`Collector`] per matching chunk. [`System::run`] drives the whole
//! match, query and dispatch sequence for one tick.
//!
//! Collectors borrow the engine, so a system cannot destroy entities while
//! it iterates. It records the handles it wants gone during
//! [`process`](System::process) and applies them in
//! [`finish`](System::finish), after every collector has been dropped.

use super::{Collector, Engine, FieldId};
use crate::error::{ColumnError, EngineError};

/// Batch processing unit.
///
/// # Example
///
/// ```rust,ignore
/// struct Expire {
///     doomed: Vec<Entity>,
/// }
///
/// impl System for Expire {
///     fn fields(&self) -> &[FieldId] {
///         <(Life,)>::FIELDS
///     }
///
///     fn process(&mut self, collector: &mut Collector<'_>, delta: f32) -> Result<(), ColumnError> {
///         let (life,) = collector.view::<(Life,)>()?;
///         let expired: Vec<usize> = life
///             .iter_mut()
///             .enumerate()
///             .filter_map(|(index, life)| {
///                 life.0 -= delta;
///                 (life.0 <= 0.0).then_some(index)
///             })
///             .collect();
///         self.doomed
///             .extend(expired.into_iter().filter_map(|index| collector.entity(index)));
///         Ok(())
///     }
///
///     fn finish(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
///         engine.destroy_entities(self.doomed.drain(..));
///         Ok(())
///     }
/// }
/// ```
pub trait System {
    /// Fields requested from every matching archetype, in view order.
    fn fields(&self) -> &[FieldId];

    /// Called once per matching chunk.
    ///
    /// # Errors
    ///
    /// Any [`ColumnError`] from casting the collector's columns.
    fn process(&mut self, collector: &mut Collector<'_>, delta: f32) -> Result<(), ColumnError>;

    /// Called once after every collector of the tick has been processed.
    ///
    /// # Errors
    ///
    /// Whatever the system's deferred work reports.
    fn finish(&mut self, _engine: &mut Engine) -> Result<(), EngineError> {
        Ok(())
    }

    /// Queries the engine and processes every collector.
    ///
    /// # Returns
    ///
    /// The number of collectors processed.
    ///
    /// # Errors
    ///
    /// Query errors and errors returned by [`process`](Self::process).
    fn dispatch(&mut self, engine: &mut Engine, delta: f32) -> Result<usize, EngineError> {
        let fields = self.fields().to_vec();
        let mut collectors = engine.run_query(&fields)?;
        for collector in &mut collectors {
            self.process(collector, delta)?;
        }
        Ok(collectors.len())
    }

    /// One full tick: [`dispatch`](Self::dispatch) then
    /// [`finish`](Self::finish).
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Self::dispatch) and [`finish`](Self::finish).
    fn run(&mut self, engine: &mut Engine, delta: f32) -> Result<(), EngineError> {
        self.dispatch(engine, delta)?;
        self.finish(engine)
    }
}

//! Periodic progress reporting.

use strata_core::{Collector, ColumnError, Engine, EngineError, FieldId, System};

use crate::boxed::{BoxedEntity, BoxedId, BoxedSystem, BoxedWorld};
use crate::timer::Timer;

/// One progress snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    /// Live entities.
    pub entities: usize,
    /// Chunks across all archetypes.
    pub chunks: usize,
    /// Seconds since the scenario started.
    pub total_secs: f32,
    /// Frames during the last whole second.
    pub fps: u32,
    /// Running average of `fps` across reports.
    pub average_fps: u32,
}

/// Logs storage statistics every `interval` seconds.
///
/// Queries nothing; it reads the engine's or world's counters directly.
#[derive(Debug)]
pub struct ReportSystem {
    interval: f32,
    remaining: f32,
    total_secs: f32,
    fps: u32,
    average_fps: u32,
    last: Option<Report>,
}

impl ReportSystem {
    /// Creates a reporter that fires on its first run and then every
    /// `interval` seconds.
    #[must_use]
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: 0.0,
            total_secs: 0.0,
            fps: 0,
            average_fps: 0,
            last: None,
        }
    }

    /// Copies the timer's current readings for the next report.
    pub fn observe(&mut self, timer: &Timer) {
        self.total_secs = timer.total();
        self.fps = timer.fps();
    }

    /// The most recent report.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> Option<Report> {
        self.last
    }

    /// Builds a report of the engine immediately, regardless of the
    /// interval.
    pub fn snapshot(&mut self, engine: &Engine) -> Report {
        self.record(engine.total_entities(), engine.chunk_count())
    }

    /// Builds a report from raw counters immediately.
    pub fn record(&mut self, entities: usize, chunks: usize) -> Report {
        self.average_fps = if self.average_fps == 0 {
            self.fps
        } else {
            (self.average_fps + self.fps) / 2
        };

        let report = Report {
            entities,
            chunks,
            total_secs: self.total_secs,
            fps: self.fps,
            average_fps: self.average_fps,
        };
        self.last = Some(report);
        report
    }

    /// Counts the interval down and logs a report when it has elapsed.
    ///
    /// # Returns
    ///
    /// The report, if one was due.
    pub fn poll(&mut self, delta: f32, entities: usize, chunks: usize) -> Option<Report> {
        self.remaining -= delta;
        if self.remaining > 0.0 {
            return None;
        }
        self.remaining += self.interval;

        let report = self.record(entities, chunks);
        tracing::info!(
            "entities={} chunks={} time={:.2}s fps={} avg_fps={}",
            report.entities,
            report.chunks,
            report.total_secs,
            report.fps,
            report.average_fps
        );
        Some(report)
    }
}

impl System for ReportSystem {
    fn fields(&self) -> &[FieldId] {
        &[]
    }

    fn process(&mut self, _collector: &mut Collector<'_>, _delta: f32) -> Result<(), ColumnError> {
        Ok(())
    }

    fn run(&mut self, engine: &mut Engine, delta: f32) -> Result<(), EngineError> {
        self.poll(delta, engine.total_entities(), engine.chunk_count());
        Ok(())
    }
}

impl BoxedSystem for ReportSystem {
    fn boxed_fields(&self) -> &[FieldId] {
        &[]
    }

    fn for_each(&mut self, _id: BoxedId, _entity: &mut BoxedEntity, _delta: f32) {}

    fn run_boxed(&mut self, world: &mut BoxedWorld, delta: f32) {
        self.poll(delta, world.len(), 0);
    }
}

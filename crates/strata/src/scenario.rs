//! # Scenarios
//!
//! Both modes tick the same systems in the same order until the
//! configured duration has elapsed:
//!
//! - [`Scenario`]: the five-component archetype in chunk storage
//! - [`BoxedScenario`]: one heap object per entity, boxed components

use strata_core::{Engine, System};

use crate::boxed::{BoxedSystem, BoxedWorld};
use crate::components::archetype;
use crate::config::{ScenarioConfig, ScenarioMode};
use crate::error::ScenarioError;
use crate::systems::{CreateSystem, DestroySystem, Report, ReportSystem, RotationSystem, TransformSystem};
use crate::timer::Timer;

/// Final numbers of one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenarioSummary {
    /// Storage the run used.
    pub mode: ScenarioMode,
    /// Ticks executed.
    pub ticks: u64,
    /// Entities created over the run.
    pub created: u64,
    /// Entities destroyed over the run.
    pub destroyed: u64,
    /// The last report taken.
    pub report: Report,
}

/// Runs whichever storage `config.mode` selects.
///
/// # Errors
///
/// Config and engine errors of the selected scenario.
pub fn run(config: ScenarioConfig) -> Result<ScenarioSummary, ScenarioError> {
    match config.mode {
        ScenarioMode::Chunk => Scenario::new(config)?.run(),
        ScenarioMode::NoChunk => Ok(BoxedScenario::new(config)?.run()),
    }
}

fn advance(timer: &mut Timer, config: &ScenarioConfig) -> f32 {
    match config.fixed_delta_secs {
        Some(delta) => timer.advance(delta),
        None => timer.update(),
    }
    timer.delta()
}

fn log_end(summary: &ScenarioSummary) {
    tracing::info!(
        "End {} ecs scenario: {} ticks, {} created, {} destroyed, avg fps {}",
        summary.mode,
        summary.ticks,
        summary.created,
        summary.destroyed,
        summary.report.average_fps
    );
}

/// Engine plus the scenario's systems.
pub struct Scenario {
    config: ScenarioConfig,
    engine: Engine,
    timer: Timer,
    ticks: u64,
    report: ReportSystem,
    create: CreateSystem,
    destroy: DestroySystem,
    rotation: RotationSystem,
    transform: TransformSystem,
}

impl Scenario {
    /// Builds the engine and registers the scenario archetype.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Invalid`] for a bad config, or an engine error if
    /// registration fails.
    pub fn new(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;

        let mut engine = Engine::with_config(config.engine.clone());
        let archetype = engine.register_archetype(&archetype())?;
        tracing::info!(
            "Registered scenario {} ({} records per chunk)",
            archetype,
            engine
                .archetype(archetype)
                .map_or(0, strata_core::Archetype::capacity)
        );

        Ok(Self {
            report: ReportSystem::new(config.report_interval_secs),
            create: CreateSystem::new(
                config.max_entities,
                config.min_life_secs,
                config.max_life_secs,
                config.seed,
            ),
            destroy: DestroySystem::new(),
            rotation: RotationSystem,
            transform: TransformSystem,
            engine,
            timer: Timer::new(),
            ticks: 0,
            config,
        })
    }

    /// The storage engine.
    #[inline]
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The frame timer.
    #[inline]
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Advances the timer and runs every system once.
    ///
    /// # Errors
    ///
    /// The first engine error any system returns.
    pub fn tick(&mut self) -> Result<(), ScenarioError> {
        let delta = advance(&mut self.timer, &self.config);

        self.report.observe(&self.timer);
        self.report.run(&mut self.engine, delta)?;
        self.create.run(&mut self.engine, delta)?;
        self.destroy.run(&mut self.engine, delta)?;
        self.rotation.run(&mut self.engine, delta)?;
        self.transform.run(&mut self.engine, delta)?;

        self.ticks += 1;
        Ok(())
    }

    /// Ticks until `duration_secs` have elapsed.
    ///
    /// # Errors
    ///
    /// See [`tick`](Self::tick).
    pub fn run(&mut self) -> Result<ScenarioSummary, ScenarioError> {
        tracing::info!(
            "Start chunk ecs scenario: {} entities for {:.0}s",
            self.config.max_entities,
            self.config.duration_secs
        );

        while self.timer.total() < self.config.duration_secs {
            self.tick()?;
        }

        let summary = self.summary();
        log_end(&summary);
        Ok(summary)
    }

    /// Numbers for the run so far.
    pub fn summary(&mut self) -> ScenarioSummary {
        self.report.observe(&self.timer);
        ScenarioSummary {
            mode: ScenarioMode::Chunk,
            ticks: self.ticks,
            created: self.create.created(),
            destroyed: self.destroy.destroyed(),
            report: self.report.snapshot(&self.engine),
        }
    }
}

/// Boxed-entity world plus the scenario's systems.
pub struct BoxedScenario {
    config: ScenarioConfig,
    world: BoxedWorld,
    timer: Timer,
    ticks: u64,
    report: ReportSystem,
    create: CreateSystem,
    destroy: DestroySystem,
    rotation: RotationSystem,
    transform: TransformSystem,
}

impl BoxedScenario {
    /// Builds an empty world.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Invalid`] for a bad config.
    pub fn new(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;

        Ok(Self {
            report: ReportSystem::new(config.report_interval_secs),
            create: CreateSystem::new(
                config.max_entities,
                config.min_life_secs,
                config.max_life_secs,
                config.seed,
            ),
            destroy: DestroySystem::new(),
            rotation: RotationSystem,
            transform: TransformSystem,
            world: BoxedWorld::new(),
            timer: Timer::new(),
            ticks: 0,
            config,
        })
    }

    /// The entity world.
    #[inline]
    #[must_use]
    pub const fn world(&self) -> &BoxedWorld {
        &self.world
    }

    /// The frame timer.
    #[inline]
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Advances the timer and runs every system once.
    pub fn tick(&mut self) {
        let delta = advance(&mut self.timer, &self.config);

        self.report.observe(&self.timer);
        self.report.run_boxed(&mut self.world, delta);
        self.create.run_boxed(&mut self.world, delta);
        self.destroy.run_boxed(&mut self.world, delta);
        self.rotation.run_boxed(&mut self.world, delta);
        self.transform.run_boxed(&mut self.world, delta);

        self.ticks += 1;
    }

    /// Ticks until `duration_secs` have elapsed.
    pub fn run(&mut self) -> ScenarioSummary {
        tracing::info!(
            "Start no-chunk ecs scenario: {} entities for {:.0}s",
            self.config.max_entities,
            self.config.duration_secs
        );

        while self.timer.total() < self.config.duration_secs {
            self.tick();
        }

        let summary = self.summary();
        log_end(&summary);
        summary
    }

    /// Numbers for the run so far.
    pub fn summary(&mut self) -> ScenarioSummary {
        self.report.observe(&self.timer);
        ScenarioSummary {
            mode: ScenarioMode::NoChunk,
            ticks: self.ticks,
            created: self.create.created(),
            destroyed: self.destroy.destroyed(),
            report: self.report.record(self.world.len(), 0),
        }
    }
}

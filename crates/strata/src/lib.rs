//! # Strata
//!
//! A self-contained scenario that exercises the chunk storage core, and
//! the same scenario over boxed per-entity components for comparison.
//!
//! ## Tick Order
//!
//! ```text
//! ReportSystem     every `report_interval` seconds, log stats
//! CreateSystem     create entities until `max_entities` are alive
//! DestroySystem    count lifetimes down, destroy the expired after the pass
//! RotationSystem   spin every rotation about +Y
//! TransformSystem  translate * rotate * scale into a 4x4 matrix
//! ```
//!
//! ## Modules
//!
//! - `boxed`: Heap-allocated entities for the no-chunk mode
//! - `components`: The five record fields of the scenario archetype
//! - `config`: TOML-loadable scenario settings
//! - `scenario`: Storage setup and the tick loop for both modes
//! - `systems`: The systems listed above, for either storage
//! - `timer`: Frame timing

pub mod boxed;
pub mod components;
pub mod config;
pub mod error;
pub mod scenario;
pub mod systems;
pub mod timer;

pub use strata_core as core;

pub use boxed::{BoxedEntity, BoxedId, BoxedSystem, BoxedWorld};
pub use config::{ScenarioConfig, ScenarioMode};
pub use error::ScenarioError;
pub use scenario::{run, BoxedScenario, Scenario, ScenarioSummary};
pub use timer::Timer;

//! # Scenario Systems
//!
//! Each system implements [`strata_core::System`]. Systems that only touch
//! column data do all their work in `process`; systems that change the
//! population override `run` or `finish`, since collectors borrow the
//! engine.
//!
//! Every system also implements [`BoxedSystem`](crate::boxed::BoxedSystem)
//! so the no-chunk mode runs the same per-record logic.

mod create;
mod destroy;
mod report;
mod rotation;
mod transform;

pub use create::CreateSystem;
pub use destroy::DestroySystem;
pub use report::{Report, ReportSystem};
pub use rotation::RotationSystem;
pub use transform::TransformSystem;

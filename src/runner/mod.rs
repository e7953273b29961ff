//! Runner module for fanning domains out over a bounded worker pool
//!
//! This module contains the core orchestration logic:
//! - `Unit` / `UnitPipeline`: resolve → probe → write artifact for one domain
//! - `Scheduler`: bounded admission of units and completion-order delivery
//! - `Coordinator`: wires the scheduler to the report and times the run

mod coordinator;
mod pipeline;
mod scheduler;

pub use coordinator::{run_survey, Coordinator};
pub use pipeline::{Unit, UnitPipeline};
pub use scheduler::{OutcomeStream, Scheduler};

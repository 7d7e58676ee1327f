//! Background processors.
//!
//! - `DeadlineScheduler`: sweeps gatherings past their voting deadline and
//!   gatherings stuck in tie-break, handing each to the orchestrator.

pub mod deadline_scheduler;

pub use deadline_scheduler::{DeadlineScheduler, SweepReport};

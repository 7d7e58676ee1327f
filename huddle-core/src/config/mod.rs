//! Configuration types for Huddle.
//!
//! These types represent the validated runtime configuration used by the
//! server. Loading and parsing is handled by the server crate.

mod scheduler;
mod server;

pub use scheduler::SchedulerConfig;
pub use server::ServerConfig;

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuddleConfig {
    pub server: ServerConfig,
    pub scheduler: SchedulerConfig,
}

//! TOML file configuration structures.
//!
//! These structs directly map to the `huddle-config.toml` file format.
//! Every section and key is optional.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Deadline scheduler section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Seconds between the starts of two sweeps.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Hours a host has to break a tie before it is resolved automatically.
    #[serde(default = "default_tiebreak_window_hours")]
    pub tiebreak_window_hours: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            tiebreak_window_hours: default_tiebreak_window_hours(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

fn default_tiebreak_window_hours() -> u32 {
    24
}

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![forbid(unsafe_code)]

pub mod auth;
pub mod calendar;
pub mod config;
pub mod entities;
pub mod framework;
pub mod lifecycle;
pub mod orchestrator;
pub mod processors;
pub mod store;
pub mod tally;
pub mod tiebreak;
pub mod utils;

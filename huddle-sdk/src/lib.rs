//! Shared types for Huddle.
//!
//! Wire-level request/response objects, host-token hashing, and (behind the
//! `client` feature) a typed HTTP client for the confirmation API.

pub mod objects;
pub mod token;

#[cfg(feature = "client")]
pub mod client;

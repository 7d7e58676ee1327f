//! HTTP client for the Huddle confirmation API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod gathering;

pub use gathering::GatheringClient;

use reqwest::StatusCode;

use crate::objects::ErrorResponse;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a structured error.
    #[error("api error: status {status}, code {:?}: {}", .error.code, .error.message)]
    Api {
        status: StatusCode,
        error: ErrorResponse,
    },

    /// The server returned a non-2xx status code without a structured body.
    #[error("unexpected status {status}, body: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

//! Custom Axum extractors for request authentication.

use axum::{extract::FromRequestParts, http::request::Parts};
use huddle_sdk::token::HOST_TOKEN_HEADER;
use std::convert::Infallible;

/// The raw host token from the `Huddle-Host-Token` header, if present.
///
/// Extraction never fails; a missing or non-UTF-8 header yields `None`,
/// which the orchestrator rejects as unauthorized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostToken(pub Option<String>);

impl HostToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for HostToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(HOST_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned);
        Ok(HostToken(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> HostToken {
        let (mut parts, _) = request.into_parts();
        HostToken::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_host_token_extraction() {
        let request = Request::builder()
            .header(HOST_TOKEN_HEADER, " abc ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("abc"));

        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await, HostToken(None));

        let request = Request::builder()
            .header(HOST_TOKEN_HEADER, "")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await, HostToken(None));
    }
}

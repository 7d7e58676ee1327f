//! HTTP API.
//!
//! All endpoints live under `/api/v1` and speak JSON, except the calendar
//! download. Errors are returned as [`ErrorResponse`] bodies.

pub mod extractors;
pub mod gatherings;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use huddle_core::calendar::CalendarError;
use huddle_core::orchestrator::ConfirmError;
use huddle_sdk::objects::{ErrorCode, ErrorResponse, GatheringStatus};

use crate::state::AppState;

/// Build the versioned API router.
pub fn router() -> Router<AppState> {
    Router::new().nest("/gatherings", gatherings::router())
}

/// Errors surfaced by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Confirm(#[from] ConfirmError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Confirm(ConfirmError::GatheringNotFound) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::GatheringNotFound, "gathering not found"),
            ),
            ApiError::Confirm(ConfirmError::NotConfirmed) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::NotConfirmed, "gathering is not confirmed yet"),
            ),
            ApiError::Confirm(ConfirmError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(ErrorCode::Unauthorized, "host token does not match"),
            ),
            ApiError::Confirm(ConfirmError::InvalidState { status }) => (
                StatusCode::CONFLICT,
                ErrorResponse::new(
                    ErrorCode::InvalidState,
                    format!(
                        "operation not allowed while gathering is {}",
                        status_name((*status).into())
                    ),
                ),
            ),
            ApiError::Confirm(ConfirmError::InvalidCandidate(rejection)) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::InvalidCandidate, rejection.to_string()),
            ),
            ApiError::Confirm(ConfirmError::Store(_) | ConfirmError::Inconsistent(_))
            | ApiError::Calendar(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(ErrorCode::Internal, "internal server error"),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(error = %self, "API request failed");
        }
        (status, Json(body)).into_response()
    }
}

fn status_name(status: GatheringStatus) -> &'static str {
    match status {
        GatheringStatus::Voting => "VOTING",
        GatheringStatus::Tiebreak => "TIEBREAK",
        GatheringStatus::Confirmed => "CONFIRMED",
        GatheringStatus::Expired => "EXPIRED",
    }
}

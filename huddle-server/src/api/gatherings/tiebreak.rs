use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use huddle_sdk::objects::CandidateSelection;

use super::to_response;
use crate::api::ApiError;
use crate::api::extractors::HostToken;
use crate::state::AppState;

/// `POST /{share_code}/tiebreak`: host picks among tied candidates.
pub(super) async fn resolve_tiebreak(
    state: State<AppState>,
    Path(share_code): Path<String>,
    host_token: HostToken,
    Json(selection): Json<CandidateSelection>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .orchestrator
        .resolve_tiebreak_by_host(&share_code, host_token.as_deref(), selection)
        .await?;
    let detail = state.orchestrator.get_confirmed_result(&share_code).await?;
    Ok(Json(to_response(&detail)))
}

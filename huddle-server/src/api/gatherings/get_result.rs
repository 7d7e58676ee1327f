use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use super::to_response;
use crate::api::ApiError;
use crate::state::AppState;

/// `GET /{share_code}/result`: the confirmed result, readable by anyone
/// holding the share code.
pub(super) async fn get_result(
    state: State<AppState>,
    Path(share_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.orchestrator.get_confirmed_result(&share_code).await?;
    Ok(Json(to_response(&detail)))
}

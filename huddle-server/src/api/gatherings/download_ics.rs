use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use huddle_core::calendar::render_ics;
use huddle_core::utils::clock::now_utc;

use crate::api::ApiError;
use crate::state::AppState;

/// `GET /{share_code}/result/ics`: download the confirmed result as an
/// iCalendar file.
pub(super) async fn download_ics(
    state: State<AppState>,
    Path(share_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.orchestrator.get_confirmed_result(&share_code).await?;
    let ics = render_ics(&detail, now_utc())?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.ics\"", file_stem(&share_code)),
            ),
        ],
        ics,
    ))
}

/// Keep only characters that are safe inside a quoted header parameter.
fn file_stem(share_code: &str) -> String {
    let stem: String = share_code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if stem.is_empty() {
        "gathering".to_string()
    } else {
        stem
    }
}

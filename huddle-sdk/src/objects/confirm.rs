//! Host request bodies.

use serde::{Deserialize, Serialize};

/// Body of both `POST /{share_code}/confirm` and `POST /{share_code}/tiebreak`.
///
/// `time_candidate_id` is required unless the gathering is `PLACE_ONLY`,
/// `place_candidate_id` is required unless it is `TIME_ONLY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSelection {
    #[serde(default)]
    pub time_candidate_id: Option<i64>,
    #[serde(default)]
    pub place_candidate_id: Option<i64>,
}

//! Confirmed result read model.

use serde::{Deserialize, Serialize};

use super::gathering::ConfirmedBy;

/// The chosen time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTime {
    pub candidate_id: i64,
    /// ISO-8601 calendar date, e.g. `2026-03-07`.
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    pub end_time: Option<String>,
    /// Participants who voted for this slot.
    pub voter_ids: Vec<i64>,
}

/// The chosen place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedPlace {
    pub candidate_id: i64,
    pub name: String,
    pub map_link: Option<String>,
    /// Participants who voted for this place.
    pub voter_ids: Vec<i64>,
}

/// Response of `GET /{share_code}/result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedResultResponse {
    pub share_code: String,
    pub title: String,
    pub host_name: String,
    /// `None` for `PLACE_ONLY` gatherings.
    pub time: Option<ConfirmedTime>,
    /// `None` for `TIME_ONLY` gatherings.
    pub place: Option<ConfirmedPlace>,
    pub confirmed_by: ConfirmedBy,
    /// Unix timestamp (seconds).
    pub confirmed_at: i64,
    pub ics_download_url: String,
}

impl ConfirmedResultResponse {
    /// Relative download path of the calendar file for a gathering.
    pub fn ics_path(share_code: &str) -> String {
        format!("/api/v1/gatherings/{share_code}/result/ics")
    }
}

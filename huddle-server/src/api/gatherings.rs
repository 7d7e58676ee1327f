//! Gathering confirmation handlers.
//!
//! # Endpoints
//!
//! - `POST /{share_code}/confirm`    – host confirms while voting is open
//! - `POST /{share_code}/tiebreak`   – host breaks a tie
//! - `GET  /{share_code}/result`     – confirmed result with voters
//! - `GET  /{share_code}/result/ics` – calendar file of the confirmed result
//!
//! Host endpoints require the `Huddle-Host-Token` header.

mod confirm;
mod download_ics;
mod get_result;
mod tiebreak;

use axum::{
    Router,
    routing::{get, post},
};
use huddle_core::orchestrator::ConfirmationDetail;
use huddle_sdk::objects::{ConfirmedPlace, ConfirmedResultResponse, ConfirmedTime};

use crate::state::AppState;

/// Build the gatherings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{share_code}/confirm", post(confirm::confirm))
        .route("/{share_code}/tiebreak", post(tiebreak::resolve_tiebreak))
        .route("/{share_code}/result", get(get_result::get_result))
        .route("/{share_code}/result/ics", get(download_ics::download_ics))
}

/// Convert the core read model into the API response.
fn to_response(detail: &ConfirmationDetail) -> ConfirmedResultResponse {
    let share_code = detail.gathering.share_code.to_string();
    ConfirmedResultResponse {
        ics_download_url: ConfirmedResultResponse::ics_path(&share_code),
        share_code,
        title: detail.gathering.title.clone(),
        host_name: detail.gathering.host_name.clone(),
        time: detail.time.as_ref().map(|slot| ConfirmedTime {
            candidate_id: slot.id,
            date: slot.candidate_date.to_string(),
            start_time: hh_mm(slot.start_time),
            end_time: slot.end_time.map(hh_mm),
            voter_ids: detail.time_voters.clone(),
        }),
        place: detail.place.as_ref().map(|place| ConfirmedPlace {
            candidate_id: place.id,
            name: place.name.clone(),
            map_link: place.map_link.clone(),
            voter_ids: detail.place_voters.clone(),
        }),
        confirmed_by: detail.result.confirmed_by.into(),
        confirmed_at: detail.result.confirmed_at.assume_utc().unix_timestamp(),
    }
}

fn hh_mm(t: time::Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::entities::candidates::{PlaceCandidate, TimeCandidate};
    use huddle_core::entities::confirmed_result::ConfirmedResult;
    use huddle_core::entities::gathering::Gathering;
    use huddle_core::entities::{ConfirmType, GatheringKind, GatheringStatus};
    use huddle_sdk::objects::ConfirmedBy;
    use time::macros::{date, datetime, time};

    fn detail() -> ConfirmationDetail {
        ConfirmationDetail {
            gathering: Gathering {
                id: 1,
                share_code: "abcd1234".into(),
                title: "Team dinner".to_string(),
                host_name: "Mina".to_string(),
                host_token_hash: String::new(),
                kind: GatheringKind::Both,
                deadline: datetime!(2026-03-01 00:00),
                status: GatheringStatus::Confirmed,
                created_at: datetime!(2026-02-20 00:00),
                updated_at: datetime!(2026-03-01 00:01),
            },
            result: ConfirmedResult {
                id: 9,
                gathering_id: 1,
                time_candidate_id: Some(10),
                place_candidate_id: Some(20),
                confirmed_at: datetime!(2026-03-01 00:01),
                confirmed_by: ConfirmType::Host,
            },
            time: Some(TimeCandidate {
                id: 10,
                gathering_id: 1,
                candidate_date: date!(2026 - 03 - 07),
                start_time: time!(18:00),
                end_time: Some(time!(21:30)),
                display_order: 0,
            }),
            place: Some(PlaceCandidate {
                id: 20,
                gathering_id: 1,
                name: "Noodle Bar".to_string(),
                map_link: None,
                display_order: 0,
            }),
            time_voters: vec![1, 2],
            place_voters: vec![2],
        }
    }

    #[test]
    fn test_to_response() {
        let response = to_response(&detail());
        assert_eq!(response.share_code, "abcd1234");
        assert_eq!(response.ics_download_url, "/api/v1/gatherings/abcd1234/result/ics");
        assert_eq!(response.confirmed_by, ConfirmedBy::Host);
        assert_eq!(
            response.confirmed_at,
            datetime!(2026-03-01 00:01).assume_utc().unix_timestamp()
        );

        let time = response.time.unwrap();
        assert_eq!(time.date, "2026-03-07");
        assert_eq!(time.start_time, "18:00");
        assert_eq!(time.end_time.as_deref(), Some("21:30"));
        assert_eq!(time.voter_ids, vec![1, 2]);

        let place = response.place.unwrap();
        assert_eq!(place.name, "Noodle Bar");
        assert_eq!(place.voter_ids, vec![2]);
    }
}

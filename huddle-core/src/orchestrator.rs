//! Confirmation orchestrator.
//!
//! Every path that ends a gathering goes through one finishing routine:
//! insert the [`ConfirmedResult`] and move the status to `CONFIRMED` in a
//! single [`crate::store::ConfirmationStore::finalize`] call. Automatic callers treat a lost
//! race as a no-op; host callers see it as [`ConfirmError::InvalidState`].

use crate::auth::{HostTokenVerifier, SecretVerifier};
use crate::entities::candidates::{GatheringCandidates, PlaceCandidate, TimeCandidate};
use crate::entities::confirmed_result::{ConfirmedResult, ConfirmedResultInsert};
use crate::entities::gathering::Gathering;
use crate::entities::{CandidateKind, ConfirmType, GatheringKind, GatheringStatus};
use crate::store::{FinalizeOutcome, Store, StoreError};
use crate::tally::{TallyOutcome, tally};
use crate::tiebreak;
use crate::utils::clock::now_utc;
use huddle_sdk::objects::CandidateSelection;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("gathering not found")]
    GatheringNotFound,

    #[error("host credential does not match")]
    Unauthorized,

    #[error("operation not allowed while gathering is {status:?}")]
    InvalidState { status: GatheringStatus },

    #[error("invalid candidate selection: {0}")]
    InvalidCandidate(#[from] CandidateRejection),

    #[error("gathering has no confirmed result yet")]
    NotConfirmed,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Stored rows reference each other inconsistently.
    #[error("inconsistent data: {0}")]
    Inconsistent(String),
}

/// Why a host's candidate selection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CandidateRejection {
    #[error("a time candidate is required")]
    MissingTime,
    #[error("a place candidate is required")]
    MissingPlace,
    #[error("this gathering does not vote on time")]
    UnexpectedTime,
    #[error("this gathering does not vote on place")]
    UnexpectedPlace,
    #[error("time candidate {0} does not belong to this gathering")]
    UnknownTime(i64),
    #[error("place candidate {0} does not belong to this gathering")]
    UnknownPlace(i64),
}

/// What an automatic trigger did to a gathering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoOutcome {
    Confirmed(ConfirmedResult),
    MovedToTiebreak,
    Expired,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A result already exists, usually written by a concurrent host action.
    AlreadyConfirmed,
    /// The gathering left the expected status before the write.
    StatusChanged,
    /// A kind the gathering votes on has no candidates at all.
    NoCandidates,
}

/// Read model of a confirmed gathering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationDetail {
    pub gathering: Gathering,
    pub result: ConfirmedResult,
    pub time: Option<TimeCandidate>,
    pub place: Option<PlaceCandidate>,
    pub time_voters: Vec<i64>,
    pub place_voters: Vec<i64>,
}

/// Check a host's selection against the gathering kind and its candidates.
///
/// Returns the `(time, place)` ids to store.
pub fn validate_selection(
    kind: GatheringKind,
    selection: &CandidateSelection,
    candidates: &GatheringCandidates,
) -> Result<(Option<i64>, Option<i64>), CandidateRejection> {
    let time = match (kind.uses_time(), selection.time_candidate_id) {
        (true, None) => return Err(CandidateRejection::MissingTime),
        (true, Some(id)) => {
            candidates
                .time_by_id(id)
                .ok_or(CandidateRejection::UnknownTime(id))?;
            Some(id)
        }
        (false, Some(_)) => return Err(CandidateRejection::UnexpectedTime),
        (false, None) => None,
    };
    let place = match (kind.uses_place(), selection.place_candidate_id) {
        (true, None) => return Err(CandidateRejection::MissingPlace),
        (true, Some(id)) => {
            candidates
                .place_by_id(id)
                .ok_or(CandidateRejection::UnknownPlace(id))?;
            Some(id)
        }
        (false, Some(_)) => return Err(CandidateRejection::UnexpectedPlace),
        (false, None) => None,
    };
    Ok((time, place))
}

pub struct ConfirmationOrchestrator<S, V = HostTokenVerifier> {
    store: Arc<S>,
    verifier: V,
}

impl<S, V: Clone> Clone for ConfirmationOrchestrator<S, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            verifier: self.verifier.clone(),
        }
    }
}

impl<S: Store> ConfirmationOrchestrator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_verifier(store, HostTokenVerifier)
    }
}

impl<S: Store, V: SecretVerifier> ConfirmationOrchestrator<S, V> {
    pub fn with_verifier(store: Arc<S>, verifier: V) -> Self {
        Self { store, verifier }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve a `VOTING` gathering whose deadline has passed.
    #[tracing::instrument(skip_all, err, fields(gathering_id = gathering.id, share_code = %gathering.share_code))]
    pub async fn auto_confirm(
        &self,
        gathering: &Gathering,
        now: time::PrimitiveDateTime,
    ) -> Result<AutoOutcome, ConfirmError> {
        if self.store.result_exists(gathering.id).await? {
            return Ok(AutoOutcome::Skipped(SkipReason::AlreadyConfirmed));
        }

        if self.store.count_participants(gathering.id).await? == 0 {
            return self
                .move_status(gathering, GatheringStatus::Voting, GatheringStatus::Expired)
                .await;
        }

        let candidates = self.store.candidates(gathering.id).await?;
        let time = self.tally_kind(gathering, CandidateKind::Time).await?;
        let place = self.tally_kind(gathering, CandidateKind::Place).await?;

        if time.as_ref().is_some_and(TallyOutcome::is_tie)
            || place.as_ref().is_some_and(TallyOutcome::is_tie)
        {
            return self
                .move_status(gathering, GatheringStatus::Voting, GatheringStatus::Tiebreak)
                .await;
        }

        self.finish_automatically(gathering, GatheringStatus::Voting, &candidates, time, place, now)
            .await
    }

    /// Resolve a gathering stuck in `TIEBREAK` past the host's window.
    ///
    /// Votes are tallied again; a tie still standing falls to the candidate
    /// with the lowest display order.
    #[tracing::instrument(skip_all, err, fields(gathering_id = gathering.id, share_code = %gathering.share_code))]
    pub async fn auto_resolve_tiebreak(
        &self,
        gathering: &Gathering,
        now: time::PrimitiveDateTime,
    ) -> Result<AutoOutcome, ConfirmError> {
        if self.store.result_exists(gathering.id).await? {
            return Ok(AutoOutcome::Skipped(SkipReason::AlreadyConfirmed));
        }

        let candidates = self.store.candidates(gathering.id).await?;
        let time = self.tally_kind(gathering, CandidateKind::Time).await?;
        let place = self.tally_kind(gathering, CandidateKind::Place).await?;

        self.finish_automatically(
            gathering,
            GatheringStatus::Tiebreak,
            &candidates,
            time,
            place,
            now,
        )
        .await
    }

    /// Host picks the outcome while voting is still open.
    pub async fn manual_confirm(
        &self,
        share_code: &str,
        host_token: Option<&str>,
        selection: CandidateSelection,
    ) -> Result<ConfirmedResult, ConfirmError> {
        self.finish_by_host(share_code, host_token, selection, GatheringStatus::Voting)
            .await
    }

    /// Host breaks a tie.
    pub async fn resolve_tiebreak_by_host(
        &self,
        share_code: &str,
        host_token: Option<&str>,
        selection: CandidateSelection,
    ) -> Result<ConfirmedResult, ConfirmError> {
        self.finish_by_host(share_code, host_token, selection, GatheringStatus::Tiebreak)
            .await
    }

    pub async fn get_confirmed_result(
        &self,
        share_code: &str,
    ) -> Result<ConfirmationDetail, ConfirmError> {
        let gathering = self
            .store
            .find_gathering(share_code)
            .await?
            .ok_or(ConfirmError::GatheringNotFound)?;
        let result = self
            .store
            .find_result(gathering.id)
            .await?
            .ok_or(ConfirmError::NotConfirmed)?;
        let candidates = self.store.candidates(gathering.id).await?;

        let time = result
            .time_candidate_id
            .map(|id| {
                candidates.time_by_id(id).cloned().ok_or_else(|| {
                    ConfirmError::Inconsistent(format!("time candidate {id} is missing"))
                })
            })
            .transpose()?;
        let place = result
            .place_candidate_id
            .map(|id| {
                candidates.place_by_id(id).cloned().ok_or_else(|| {
                    ConfirmError::Inconsistent(format!("place candidate {id} is missing"))
                })
            })
            .transpose()?;

        let time_voters = match &time {
            Some(c) => {
                self.store
                    .voters_for(gathering.id, c.id, CandidateKind::Time)
                    .await?
            }
            None => Vec::new(),
        };
        let place_voters = match &place {
            Some(c) => {
                self.store
                    .voters_for(gathering.id, c.id, CandidateKind::Place)
                    .await?
            }
            None => Vec::new(),
        };

        Ok(ConfirmationDetail {
            gathering,
            result,
            time,
            place,
            time_voters,
            place_voters,
        })
    }

    /// Tally one kind, or `None` when the gathering does not vote on it.
    async fn tally_kind(
        &self,
        gathering: &Gathering,
        kind: CandidateKind,
    ) -> Result<Option<TallyOutcome>, ConfirmError> {
        let applicable = match kind {
            CandidateKind::Time => gathering.kind.uses_time(),
            CandidateKind::Place => gathering.kind.uses_place(),
        };
        if !applicable {
            return Ok(None);
        }
        let counts = self.store.vote_counts(gathering.id, kind).await?;
        Ok(Some(tally(&counts)))
    }

    async fn move_status(
        &self,
        gathering: &Gathering,
        from: GatheringStatus,
        to: GatheringStatus,
    ) -> Result<AutoOutcome, ConfirmError> {
        from.transition(to)
            .map_err(|e| ConfirmError::InvalidState { status: e.from })?;
        if !self
            .store
            .compare_and_set_status(gathering.id, from, to)
            .await?
        {
            info!("Status changed concurrently, skipping");
            return Ok(AutoOutcome::Skipped(SkipReason::StatusChanged));
        }
        match to {
            GatheringStatus::Expired => {
                info!("No participants by the deadline, gathering expired");
                Ok(AutoOutcome::Expired)
            }
            _ => {
                info!("Top vote tied, gathering moved to tiebreak");
                Ok(AutoOutcome::MovedToTiebreak)
            }
        }
    }

    async fn finish_automatically(
        &self,
        gathering: &Gathering,
        expected: GatheringStatus,
        candidates: &GatheringCandidates,
        time: Option<TallyOutcome>,
        place: Option<TallyOutcome>,
        now: time::PrimitiveDateTime,
    ) -> Result<AutoOutcome, ConfirmError> {
        let time_id = match &time {
            Some(outcome) => match tiebreak::resolve(outcome, &candidates.time) {
                Some(id) => Some(id),
                None => {
                    warn!("Gathering has no time candidates, cannot confirm");
                    return Ok(AutoOutcome::Skipped(SkipReason::NoCandidates));
                }
            },
            None => None,
        };
        let place_id = match &place {
            Some(outcome) => match tiebreak::resolve(outcome, &candidates.place) {
                Some(id) => Some(id),
                None => {
                    warn!("Gathering has no place candidates, cannot confirm");
                    return Ok(AutoOutcome::Skipped(SkipReason::NoCandidates));
                }
            },
            None => None,
        };

        let insert = ConfirmedResultInsert {
            gathering_id: gathering.id,
            time_candidate_id: time_id,
            place_candidate_id: place_id,
            confirmed_at: now,
            confirmed_by: ConfirmType::Auto,
        };
        match self.store.finalize(insert, expected).await? {
            FinalizeOutcome::Confirmed(result) => {
                info!(
                    time_candidate_id = ?result.time_candidate_id,
                    place_candidate_id = ?result.place_candidate_id,
                    "Gathering confirmed automatically"
                );
                Ok(AutoOutcome::Confirmed(result))
            }
            FinalizeOutcome::AlreadyConfirmed => {
                info!("Gathering confirmed concurrently, skipping");
                Ok(AutoOutcome::Skipped(SkipReason::AlreadyConfirmed))
            }
            FinalizeOutcome::StatusChanged => {
                info!("Status changed concurrently, skipping");
                Ok(AutoOutcome::Skipped(SkipReason::StatusChanged))
            }
        }
    }

    #[tracing::instrument(skip(self, host_token, selection), err)]
    async fn finish_by_host(
        &self,
        share_code: &str,
        host_token: Option<&str>,
        selection: CandidateSelection,
        required: GatheringStatus,
    ) -> Result<ConfirmedResult, ConfirmError> {
        let gathering = self
            .store
            .find_gathering(share_code)
            .await?
            .ok_or(ConfirmError::GatheringNotFound)?;
        if !self.verifier.verify(host_token, &gathering.host_token_hash) {
            return Err(ConfirmError::Unauthorized);
        }
        if gathering.status != required {
            return Err(ConfirmError::InvalidState {
                status: gathering.status,
            });
        }

        let candidates = self.store.candidates(gathering.id).await?;
        let (time_id, place_id) = validate_selection(gathering.kind, &selection, &candidates)?;

        let insert = ConfirmedResultInsert {
            gathering_id: gathering.id,
            time_candidate_id: time_id,
            place_candidate_id: place_id,
            confirmed_at: now_utc(),
            confirmed_by: ConfirmType::Host,
        };
        match self.store.finalize(insert, required).await? {
            FinalizeOutcome::Confirmed(result) => {
                info!(gathering_id = gathering.id, "Gathering confirmed by host");
                Ok(result)
            }
            FinalizeOutcome::AlreadyConfirmed | FinalizeOutcome::StatusChanged => {
                let status = self
                    .store
                    .find_gathering(share_code)
                    .await?
                    .map(|g| g.status)
                    .unwrap_or(GatheringStatus::Confirmed);
                Err(ConfirmError::InvalidState { status })
            }
        }
    }
}

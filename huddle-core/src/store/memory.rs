//! In-memory store for unit tests.
//!
//! Mirrors the guarantees of [`super::PgStore`]: one result per gathering and
//! an all-or-nothing [`ConfirmationStore::finalize`].

use super::{ConfirmationStore, FinalizeOutcome, GatheringStore, StoreError, VoteStore};
use crate::entities::candidates::{GatheringCandidates, PlaceCandidate, TimeCandidate};
use crate::entities::confirmed_result::{ConfirmedResult, ConfirmedResultInsert};
use crate::entities::gathering::Gathering;
use crate::entities::votes::VoteCount;
use crate::entities::{CandidateKind, GatheringKind, GatheringStatus};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use time::macros::{date, datetime, time};

pub(crate) const HOST_TOKEN: &str = "host-secret";

#[derive(Debug, Clone, Copy)]
struct VoteRow {
    gathering_id: i64,
    participant_id: i64,
    candidate_id: i64,
    kind: CandidateKind,
}

#[derive(Debug, Default)]
struct Inner {
    gatherings: HashMap<i64, Gathering>,
    time: Vec<TimeCandidate>,
    place: Vec<PlaceCandidate>,
    participants: HashMap<i64, u64>,
    votes: Vec<VoteRow>,
    results: HashMap<i64, ConfirmedResult>,
    failing: HashSet<i64>,
    next_result_id: i64,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    inner: Mutex<Inner>,
}

/// A gathering fixture whose host token is [`HOST_TOKEN`].
pub(crate) fn gathering(
    id: i64,
    share_code: &str,
    kind: GatheringKind,
    status: GatheringStatus,
) -> Gathering {
    let created = datetime!(2026-01-01 09:00);
    Gathering {
        id,
        share_code: share_code.into(),
        title: format!("Gathering {id}"),
        host_name: "Host".to_string(),
        host_token_hash: huddle_sdk::token::hash_token(HOST_TOKEN),
        kind,
        deadline: datetime!(2026-01-10 12:00),
        status,
        created_at: created,
        updated_at: created,
    }
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub(crate) fn insert_gathering(&self, gathering: Gathering) {
        self.lock().gatherings.insert(gathering.id, gathering);
    }

    pub(crate) fn add_time_candidate(&self, gathering_id: i64, id: i64, display_order: i32) {
        self.lock().time.push(TimeCandidate {
            id,
            gathering_id,
            candidate_date: date!(2026 - 02 - 01),
            start_time: time!(18:00),
            end_time: None,
            display_order,
        });
    }

    pub(crate) fn add_place_candidate(&self, gathering_id: i64, id: i64, display_order: i32) {
        self.lock().place.push(PlaceCandidate {
            id,
            gathering_id,
            name: format!("Place {id}"),
            map_link: None,
            display_order,
        });
    }

    pub(crate) fn set_participants(&self, gathering_id: i64, count: u64) {
        self.lock().participants.insert(gathering_id, count);
    }

    pub(crate) fn vote(
        &self,
        gathering_id: i64,
        participant_id: i64,
        candidate_id: i64,
        kind: CandidateKind,
    ) {
        self.lock().votes.push(VoteRow {
            gathering_id,
            participant_id,
            candidate_id,
            kind,
        });
    }

    /// Cast `n` votes for one candidate from fresh participant ids.
    pub(crate) fn votes(&self, gathering_id: i64, candidate_id: i64, kind: CandidateKind, n: i64) {
        for i in 0..n {
            self.vote(gathering_id, 1000 * candidate_id + i, candidate_id, kind);
        }
    }

    /// Make every call touching `gathering_id` fail as if the pool were exhausted.
    pub(crate) fn fail_on(&self, gathering_id: i64) {
        self.lock().failing.insert(gathering_id);
    }

    pub(crate) fn status_of(&self, gathering_id: i64) -> Option<GatheringStatus> {
        self.lock().gatherings.get(&gathering_id).map(|g| g.status)
    }

    pub(crate) fn result_of(&self, gathering_id: i64) -> Option<ConfirmedResult> {
        self.lock().results.get(&gathering_id).cloned()
    }

    pub(crate) fn result_count(&self) -> usize {
        self.lock().results.len()
    }

    fn check(inner: &Inner, gathering_id: i64) -> Result<(), StoreError> {
        if inner.failing.contains(&gathering_id) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GatheringStore for MemoryStore {
    async fn find_gathering(&self, share_code: &str) -> Result<Option<Gathering>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .gatherings
            .values()
            .find(|g| g.share_code == share_code)
            .cloned())
    }

    async fn list_due(
        &self,
        status: GatheringStatus,
        deadline_before: time::PrimitiveDateTime,
    ) -> Result<Vec<Gathering>, StoreError> {
        let inner = self.lock();
        let mut due: Vec<Gathering> = inner
            .gatherings
            .values()
            .filter(|g| g.status == status && g.deadline < deadline_before)
            .cloned()
            .collect();
        due.sort_by_key(|g| (g.deadline, g.id));
        Ok(due)
    }

    async fn candidates(&self, gathering_id: i64) -> Result<GatheringCandidates, StoreError> {
        let inner = self.lock();
        Self::check(&inner, gathering_id)?;
        let mut time: Vec<_> = inner
            .time
            .iter()
            .filter(|c| c.gathering_id == gathering_id)
            .cloned()
            .collect();
        time.sort_by_key(|c| c.display_order);
        let mut place: Vec<_> = inner
            .place
            .iter()
            .filter(|c| c.gathering_id == gathering_id)
            .cloned()
            .collect();
        place.sort_by_key(|c| c.display_order);
        Ok(GatheringCandidates { time, place })
    }

    async fn compare_and_set_status(
        &self,
        gathering_id: i64,
        from: GatheringStatus,
        to: GatheringStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        Self::check(&inner, gathering_id)?;
        match inner.gatherings.get_mut(&gathering_id) {
            Some(g) if g.status == from => {
                g.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl VoteStore for MemoryStore {
    async fn count_participants(&self, gathering_id: i64) -> Result<u64, StoreError> {
        let inner = self.lock();
        Self::check(&inner, gathering_id)?;
        Ok(inner.participants.get(&gathering_id).copied().unwrap_or(0))
    }

    async fn vote_counts(
        &self,
        gathering_id: i64,
        kind: CandidateKind,
    ) -> Result<Vec<VoteCount>, StoreError> {
        let inner = self.lock();
        Self::check(&inner, gathering_id)?;
        let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
        for v in inner
            .votes
            .iter()
            .filter(|v| v.gathering_id == gathering_id && v.kind == kind)
        {
            *counts.entry(v.candidate_id).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(id, votes)| VoteCount::new(id, votes))
            .collect())
    }

    async fn voters_for(
        &self,
        gathering_id: i64,
        candidate_id: i64,
        kind: CandidateKind,
    ) -> Result<Vec<i64>, StoreError> {
        let inner = self.lock();
        Self::check(&inner, gathering_id)?;
        let mut ids: Vec<i64> = inner
            .votes
            .iter()
            .filter(|v| {
                v.gathering_id == gathering_id && v.candidate_id == candidate_id && v.kind == kind
            })
            .map(|v| v.participant_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[async_trait]
impl ConfirmationStore for MemoryStore {
    async fn result_exists(&self, gathering_id: i64) -> Result<bool, StoreError> {
        let inner = self.lock();
        Self::check(&inner, gathering_id)?;
        Ok(inner.results.contains_key(&gathering_id))
    }

    async fn find_result(&self, gathering_id: i64) -> Result<Option<ConfirmedResult>, StoreError> {
        let inner = self.lock();
        Self::check(&inner, gathering_id)?;
        Ok(inner.results.get(&gathering_id).cloned())
    }

    async fn finalize(
        &self,
        insert: ConfirmedResultInsert,
        expected: GatheringStatus,
    ) -> Result<FinalizeOutcome, StoreError> {
        let mut inner = self.lock();
        Self::check(&inner, insert.gathering_id)?;
        let status_matches = inner
            .gatherings
            .get(&insert.gathering_id)
            .is_some_and(|g| g.status == expected);
        if !status_matches {
            return Ok(FinalizeOutcome::StatusChanged);
        }
        if inner.results.contains_key(&insert.gathering_id) {
            return Ok(FinalizeOutcome::AlreadyConfirmed);
        }

        inner.next_result_id += 1;
        let result = ConfirmedResult {
            id: inner.next_result_id,
            gathering_id: insert.gathering_id,
            time_candidate_id: insert.time_candidate_id,
            place_candidate_id: insert.place_candidate_id,
            confirmed_at: insert.confirmed_at,
            confirmed_by: insert.confirmed_by,
        };
        inner.results.insert(insert.gathering_id, result.clone());
        if let Some(g) = inner.gatherings.get_mut(&insert.gathering_id) {
            g.status = GatheringStatus::Confirmed;
        }
        Ok(FinalizeOutcome::Confirmed(result))
    }
}

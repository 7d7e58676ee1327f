//! Storage seams used by the confirmation engine.
//!
//! [`PgStore`] backs all three traits with PostgreSQL. Implementations must
//! guarantee two things at the storage layer:
//!
//! - at most one confirmed result per gathering, enforced by the store
//!   itself and not only by callers checking [`ConfirmationStore::result_exists`];
//! - [`ConfirmationStore::finalize`] applies the result insert and the status
//!   update as one atomic unit.

mod postgres;

#[cfg(test)]
pub(crate) mod memory;

pub use postgres::PgStore;

use crate::entities::candidates::GatheringCandidates;
use crate::entities::confirmed_result::{ConfirmedResult, ConfirmedResultInsert};
use crate::entities::gathering::Gathering;
use crate::entities::votes::VoteCount;
use crate::entities::{CandidateKind, GatheringStatus};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of the atomic finishing write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The result was inserted and the gathering is now `CONFIRMED`.
    Confirmed(ConfirmedResult),
    /// A result already exists for this gathering; nothing was written.
    AlreadyConfirmed,
    /// The gathering left the expected status before the write; nothing was written.
    StatusChanged,
}

/// Gathering lookups and status writes.
#[async_trait]
pub trait GatheringStore: Send + Sync {
    async fn find_gathering(&self, share_code: &str) -> Result<Option<Gathering>, StoreError>;

    /// Gatherings in `status` whose deadline is strictly before `deadline_before`.
    async fn list_due(
        &self,
        status: GatheringStatus,
        deadline_before: time::PrimitiveDateTime,
    ) -> Result<Vec<Gathering>, StoreError>;

    /// Candidates of a gathering, each list sorted by `display_order`.
    async fn candidates(&self, gathering_id: i64) -> Result<GatheringCandidates, StoreError>;

    /// Move `gathering_id` from `from` to `to` only if it is still in `from`.
    ///
    /// Returns `false` when the gathering was no longer in `from`.
    async fn compare_and_set_status(
        &self,
        gathering_id: i64,
        from: GatheringStatus,
        to: GatheringStatus,
    ) -> Result<bool, StoreError>;
}

/// Read-only vote aggregates.
#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn count_participants(&self, gathering_id: i64) -> Result<u64, StoreError>;

    async fn vote_counts(
        &self,
        gathering_id: i64,
        kind: CandidateKind,
    ) -> Result<Vec<VoteCount>, StoreError>;

    async fn voters_for(
        &self,
        gathering_id: i64,
        candidate_id: i64,
        kind: CandidateKind,
    ) -> Result<Vec<i64>, StoreError>;
}

/// Confirmed result persistence.
#[async_trait]
pub trait ConfirmationStore: Send + Sync {
    async fn result_exists(&self, gathering_id: i64) -> Result<bool, StoreError>;

    async fn find_result(&self, gathering_id: i64) -> Result<Option<ConfirmedResult>, StoreError>;

    /// Insert `insert` and move the gathering from `expected` to `CONFIRMED`,
    /// atomically. A lost race is reported through [`FinalizeOutcome`], not
    /// as an error.
    async fn finalize(
        &self,
        insert: ConfirmedResultInsert,
        expected: GatheringStatus,
    ) -> Result<FinalizeOutcome, StoreError>;
}

/// Everything the orchestrator and the scheduler need.
pub trait Store: GatheringStore + VoteStore + ConfirmationStore {}

impl<T> Store for T where T: GatheringStore + VoteStore + ConfirmationStore {}

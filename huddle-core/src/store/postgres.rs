use super::{ConfirmationStore, FinalizeOutcome, GatheringStore, StoreError, VoteStore};
use crate::entities::candidates::{GatheringCandidates, GetGatheringCandidates};
use crate::entities::confirmed_result::{
    ConfirmedResult, ConfirmedResultExists, ConfirmedResultInsert, GetConfirmedResult,
};
use crate::entities::gathering::{
    CompareAndSetGatheringStatus, Gathering, GetGatheringByShareCode, ListGatheringsDue,
};
use crate::entities::votes::{
    CountParticipants, CountVotesByCandidate, ListVotersForCandidate, VoteCount,
};
use crate::entities::{CandidateKind, GatheringStatus};
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use kanau::processor::Processor;
use sqlx::PgPool;
use tracing::info;

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DatabaseProcessor,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            db: DatabaseProcessor { pool },
        }
    }
}

#[async_trait]
impl GatheringStore for PgStore {
    async fn find_gathering(&self, share_code: &str) -> Result<Option<Gathering>, StoreError> {
        Ok(self
            .db
            .process(GetGatheringByShareCode {
                share_code: share_code.into(),
            })
            .await?)
    }

    async fn list_due(
        &self,
        status: GatheringStatus,
        deadline_before: time::PrimitiveDateTime,
    ) -> Result<Vec<Gathering>, StoreError> {
        Ok(self
            .db
            .process(ListGatheringsDue {
                status,
                deadline_before,
            })
            .await?)
    }

    async fn candidates(&self, gathering_id: i64) -> Result<GatheringCandidates, StoreError> {
        Ok(self
            .db
            .process(GetGatheringCandidates { gathering_id })
            .await?)
    }

    async fn compare_and_set_status(
        &self,
        gathering_id: i64,
        from: GatheringStatus,
        to: GatheringStatus,
    ) -> Result<bool, StoreError> {
        Ok(self
            .db
            .process(CompareAndSetGatheringStatus {
                gathering_id,
                from,
                to,
            })
            .await?)
    }
}

#[async_trait]
impl VoteStore for PgStore {
    async fn count_participants(&self, gathering_id: i64) -> Result<u64, StoreError> {
        Ok(self.db.process(CountParticipants { gathering_id }).await?)
    }

    async fn vote_counts(
        &self,
        gathering_id: i64,
        kind: CandidateKind,
    ) -> Result<Vec<VoteCount>, StoreError> {
        Ok(self
            .db
            .process(CountVotesByCandidate { gathering_id, kind })
            .await?)
    }

    async fn voters_for(
        &self,
        gathering_id: i64,
        candidate_id: i64,
        kind: CandidateKind,
    ) -> Result<Vec<i64>, StoreError> {
        Ok(self
            .db
            .process(ListVotersForCandidate {
                gathering_id,
                candidate_id,
                kind,
            })
            .await?)
    }
}

#[async_trait]
impl ConfirmationStore for PgStore {
    async fn result_exists(&self, gathering_id: i64) -> Result<bool, StoreError> {
        Ok(self
            .db
            .process(ConfirmedResultExists { gathering_id })
            .await?)
    }

    async fn find_result(&self, gathering_id: i64) -> Result<Option<ConfirmedResult>, StoreError> {
        Ok(self.db.process(GetConfirmedResult { gathering_id }).await?)
    }

    #[tracing::instrument(skip_all, err, fields(gathering_id = insert.gathering_id))]
    async fn finalize(
        &self,
        insert: ConfirmedResultInsert,
        expected: GatheringStatus,
    ) -> Result<FinalizeOutcome, StoreError> {
        let mut tx = self.db.pool.begin().await?;

        // Status first: the row lock serializes concurrent finishers.
        let moved = Gathering::compare_and_set_status(
            &mut *tx,
            insert.gathering_id,
            expected,
            GatheringStatus::Confirmed,
        )
        .await?;
        if !moved {
            tx.rollback().await?;
            return Ok(FinalizeOutcome::StatusChanged);
        }

        let result = match ConfirmedResult::insert_tx(&mut tx, &insert).await {
            Ok(result) => result,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                info!("Confirmed result already exists, insert rejected");
                tx.rollback().await?;
                return Ok(FinalizeOutcome::AlreadyConfirmed);
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(FinalizeOutcome::Confirmed(result))
    }
}

use crate::entities::{GatheringKind, GatheringStatus};
use crate::framework::DatabaseProcessor;
use compact_str::CompactString;
use kanau::processor::Processor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Gathering {
    pub id: i64,
    /// Public lookup key carried in invite links.
    pub share_code: CompactString,
    pub title: String,
    pub host_name: String,
    pub host_token_hash: String,
    pub kind: GatheringKind,
    pub deadline: time::PrimitiveDateTime,
    pub status: GatheringStatus,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

#[derive(Debug, Clone)]
/// Look up a gathering by its share code.
pub struct GetGatheringByShareCode {
    pub share_code: CompactString,
}

impl Processor<GetGatheringByShareCode> for DatabaseProcessor {
    type Output = Option<Gathering>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetGatheringByShareCode")]
    async fn process(
        &self,
        query: GetGatheringByShareCode,
    ) -> Result<Option<Gathering>, sqlx::Error> {
        let gathering = sqlx::query_as::<_, Gathering>(
            r#"
            SELECT id, share_code, title, host_name, host_token_hash,
                   kind, deadline, status, created_at, updated_at
            FROM gatherings
            WHERE share_code = $1
            "#,
        )
        .bind(query.share_code.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(gathering)
    }
}

#[derive(Debug, Clone)]
/// List gatherings in `status` whose deadline is strictly before `deadline_before`.
pub struct ListGatheringsDue {
    pub status: GatheringStatus,
    pub deadline_before: time::PrimitiveDateTime,
}

impl Processor<ListGatheringsDue> for DatabaseProcessor {
    type Output = Vec<Gathering>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListGatheringsDue")]
    async fn process(&self, query: ListGatheringsDue) -> Result<Vec<Gathering>, sqlx::Error> {
        let gatherings = sqlx::query_as::<_, Gathering>(
            r#"
            SELECT id, share_code, title, host_name, host_token_hash,
                   kind, deadline, status, created_at, updated_at
            FROM gatherings
            WHERE status = $1 AND deadline < $2
            ORDER BY deadline ASC
            "#,
        )
        .bind(query.status)
        .bind(query.deadline_before)
        .fetch_all(&self.pool)
        .await?;
        Ok(gatherings)
    }
}

#[derive(Debug, Clone)]
/// Move a gathering from `from` to `to`, only if it is still in `from`.
///
/// Returns whether the row was updated.
pub struct CompareAndSetGatheringStatus {
    pub gathering_id: i64,
    pub from: GatheringStatus,
    pub to: GatheringStatus,
}

impl Processor<CompareAndSetGatheringStatus> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CompareAndSetGatheringStatus")]
    async fn process(&self, cmd: CompareAndSetGatheringStatus) -> Result<bool, sqlx::Error> {
        Gathering::compare_and_set_status(&self.pool, cmd.gathering_id, cmd.from, cmd.to).await
    }
}

impl Gathering {
    /// Move a gathering from `from` to `to` on any executor, pool or transaction.
    ///
    /// Inside a transaction the `UPDATE` takes the row lock, so concurrent
    /// finishers on the same gathering serialize here and the loser observes
    /// zero affected rows.
    pub async fn compare_and_set_status<'e, E>(
        executor: E,
        gathering_id: i64,
        from: GatheringStatus,
        to: GatheringStatus,
    ) -> Result<bool, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query(COMPARE_AND_SET_STATUS_SQL)
            .bind(gathering_id)
            .bind(from)
            .bind(to)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

/// `$1` id, `$2` expected status, `$3` new status.
const COMPARE_AND_SET_STATUS_SQL: &str = r#"
    UPDATE gatherings
    SET status = $3, updated_at = NOW() AT TIME ZONE 'UTC'
    WHERE id = $1 AND status = $2
"#;

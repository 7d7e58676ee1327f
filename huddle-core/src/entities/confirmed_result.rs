use crate::entities::ConfirmType;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// The single outcome of a gathering.
///
/// `confirmed_results.gathering_id` carries a `UNIQUE` constraint; it is the
/// storage-level guarantee that a gathering is confirmed at most once.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ConfirmedResult {
    pub id: i64,
    pub gathering_id: i64,
    pub time_candidate_id: Option<i64>,
    pub place_candidate_id: Option<i64>,
    pub confirmed_at: time::PrimitiveDateTime,
    pub confirmed_by: ConfirmType,
}

/// Data for inserting a confirmed result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedResultInsert {
    pub gathering_id: i64,
    pub time_candidate_id: Option<i64>,
    pub place_candidate_id: Option<i64>,
    pub confirmed_at: time::PrimitiveDateTime,
    pub confirmed_by: ConfirmType,
}

#[derive(Debug, Clone)]
/// Check whether a gathering already has a confirmed result.
pub struct ConfirmedResultExists {
    pub gathering_id: i64,
}

impl Processor<ConfirmedResultExists> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ConfirmedResultExists")]
    async fn process(&self, query: ConfirmedResultExists) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM confirmed_results WHERE gathering_id = $1)",
        )
        .bind(query.gathering_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[derive(Debug, Clone)]
/// Fetch the confirmed result of a gathering, if any.
pub struct GetConfirmedResult {
    pub gathering_id: i64,
}

impl Processor<GetConfirmedResult> for DatabaseProcessor {
    type Output = Option<ConfirmedResult>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetConfirmedResult")]
    async fn process(
        &self,
        query: GetConfirmedResult,
    ) -> Result<Option<ConfirmedResult>, sqlx::Error> {
        let result = sqlx::query_as::<_, ConfirmedResult>(
            r#"
            SELECT id, gathering_id, time_candidate_id, place_candidate_id,
                   confirmed_at, confirmed_by
            FROM confirmed_results
            WHERE gathering_id = $1
            "#,
        )
        .bind(query.gathering_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(result)
    }
}

impl ConfirmedResult {
    /// Insert a confirmed result within a transaction.
    ///
    /// A second insert for the same gathering fails with a unique violation.
    pub async fn insert_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        insert: &ConfirmedResultInsert,
    ) -> Result<ConfirmedResult, sqlx::Error> {
        let result = sqlx::query_as::<_, ConfirmedResult>(
            r#"
            INSERT INTO confirmed_results
                (gathering_id, time_candidate_id, place_candidate_id, confirmed_at, confirmed_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, gathering_id, time_candidate_id, place_candidate_id,
                      confirmed_at, confirmed_by
            "#,
        )
        .bind(insert.gathering_id)
        .bind(insert.time_candidate_id)
        .bind(insert.place_candidate_id)
        .bind(insert.confirmed_at)
        .bind(insert.confirmed_by)
        .fetch_one(&mut **tx)
        .await?;
        Ok(result)
    }
}

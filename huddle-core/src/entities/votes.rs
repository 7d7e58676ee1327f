use crate::entities::CandidateKind;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// One row of the per-candidate group count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct VoteCount {
    pub candidate_id: i64,
    pub votes: i64,
}

impl VoteCount {
    pub fn new(candidate_id: i64, votes: i64) -> Self {
        Self {
            candidate_id,
            votes,
        }
    }
}

#[derive(Debug, Clone)]
/// Count registered participants of a gathering.
pub struct CountParticipants {
    pub gathering_id: i64,
}

impl Processor<CountParticipants> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountParticipants")]
    async fn process(&self, query: CountParticipants) -> Result<u64, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM participants WHERE gathering_id = $1")
                .bind(query.gathering_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as u64)
    }
}

#[derive(Debug, Clone)]
/// Group-count votes by candidate for one gathering and one candidate kind.
///
/// Candidates nobody voted for do not appear in the output.
pub struct CountVotesByCandidate {
    pub gathering_id: i64,
    pub kind: CandidateKind,
}

impl Processor<CountVotesByCandidate> for DatabaseProcessor {
    type Output = Vec<VoteCount>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountVotesByCandidate")]
    async fn process(&self, query: CountVotesByCandidate) -> Result<Vec<VoteCount>, sqlx::Error> {
        let counts = sqlx::query_as::<_, VoteCount>(
            r#"
            SELECT candidate_id, COUNT(*) AS votes
            FROM votes
            WHERE gathering_id = $1 AND candidate_kind = $2
            GROUP BY candidate_id
            "#,
        )
        .bind(query.gathering_id)
        .bind(query.kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }
}

#[derive(Debug, Clone)]
/// List the participants who voted for one candidate.
pub struct ListVotersForCandidate {
    pub gathering_id: i64,
    pub candidate_id: i64,
    pub kind: CandidateKind,
}

impl Processor<ListVotersForCandidate> for DatabaseProcessor {
    type Output = Vec<i64>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListVotersForCandidate")]
    async fn process(&self, query: ListVotersForCandidate) -> Result<Vec<i64>, sqlx::Error> {
        let ids = sqlx::query_scalar(
            r#"
            SELECT participant_id
            FROM votes
            WHERE gathering_id = $1 AND candidate_id = $2 AND candidate_kind = $3
            ORDER BY participant_id ASC
            "#,
        )
        .bind(query.gathering_id)
        .bind(query.candidate_id)
        .bind(query.kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}

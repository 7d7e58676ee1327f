use crate::framework::DatabaseProcessor;
use crate::tiebreak::Ranked;
use kanau::processor::Processor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TimeCandidate {
    pub id: i64,
    pub gathering_id: i64,
    pub candidate_date: time::Date,
    pub start_time: time::Time,
    pub end_time: Option<time::Time>,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlaceCandidate {
    pub id: i64,
    pub gathering_id: i64,
    pub name: String,
    pub map_link: Option<String>,
    pub display_order: i32,
}

impl Ranked for TimeCandidate {
    fn identity(&self) -> i64 {
        self.id
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }
}

impl Ranked for PlaceCandidate {
    fn identity(&self) -> i64 {
        self.id
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }
}

/// Both candidate lists of one gathering, each sorted by `display_order`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatheringCandidates {
    pub time: Vec<TimeCandidate>,
    pub place: Vec<PlaceCandidate>,
}

impl GatheringCandidates {
    pub fn time_by_id(&self, id: i64) -> Option<&TimeCandidate> {
        self.time.iter().find(|c| c.id == id)
    }

    pub fn place_by_id(&self, id: i64) -> Option<&PlaceCandidate> {
        self.place.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone)]
/// Load the time and place candidates of a gathering.
pub struct GetGatheringCandidates {
    pub gathering_id: i64,
}

impl Processor<GetGatheringCandidates> for DatabaseProcessor {
    type Output = GatheringCandidates;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetGatheringCandidates")]
    async fn process(
        &self,
        query: GetGatheringCandidates,
    ) -> Result<GatheringCandidates, sqlx::Error> {
        let time = sqlx::query_as::<_, TimeCandidate>(
            r#"
            SELECT id, gathering_id, candidate_date, start_time, end_time, display_order
            FROM time_candidates
            WHERE gathering_id = $1
            ORDER BY display_order ASC
            "#,
        )
        .bind(query.gathering_id)
        .fetch_all(&self.pool)
        .await?;

        let place = sqlx::query_as::<_, PlaceCandidate>(
            r#"
            SELECT id, gathering_id, name, map_link, display_order
            FROM place_candidates
            WHERE gathering_id = $1
            ORDER BY display_order ASC
            "#,
        )
        .bind(query.gathering_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(GatheringCandidates { time, place })
    }
}

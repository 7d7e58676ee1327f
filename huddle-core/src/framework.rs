use sqlx::PgPool;

/// Runs query objects against the connection pool.
///
/// Every SQL statement in [`crate::entities`] is a small struct with a
/// `Processor<Query> for DatabaseProcessor` impl.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

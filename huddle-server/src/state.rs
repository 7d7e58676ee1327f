//! Application state shared across all request handlers.

use huddle_core::orchestrator::ConfirmationOrchestrator;
use huddle_core::store::PgStore;
use sqlx::PgPool;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used by the readiness check.
    pub db: PgPool,
    /// Confirmation engine over the Postgres store.
    pub orchestrator: ConfirmationOrchestrator<PgStore>,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        let store = Arc::new(PgStore::new(db.clone()));
        Self {
            db,
            orchestrator: ConfirmationOrchestrator::new(store),
        }
    }
}

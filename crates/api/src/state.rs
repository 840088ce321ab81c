use crate::error::ApiError;
use lifesheet_core::config::Settings;
use sqlx::PgPool;

/// Shared across all handlers. The pool is optional so the server can come up
/// in degraded mode when the database is unreachable; data routes then answer
/// 503 while health keeps responding.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: Option<PgPool>,
    pub settings: Settings,
}

impl AppState {
    pub fn db(&self) -> Result<&PgPool, ApiError> {
        self.pool.as_ref().ok_or(ApiError::DatabaseUnavailable)
    }
}

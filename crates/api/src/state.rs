use crate::config::Config;
use sqlx::PgPool;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub recurrence_expansion_days: i64,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            recurrence_expansion_days: config.recurrence_expansion_days,
        }
    }
}

/// Process configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub log_level: String,
    pub recurrence_expansion_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
        let recurrence_expansion_days = std::env::var("RECURRENCE_EXPANSION_DAYS")
            .ok()
            .and_then(|d| d.parse().ok())
            .unwrap_or(domain::DEFAULT_RECURRENCE_EXPANSION_DAYS);

        Self {
            database_url,
            port,
            log_level,
            recurrence_expansion_days,
        }
    }
}

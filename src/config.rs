use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub sql_logging: bool,
    /// Keep pooled connections open forever. An in-memory SQLite database lives
    /// only as long as its connection.
    pub pin_connections: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let sql_logging = env::var("DB_SQL_LOGGING")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);
        Ok(Self {
            database_url,
            max_connections,
            sql_logging,
            pin_connections: false,
        })
    }

    /// Single-connection in-memory SQLite, used by tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            sql_logging: false,
            pin_connections: true,
        }
    }
}


//! Application configuration loaded from environment variables.

use crate::errors::{LedgerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string (e.g. sqlite:./ledger.db)
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Upper bound on pooled SQLite connections
    pub max_connections: u32,
    /// How long (in seconds) a writer waits for the SQLite write lock
    pub busy_timeout_secs: u64,
    /// Wipe the tables and load the demo fixture at startup
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./ledger.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| LedgerError::Config("Invalid API_PORT".to_string()))?,
            max_connections: env_var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| LedgerError::Config("Invalid DB_MAX_CONNECTIONS".to_string()))?,
            busy_timeout_secs: env_var("DB_BUSY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| LedgerError::Config("Invalid DB_BUSY_TIMEOUT_SECS".to_string()))?,
            seed_demo_data: parse_flag(
                &env_var("SEED_DEMO_DATA").unwrap_or_else(|_| "false".to_string()),
            )
            .ok_or_else(|| LedgerError::Config("Invalid SEED_DEMO_DATA".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| LedgerError::Config(format!("Missing env var: {key}")))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

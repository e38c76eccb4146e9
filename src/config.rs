use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown STORE_BACKEND `{other}` (expected mysql or memory)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub server_addr: String,
    pub api_prefix: String,
    pub store_timeout: Duration,
    pub db_max_connections: u32,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: get(
                "DATABASE_URL",
                "mysql://root@localhost:3306/attendance_db",
            ),
            store_backend: get("STORE_BACKEND", "mysql").parse()?,
            server_addr: get("SERVER_ADDR", "0.0.0.0:8080"),
            api_prefix: get("API_PREFIX", "/v1"),
            store_timeout: Duration::from_secs(
                get("STORE_TIMEOUT_SECS", "10")
                    .parse()
                    .context("STORE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            db_max_connections: get("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            log_dir: get("LOG_DIR", "logs"),
        })
    }
}

use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use anyhow::{Result, anyhow};
use mealdb::remote::DEFAULT_ENDPOINT;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub mealdb_url: String,
    pub mealdb_key: String,
    pub request_timeout: Duration,
    pub max_sessions: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            mealdb_url: try_load("MEALDB_URL", DEFAULT_ENDPOINT)?,
            mealdb_key: load_key("MEALDB_KEY", "1"),
            request_timeout: Duration::from_millis(try_load("MEALDB_TIMEOUT_MS", "8000")?),
            max_sessions: try_load("RUST_MAX_SESSIONS", "1024")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            mealdb_url: DEFAULT_ENDPOINT.to_string(),
            mealdb_key: "1".to_string(),
            request_timeout: Duration::from_secs(8),
            max_sessions: 1024,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

/// Environment first, then the mounted secret, then the public test key.
fn load_key(key: &str, default: &str) -> String {
    var(key)
        .or_else(|| read_secret(key))
        .unwrap_or_else(|| {
            info!("{key} not set, using the public test key");
            default.to_string()
        })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}

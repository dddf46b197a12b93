use crate::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_HTTP_ADDR: &str = "OPEN_HOURS_HTTP_ADDR";
pub const ENV_DB_PATH: &str = "OPEN_HOURS_DB_PATH";
pub const ENV_SEED_CSV: &str = "OPEN_HOURS_SEED_CSV";
pub const ENV_CACHE_TTL_SECS: &str = "OPEN_HOURS_CACHE_TTL_SECS";
pub const ENV_CACHE_CAPACITY: &str = "OPEN_HOURS_CACHE_CAPACITY";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}' for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub http_addr: SocketAddr,
    pub db_path: PathBuf,
    pub seed_csv: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            db_path: PathBuf::from("open_hours.db"),
            seed_csv: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = value(ENV_HTTP_ADDR) {
            config.http_addr = parse_value(ENV_HTTP_ADDR, &raw)?;
        }
        if let Some(raw) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(raw.trim());
        }
        if let Some(raw) = value(ENV_SEED_CSV) {
            config.seed_csv = Some(PathBuf::from(raw.trim()));
        }
        if let Some(raw) = value(ENV_CACHE_TTL_SECS) {
            config.cache_ttl = Duration::from_secs(parse_value(ENV_CACHE_TTL_SECS, &raw)?);
        }
        if let Some(raw) = value(ENV_CACHE_CAPACITY) {
            config.cache_capacity = parse_value(ENV_CACHE_CAPACITY, &raw)?;
            if config.cache_capacity == 0 {
                return Err(ConfigError {
                    key: ENV_CACHE_CAPACITY,
                    value: raw,
                });
            }
        }
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError {
        key,
        value: raw.to_string(),
    })
}

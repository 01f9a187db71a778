use std::env;
use std::str::FromStr;

use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub mongo_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub bcrypt_cost: u32,
    pub bind_addr: String,
    pub frontend_origin: String,
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

/// Token lifetime in hours; must be positive and representable.
fn token_lifetime(hours: i64) -> Result<Duration, ConfigError> {
    Duration::try_hours(hours)
        .filter(|ttl| *ttl > Duration::zero())
        .ok_or_else(|| ConfigError::Invalid {
            name: "JWT_TTL_HOURS",
            value: hours.to_string(),
        })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let storage = match env::var("STORAGE").unwrap_or_else(|_| "mongo".to_string()).as_str() {
            "mongo" => StorageBackend::Mongo,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE",
                    value: other.to_string(),
                })
            }
        };
        let mongo_uri = match (storage, env::var("MONGO_URI")) {
            (_, Ok(uri)) => uri,
            (StorageBackend::Memory, Err(_)) => String::new(),
            (StorageBackend::Mongo, Err(_)) => return Err(ConfigError::Missing("MONGO_URI")),
        };

        Ok(Self {
            storage,
            mongo_uri,
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "teamtrack".to_string()),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_ttl: token_lifetime(parsed("JWT_TTL_HOURS", 24)?)?,
            bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }

    /// In-memory settings with a cheap bcrypt cost, for tests.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            storage: StorageBackend::Memory,
            mongo_uri: String::new(),
            database_name: "teamtrack_test".to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_ttl: Duration::hours(24),
            bcrypt_cost: 4,
            bind_addr: "127.0.0.1:0".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
        }
    }
}

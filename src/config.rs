//! Process configuration from the environment (and `.env` via dotenvy).

use crate::error::ConfigError;
use crate::list::{ListLimits, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Characters left as-is in URL userinfo (RFC 3986 unreserved).
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Load `.env` into the process environment if present and return its path.
/// Call before installing the tracing subscriber so `RUST_LOG` may come from `.env`.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(res: Result<PathBuf, dotenvy::Error>) -> Result<Option<PathBuf>, ConfigError> {
    match res {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Validation(format!(".env: {}", e))),
    }
}

/// Storage backend selected with `STORAGE` (`postgres` or `memory`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid {
                key: "STORAGE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub server_port: u16,
    pub storage: StorageBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub list_limits: ListLimits,
}

impl AppConfig {
    /// Read the process environment. See [`load_dotenv`] for `.env` files.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = get("DB_HOST").unwrap_or_else(|| "localhost".into());
                let port = get("DB_PORT").unwrap_or_else(|| "5432".into());
                let user = get("DB_USER").unwrap_or_else(|| "postgres".into());
                let password = get("DB_PASSWORD").unwrap_or_default();
                let name = get("DB_NAME").unwrap_or_else(|| "crafting".into());
                let user = utf8_percent_encode(&user, USERINFO).to_string();
                let auth = if password.is_empty() {
                    user
                } else {
                    format!("{}:{}", user, utf8_percent_encode(&password, USERINFO))
                };
                format!("postgres://{}@{}:{}/{}", auth, host, port, name)
            }
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let list_limits = ListLimits {
            default_per_page: parse_or(get("PAGINATION_DEFAULT_PER_PAGE"), "PAGINATION_DEFAULT_PER_PAGE", DEFAULT_PER_PAGE)?,
            max_per_page: parse_or(get("PAGINATION_MAX_PER_PAGE"), "PAGINATION_MAX_PER_PAGE", MAX_PER_PAGE)?,
        };
        if list_limits.max_per_page <= 0
            || list_limits.default_per_page <= 0
            || list_limits.default_per_page > list_limits.max_per_page
        {
            return Err(ConfigError::Validation(format!(
                "pagination default per page ({}) must be between 1 and the max ({})",
                list_limits.default_per_page, list_limits.max_per_page
            )));
        }

        Ok(AppConfig {
            server_port: parse_or(get("SERVER_PORT"), "SERVER_PORT", 8080)?,
            storage: get("STORAGE")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(StorageBackend::Postgres),
            database_url,
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 25)?,
            allowed_origins,
            request_timeout: Duration::from_secs(parse_or(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", 60)?),
            list_limits,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

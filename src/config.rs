use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3002;
const DEFAULT_DATABASE_NAME: &str = "users_db";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("STORE_BACKEND must be 'mongodb' or 'memory', got {0:?}")]
    UnknownBackend(String),
    #[error("{key} must be true or false, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error("DATABASE_URL must be set when STORE_BACKEND=mongodb")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::MongoDb => write!(f, "mongodb"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Runtime settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_name: String,
    pub store_backend: StoreBackend,
    pub allowed_origins: Vec<String>,
    /// Answer 200 with a `null` body instead of 404 for unknown ids.
    pub legacy_null_on_missing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            store_backend: StoreBackend::Memory,
            allowed_origins: split_list(DEFAULT_ALLOWED_ORIGINS),
            legacy_null_on_missing: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let database_url = get("DATABASE_URL");

        let store_backend = match get("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None if database_url.is_some() => StoreBackend::MongoDb,
            None => StoreBackend::Memory,
        };
        if store_backend == StoreBackend::MongoDb && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let database_name = get("DATABASE_NAME")
            .or_else(|| database_url.as_deref().and_then(database_name_from_url))
            .unwrap_or(defaults.database_name);

        let legacy_null_on_missing = match get("LEGACY_NULL_ON_MISSING") {
            Some(raw) => parse_bool("LEGACY_NULL_ON_MISSING", &raw)?,
            None => defaults.legacy_null_on_missing,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            database_url,
            database_name,
            store_backend,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.allowed_origins),
            legacy_null_on_missing,
        })
    }
}

/// `mongodb://host:27017/name?opts` -> `name`
fn database_name_from_url(url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let (_, path) = without_scheme.split_once('/')?;
    let name = path.split('?').next().unwrap_or_default();
    (!name.is_empty()).then(|| name.to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}

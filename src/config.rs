use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Clearwatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DATABASE_FILE: &str = "clearwatch.db";

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "clearwatch_lib=info,clearwatch=info,tower_http=warn"
}

/// ~/Clearwatch/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(ConfigError::Invalid {
                key: "CLEARWATCH_STORE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub store: StoreKind,
    pub db_path: PathBuf,
    /// Supersede stale context-aware alerts instead of accumulating them.
    pub supersede_alerts: bool,
}

impl AppConfig {
    /// Read configuration from `CLEARWATCH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_raw = lookup("CLEARWATCH_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "CLEARWATCH_ADDR",
            value: addr_raw.clone(),
        })?;

        let store = match lookup("CLEARWATCH_STORE") {
            Some(value) => value.parse()?,
            None => StoreKind::Memory,
        };

        let db_path = lookup("CLEARWATCH_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let supersede_alerts = match lookup("CLEARWATCH_SUPERSEDE_ALERTS") {
            Some(value) => parse_flag("CLEARWATCH_SUPERSEDE_ALERTS", &value)?,
            None => false,
        };

        Ok(Self {
            addr,
            store,
            db_path,
            supersede_alerts,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            store: StoreKind::Memory,
            db_path: default_db_path(),
            supersede_alerts: false,
        }
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

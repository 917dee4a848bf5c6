//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::index::IndexConfig;
use crate::mbta::MbtaConfig;

/// Error reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be used
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to listen on
    pub addr: SocketAddr,

    /// Live MBTA API settings
    pub mbta: MbtaConfig,

    /// Index building and caching
    pub index: IndexConfig,

    /// Serve a static network from this JSON file instead of the live API
    pub fixture: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `MBTA_API_KEY` | sent as `x-api-key` |
    /// | `MBTA_BASE_URL` | API base URL |
    /// | `ROUTE_PLANNER_ADDR` | listen address (default `127.0.0.1:3000`) |
    /// | `ROUTE_PLANNER_CACHE_DIR` | index cache directory (default `output`) |
    /// | `ROUTE_PLANNER_NO_CACHE` | `1`/`true`/`yes` disables the disk cache |
    /// | `ROUTE_PLANNER_FIXTURE` | static network JSON to serve from |
    /// | `ROUTE_PLANNER_FETCH_TIMEOUT_SECS` | per-request time limit |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(key) = get("MBTA_API_KEY") {
            config.mbta.api_key = Some(key);
        }
        if let Some(url) = get("MBTA_BASE_URL") {
            config.mbta = config.mbta.with_base_url(url);
        }

        if let Some(raw) = get("ROUTE_PLANNER_ADDR") {
            config.addr = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("ROUTE_PLANNER_ADDR", &raw, e))?;
        }

        if let Some(dir) = get("ROUTE_PLANNER_CACHE_DIR") {
            config.index = config.index.with_cache_dir(dir);
        }
        if let Some(raw) = get("ROUTE_PLANNER_NO_CACHE")
            && parse_flag("ROUTE_PLANNER_NO_CACHE", &raw)?
        {
            config.index = config.index.without_cache();
        }

        config.fixture = get("ROUTE_PLANNER_FIXTURE").map(PathBuf::from);

        if let Some(raw) = get("ROUTE_PLANNER_FETCH_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("ROUTE_PLANNER_FETCH_TIMEOUT_SECS", &raw, e))?;
            if secs == 0 {
                return Err(ConfigError::invalid(
                    "ROUTE_PLANNER_FETCH_TIMEOUT_SECS",
                    &raw,
                    "must be at least 1",
                ));
            }
            config.mbta = config.mbta.with_timeout(secs);
            config.index = config.index.with_fetch_timeout(secs);
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            mbta: MbtaConfig::default(),
            index: IndexConfig::default(),
            fixture: None,
        }
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, raw, "expected a boolean")),
    }
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Number of objects requested per list call, matching kubectl.
pub const DEFAULT_CHUNK_SIZE: u32 = 500;

/// What `list` does when a backup job it resolved cannot be fetched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchErrorPolicy {
    /// Skip the job, keep listing, report all failures at the end.
    #[serde(rename = "aggregate")]
    Aggregate,
    /// Stop at the first failure without printing anything.
    #[serde(rename = "fail-fast")]
    FailFast,
}

impl Default for FetchErrorPolicy {
    fn default() -> Self {
        FetchErrorPolicy::Aggregate
    }
}

impl FromStr for FetchErrorPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "aggregate" => Ok(FetchErrorPolicy::Aggregate),
            "fail-fast" | "failfast" => Ok(FetchErrorPolicy::FailFast),
            other => Err(crate::Error::Config(format!(
                "unknown fetch policy {:?}, expected \"aggregate\" or \"fail-fast\"",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub list: ListConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// 0 disables chunking.
    pub chunk_size: u32,
    #[serde(default)]
    pub fetch_policy: FetchErrorPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chunk_size: u32 = match lookup("BACKUPCTL_CHUNK_SIZE") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                crate::Error::Config(format!(
                    "BACKUPCTL_CHUNK_SIZE must be a non-negative integer, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_CHUNK_SIZE,
        };

        let fetch_policy = match lookup("BACKUPCTL_FETCH_POLICY") {
            Some(raw) => raw.trim().parse()?,
            None => FetchErrorPolicy::default(),
        };

        let level = lookup("BACKUPCTL_LOG_LEVEL")
            .filter(|level| !level.trim().is_empty())
            .unwrap_or_else(|| "warn".to_string());

        Ok(Config {
            list: ListConfig {
                chunk_size,
                fetch_policy,
            },
            logging: LoggingConfig { level },
        })
    }
}

/// Parse a log level or `EnvFilter` directive list, e.g. `backupctl=debug,kube=info`.
pub fn env_filter(directives: &str) -> crate::Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        crate::Error::Config(format!("invalid log level {:?}: {}", directives, e))
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list: ListConfig {
                chunk_size: DEFAULT_CHUNK_SIZE,
                fetch_policy: FetchErrorPolicy::Aggregate,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

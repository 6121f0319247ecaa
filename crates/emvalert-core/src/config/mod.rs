mod env;

use crate::error::{AlertError, Result};
use crate::watermark::DEFAULT_RETENTION_DAYS;

use self::env::{process_env, read_env_u32, read_env_u64, read_non_empty_env, read_raw_env};

pub use self::env::{EnvLookup, parse_env_bool};

const ENV_DATA_URL: &str = "DATA_URL";
const ENV_DELTA_URL: &str = "DELTA_URL";
const ENV_HTTP_TIMEOUT_MS: &str = "HTTP_TIMEOUT_MS";
const ENV_UPDATE_TIME: &str = "UPDATE_TIME";
const ENV_PURGE_DAYS: &str = "PURGE_DAYS";
const ENV_DEBUG: &str = "DEBUG";
const ENV_POST_TO_BSKY: &str = "POST_TO_BSKY";
const ENV_BLUESKY_SERVICE: &str = "BLUESKY_SERVICE";
const ENV_BLUESKY_USERNAME: &str = "BLUESKY_USERNAME";
const ENV_BLUESKY_PASSWORD: &str = "BLUESKY_PASSWORD";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_BLUESKY_SERVICE: &str = "https://bsky.social";
const MIN_HTTP_TIMEOUT_MS: u64 = 200;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub poll: PollConfig,
    pub posting: PostingConfig,
    pub verbose: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            feed: FeedConfig::from_lookup(lookup),
            poll: PollConfig::from_lookup(lookup),
            posting: PostingConfig::from_lookup(lookup),
            verbose: parse_env_bool(lookup(ENV_DEBUG).as_deref()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub data_url: Option<String>,
    pub delta_url: Option<String>,
    pub timeout_ms: u64,
}

impl FeedConfig {
    fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            data_url: read_non_empty_env(lookup, ENV_DATA_URL),
            delta_url: read_non_empty_env(lookup, ENV_DELTA_URL),
            timeout_ms: read_env_u64(
                lookup,
                ENV_HTTP_TIMEOUT_MS,
                DEFAULT_HTTP_TIMEOUT_MS,
                MIN_HTTP_TIMEOUT_MS,
            ),
        }
    }

    /// Both feed URLs, or a configuration error naming the first one missing.
    pub fn endpoints(&self) -> Result<(&str, &str)> {
        let data_url = self
            .data_url
            .as_deref()
            .ok_or_else(|| AlertError::Config(format!("{ENV_DATA_URL} is not set")))?;
        let delta_url = self
            .delta_url
            .as_deref()
            .ok_or_else(|| AlertError::Config(format!("{ENV_DELTA_URL} is not set")))?;
        Ok((data_url, delta_url))
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            data_url: None,
            delta_url: None,
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub retention_days: u32,
}

impl PollConfig {
    fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            interval_secs: read_env_u64(lookup, ENV_UPDATE_TIME, DEFAULT_POLL_INTERVAL_SECS, 1),
            retention_days: read_env_u32(lookup, ENV_PURGE_DAYS, DEFAULT_RETENTION_DAYS, 1),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

#[derive(Clone)]
pub struct PostingConfig {
    pub enabled: bool,
    pub service: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for PostingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostingConfig")
            .field("enabled", &self.enabled)
            .field("service", &self.service)
            .field("username", &self.username)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl PostingConfig {
    fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            enabled: parse_env_bool(lookup(ENV_POST_TO_BSKY).as_deref()),
            service: read_non_empty_env(lookup, ENV_BLUESKY_SERVICE)
                .map(|raw| raw.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BLUESKY_SERVICE.to_string()),
            username: read_non_empty_env(lookup, ENV_BLUESKY_USERNAME),
            password: read_raw_env(lookup, ENV_BLUESKY_PASSWORD),
            timeout_ms: read_env_u64(
                lookup,
                ENV_HTTP_TIMEOUT_MS,
                DEFAULT_HTTP_TIMEOUT_MS,
                MIN_HTTP_TIMEOUT_MS,
            ),
        }
    }

    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(AlertError::Config(format!(
                "{ENV_BLUESKY_USERNAME} and {ENV_BLUESKY_PASSWORD} are required when posting"
            ))),
        }
    }
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service: DEFAULT_BLUESKY_SERVICE.to_string(),
            username: None,
            password: None,
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

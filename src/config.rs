use std::env;
use std::time::Duration;

use crate::avatar::{
    AvatarConfig, DEFAULT_AVATAR_URL, DEFAULT_BODY_FALLBACK_URL, DEFAULT_BODY_URL,
    DEFAULT_PLACEHOLDER_URL,
};
use crate::loader::DataSource;

pub const DEFAULT_DATA_FILE: &str = "data/results.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub source: DataSource,
    pub request_timeout: Duration,
    pub avatars: AvatarConfig,
}

impl Config {
    /// Reads `.env.local`, `.env` and the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());
        let source = get("TIERLIST_DATA")
            .map(|raw| DataSource::parse(&raw))
            .unwrap_or_else(|| DataSource::parse(DEFAULT_DATA_FILE));
        let timeout = get("TIERLIST_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);
        let avatars = AvatarConfig {
            avatar_template: get("TIERLIST_AVATAR_URL")
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            body_template: get("TIERLIST_BODY_URL").unwrap_or_else(|| DEFAULT_BODY_URL.to_string()),
            body_fallback_template: get("TIERLIST_BODY_FALLBACK_URL")
                .unwrap_or_else(|| DEFAULT_BODY_FALLBACK_URL.to_string()),
            placeholder_url: get("TIERLIST_PLACEHOLDER_URL")
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_URL.to_string()),
        };
        Self {
            source,
            request_timeout: Duration::from_secs(timeout),
            avatars,
        }
    }

    /// A positional argument takes precedence over `TIERLIST_DATA`.
    pub fn with_source_arg(mut self, arg: Option<String>) -> Self {
        if let Some(raw) = arg.filter(|a| !a.trim().is_empty()) {
            self.source = DataSource::parse(&raw);
        }
        self
    }
}

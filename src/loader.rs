use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, PRAGMA, USER_AGENT};

use crate::error::LoadError;
use crate::http_client::http_client;
use crate::results::{parse_results_json, ResultsDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        let cleaned = raw.trim();
        let lower = cleaned.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(cleaned.to_string())
        } else {
            DataSource::Path(PathBuf::from(cleaned))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Loads the results document, bypassing any HTTP cache. No retry.
pub fn load(source: &DataSource, timeout: Duration) -> Result<ResultsDocument, LoadError> {
    let body = match source {
        DataSource::Path(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?,
        DataSource::Url(url) => fetch_fresh(url, timeout)?,
    };
    let doc = parse_results_json(&body)?;
    for player in &doc.players {
        for (gamemode, label) in player.unrecognized_tiers() {
            log::warn!(
                "ignoring unknown tier {label:?} for {} in {}",
                player.username,
                gamemode.key()
            );
        }
    }
    log::info!("loaded {} players from {source}", doc.players.len());
    Ok(doc)
}

fn fetch_fresh(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let client = http_client(timeout)?;
    let resp = client
        .get(cache_busted(url, Utc::now().timestamp_millis()))
        .header(USER_AGENT, "Mozilla/5.0")
        .header(CACHE_CONTROL, "no-cache, no-store")
        .header(PRAGMA, "no-cache")
        .send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp.text()?)
}

fn cache_busted(url: &str, stamp: i64) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let sep = if base.contains('?') { '&' } else { '?' };
    match fragment {
        Some(fragment) => format!("{base}{sep}_ts={stamp}#{fragment}"),
        None => format!("{base}{sep}_ts={stamp}"),
    }
}

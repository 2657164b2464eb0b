use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http {status} from {url}")]
    Status { status: u16, url: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid results json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("results document has no players list")]
    MissingPlayers,
}

/// Detail view requested for a uuid that is not in the loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no player with uuid {uuid}")]
pub struct NotFound {
    pub uuid: String,
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("filesystem error on {path}: {source}")]
    Fs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize tracker: {0}")]
    Serialize(#[from] serde_json::Error),
}

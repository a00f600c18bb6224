use std::path::PathBuf;

use thiserror::Error;

use crate::{storage::error::TrackerError, tools::error::ToolError};

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("unrecognized source url: {0}")]
    UnrecognizedUrl(String),

    #[error("failed to list collection {url}: {source}")]
    Listing {
        url: String,
        #[source]
        source: ToolError,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

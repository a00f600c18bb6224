use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use log::{error, info};

use crate::{
    domain::{item::ItemId, source::SourceUrl},
    pipeline::error::{PipelineError, ResolutionError},
    storage::{error::TrackerError, tracker::Tracker},
    tools::Retriever,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// number of ids the source resolved to
    pub resolved: usize,
    /// already in the tracker, not downloaded again
    pub skipped: Vec<ItemId>,
    pub fetched: Vec<ItemId>,
    pub failed: Vec<ItemId>,
}

/// Downloads items that are not in the tracker yet
pub struct Fetcher<R> {
    retriever: R,
    tracker: Tracker,
    download_dir: PathBuf,
}

impl<R: Retriever> Fetcher<R> {
    pub fn new(retriever: R, tracker: Tracker, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            retriever,
            tracker,
            download_dir: download_dir.into(),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Turns a source url into item ids, in playlist order with duplicates removed
    pub fn resolve_ids(&self, source_url: &str) -> Result<Vec<ItemId>, ResolutionError> {
        let source = SourceUrl::classify(source_url)
            .ok_or_else(|| ResolutionError::UnrecognizedUrl(source_url.to_string()))?;

        let ids = match source {
            SourceUrl::Single(id) => vec![id],
            SourceUrl::Collection(url) => {
                let ids = self
                    .retriever
                    .list(&url)
                    .map_err(|source| ResolutionError::Listing { url, source })?;
                let mut seen = HashSet::new();
                ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
            }
        };

        Ok(ids)
    }

    /// Downloads every id absent from the tracker, recording each success right away.
    ///
    /// A failed download is logged and does not stop the remaining ones.
    pub fn fetch_ids(&self, ids: Vec<ItemId>) -> Result<FetchSummary, TrackerError> {
        let tracked = self.tracker.load_for_update()?;
        let resolved = ids.len();

        let (skipped, new): (Vec<_>, Vec<_>) =
            ids.into_iter().partition(|id| tracked.contains(id.as_str()));

        let mut summary = FetchSummary {
            resolved,
            skipped,
            ..Default::default()
        };

        if new.is_empty() {
            info!("No new items to download ({resolved} already downloaded)");
            return Ok(summary);
        }

        info!("Found {} new items", new.len());

        for id in new {
            info!("Downloading {}", id.watch_url());
            match self.retriever.fetch_one(&id, &self.download_dir) {
                Ok(()) => {
                    self.tracker.mark_processed(id.as_str())?;
                    summary.fetched.push(id);
                }
                Err(e) => {
                    error!("Error downloading {}: {e}", id.watch_url());
                    summary.failed.push(id);
                }
            }
        }

        Ok(summary)
    }

    /// [`Fetcher::resolve_ids`] followed by [`Fetcher::fetch_ids`].
    ///
    /// The pipeline calls the two steps itself to log its state in between; keep them in sync.
    pub fn fetch_new(&self, source_url: &str) -> Result<FetchSummary, PipelineError> {
        let ids = self.resolve_ids(source_url)?;
        Ok(self.fetch_ids(ids)?)
    }
}

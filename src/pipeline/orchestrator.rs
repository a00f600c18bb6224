//! Sequences downloading and separation for one source url

use std::{fmt::Display, path::PathBuf};

use log::{error, info};

use crate::{
    config::Config,
    pipeline::{
        error::PipelineError,
        fetcher::{FetchSummary, Fetcher},
        separator::{SeparationSummary, Separator},
    },
    storage::{fs::scan_audio_files, tracker::Tracker},
    tools::{Retriever, StemSplitter, demucs::Demucs, ytdlp::YtDlp},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Resolving,
    Fetching,
    Scanning,
    Separating,
    Done,
    Failed,
}

impl PipelineState {
    /// The only state reachable from `self`, apart from `Resolving -> Failed`
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Resolving),
            Self::Resolving => Some(Self::Fetching),
            Self::Fetching => Some(Self::Scanning),
            Self::Scanning => Some(Self::Separating),
            Self::Separating => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    pub fn can_advance_to(self, next: Self) -> bool {
        self.successor() == Some(next) || (self == Self::Resolving && next == Self::Failed)
    }

    fn advance(&mut self, next: Self) {
        debug_assert!(self.can_advance_to(next), "{self} -> {next}");
        info!("Pipeline: {self} -> {next}");
        *self = next;
    }
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Fetching => "fetching",
            Self::Scanning => "scanning",
            Self::Separating => "separating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub fetch: FetchSummary,
    pub separation: SeparationSummary,
}

pub struct Pipeline<R, S> {
    fetcher: Fetcher<R>,
    separator: Separator<S>,
    audio_extension: String,
}

impl Pipeline<YtDlp, Demucs> {
    /// Pipeline driving the real `yt-dlp` and demucs executables
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            YtDlp::new(&config.retriever),
            Demucs::new(&config.separator),
        )
    }
}

impl<R: Retriever, S: StemSplitter> Pipeline<R, S> {
    pub fn new(config: &Config, retriever: R, splitter: S) -> Self {
        let paths = &config.paths;
        Self {
            fetcher: Fetcher::new(
                retriever,
                Tracker::new(&paths.tracker_file),
                &paths.download_dir,
            ),
            separator: Separator::new(
                splitter,
                Tracker::new(&paths.separated_ledger),
                &paths.separated_dir,
            ),
            audio_extension: config.retriever.audio_format.clone(),
        }
    }

    pub fn fetcher(&self) -> &Fetcher<R> {
        &self.fetcher
    }

    /// Audio files waiting in the download directory, including leftovers of earlier runs
    pub fn scan_downloads(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let dir = self.fetcher.download_dir();
        scan_audio_files(dir, &self.audio_extension).map_err(|source| PipelineError::Scan {
            path: dir.to_path_buf(),
            source,
        })
    }

    /// Downloads new items of `source_url`, then separates every audio file in the download directory.
    ///
    /// Only an unusable url stops the run early. Failures of single items are
    /// logged and the run still ends in [`PipelineState::Done`].
    pub fn run_pipeline(&self, source_url: &str) -> Result<PipelineReport, PipelineError> {
        let mut state = PipelineState::Idle;

        state.advance(PipelineState::Resolving);
        let ids = match self.fetcher.resolve_ids(source_url) {
            Ok(ids) => ids,
            Err(e) => {
                error!("{e}");
                state.advance(PipelineState::Failed);
                return Err(e.into());
            }
        };

        state.advance(PipelineState::Fetching);
        let fetch = self.fetcher.fetch_ids(ids)?;

        state.advance(PipelineState::Scanning);
        let files = self.scan_downloads()?;
        info!("Found {} audio files to separate", files.len());

        state.advance(PipelineState::Separating);
        let separation = self.separator.separate_all(&files)?;

        state.advance(PipelineState::Done);
        info!(
            "Pipeline finished: {} downloaded, {} download failures, {} separated, {} separation failures",
            fetch.fetched.len(),
            fetch.failed.len(),
            separation.separated.len(),
            separation.failed.len()
        );

        Ok(PipelineReport {
            state,
            fetch,
            separation,
        })
    }
}

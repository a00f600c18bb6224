use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::{
    domain::hash::AudioHash,
    storage::{error::TrackerError, tracker::Tracker},
    tools::StemSplitter,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeparationSummary {
    pub separated: Vec<PathBuf>,
    /// content already separated in an earlier run
    pub already_separated: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Runs the stem splitter over audio files, remembering which contents were split
pub struct Separator<S> {
    splitter: S,
    ledger: Tracker,
    output_dir: PathBuf,
}

impl<S: StemSplitter> Separator<S> {
    pub fn new(splitter: S, ledger: Tracker, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            splitter,
            ledger,
            output_dir: output_dir.into(),
        }
    }

    pub fn ledger(&self) -> &Tracker {
        &self.ledger
    }

    /// Splits one file. Failures are logged with the tool's diagnostics and reported as `false`.
    pub fn separate(&self, audio: &Path) -> bool {
        info!("Processing file with demucs: {}", audio.display());
        match self.splitter.separate_one(audio, &self.output_dir) {
            Ok(output) => {
                info!("Demucs output for {}: {}", audio.display(), output.stdout);
                debug!("Demucs diagnostics for {}: {}", audio.display(), output.stderr);
                true
            }
            Err(e) => {
                error!("Error processing {} with demucs: {e}", audio.display());
                false
            }
        }
    }

    /// Splits each file whose content is not in the ledger yet, one at a time
    pub fn separate_all(&self, files: &[PathBuf]) -> Result<SeparationSummary, TrackerError> {
        let mut done = self.ledger.load_for_update()?;
        let mut summary = SeparationSummary::default();

        for file in files {
            let hash = match AudioHash::from_file(file) {
                Ok(hash) => hash.to_hex(),
                Err(e) => {
                    error!("Failed to read {}: {e}", file.display());
                    summary.failed.push(file.clone());
                    continue;
                }
            };

            if done.contains(&hash) {
                info!("Skipping {}, already separated", file.display());
                summary.already_separated.push(file.clone());
                continue;
            }

            if self.separate(file) {
                self.ledger.mark_processed(&hash)?;
                done.insert(hash);
                summary.separated.push(file.clone());
            } else {
                summary.failed.push(file.clone());
            }
        }

        Ok(summary)
    }
}

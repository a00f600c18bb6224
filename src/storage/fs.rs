//! Module to scan the download directory for audio files

use walkdir::WalkDir;

use std::{
    io,
    path::{Path, PathBuf},
};

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Lists files directly inside `dir` with the given extension, sorted by path.
///
/// Subdirectories are not descended into. A missing directory yields no files.
pub fn scan_audio_files(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!(
                    "error while scanning dir {}, skipping an entry: {err}",
                    dir.display()
                );
                None
            }
        })
        .map(|e| e.into_path())
        .filter(|path| path.is_file())
        .filter(|path| has_extension(path, extension))
        .collect::<Vec<_>>();

    files.sort();
    Ok(files)
}

//! In-memory stand-ins for the external tools

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use crate::{
    domain::item::ItemId,
    tools::{Retriever, StemSplitter, error::ToolError, process::ToolOutput},
};

fn failed(program: &str, stderr: String) -> ToolError {
    ToolError::Failed {
        program: program.to_string(),
        status: "exit status: 1".to_string(),
        stderr,
    }
}

/// Lists configured collections and "downloads" by writing `<id>.<ext>` into the target directory
#[derive(Debug, Default)]
pub struct FakeRetriever {
    pub collections: HashMap<String, Vec<String>>,
    pub failing: HashSet<String>,
    pub extension: String,
    pub listed: RefCell<Vec<String>>,
    pub fetched: RefCell<Vec<String>>,
}

impl FakeRetriever {
    pub fn new() -> Self {
        Self {
            extension: "wav".to_string(),
            ..Default::default()
        }
    }

    pub fn with_collection(mut self, url: &str, ids: &[&str]) -> Self {
        self.collections
            .insert(url.to_string(), ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl Retriever for FakeRetriever {
    fn list(&self, collection_url: &str) -> Result<Vec<ItemId>, ToolError> {
        self.listed.borrow_mut().push(collection_url.to_string());
        let ids = self
            .collections
            .get(collection_url)
            .ok_or_else(|| failed("yt-dlp", format!("ERROR: no playlist at {collection_url}")))?;
        Ok(ids.iter().filter_map(|id| ItemId::new(id)).collect())
    }

    fn fetch_one(&self, id: &ItemId, dest_dir: &Path) -> Result<(), ToolError> {
        self.fetched.borrow_mut().push(id.to_string());
        if self.failing.contains(id.as_str()) {
            return Err(failed("yt-dlp", format!("ERROR: [youtube] {id}: Video unavailable")));
        }
        let path = dest_dir.join(format!("{id}.{}", self.extension));
        std::fs::write(&path, format!("audio of {id}"))
            .map_err(|e| failed("yt-dlp", e.to_string()))?;
        Ok(())
    }
}

/// Records every separation and writes one stem per input
#[derive(Debug, Default)]
pub struct FakeSplitter {
    /// file names that fail to separate
    pub failing: HashSet<String>,
    pub calls: RefCell<Vec<PathBuf>>,
}

impl FakeSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl StemSplitter for FakeSplitter {
    fn separate_one(&self, audio: &Path, out_dir: &Path) -> Result<ToolOutput, ToolError> {
        self.calls.borrow_mut().push(audio.to_path_buf());

        let name = audio
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_name = audio
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if self.failing.contains(&file_name) {
            return Err(failed("demucs", format!("failed to decode {file_name}")));
        }

        let stem_dir = out_dir.join("htdemucs").join(&name);
        std::fs::create_dir_all(&stem_dir).map_err(|e| failed("demucs", e.to_string()))?;
        std::fs::write(stem_dir.join("vocals.wav"), b"vocals")
            .map_err(|e| failed("demucs", e.to_string()))?;

        Ok(ToolOutput {
            stdout: format!("Separated tracks will be stored in {}", stem_dir.display()),
            stderr: String::new(),
        })
    }
}

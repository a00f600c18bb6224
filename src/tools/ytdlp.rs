//! [`Retriever`] backed by the `yt-dlp` command line tool

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    config::RetrieverConfig,
    domain::item::ItemId,
    tools::{Retriever, error::ToolError, process},
};

/// Output template: one file per item, named after its title
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    audio_format: String,
    extra_args: Vec<String>,
}

impl YtDlp {
    pub fn new(config: &RetrieverConfig) -> Self {
        Self {
            program: config.program.clone(),
            audio_format: config.audio_format.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    fn base_args(&self) -> Vec<OsString> {
        self.extra_args.iter().map(OsString::from).collect()
    }

    pub fn list_args(&self, collection_url: &str) -> Vec<OsString> {
        let mut args = self.base_args();
        args.extend(
            ["--flat-playlist", "--print", "%(id)s", collection_url]
                .into_iter()
                .map(OsString::from),
        );
        args
    }

    pub fn download_args(&self, id: &ItemId, dest_dir: &Path) -> Vec<OsString> {
        let mut args = self.base_args();
        args.extend(
            ["-x", "--audio-format", self.audio_format.as_str(), "--output"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(dest_dir.join(OUTPUT_TEMPLATE).into_os_string());
        args.push(id.watch_url().into());
        args
    }
}

/// one id per line, blank lines dropped
pub fn parse_id_lines(stdout: &str) -> Vec<ItemId> {
    stdout.lines().filter_map(ItemId::new).collect()
}

impl Retriever for YtDlp {
    fn list(&self, collection_url: &str) -> Result<Vec<ItemId>, ToolError> {
        let output = process::run(&self.program, &self.list_args(collection_url))?;
        Ok(parse_id_lines(&output.stdout))
    }

    fn fetch_one(&self, id: &ItemId, dest_dir: &Path) -> Result<(), ToolError> {
        let output = process::run(&self.program, &self.download_args(id, dest_dir))?;
        debug!("yt-dlp output for {id}: {}", output.stdout);
        Ok(())
    }
}

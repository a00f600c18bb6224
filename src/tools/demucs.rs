//! [`StemSplitter`] backed by demucs

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    config::SeparatorConfig,
    tools::{StemSplitter, error::ToolError, process, process::ToolOutput},
};

#[derive(Debug, Clone)]
pub struct Demucs {
    program: PathBuf,
    args: Vec<String>,
}

impl Demucs {
    pub fn new(config: &SeparatorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    pub fn separate_args(&self, audio: &Path, out_dir: &Path) -> Vec<OsString> {
        let mut args = self.args.iter().map(OsString::from).collect::<Vec<_>>();
        args.push("--out".into());
        args.push(out_dir.as_os_str().to_owned());
        args.push(audio.as_os_str().to_owned());
        args
    }
}

impl StemSplitter for Demucs {
    fn separate_one(&self, audio: &Path, out_dir: &Path) -> Result<ToolOutput, ToolError> {
        process::run(&self.program, &self.separate_args(audio, out_dir))
    }
}

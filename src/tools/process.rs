//! Blocking invocation of external programs with captured output

use std::{ffi::OsString, path::Path, process::Command};

use log::debug;

use crate::tools::error::ToolError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `program` to completion. A non-zero exit status is an error carrying the captured stderr.
pub fn run(program: &Path, args: &[OsString]) -> Result<ToolOutput, ToolError> {
    let name = program.to_string_lossy().to_string();
    debug!("running {name} {args:?}");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| ToolError::Launch {
            program: name.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        return Err(ToolError::Failed {
            program: name,
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

//! Interactive prompt: one url per line, one pipeline run per url

use std::io::{self, BufRead, Write};

use log::error;

use crate::pipeline::{error::PipelineError, orchestrator::PipelineReport};

/// What the status line shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    InvalidInput,
    Running,
    Completed,
    Failed,
}

impl Status {
    pub fn message(self) -> &'static str {
        match self {
            Status::Idle => "Enter YouTube Playlist or Video URL:",
            Status::InvalidInput => "Please enter a valid URL.",
            Status::Running => "Running pipeline...",
            Status::Completed => "Pipeline completed successfully.",
            Status::Failed => "An error occurred. Check log for details.",
        }
    }
}

fn show(output: &mut impl Write, status: Status) -> io::Result<()> {
    writeln!(output, "{}", status.message())?;
    output.flush()
}

/// Reads urls from `input` until EOF, `quit` or `exit`, running `run_pipeline` for each.
///
/// Pipeline errors are logged and shown as a generic failure; the prompt always comes back.
pub fn run_shell<F>(
    input: &mut impl BufRead,
    output: &mut impl Write,
    mut run_pipeline: F,
) -> io::Result<()>
where
    F: FnMut(&str) -> Result<PipelineReport, PipelineError>,
{
    let mut line = String::new();

    loop {
        show(output, Status::Idle)?;
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let url = line.trim();
        match url {
            "" => {
                show(output, Status::InvalidInput)?;
                continue;
            }
            "quit" | "exit" => break,
            _ => {}
        }

        show(output, Status::Running)?;
        let status = match run_pipeline(url) {
            Ok(_) => Status::Completed,
            Err(e) => {
                error!("Pipeline failed for {url}: {e}");
                Status::Failed
            }
        };
        show(output, status)?;
    }

    Ok(())
}

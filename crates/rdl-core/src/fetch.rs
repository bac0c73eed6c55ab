//! Media fetching through an external downloader.
//!
//! No retry and no cleanup: a failed download leaves whatever the tool wrote.

use std::process::Command;
use std::time::Duration;

use crate::config::ToolsConfig;
use crate::probe::exit_code;
use crate::process::{self, ProcessError};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("downloader exited with {code}: {stderr}")]
    Exit { code: String, stderr: String },
}

/// Capability to download a URL to a path built from `output_template`. Blocking.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, output_template: &str) -> Result<(), FetchError>;
}

/// Runs `<program> <fetch_args...> -o <template> <url>`.
#[derive(Debug, Clone)]
pub struct ProcessFetcher {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessFetcher {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self::new(
            tools.program.clone(),
            tools.fetch_args.clone(),
            tools.fetch_timeout(),
        )
    }
}

impl Fetcher for ProcessFetcher {
    fn fetch(&self, url: &str, output_template: &str) -> Result<(), FetchError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg("-o").arg(output_template).arg(url);

        let out = process::run(cmd, self.timeout)?;
        if !out.status.success() {
            return Err(FetchError::Exit {
                code: exit_code(&out.status),
                stderr: out.stderr_tail(),
            });
        }
        Ok(())
    }
}

/// Logs what would be downloaded without running anything (`rdl run --dry-run`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunFetcher;

impl Fetcher for DryRunFetcher {
    fn fetch(&self, url: &str, output_template: &str) -> Result<(), FetchError> {
        tracing::info!(%url, template = %output_template, "dry run: would download");
        Ok(())
    }
}

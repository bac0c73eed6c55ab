//! CLI for rdl.

mod commands;
mod feed;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rdl_core::config::{self, RdlConfig};
use std::path::{Path, PathBuf};

use commands::{run_pipeline, run_probe, run_scan, RunOptions};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rdl")]
#[command(
    about = "Scan a subreddit for video links and download the long ones",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: ~/.config/rdl/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Scan the feed, probe every video link and download the eligible ones.
    Run {
        /// Run up to N probe/download units at once (default: max_concurrent from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Minimum duration in minutes (default: min_duration from config).
        #[arg(long, value_name = "MINUTES")]
        min_duration: Option<u32>,
        /// Probe and decide, but do not download anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// List candidate video links without probing them.
    Scan,

    /// Probe one URL and show the download decision.
    Probe {
        /// Video URL.
        url: String,
        /// Minimum duration in minutes (default: min_duration from config).
        #[arg(long, value_name = "MINUTES")]
        min_duration: Option<u32>,
    },
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!(
            subreddit = ?cfg.subreddit,
            entries = cfg.entries,
            min_duration = cfg.min_duration,
            "loaded config"
        );

        match cli.command {
            CliCommand::Run {
                jobs,
                min_duration,
                dry_run,
            } => {
                let opts = RunOptions {
                    jobs,
                    min_duration,
                    dry_run,
                };
                run_pipeline(&cfg, opts).await?;
            }
            CliCommand::Scan => run_scan(&cfg).await?,
            CliCommand::Probe { url, min_duration } => {
                run_probe(&cfg, &url, min_duration).await?;
            }
        }

        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<RdlConfig> {
    let cfg = match path {
        Some(p) => config::load_or_init_at(p)?,
        None => config::load_or_init()?,
    };
    Ok(cfg)
}

#[cfg(test)]
mod tests;

//! `rdl run` – scan, probe and download.

use anyhow::Result;
use rdl_core::config::RdlConfig;
use rdl_core::coordinator::DownloadCoordinator;
use rdl_core::fetch::{DryRunFetcher, Fetcher, ProcessFetcher};
use rdl_core::policy::ThresholdPolicy;
use rdl_core::probe::ProcessDurationProbe;
use std::sync::Arc;

use crate::cli::feed;

/// Command-line overrides for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub jobs: Option<usize>,
    pub min_duration: Option<u32>,
    pub dry_run: bool,
}

pub async fn run_pipeline(cfg: &RdlConfig, opts: RunOptions) -> Result<()> {
    let tools = cfg.tools();
    let min_duration = opts.min_duration.unwrap_or(cfg.min_duration);
    let jobs = opts.jobs.unwrap_or(cfg.max_concurrent);

    let client = feed::connect(cfg).await?;
    let submissions = feed::list_submissions(&client, cfg).await?;
    let candidates = feed::candidates(&client, submissions, cfg);

    let fetcher: Arc<dyn Fetcher> = if opts.dry_run {
        Arc::new(DryRunFetcher)
    } else {
        Arc::new(ProcessFetcher::from_config(&tools))
    };
    let coordinator = DownloadCoordinator::new(
        Arc::new(ProcessDurationProbe::from_config(&tools)),
        fetcher,
        ThresholdPolicy::new(min_duration),
        cfg.output_template.clone(),
        jobs,
    );
    tracing::info!(
        min_duration,
        jobs,
        dry_run = opts.dry_run,
        "starting downloads"
    );

    let summary = coordinator.run(candidates).await?;
    println!("{}", summary);
    Ok(())
}

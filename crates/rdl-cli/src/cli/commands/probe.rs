//! `rdl probe <url>` – show one video's duration and the download decision.

use anyhow::{Context, Result};
use rdl_core::config::RdlConfig;
use rdl_core::policy::ThresholdPolicy;
use rdl_core::probe::{DurationProbe, ProcessDurationProbe};

pub async fn run_probe(cfg: &RdlConfig, url: &str, min_duration: Option<u32>) -> Result<()> {
    let probe = ProcessDurationProbe::from_config(&cfg.tools());
    let policy = ThresholdPolicy::new(min_duration.unwrap_or(cfg.min_duration));

    let target = url.to_string();
    let duration = tokio::task::spawn_blocking(move || probe.probe(&target))
        .await
        .context("probe task join")?
        .with_context(|| format!("cannot probe {}", url))?;

    println!("{}: {}", url, duration);
    println!("{}", policy.decide(duration));
    Ok(())
}

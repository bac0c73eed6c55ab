//! `rdl scan` – list candidate links without probing.

use anyhow::{Context, Result};
use rdl_core::config::RdlConfig;

use crate::cli::feed;

pub async fn run_scan(cfg: &RdlConfig) -> Result<()> {
    let client = feed::connect(cfg).await?;
    let submissions = feed::list_submissions(&client, cfg).await?;
    let candidates = feed::candidates(&client, submissions, cfg);

    let count = tokio::task::spawn_blocking(move || {
        let mut count = 0usize;
        for c in candidates {
            println!("{}\t{}\t{}", c.url, c.origin, c.title);
            count += 1;
        }
        count
    })
    .await
    .context("scan task join")?;

    if count == 0 {
        println!("No video links found.");
    }
    Ok(())
}

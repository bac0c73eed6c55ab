//! Connect to reddit and fetch the configured listing.

use anyhow::{Context, Result};
use rdl_core::config::RdlConfig;
use rdl_core::feed::{FeedClient, ListingRequest, RedditClient, Submission};
use rdl_core::links::{discover, Candidate, HostMatcher};
use std::sync::Arc;

/// Logs in when an account is configured, otherwise uses the public endpoints.
/// Authentication failure is fatal.
pub async fn connect(cfg: &RdlConfig) -> Result<Arc<RedditClient>> {
    let client = match cfg.account.clone() {
        Some(account) => tokio::task::spawn_blocking(move || RedditClient::login(&account))
            .await
            .context("login task join")?
            .context("reddit login failed")?,
        None => RedditClient::anonymous(None),
    };
    Ok(Arc::new(client))
}

pub async fn list_submissions(client: &Arc<RedditClient>, cfg: &RdlConfig) -> Result<Vec<Submission>> {
    let request = ListingRequest {
        subreddit: cfg.subreddit.clone(),
        sort: cfg.sort,
        limit: cfg.entries,
    };
    let path = request.path();
    let client = Arc::clone(client);
    let submissions = tokio::task::spawn_blocking(move || client.submissions(&request))
        .await
        .context("listing task join")?
        .with_context(|| format!("cannot list {}", path))?;
    tracing::info!("{} submission(s) from {}", submissions.len(), path);
    Ok(submissions)
}

/// Lazy candidate sequence; comment threads are fetched as it is consumed.
pub fn candidates(
    client: &Arc<RedditClient>,
    submissions: Vec<Submission>,
    cfg: &RdlConfig,
) -> impl Iterator<Item = Candidate> + Send + 'static {
    let client = Arc::clone(client);
    discover(
        submissions,
        move |s: &Submission| client.comments(s),
        HostMatcher::new(&cfg.host_patterns),
    )
}

//! Feed listing: submissions and their comment threads.
//!
//! The pipeline only depends on [`FeedClient`]; [`RedditClient`] is the
//! curl-backed implementation used by the CLI.

mod listing;
mod reddit;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use listing::{parse_comment_thread, parse_submissions};
pub use reddit::RedditClient;

/// One entry of a feed listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Base-36 id without the `t3_` prefix.
    pub id: String,
    pub title: String,
    /// Primary link; for self posts this points back at reddit.
    pub url: String,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub body: String,
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSort {
    #[default]
    New,
    Hot,
    Top,
    Rising,
}

impl ListingSort {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingSort::New => "new",
            ListingSort::Hot => "hot",
            ListingSort::Top => "top",
            ListingSort::Rising => "rising",
        }
    }
}

impl fmt::Display for ListingSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to list: a subreddit (or the front page), order and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub subreddit: Option<String>,
    pub sort: ListingSort,
    pub limit: u32,
}

impl ListingRequest {
    /// Listing path relative to the API root, e.g. `/r/rugbyunion/new`.
    pub fn path(&self) -> String {
        match &self.subreddit {
            Some(sub) => format!("/r/{}/{}", sub, self.sort),
            None => format!("/{}", self.sort),
        }
    }
}

/// Failure talking to the feed service or decoding its response.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("request failed: {0}")]
    Http(#[from] curl::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    #[error("cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Blocking access to a feed. Call from `spawn_blocking` when used from async code.
pub trait FeedClient: Send + Sync {
    /// Submissions in listing order.
    fn submissions(&self, request: &ListingRequest) -> Result<Vec<Submission>, DiscoveryError>;

    /// Every comment of the submission's thread, parents before replies.
    fn comments(&self, submission: &Submission) -> Result<Vec<Comment>, DiscoveryError>;
}

//! Link discovery: candidate video URLs from submissions and their comments.
//!
//! [`discover`] is lazy. Comment threads are fetched one submission at a time
//! as the sequence is consumed, so downloads can start before the scan ends.

mod extract;
mod host;

use std::collections::VecDeque;
use std::fmt;

use crate::feed::{Comment, DiscoveryError, Submission};

pub use extract::find_urls;
pub use host::HostMatcher;

/// Where a candidate URL was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    Submission,
    Comment,
}

impl fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOrigin::Submission => f.write_str("submission"),
            CandidateOrigin::Comment => f.write_str("comment"),
        }
    }
}

/// A discovered link that may point to a downloadable video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    /// Title of the submission the link belongs to.
    pub title: String,
    pub origin: CandidateOrigin,
}

impl Candidate {
    pub fn new(url: impl Into<String>, title: impl Into<String>, origin: CandidateOrigin) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            origin,
        }
    }
}

/// Lazily yields candidates for `submissions` in feed order.
///
/// For each submission the primary URL comes first (when it matches), then
/// every matching URL from its comments in thread order. Duplicates are kept.
/// A failed comment fetch is logged and that submission's comments are skipped.
pub fn discover<F>(submissions: Vec<Submission>, fetch_comments: F, matcher: HostMatcher) -> Discover<F>
where
    F: FnMut(&Submission) -> Result<Vec<Comment>, DiscoveryError>,
{
    Discover {
        submissions: submissions.into_iter(),
        fetch_comments,
        matcher,
        pending: VecDeque::new(),
    }
}

/// Iterator returned by [`discover`].
pub struct Discover<F> {
    submissions: std::vec::IntoIter<Submission>,
    fetch_comments: F,
    matcher: HostMatcher,
    pending: VecDeque<Candidate>,
}

impl<F> Discover<F>
where
    F: FnMut(&Submission) -> Result<Vec<Comment>, DiscoveryError>,
{
    fn scan(&mut self, submission: Submission) {
        tracing::info!(
            title = %submission.title,
            permalink = %submission.permalink,
            "scanning submission"
        );
        if self.matcher.matches(&submission.url) {
            self.pending.push_back(Candidate::new(
                submission.url.clone(),
                submission.title.clone(),
                CandidateOrigin::Submission,
            ));
        }

        let comments = match (self.fetch_comments)(&submission) {
            Ok(comments) => comments,
            Err(e) => {
                tracing::warn!(
                    title = %submission.title,
                    error = %e,
                    "cannot fetch comments; skipping them"
                );
                return;
            }
        };

        for comment in &comments {
            for url in find_urls(&comment.body) {
                if self.matcher.matches(&url) {
                    self.pending.push_back(Candidate::new(
                        url,
                        submission.title.clone(),
                        CandidateOrigin::Comment,
                    ));
                }
            }
        }
    }
}

impl<F> Iterator for Discover<F>
where
    F: FnMut(&Submission) -> Result<Vec<Comment>, DiscoveryError>,
{
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.pending.pop_front() {
                return Some(candidate);
            }
            let submission = self.submissions.next()?;
            self.scan(submission);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn submission(id: &str, url: &str) -> Submission {
        Submission {
            id: id.to_string(),
            title: format!("post {}", id),
            url: url.to_string(),
            permalink: format!("/r/test/comments/{}/", id),
        }
    }

    fn comment(body: &str) -> Comment {
        Comment {
            body: body.to_string(),
        }
    }

    fn urls(candidates: impl Iterator<Item = Candidate>) -> Vec<String> {
        candidates.map(|c| c.url).collect()
    }

    #[test]
    fn primary_then_matching_comment_urls() {
        let subs = vec![submission("a", "https://www.youtube.com/watch?v=U0")];
        let found: Vec<Candidate> = discover(
            subs,
            |_| {
                Ok(vec![
                    comment("replay: https://www.youtube.com/watch?v=U1"),
                    comment("stats at https://www.espn.com/rugby/U2"),
                ])
            },
            HostMatcher::new(["youtube"]),
        )
        .collect();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].url, "https://www.youtube.com/watch?v=U0");
        assert_eq!(found[0].origin, CandidateOrigin::Submission);
        assert_eq!(found[1].url, "https://www.youtube.com/watch?v=U1");
        assert_eq!(found[1].origin, CandidateOrigin::Comment);
        assert_eq!(found[1].title, "post a");
    }

    #[test]
    fn non_matching_primary_is_skipped_but_comments_scanned() {
        let subs = vec![submission("a", "https://www.reddit.com/r/test/comments/a/")];
        let found = urls(discover(
            subs,
            |_| Ok(vec![comment("https://youtube.com/watch?v=x")]),
            HostMatcher::new(["youtube"]),
        ));
        assert_eq!(found, vec!["https://youtube.com/watch?v=x"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let u = "https://www.youtube.com/watch?v=dup";
        let subs = vec![submission("a", u)];
        let found = urls(discover(
            subs,
            |_| Ok(vec![comment(&format!("{} and again {}", u, u))]),
            HostMatcher::new(["youtube"]),
        ));
        assert_eq!(found, vec![u, u, u]);
    }

    #[test]
    fn comment_failure_skips_only_that_submission() {
        let subs = vec![
            submission("a", "https://www.youtube.com/watch?v=a"),
            submission("b", "https://www.youtube.com/watch?v=b"),
        ];
        let found = urls(discover(
            subs,
            |s| {
                if s.id == "a" {
                    Err(DiscoveryError::Auth("expired".to_string()))
                } else {
                    Ok(vec![comment("https://www.youtube.com/watch?v=b1")])
                }
            },
            HostMatcher::new(["youtube"]),
        ));
        assert_eq!(
            found,
            vec![
                "https://www.youtube.com/watch?v=a",
                "https://www.youtube.com/watch?v=b",
                "https://www.youtube.com/watch?v=b1",
            ]
        );
    }

    #[test]
    fn comments_fetched_lazily_in_feed_order() {
        let fetched = Cell::new(0);
        let subs = vec![
            submission("a", "https://www.youtube.com/watch?v=a"),
            submission("b", "https://www.youtube.com/watch?v=b"),
        ];
        let mut iter = discover(
            subs,
            |_| {
                fetched.set(fetched.get() + 1);
                Ok(Vec::new())
            },
            HostMatcher::new(["youtube"]),
        );
        assert_eq!(fetched.get(), 0);
        assert_eq!(iter.next().unwrap().url, "https://www.youtube.com/watch?v=a");
        assert_eq!(fetched.get(), 1);
        assert_eq!(iter.next().unwrap().url, "https://www.youtube.com/watch?v=b");
        assert_eq!(fetched.get(), 2);
        assert!(iter.next().is_none());
    }
}

//! One unit of work: probe → decide → (fetch) for a single candidate.

use crate::fetch::Fetcher;
use crate::links::Candidate;
use crate::policy::ThresholdPolicy;
use crate::probe::DurationProbe;

/// How a unit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Downloaded,
    Skipped,
    ProbeFailed,
    FetchFailed,
    /// The unit panicked; recorded by the worker, never returned by [`process_candidate`].
    Crashed,
}

/// Runs one unit on the current (blocking) thread. Every error is logged and
/// folded into the outcome; nothing propagates to sibling units.
pub fn process_candidate(
    candidate: &Candidate,
    probe: &dyn DurationProbe,
    fetcher: &dyn Fetcher,
    policy: ThresholdPolicy,
    output_template: &str,
) -> UnitOutcome {
    let url = candidate.url.as_str();
    let duration = match probe.probe(url) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(%url, title = %candidate.title, error = %e, "probe failed; not downloading");
            return UnitOutcome::ProbeFailed;
        }
    };

    let decision = policy.decide(duration);
    tracing::info!(
        %url,
        title = %candidate.title,
        origin = %candidate.origin,
        %duration,
        "{}",
        decision
    );
    if !decision.is_download() {
        return UnitOutcome::Skipped;
    }

    match fetcher.fetch(url, output_template) {
        Ok(()) => {
            tracing::info!(%url, "download finished");
            UnitOutcome::Downloaded
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "download failed");
            UnitOutcome::FetchFailed
        }
    }
}

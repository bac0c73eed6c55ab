//! Download coordinator: a bounded worker pool over the candidate sequence.
//!
//! A feeder on a blocking thread pulls candidates from the (lazy, blocking)
//! discovery iterator into a bounded queue. `max_concurrent` workers take one
//! candidate at a time and run probe → decide → fetch on the blocking pool.
//! Every queued unit holds a [`WorkGuard`]; `run` returns only after the
//! feeder is done and the outstanding count is back to zero.

mod summary;
mod tracker;
mod unit;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::fetch::Fetcher;
use crate::links::Candidate;
use crate::policy::ThresholdPolicy;
use crate::probe::DurationProbe;

pub use summary::RunSummary;
pub use tracker::{WorkGuard, WorkTracker};
pub use unit::{process_candidate, UnitOutcome};

/// A candidate waiting in the queue, already counted as outstanding.
struct Queued {
    candidate: Candidate,
    guard: WorkGuard,
}

pub struct DownloadCoordinator {
    probe: Arc<dyn DurationProbe>,
    fetcher: Arc<dyn Fetcher>,
    policy: ThresholdPolicy,
    output_template: Arc<str>,
    max_concurrent: usize,
    tracker: Arc<WorkTracker>,
}

impl DownloadCoordinator {
    /// `max_concurrent` is clamped to at least 1.
    pub fn new(
        probe: Arc<dyn DurationProbe>,
        fetcher: Arc<dyn Fetcher>,
        policy: ThresholdPolicy,
        output_template: impl Into<String>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            probe,
            fetcher,
            policy,
            output_template: Arc::from(output_template.into()),
            max_concurrent: max_concurrent.max(1),
            tracker: Arc::new(WorkTracker::new()),
        }
    }

    /// Units queued or running right now.
    pub fn outstanding(&self) -> usize {
        self.tracker.outstanding()
    }

    /// Runs one unit per candidate (duplicates included) and waits for all of them.
    ///
    /// The iterator is consumed on a blocking thread, so it may do blocking
    /// I/O such as fetching comment threads.
    pub async fn run<I>(&self, candidates: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Candidate> + Send + 'static,
        I::IntoIter: Send,
    {
        let (tx, rx) = mpsc::channel::<Queued>(self.max_concurrent);
        let rx = Arc::new(Mutex::new(rx));

        let tracker = Arc::clone(&self.tracker);
        let feeder = tokio::task::spawn_blocking(move || {
            let mut queued = 0usize;
            for candidate in candidates {
                tracing::debug!(url = %candidate.url, "queueing candidate");
                // Count before the unit can start so the tracker never reads
                // idle while work is in flight.
                let guard = tracker.begin();
                if tx.blocking_send(Queued { candidate, guard }).is_err() {
                    break;
                }
                queued += 1;
            }
            queued
        });

        let mut workers = JoinSet::new();
        for _ in 0..self.max_concurrent {
            workers.spawn(worker(
                Arc::clone(&rx),
                Arc::clone(&self.probe),
                Arc::clone(&self.fetcher),
                self.policy,
                Arc::clone(&self.output_template),
            ));
        }

        // A panicking feeder drops the sender, so the workers still drain
        // whatever was queued. Wait for those units before reporting it.
        let fed = feeder.await;
        if let Err(e) = &fed {
            tracing::error!(error = %e, "candidate feeder failed, finishing queued units");
        }
        self.tracker.wait_idle().await;

        let mut summary = RunSummary::default();
        while let Some(res) = workers.join_next().await {
            for outcome in res.context("worker task join")? {
                summary.record(outcome);
            }
        }
        summary.candidates = fed.context("candidate feeder join")?;

        tracing::info!("run finished: {}", summary);
        Ok(summary)
    }
}

/// Takes units off the queue until it is closed and drained.
async fn worker(
    rx: Arc<Mutex<mpsc::Receiver<Queued>>>,
    probe: Arc<dyn DurationProbe>,
    fetcher: Arc<dyn Fetcher>,
    policy: ThresholdPolicy,
    output_template: Arc<str>,
) -> Vec<UnitOutcome> {
    let mut outcomes = Vec::new();
    loop {
        let next = rx.lock().await.recv().await;
        let Some(Queued { candidate, guard }) = next else {
            break;
        };

        let probe = Arc::clone(&probe);
        let fetcher = Arc::clone(&fetcher);
        let template = Arc::clone(&output_template);
        let url = candidate.url.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            process_candidate(
                &candidate,
                probe.as_ref(),
                fetcher.as_ref(),
                policy,
                &template,
            )
        })
        .await;

        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                tracing::error!(%url, error = %e, "unit panicked");
                outcomes.push(UnitOutcome::Crashed);
            }
        }
    }
    outcomes
}

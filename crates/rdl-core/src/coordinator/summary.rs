//! Per-run counts, used for the final log line.

use std::fmt;

use super::unit::UnitOutcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Units launched (one per candidate, duplicates included).
    pub candidates: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub probe_failed: usize,
    pub fetch_failed: usize,
    /// Units whose blocking task panicked.
    pub crashed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Downloaded => self.downloaded += 1,
            UnitOutcome::Skipped => self.skipped += 1,
            UnitOutcome::ProbeFailed => self.probe_failed += 1,
            UnitOutcome::FetchFailed => self.fetch_failed += 1,
            UnitOutcome::Crashed => self.crashed += 1,
        }
    }

    /// Units that reached an outcome.
    pub fn finished(&self) -> usize {
        self.downloaded + self.skipped + self.probe_failed + self.fetch_failed + self.crashed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidate(s): {} downloaded, {} skipped, {} probe error(s), {} download error(s)",
            self.candidates, self.downloaded, self.skipped, self.probe_failed, self.fetch_failed
        )?;
        if self.crashed > 0 {
            write!(f, ", {} crashed", self.crashed)?;
        }
        Ok(())
    }
}

//! Threshold policy: whether a probed video is long enough to download.

use std::fmt;

use crate::probe::VideoDuration;

/// Outcome of [`ThresholdPolicy::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Download(DownloadReason),
    Skip { minutes: u32, min_duration: u32 },
}

impl Decision {
    pub fn is_download(&self) -> bool {
        matches!(self, Decision::Download(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadReason {
    /// Has an hour component.
    OverOneHour,
    /// `minutes >= min_duration`.
    AtLeastMinimum { minutes: u32, min_duration: u32 },
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Download(DownloadReason::OverOneHour) => {
                f.write_str("downloading as over one hour")
            }
            Decision::Download(DownloadReason::AtLeastMinimum {
                minutes,
                min_duration,
            }) => write!(
                f,
                "downloading as over configured minimum duration: {} >= {}",
                minutes, min_duration
            ),
            Decision::Skip {
                minutes,
                min_duration,
            } => write!(
                f,
                "not downloading as not over minimum duration: {} < {}",
                minutes, min_duration
            ),
        }
    }
}

/// Configured minimum duration in minutes, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    min_duration: u32,
}

impl ThresholdPolicy {
    pub fn new(min_duration: u32) -> Self {
        Self { min_duration }
    }

    pub fn min_duration(&self) -> u32 {
        self.min_duration
    }

    pub fn decide(&self, duration: VideoDuration) -> Decision {
        match duration {
            VideoDuration::Long => Decision::Download(DownloadReason::OverOneHour),
            VideoDuration::Short { minutes } if minutes >= self.min_duration => {
                Decision::Download(DownloadReason::AtLeastMinimum {
                    minutes,
                    min_duration: self.min_duration,
                })
            }
            VideoDuration::Short { minutes } => Decision::Skip {
                minutes,
                min_duration: self.min_duration,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(output: &str, min: u32) -> Decision {
        ThresholdPolicy::new(min).decide(VideoDuration::parse(output).unwrap())
    }

    #[test]
    fn long_form_always_downloads() {
        assert!(decide("1:02:03", 10).is_download());
        assert!(decide("0:00:01", 10_000).is_download());
        assert_eq!(
            decide("2:00:00", 0),
            Decision::Download(DownloadReason::OverOneHour)
        );
    }

    #[test]
    fn short_form_compares_minutes_inclusive() {
        assert_eq!(
            decide("09:59", 10),
            Decision::Skip {
                minutes: 9,
                min_duration: 10
            }
        );
        assert!(decide("10:00", 10).is_download());
        assert!(decide("15:00", 10).is_download());
    }

    #[test]
    fn zero_minimum_downloads_everything_parseable() {
        assert!(decide("00:05", 0).is_download());
    }

    #[test]
    fn skip_message_shows_comparison() {
        let msg = decide("05:00", 10).to_string();
        assert_eq!(msg, "not downloading as not over minimum duration: 5 < 10");
    }
}

//! Parse `H:MM:SS` / `MM:SS` duration strings.

use std::fmt;

use super::ProbeError;

/// Duration as reported by the probe, reduced to what the threshold needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoDuration {
    /// Has an hour component (three or more fields). Field values are not inspected.
    Long,
    /// `MM:SS`: only the minutes field matters.
    Short { minutes: u32 },
}

impl VideoDuration {
    /// Classify probe output.
    ///
    /// Three or more `:`-separated fields are `Long` whatever they contain.
    /// Two fields are `Short` with the first as whole minutes; a non-integer
    /// first field is [`ProbeError::InvalidMinutes`]. Anything else (empty,
    /// a bare number of seconds, text) is [`ProbeError::Unrecognized`].
    pub fn parse(output: &str) -> Result<Self, ProbeError> {
        let line = output
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("");
        let fields: Vec<&str> = line.split(':').collect();
        match fields.len() {
            n if n >= 3 => Ok(VideoDuration::Long),
            2 => {
                let minutes = fields[0]
                    .parse::<u32>()
                    .map_err(|_| ProbeError::InvalidMinutes {
                        field: fields[0].to_string(),
                        output: line.to_string(),
                    })?;
                Ok(VideoDuration::Short { minutes })
            }
            _ => Err(ProbeError::Unrecognized(line.to_string())),
        }
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoDuration::Long => f.write_str("over one hour"),
            VideoDuration::Short { minutes } => write!(f, "{} min", minutes),
        }
    }
}

//! Duration probing: ask an external tool how long a video is, without downloading it.

mod duration;

use std::process::Command;
use std::time::Duration;

use crate::config::ToolsConfig;
use crate::process::{self, ProcessError};

pub use duration::VideoDuration;

/// Why a duration could not be determined. Never fatal: the candidate is skipped.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("probe exited with {code}: {stderr}")]
    Exit { code: String, stderr: String },
    #[error("unrecognized duration {0:?}")]
    Unrecognized(String),
    #[error("minutes field {field:?} of {output:?} is not an integer")]
    InvalidMinutes { field: String, output: String },
}

/// Capability to look up a video's duration. Blocking.
pub trait DurationProbe: Send + Sync {
    fn probe(&self, url: &str) -> Result<VideoDuration, ProbeError>;
}

/// Runs `<program> <probe_args...> <url>` and parses its stdout.
#[derive(Debug, Clone)]
pub struct ProcessDurationProbe {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessDurationProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self::new(
            tools.program.clone(),
            tools.probe_args.clone(),
            tools.probe_timeout(),
        )
    }
}

impl DurationProbe for ProcessDurationProbe {
    fn probe(&self, url: &str) -> Result<VideoDuration, ProbeError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(url);

        let out = process::run(cmd, self.timeout)?;
        if !out.status.success() {
            return Err(ProbeError::Exit {
                code: exit_code(&out.status),
                stderr: out.stderr_tail(),
            });
        }
        VideoDuration::parse(&out.stdout)
    }
}

/// Exit code, or a description when the process was killed by a signal.
pub(crate) fn exit_code(status: &std::process::ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("status {}", code),
        None => status.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// `sh -c <script> sh <url>`: the URL lands in `$1`.
    fn sh_probe(script: &str) -> ProcessDurationProbe {
        ProcessDurationProbe::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            Some(Duration::from_secs(10)),
        )
    }

    #[test]
    fn parses_tool_output() {
        let probe = sh_probe("echo 1:02:03");
        assert_eq!(
            probe.probe("https://youtube.com/watch?v=a").unwrap(),
            VideoDuration::Long
        );
        let probe = sh_probe("echo 12:34");
        assert_eq!(
            probe.probe("https://youtube.com/watch?v=a").unwrap(),
            VideoDuration::Short { minutes: 12 }
        );
    }

    #[test]
    fn url_is_passed_as_last_argument() {
        let probe = sh_probe(r#"test "$1" = "https://youtube.com/watch?v=zz" && echo 20:00"#);
        assert_eq!(
            probe.probe("https://youtube.com/watch?v=zz").unwrap(),
            VideoDuration::Short { minutes: 20 }
        );
    }

    #[test]
    fn non_zero_exit_is_probe_error() {
        let probe = sh_probe("echo 'ERROR: Video unavailable' >&2; exit 1");
        match probe.probe("https://youtube.com/watch?v=gone") {
            Err(ProbeError::Exit { code, stderr }) => {
                assert_eq!(code, "status 1");
                assert_eq!(stderr, "ERROR: Video unavailable");
            }
            other => panic!("expected Exit, got {:?}", other),
        }
    }

    #[test]
    fn missing_program_is_probe_error() {
        let probe = ProcessDurationProbe::new("/nonexistent/yt-dlp", Vec::new(), None);
        assert!(matches!(
            probe.probe("https://youtube.com/watch?v=a"),
            Err(ProbeError::Process(ProcessError::Spawn { .. }))
        ));
    }
}

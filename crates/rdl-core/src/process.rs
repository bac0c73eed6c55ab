//! Blocking external-process runner with captured output and an optional timeout.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spawn, wait and timeout failures shared by the probe and the fetcher.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("waiting for {program} failed: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} timed out after {}s and was killed", .timeout.as_secs_f64())]
    TimedOut { program: String, timeout: Duration },
}

/// Exit status and captured output of a finished process.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Last non-empty stderr line, for error messages.
    pub fn stderr_tail(&self) -> String {
        self.stderr
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .unwrap_or("")
            .to_string()
    }
}

/// Runs `cmd` to completion on the current thread.
///
/// Both pipes are drained on helper threads so a chatty child cannot block
/// on a full pipe. With a timeout, the child is killed once it expires.
pub fn run(mut cmd: Command, timeout: Option<Duration>) -> Result<Captured, ProcessError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = timeout.map(|t| Instant::now() + t);
    let status = loop {
        let waited = match deadline {
            None => child.wait().map(Some),
            Some(_) => child.try_wait(),
        };
        match waited {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(source) => {
                kill_and_reap(&mut child);
                return Err(ProcessError::Wait { program, source });
            }
        }
        if let (Some(deadline), Some(timeout)) = (deadline, timeout) {
            if Instant::now() >= deadline {
                tracing::warn!(%program, "process timed out after {:?}, killing", timeout);
                kill_and_reap(&mut child);
                // Reader threads are left to finish on their own: a grandchild
                // may still hold the pipes open.
                return Err(ProcessError::TimedOut { program, timeout });
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Captured {
        status,
        stdout: join_reader(stdout),
        stderr: join_reader(stderr),
    })
}

/// Best effort: the child may already have exited.
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

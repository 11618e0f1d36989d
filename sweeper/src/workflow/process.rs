//! External measurement-tool invocation.
//!
//! One child process per call, argv passed literally (never through a
//! shell), stdout ignored since results arrive only via files, stderr
//! captured bounded for diagnostics. The timeout is a hard wall-clock
//! deadline enforced by forced termination; the tool is not expected to
//! poll for cooperative cancellation. Retry policy belongs to callers.

use sigmetcore::telemetry::LogManager;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const STDERR_CAP_BYTES: u64 = 64 * 1024;
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Classified outcome of one external run. Failures carry no partial
/// output; result files from a failed run are never read.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Success,
    Timeout,
    NonZeroExit { code: i32, stderr: String },
    LaunchFailure { reason: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => write!(f, "success"),
            RunOutcome::Timeout => write!(f, "timed out"),
            RunOutcome::NonZeroExit { code, stderr } => {
                if stderr.is_empty() {
                    write!(f, "exited with code {}", code)
                } else {
                    write!(f, "exited with code {}: {}", code, stderr.trim_end())
                }
            }
            RunOutcome::LaunchFailure { reason } => write!(f, "failed to launch: {}", reason),
        }
    }
}

pub struct ExternalRunner {
    timeout: Duration,
    logger: LogManager,
}

impl ExternalRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            logger: LogManager::new("runner"),
        }
    }

    /// Runs `argv` with `working_dir` as the child's working directory and
    /// blocks until natural exit or the deadline, whichever comes first.
    pub fn run(&self, argv: &[String], working_dir: &Path) -> RunOutcome {
        let Some((program, tail)) = argv.split_first() else {
            return RunOutcome::LaunchFailure {
                reason: "empty argument vector".to_string(),
            };
        };

        let mut child = match Command::new(program)
            .args(tail)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                return RunOutcome::LaunchFailure {
                    reason: err.to_string(),
                }
            }
        };

        self.logger
            .record(&format!("spawned {} ({} args)", program, tail.len()));

        // Drain stderr on its own thread so a chatty child cannot block on
        // a full pipe while we poll for exit. Only the first cap bytes are
        // kept; the rest is discarded but still consumed.
        let stderr_reader: Option<JoinHandle<String>> = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut captured = Vec::new();
                let _ = (&mut pipe)
                    .take(STDERR_CAP_BYTES)
                    .read_to_end(&mut captured);
                let _ = std::io::copy(&mut pipe, &mut std::io::sink());
                String::from_utf8_lossy(&captured).into_owned()
            })
        });

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let stderr = harvest_stderr(stderr_reader);
                    return if status.success() {
                        RunOutcome::Success
                    } else {
                        RunOutcome::NonZeroExit {
                            // None means the child died on a signal.
                            code: status.code().unwrap_or(-1),
                            stderr,
                        }
                    };
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        self.logger
                            .warn(&format!("deadline reached, terminating {}", program));
                        terminate(&mut child);
                        harvest_stderr(stderr_reader);
                        return RunOutcome::Timeout;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(err) => {
                    terminate(&mut child);
                    harvest_stderr(stderr_reader);
                    return RunOutcome::LaunchFailure {
                        reason: format!("wait failed: {}", err),
                    };
                }
            }
        }
    }
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn harvest_stderr(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner_with_timeout(ms: u64) -> ExternalRunner {
        ExternalRunner::new(Duration::from_millis(ms))
    }

    fn shell(script: &str) -> Vec<String> {
        vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = runner_with_timeout(5_000).run(&shell("exit 0"), dir.path());
        assert_eq!(outcome, RunOutcome::Success);
    }

    #[test]
    fn nonzero_exit_carries_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = runner_with_timeout(5_000).run(&shell("echo boom >&2; exit 3"), dir.path());
        match outcome {
            RunOutcome::NonZeroExit { code, stderr } => {
                assert_eq!(code, 3);
                assert!(stderr.contains("boom"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn launch_failure_for_non_executable_path() {
        let dir = tempfile::tempdir().unwrap();
        let outcome =
            runner_with_timeout(5_000).run(&["/nonexistent/tool".to_string()], dir.path());
        assert!(matches!(outcome, RunOutcome::LaunchFailure { .. }));
    }

    #[test]
    fn deadline_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let start = Instant::now();
        let outcome = runner_with_timeout(200).run(&shell("sleep 30"), dir.path());
        assert_eq!(outcome, RunOutcome::Timeout);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn empty_argv_is_a_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = runner_with_timeout(100).run(&[], dir.path());
        assert!(matches!(outcome, RunOutcome::LaunchFailure { .. }));
    }
}

//! Process-backed runner using the external yt-dlp binary

use super::traits::{CommandOutput, CommandRunner};
use crate::error::ToolError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Name of the binary searched for on PATH
pub const YTDLP_BINARY: &str = "yt-dlp";

/// Runner that spawns the media tool as a child process
///
/// The child is spawned with `kill_on_drop`, so abandoning the wait on
/// timeout terminates it. On unix it also leads its own process group, and a
/// timeout kills the whole group, so helpers the tool starts (ffmpeg for
/// merging and audio extraction) die with it. Elsewhere only the direct child
/// is killed.
///
/// # Examples
///
/// ```no_run
/// use media_jobs::fetcher::ProcessRunner;
/// use std::path::PathBuf;
///
/// // Explicit path
/// let runner = ProcessRunner::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let runner = ProcessRunner::from_path().expect("yt-dlp not found in PATH");
/// ```
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    binary_path: PathBuf,
}

impl ProcessRunner {
    /// Create a runner for an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// Returns `None` when the binary cannot be found.
    pub fn from_path() -> Option<Self> {
        which::which(YTDLP_BINARY).ok().map(Self::new)
    }

    /// Path of the binary this runner executes
    pub fn binary_path(&self) -> &std::path::Path {
        &self.binary_path
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> Result<CommandOutput, ToolError> {
        let mut command = Command::new(&self.binary_path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn().map_err(ToolError::Spawn)?;
        let pid = child.id();

        let wait = child.wait_with_output();
        tokio::pin!(wait);

        match tokio::time::timeout(timeout, &mut wait).await {
            Ok(Ok(output)) => Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code(),
            }),
            Ok(Err(e)) => Err(ToolError::Spawn(e)),
            Err(_) => {
                // The group must be signalled while the leader is unreaped
                if let Some(pid) = pid {
                    kill_process_group(pid);
                }
                tracing::warn!(
                    binary = %self.binary_path.display(),
                    timeout_secs = timeout.as_secs(),
                    "external tool timed out, killed"
                );
                Err(ToolError::Timeout { timeout })
            }
        }
    }

    fn name(&self) -> &'static str {
        "process"
    }
}

/// SIGKILL every process in the group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: kill(2) takes no pointers; a negative pid addresses the process
    // group this runner created for the child.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(
            pid,
            error = %std::io::Error::last_os_error(),
            "could not signal process group"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

/// Stand-in runner used when no binary is available
///
/// Every call fails with [`ToolError::Unavailable`], so the server can still
/// start and report the problem per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRunner;

#[async_trait]
impl CommandRunner for UnavailableRunner {
    async fn run(&self, _args: &[String], _timeout: Duration) -> Result<CommandOutput, ToolError> {
        Err(ToolError::Unavailable(YTDLP_BINARY.to_string()))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn from_path_consistent_with_which() {
        let which_result = which::which(YTDLP_BINARY);
        let from_path_result = ProcessRunner::from_path();

        assert_eq!(which_result.is_ok(), from_path_result.is_some());
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let runner = ProcessRunner::new(PathBuf::from("/nonexistent/path/to/yt-dlp"));

        let result = runner.run(&[], Duration::from_secs(5)).await;

        match result {
            Err(ToolError::Spawn(_)) => {}
            other => panic!("expected Spawn error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unavailable_runner_always_fails() {
        let result = UnavailableRunner.run(&[], Duration::from_secs(1)).await;

        match result {
            Err(ToolError::Unavailable(name)) => assert_eq!(name, "yt-dlp"),
            other => panic!("expected Unavailable, got: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_both_streams_and_exit_code() {
        let runner = ProcessRunner::new(PathBuf::from("sh"));

        let output = runner
            .run(
                &sh("echo out; echo 'ERROR: boom' >&2; exit 3"),
                Duration::from_secs(10),
            )
            .await
            .unwrap();

        assert_eq!(output.stdout, "out\n");
        assert!(output.stderr.contains("ERROR: boom"));
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_run_reports_zero() {
        let runner = ProcessRunner::new(PathBuf::from("sh"));

        let output = runner
            .run(&sh("printf '{}'"), Duration::from_secs(10))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "{}");
        assert!(output.into_result().is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_run_times_out() {
        let runner = ProcessRunner::new(PathBuf::from("sh"));
        let started = std::time::Instant::now();

        let result = runner
            .run(&sh("sleep 10"), Duration::from_millis(200))
            .await;

        match result {
            Err(ToolError::Timeout { timeout }) => {
                assert_eq!(timeout, Duration::from_millis(200));
            }
            other => panic!("expected Timeout, got: {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    /// Whether `pid` is gone or only a zombie awaiting its reaper
    #[cfg(target_os = "linux")]
    fn is_dead(pid: &str) -> bool {
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => stat
                .rsplit_once(") ")
                .is_some_and(|(_, rest)| rest.starts_with('Z') || rest.starts_with('X')),
            Err(_) => true,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn timeout_kills_helpers_started_by_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("helper.pid");
        let runner = ProcessRunner::new(PathBuf::from("sh"));

        let result = runner
            .run(
                &sh(&format!(
                    "sleep 30 & echo $! > '{}'; wait",
                    pid_file.display()
                )),
                Duration::from_millis(500),
            )
            .await;
        assert!(matches!(result, Err(ToolError::Timeout { .. })));

        let helper = std::fs::read_to_string(&pid_file).unwrap();
        let helper = helper.trim();
        let deadline = std::time::Instant::now() + Duration::from_secs(3);
        while !is_dead(helper) && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(is_dead(helper), "helper process {helper} survived the timeout");
    }

    #[test]
    fn non_zero_exit_converts_to_failed() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "ERROR: nope".into(),
            exit_code: Some(1),
        };

        match output.into_result() {
            Err(ToolError::Failed { code, stderr }) => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "ERROR: nope");
            }
            other => panic!("expected Failed, got: {other:?}"),
        }
    }
}

//! Traits and types for running the external media tool

use crate::error::ToolError;
use async_trait::async_trait;
use std::time::Duration;

/// Captured result of a finished tool invocation
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output (lossy UTF-8)
    pub stdout: String,
    /// Standard error (lossy UTF-8)
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Whether the tool reported success
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into [`ToolError::Failed`]
    pub fn into_result(self) -> Result<Self, ToolError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Trait for invoking the external media tool
///
/// Implementations run the tool with `args` and must give up after
/// `timeout`, making sure nothing keeps running once they return.
/// A finished run is returned as [`CommandOutput`] whatever its exit code;
/// only a timeout or a failure to start is an error.
///
/// # Examples
///
/// ```no_run
/// use media_jobs::fetcher::{CommandRunner, ProcessRunner};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let runner = ProcessRunner::from_path().expect("yt-dlp not found in PATH");
/// let output = runner
///     .run(&["--version".to_string()], Duration::from_secs(10))
///     .await?;
/// println!("yt-dlp {}", output.stdout.trim());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the tool to completion or until `timeout` elapses
    ///
    /// # Errors
    ///
    /// - [`ToolError::Timeout`] if the run exceeded `timeout` (the process is killed)
    /// - [`ToolError::Spawn`] if the process could not be started
    /// - [`ToolError::Unavailable`] for stand-in implementations
    async fn run(&self, args: &[String], timeout: Duration) -> Result<CommandOutput, ToolError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

//! Scripted [`CommandRunner`] for tests that must not depend on yt-dlp.

use super::traits::{CommandOutput, CommandRunner};
use crate::error::ToolError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted run does
#[derive(Debug, Clone)]
pub(crate) enum Script {
    /// Finish with this output
    Output(CommandOutput),
    /// Fail as if the timeout had been hit
    Timeout,
    /// Fail as if the binary were missing
    Unavailable,
}

/// One recorded invocation
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub(crate) args: Vec<String>,
    pub(crate) timeout: Duration,
}

type Chooser = dyn Fn(&[String]) -> Script + Send + Sync;

/// Runner returning canned results, optionally after a delay
///
/// On a successful run it creates the file named after `-o`, as yt-dlp would.
pub(crate) struct ScriptedRunner {
    choose: Box<Chooser>,
    delay: Duration,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedRunner {
    pub(crate) fn from_fn(choose: impl Fn(&[String]) -> Script + Send + Sync + 'static) -> Self {
        Self {
            choose: Box::new(choose),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_output(output: CommandOutput) -> Self {
        Self::from_fn(move |_| Script::Output(output.clone()))
    }

    pub(crate) fn succeeding(stdout: &str) -> Self {
        Self::with_output(CommandOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        })
    }

    pub(crate) fn exiting(code: i32, stderr: &str) -> Self {
        Self::with_output(CommandOutput {
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code: Some(code),
        })
    }

    pub(crate) fn timing_out() -> Self {
        Self::from_fn(|_| Script::Timeout)
    }

    pub(crate) fn unavailable() -> Self {
        Self::from_fn(|_| Script::Unavailable)
    }

    /// Sleep before answering; a delay longer than the call's timeout turns
    /// into a timeout error
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        self.calls.clone()
    }
}

/// Value following `-o`, if any
pub(crate) fn output_path_arg(args: &[String]) -> Option<&str> {
    args.iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> Result<CommandOutput, ToolError> {
        self.calls.lock().unwrap().push(RecordedCall {
            args: args.to_vec(),
            timeout,
        });

        if !self.delay.is_zero() {
            if self.delay > timeout {
                tokio::time::sleep(timeout).await;
                return Err(ToolError::Timeout { timeout });
            }
            tokio::time::sleep(self.delay).await;
        }

        match (self.choose)(args) {
            Script::Output(output) => {
                if output.success()
                    && let Some(path) = output_path_arg(args)
                {
                    tokio::fs::write(path, b"media").await.map_err(ToolError::Spawn)?;
                }
                Ok(output)
            }
            Script::Timeout => Err(ToolError::Timeout { timeout }),
            Script::Unavailable => Err(ToolError::Unavailable("yt-dlp".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

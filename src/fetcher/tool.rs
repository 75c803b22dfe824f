//! High-level fetch and lookup operations on top of a [`CommandRunner`]

use super::command::{FetchPlan, fetch_args, lookup_args};
use super::parser::parse_video_details;
use super::traits::CommandRunner;
use crate::config::ToolsConfig;
use crate::error::{LookupError, ToolError};
use crate::types::VideoDetails;
use std::sync::Arc;
use std::time::Duration;

/// The media tool as the rest of the crate sees it
#[derive(Clone)]
pub struct MediaTool {
    runner: Arc<dyn CommandRunner>,
    user_agent: String,
    fetch_timeout: Duration,
    lookup_timeout: Duration,
}

impl MediaTool {
    /// Wrap `runner` with the timeouts and user agent from `tools`
    pub fn new(runner: Arc<dyn CommandRunner>, tools: &ToolsConfig) -> Self {
        Self {
            runner,
            user_agent: tools.user_agent.clone(),
            fetch_timeout: tools.fetch_timeout,
            lookup_timeout: tools.lookup_timeout,
        }
    }

    /// Name of the underlying runner, for logging
    pub fn runner_name(&self) -> &'static str {
        self.runner.name()
    }

    /// Produce the file described by `plan`
    ///
    /// # Errors
    ///
    /// [`ToolError::Timeout`] past the fetch budget, [`ToolError::Failed`] on a
    /// non-zero exit, [`ToolError::Spawn`]/[`ToolError::Unavailable`] if the
    /// tool cannot run at all.
    pub async fn fetch(&self, plan: &FetchPlan<'_>) -> Result<(), ToolError> {
        let args = fetch_args(plan, &self.user_agent);
        tracing::debug!(url = plan.url, format = ?plan.format, "running fetch");

        self.runner
            .run(&args, self.fetch_timeout)
            .await?
            .into_result()
            .map(|_| ())
    }

    /// Resolve title, artist, thumbnail and quality ladder for `url`
    ///
    /// # Errors
    ///
    /// [`LookupError::InvalidUrl`] for anything that is not an absolute
    /// http(s) URL, [`LookupError::Tool`] when the tool fails or times out,
    /// [`LookupError::Malformed`] when its output cannot be parsed.
    pub async fn lookup(&self, url: &str) -> Result<VideoDetails, LookupError> {
        let url = validate_url(url).map_err(LookupError::InvalidUrl)?;

        let output = self
            .runner
            .run(&lookup_args(url, &self.user_agent), self.lookup_timeout)
            .await
            .and_then(|o| o.into_result())
            .map_err(LookupError::Tool)?;

        parse_video_details(&output.stdout)
    }
}

/// Accept only absolute http(s) URLs
///
/// Returns the URL without surrounding whitespace; that is the value to hand
/// to the tool.
pub fn validate_url(url: &str) -> Result<&str, String> {
    let trimmed = url.trim();
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trimmed),
        _ => Err(url.to_string()),
    }
}

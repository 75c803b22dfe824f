//! External media tool (yt-dlp) invocation
//!
//! This module isolates everything that talks to the external fetch tool:
//! command-line construction, process execution with a hard timeout, and
//! parsing of the tool's output.
//!
//! ## Architecture
//!
//! The core abstraction is the [`CommandRunner`] trait, which runs the tool
//! with a list of arguments and a time budget. Implementations:
//!
//! - [`ProcessRunner`]: spawns the real `yt-dlp` binary
//! - [`UnavailableRunner`]: stand-in when no binary is available
//!
//! [`MediaTool`] layers the fetch and lookup operations on top of a runner.
//!
//! ## Usage
//!
//! ```no_run
//! use media_jobs::config::ToolsConfig;
//! use media_jobs::fetcher::{MediaTool, ProcessRunner};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = ProcessRunner::from_path().expect("yt-dlp not found");
//!     let tool = MediaTool::new(Arc::new(runner), &ToolsConfig::default());
//!
//!     let details = tool.lookup("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     println!("{} by {}: {:?}", details.title, details.uploader, details.formats);
//!     Ok(())
//! }
//! ```

mod command;
mod parser;
mod process;
mod tool;
mod traits;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_support;

pub use command::{BEST_QUALITY, FetchPlan, fetch_args, lookup_args, parse_height, video_selector};
pub use parser::{LADDER_HEIGHTS, last_diagnostic_line, parse_video_details, quality_ladder};
pub use process::{ProcessRunner, UnavailableRunner, YTDLP_BINARY};
pub use tool::{MediaTool, validate_url};
pub use traits::{CommandOutput, CommandRunner};

use crate::config::ToolsConfig;
use std::sync::Arc;

/// Pick the runner described by `tools`
///
/// Uses the explicit `ytdlp_path` if set, otherwise searches PATH when
/// allowed, and falls back to [`UnavailableRunner`].
pub fn runner_from_config(tools: &ToolsConfig) -> Arc<dyn CommandRunner> {
    if let Some(ref path) = tools.ytdlp_path {
        Arc::new(ProcessRunner::new(path.clone()))
    } else if tools.search_path {
        ProcessRunner::from_path()
            .map(|r| Arc::new(r) as Arc<dyn CommandRunner>)
            .unwrap_or_else(|| {
                tracing::warn!("yt-dlp not found in PATH, jobs and lookups will fail");
                Arc::new(UnavailableRunner)
            })
    } else {
        tracing::warn!("no yt-dlp path configured and PATH search disabled");
        Arc::new(UnavailableRunner)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_path_wins() {
        let tools = ToolsConfig {
            ytdlp_path: Some(PathBuf::from("/opt/yt-dlp")),
            search_path: false,
            ..Default::default()
        };

        assert_eq!(runner_from_config(&tools).name(), "process");
    }

    #[test]
    fn no_path_and_no_search_is_unavailable() {
        let tools = ToolsConfig {
            ytdlp_path: None,
            search_path: false,
            ..Default::default()
        };

        assert_eq!(runner_from_config(&tools).name(), "unavailable");
    }
}

//! # media-jobs
//!
//! Asynchronous media fetch service: clients submit a source URL, the server
//! runs yt-dlp in the background to produce an mp4 or mp3 file, and clients
//! poll for status and download the result.
//!
//! ## Overview
//!
//! - [`JobManager`] owns the in-memory job registry and runs one background
//!   task per job
//! - [`fetcher`] wraps the external yt-dlp binary behind the
//!   [`CommandRunner`](fetcher::CommandRunner) trait
//! - [`api`] exposes the HTTP surface (axum)
//! - [`sanitize`] turns caller-supplied titles into safe filenames
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_jobs::{Config, JobManager, run_with_shutdown};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = JobManager::new(Config::default()).await?;
//!
//!     // Serve the API until SIGTERM/SIGINT, then drain running jobs
//!     run_with_shutdown(manager).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// External media tool invocation
pub mod fetcher;
/// Job registry, state machine and background execution
pub mod jobs;
/// Filename sanitization
pub mod sanitize;
/// Core types
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use jobs::JobManager;
pub use types::{
    FormatKind, InfoRequest, Job, JobId, JobRequest, JobStatus, JobStatusResponse,
    StartJobResponse, VideoDetails,
};

use std::sync::Arc;

/// Serve the API until a shutdown signal arrives, then shut down gracefully
///
/// Starts the retention sweep when enabled, serves on the configured bind
/// address, and on SIGTERM/SIGINT (Ctrl+C on other platforms) stops the
/// server and waits for running jobs via [`JobManager::shutdown`].
///
/// # Example
///
/// ```no_run
/// use media_jobs::{JobManager, Config, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let manager = JobManager::new(Config::default()).await?;
///     run_with_shutdown(manager).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(manager: JobManager) -> Result<()> {
    let manager = Arc::new(manager);
    let config = manager.config().clone();

    let _sweeper = manager.start_retention_sweeper();

    api::start_api_server(manager.clone(), config, wait_for_signal()).await?;
    manager.shutdown().await
}

/// Resolve when the process receives SIGTERM or SIGINT
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Resolve when the process receives Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}

//! Shutdown coordination.

use crate::error::Result;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::JobManager;

/// How long shutdown waits for running jobs
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

impl JobManager {
    /// Gracefully shut down the manager
    ///
    /// This method performs a graceful shutdown sequence:
    /// 1. Stops accepting new jobs
    /// 2. Stops background services such as the retention sweep
    /// 3. Waits for running jobs to finish with a timeout (30 seconds)
    ///
    /// Jobs still running after the timeout are left to the runtime; their
    /// child processes are killed when the tasks are dropped.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.accepting_new.store(false, Ordering::SeqCst);
        self.shutdown_token.cancel();
        tracing::info!("Stopped accepting new jobs");

        self.tasks.close();
        let running = self.tasks.len();
        if running > 0 {
            tracing::info!(running, "Waiting for running jobs to finish");
        }

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.tasks.wait()).await {
            Ok(()) => tracing::info!("All running jobs finished"),
            Err(_) => tracing::warn!(
                remaining = self.tasks.len(),
                "Timeout waiting for jobs to finish, proceeding with shutdown"
            ),
        }

        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Whether new jobs are accepted
    pub fn is_accepting(&self) -> bool {
        self.accepting_new.load(Ordering::SeqCst)
    }

    /// Number of executor tasks still running
    pub fn running_jobs(&self) -> usize {
        self.tasks.len()
    }
}

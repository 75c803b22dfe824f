//! Optional eviction of finished jobs and their files.

use super::JobManager;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;

impl JobManager {
    /// Evict terminal jobs that finished more than `max_age` ago
    ///
    /// Their output files are deleted as well. Returns the number of evicted
    /// jobs.
    pub async fn sweep_expired(&self, max_age: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return 0;
        };

        let evicted = self.registry.evict_finished_before(cutoff).await;

        for job in &evicted {
            let Some(path) = &job.output_path else {
                continue;
            };
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::debug!(job_id = %job.id, path = %path.display(), "removed expired file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(job_id = %job.id, path = %path.display(), error = %e, "failed to remove expired file")
                }
            }
        }

        if !evicted.is_empty() {
            tracing::info!(evicted = evicted.len(), "retention sweep evicted finished jobs");
        }
        evicted.len()
    }

    /// Start the periodic retention sweep if enabled in config
    ///
    /// The task stops when the manager shuts down.
    pub fn start_retention_sweeper(&self) -> Option<JoinHandle<()>> {
        let retention = self.config.retention.clone();
        if !retention.enabled {
            return None;
        }

        tracing::info!(
            max_age_secs = retention.max_age.as_secs(),
            interval_secs = retention.sweep_interval.as_secs(),
            "retention sweep enabled"
        );

        let manager = self.clone();
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(retention.sweep_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = manager.shutdown_token.cancelled() => {
                        tracing::debug!("retention sweep stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        manager.sweep_expired(retention.max_age).await;
                    }
                }
            }
        }))
    }
}

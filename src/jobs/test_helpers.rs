//! Shared test helpers for creating JobManager instances in tests.

use crate::config::Config;
use crate::fetcher::test_support::ScriptedRunner;
use crate::jobs::JobManager;
use crate::types::{JobId, JobRequest, JobStatusResponse};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Config whose download directory lives inside `dir`
pub(crate) fn test_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.download.download_dir = dir.path().join("downloads");
    config
}

/// Helper to create a test JobManager around a scripted runner.
/// Returns the manager and the tempdir (which must be kept alive).
pub(crate) async fn create_test_manager(runner: ScriptedRunner) -> (JobManager, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(&temp_dir);
    let manager = JobManager::with_runner(config, Arc::new(runner))
        .await
        .unwrap();
    (manager, temp_dir)
}

/// Same as [`create_test_manager`] with a caller-adjusted config
pub(crate) async fn create_test_manager_with(
    runner: ScriptedRunner,
    adjust: impl FnOnce(&mut Config),
) -> (JobManager, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let mut config = test_config(&temp_dir);
    adjust(&mut config);
    let manager = JobManager::with_runner(config, Arc::new(runner))
        .await
        .unwrap();
    (manager, temp_dir)
}

/// A well-formed request
pub(crate) fn job_request(format_type: &str) -> JobRequest {
    JobRequest {
        url: "https://www.youtube.com/watch?v=abc123".into(),
        format_type: format_type.into(),
        quality: None,
        title: "Creep".into(),
        artist: "Radiohead".into(),
    }
}

/// Poll until the job reaches a terminal state (fails the test after 5s)
pub(crate) async fn wait_for_terminal(manager: &JobManager, id: JobId) -> JobStatusResponse {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let status = manager.status(id).await.unwrap();
            if status.status.is_terminal() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}

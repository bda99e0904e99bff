use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::error::{LauncherError, LauncherResult};

use super::progress::{PercentThrottle, ProgressSink, Stage};

/// One planned fetch: source URL, destination path, human-readable label.
/// Tasks are only created for absent destinations, so executing a plan is
/// idempotent by construction.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub url: String,
    pub dest: PathBuf,
    pub label: String,
    /// Optional SHA-1 to verify while streaming (asset objects carry one).
    pub sha1: Option<String>,
}

impl DownloadTask {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            label: label.into(),
            sha1: None,
        }
    }

    pub fn with_sha1(mut self, sha1: impl Into<String>) -> Self {
        self.sha1 = Some(sha1.into());
        self
    }
}

/// Outcome of a batch run. A failed task is not fatal here; missing files
/// only matter later if classpath or argument synthesis needs them.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: usize,
    pub failures: Vec<(DownloadTask, LauncherError)>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Concurrent streaming downloader.
pub struct Downloader {
    client: Client,
    /// Maximum number of parallel downloads.
    concurrency: usize,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            concurrency: 10,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    // ── Single file download ────────────────────────────

    /// Stream a single file to `dest`, creating parent directories and
    /// optionally verifying SHA-1 over the stream.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut hasher = sha1_expected.map(|_| Sha1::new());
        let mut body = response.bytes_stream();

        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|source| LauncherError::Io {
                    path: dest.to_path_buf(),
                    source,
                })?;

            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                if let Some(hasher) = hasher.as_mut() {
                    hasher.update(&chunk);
                }
                file.write_all(&chunk)
                    .await
                    .map_err(|source| LauncherError::Io {
                        path: dest.to_path_buf(),
                        source,
                    })?;
            }

            file.flush().await.map_err(|source| LauncherError::Io {
                path: dest.to_path_buf(),
                source,
            })?;
            // Handle dropped here, before any hash verdict touches the file.
        }

        if let (Some(hasher), Some(expected)) = (hasher, sha1_expected) {
            let actual = hex::encode(hasher.finalize());
            if actual != expected {
                let _ = tokio::fs::remove_file(dest).await;
                return Err(LauncherError::Sha1Mismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        debug!("Downloaded {} -> {:?}", url, dest);
        Ok(())
    }

    // ── Batch execution ─────────────────────────────────

    /// Execute all tasks through a bounded worker pool. Individual failures
    /// are logged and collected; the batch always runs to completion.
    /// Progress is reported once per integer-percent advance.
    pub async fn run(&self, tasks: Vec<DownloadTask>, sink: &dyn ProgressSink) -> BatchReport {
        let total = tasks.len();
        if total == 0 {
            debug!("Nothing to download");
            return BatchReport::default();
        }

        info!(
            "Starting batch download: {} files, concurrency={}",
            total, self.concurrency
        );

        let mut results = stream::iter(tasks)
            .map(|task| async move {
                let result = self
                    .download_file(&task.url, &task.dest, task.sha1.as_deref())
                    .await;
                (task, result)
            })
            .buffer_unordered(self.concurrency);

        let mut report = BatchReport::default();
        let mut throttle = PercentThrottle::new(total);

        while let Some((task, result)) = results.next().await {
            report.completed += 1;
            if let Err(error) = result {
                warn!("Download failed for {}: {}", task.label, error);
                report.failures.push((task, error));
            }
            if throttle.admit(report.completed) {
                sink.on_progress(Stage::Downloading, report.completed, total);
            }
        }

        info!(
            "Batch finished: {} of {} ok",
            total - report.failures.len(),
            total
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::http::build_http_client;

    use super::super::progress::NullSink;

    #[tokio::test]
    async fn empty_batch_succeeds_without_any_fetch() {
        let downloader = Downloader::new(build_http_client().unwrap());
        let report = downloader.run(Vec::new(), &NullSink).await;

        assert_eq!(report.completed, 0);
        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn failures_are_collected_not_fatal() {
        let dest = std::env::temp_dir().join(format!(
            "downloader-test-fail-{}/never-written",
            std::process::id()
        ));
        // Unresolvable host: the task fails, the batch still completes.
        let task = DownloadTask::new("http://127.0.0.1:1/nothing", &dest, "nothing");

        let downloader = Downloader::new(build_http_client().unwrap()).with_concurrency(2);
        let report = downloader.run(vec![task], &NullSink).await;

        assert_eq!(report.completed, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(!dest.exists());

        let _ = std::fs::remove_dir_all(dest.parent().unwrap());
    }
}

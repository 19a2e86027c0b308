//! One retrieval: submit, wait for the job, download the result.
//!
//! The result is streamed into `<target>.partial` and moved onto `target`
//! only after its size has been checked, so `target` is never left holding a
//! truncated file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use era5_common::RetrievalRequest;
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::client::{AssetBody, DataStore, JobState};
use crate::error::{RetrieveError, RetrieveResult};

/// Delay schedule for job status polling.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first status check
    pub initial_delay: Duration,
    /// Upper bound for the delay
    pub max_delay: Duration,
    /// Growth factor applied after each check
    pub factor: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(120),
            factor: 1.5,
        }
    }
}

impl PollConfig {
    /// Delay to use after `current`.
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.factor.max(1.0)).min(self.max_delay)
    }
}

/// Outcome of a completed retrieval.
#[derive(Debug, Clone)]
pub struct RetrieveSummary {
    pub job_id: String,
    pub path: PathBuf,
    pub bytes: u64,
    pub status_checks: u32,
    pub elapsed: Duration,
}

/// Run one retrieval of `request` into `target`.
#[instrument(
    skip(store, request, poll),
    fields(dataset = %request.dataset, target = %target.display())
)]
pub async fn retrieve<S: DataStore + ?Sized>(
    store: &S,
    request: &RetrievalRequest,
    target: &Path,
    poll: &PollConfig,
) -> RetrieveResult<RetrieveSummary> {
    request.validate()?;
    let started = Instant::now();

    let mut status = store.submit(&request.dataset, &request.to_inputs()).await?;
    let job_id = status.job_id.clone();
    info!(job_id = %job_id, state = ?status.status, "Retrieval job submitted");

    let mut delay = poll.initial_delay;
    let mut status_checks = 0u32;
    while !status.status.is_terminal() {
        if status.status == JobState::Unknown {
            warn!(job_id = %job_id, "Archive reported an unrecognised job state");
        }
        tokio::time::sleep(delay).await;
        status = store.job(&job_id).await?;
        status_checks += 1;
        debug!(
            job_id = %job_id,
            state = ?status.status,
            delay_ms = delay.as_millis() as u64,
            "Polled job"
        );
        delay = poll.next_delay(delay);
    }

    if status.status != JobState::Successful {
        let reason = status
            .message
            .unwrap_or_else(|| format!("job {:?}", status.status).to_lowercase());
        return Err(RetrieveError::JobFailed { job_id, reason });
    }

    let asset = store.results(&job_id).await?;
    info!(
        job_id = %job_id,
        href = %asset.href,
        size = ?asset.size,
        media_type = ?asset.media_type,
        "Job finished, downloading result"
    );

    let body = store.open_asset(&asset).await?;
    let bytes = download_to(body, asset.size, target).await?;

    let summary = RetrieveSummary {
        job_id,
        path: target.to_path_buf(),
        bytes,
        status_checks,
        elapsed: started.elapsed(),
    };
    info!(
        path = %summary.path.display(),
        bytes = summary.bytes,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "Retrieval completed"
    );
    Ok(summary)
}

/// `<target>.partial`
pub fn partial_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

/// Stream `body` to `target` through a partial file.
///
/// The partial file is removed on any failure.
async fn download_to(
    body: AssetBody,
    advertised: Option<u64>,
    target: &Path,
) -> RetrieveResult<u64> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let temp_path = partial_path(target);

    let expected = advertised.or(body.content_length);
    match write_stream(body, &temp_path).await {
        Ok(written) => {
            if let Some(expected) = expected {
                if written != expected {
                    let _ = fs::remove_file(&temp_path).await;
                    return Err(RetrieveError::SizeMismatch {
                        expected,
                        actual: written,
                    });
                }
            }
            if let Err(e) = fs::rename(&temp_path, target).await {
                // rename fails across filesystems; copy instead
                debug!(error = %e, "Rename failed, copying");
                let copied = fs::copy(&temp_path, target).await;
                let _ = fs::remove_file(&temp_path).await;
                copied?;
            }
            Ok(written)
        }
        Err(e) => {
            let _ = fs::remove_file(&temp_path).await;
            Err(e)
        }
    }
}

async fn write_stream(body: AssetBody, path: &Path) -> RetrieveResult<u64> {
    let mut file = fs::File::create(path).await?;
    let mut stream = body.stream;
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

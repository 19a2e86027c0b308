//! Client for the climate data archive's process/job API.
//!
//! A retrieval is an asynchronous job on the archive side:
//!
//! 1. `POST {url}/retrieve/v1/processes/{dataset}/execution` queues a job
//! 2. `GET {url}/retrieve/v1/jobs/{id}` reports its state
//! 3. `GET {url}/retrieve/v1/jobs/{id}/results` names the result asset
//! 4. the asset `href` is fetched as a plain download
//!
//! [`DataStore`] is the seam the retrieval flow is written against, so it can
//! be driven by an in-memory store in tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::credentials::Credentials;
use crate::error::{RetrieveError, RetrieveResult};

/// Header carrying the API key.
pub const AUTH_HEADER: &str = "PRIVATE-TOKEN";

/// Server-side state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Accepted,
    Running,
    Successful,
    Failed,
    Rejected,
    Dismissed,
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// Whether the job will not change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Successful | JobState::Failed | JobState::Rejected | JobState::Dismissed
        )
    }
}

/// Job status document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "jobID")]
    pub job_id: String,
    pub status: JobState,
    #[serde(default)]
    pub message: Option<String>,
}

/// Downloadable result of a successful job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub href: String,
    #[serde(rename = "file:size", default)]
    pub size: Option<u64>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
}

#[derive(Deserialize)]
struct ResultsDocument {
    asset: AssetEnvelope,
}

#[derive(Deserialize)]
struct AssetEnvelope {
    value: Asset,
}

/// Error document returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct ProblemDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// An opened result download.
pub struct AssetBody {
    /// Length advertised by the server, if any
    pub content_length: Option<u64>,
    pub stream: BoxStream<'static, RetrieveResult<Bytes>>,
}

/// Operations the retrieval flow needs from the archive.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Queue a job for `dataset` with the given request inputs.
    async fn submit(&self, dataset: &str, inputs: &Value) -> RetrieveResult<JobStatus>;

    /// Current status of a job.
    async fn job(&self, job_id: &str) -> RetrieveResult<JobStatus>;

    /// Result asset of a successful job.
    async fn results(&self, job_id: &str) -> RetrieveResult<Asset>;

    /// Start downloading an asset.
    async fn open_asset(&self, asset: &Asset) -> RetrieveResult<AssetBody>;
}

/// [`DataStore`] backed by the archive's HTTP API.
pub struct CdsClient {
    http: Client,
    base_url: String,
    key: String,
}

impl CdsClient {
    /// Create a client for `credentials` with the given request timeout.
    pub fn new(credentials: Credentials, request_timeout: Duration) -> RetrieveResult<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("era5-retriever/", env!("CARGO_PKG_VERSION")))
            .tcp_nodelay(true)
            .build()?;

        Ok(Self {
            http,
            base_url: credentials.url.trim_end_matches('/').to_string(),
            key: credentials.key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/retrieve/v1/{}", self.base_url, path)
    }

    /// Resolve an asset `href`, which may be relative to the API URL.
    fn asset_url(&self, href: &str) -> RetrieveResult<Url> {
        let base = Url::parse(&format!("{}/", self.base_url)).map_err(|e| {
            RetrieveError::Config(format!("invalid API URL {}: {}", self.base_url, e))
        })?;
        base.join(href)
            .map_err(|e| RetrieveError::Config(format!("invalid asset href {}: {}", href, e)))
    }
}

/// Map a non-success response to an error, keeping the archive's message.
async fn check_response(response: Response) -> RetrieveResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = describe_problem(&body, status);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(RetrieveError::Auth(detail)),
        _ => Err(RetrieveError::Service {
            status: status.as_u16(),
            detail,
        }),
    }
}

fn describe_problem(body: &str, status: StatusCode) -> String {
    let problem: ProblemDocument = serde_json::from_str(body).unwrap_or_default();
    match (problem.title, problem.detail) {
        (Some(title), Some(detail)) => format!("{}: {}", title, detail),
        (Some(text), None) | (None, Some(text)) => text,
        (None, None) if !body.trim().is_empty() => body.trim().to_string(),
        (None, None) => status
            .canonical_reason()
            .unwrap_or("no details")
            .to_string(),
    }
}

#[async_trait]
impl DataStore for CdsClient {
    #[instrument(skip(self, inputs))]
    async fn submit(&self, dataset: &str, inputs: &Value) -> RetrieveResult<JobStatus> {
        let url = self.endpoint(&format!("processes/{}/execution", dataset));
        let response = self
            .http
            .post(&url)
            .header(AUTH_HEADER, &self.key)
            .json(&json!({ "inputs": inputs }))
            .send()
            .await?;
        let status: JobStatus = check_response(response).await?.json().await?;
        debug!(job_id = %status.job_id, state = ?status.status, "Job submitted");
        Ok(status)
    }

    async fn job(&self, job_id: &str) -> RetrieveResult<JobStatus> {
        let response = self
            .http
            .get(self.endpoint(&format!("jobs/{}", job_id)))
            .header(AUTH_HEADER, &self.key)
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    #[instrument(skip(self))]
    async fn results(&self, job_id: &str) -> RetrieveResult<Asset> {
        let response = self
            .http
            .get(self.endpoint(&format!("jobs/{}/results", job_id)))
            .header(AUTH_HEADER, &self.key)
            .send()
            .await?;
        let document: ResultsDocument = check_response(response).await?.json().await?;
        Ok(document.asset.value)
    }

    #[instrument(skip(self), fields(href = %asset.href))]
    async fn open_asset(&self, asset: &Asset) -> RetrieveResult<AssetBody> {
        let url = self.asset_url(&asset.href)?;
        let response = check_response(self.http.get(url).send().await?).await?;
        let content_length = response.content_length();
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(RetrieveError::from))
            .boxed();
        Ok(AssetBody {
            content_length,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_parsing() {
        let status: JobStatus = serde_json::from_str(
            r#"{"processID": "reanalysis-era5-single-levels", "type": "process",
                "jobID": "7f3c", "status": "running", "created": "2025-02-25T12:00:00"}"#,
        )
        .unwrap();
        assert_eq!(status.job_id, "7f3c");
        assert_eq!(status.status, JobState::Running);
        assert!(!status.status.is_terminal());
    }

    #[test]
    fn test_unknown_state_is_not_terminal() {
        let status: JobStatus =
            serde_json::from_str(r#"{"jobID": "1", "status": "paused"}"#).unwrap();
        assert_eq!(status.status, JobState::Unknown);
        assert!(!status.status.is_terminal());
    }

    #[test]
    fn test_results_parsing() {
        let document: ResultsDocument = serde_json::from_str(
            r#"{"asset": {"value": {"type": "application/netcdf",
                "href": "https://object-store.example/cache/abc.nc", "file:size": 2076588}}}"#,
        )
        .unwrap();
        assert_eq!(document.asset.value.href, "https://object-store.example/cache/abc.nc");
        assert_eq!(document.asset.value.size, Some(2_076_588));
        assert_eq!(
            document.asset.value.media_type.as_deref(),
            Some("application/netcdf")
        );
    }

    #[test]
    fn test_describe_problem() {
        assert_eq!(
            describe_problem(
                r#"{"title": "invalid request", "detail": "date out of range"}"#,
                StatusCode::BAD_REQUEST
            ),
            "invalid request: date out of range"
        );
        assert_eq!(
            describe_problem("gateway down", StatusCode::BAD_GATEWAY),
            "gateway down"
        );
        assert_eq!(
            describe_problem("", StatusCode::NOT_FOUND),
            "Not Found"
        );
    }

    #[test]
    fn test_endpoints() {
        let client = CdsClient::new(
            Credentials {
                url: "https://cds.example/api/".to_string(),
                key: "k".to_string(),
            },
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("jobs/42"),
            "https://cds.example/api/retrieve/v1/jobs/42"
        );
        assert_eq!(
            client.asset_url("https://store.example/a.nc").unwrap().as_str(),
            "https://store.example/a.nc"
        );
        assert_eq!(
            client.asset_url("/download/a.nc").unwrap().as_str(),
            "https://cds.example/download/a.nc"
        );
    }
}

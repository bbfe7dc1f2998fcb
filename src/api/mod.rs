//! HTTP collaborators for the backend API.
//!
//! The pipeline only sees the traits; [`HttpApi`] is the reqwest-backed
//! implementation used in production, and the integration tests script the
//! collaborators in process.

pub mod jobs;
pub mod reports;
pub mod uploads;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::{evidence::PendingFile, payload::ReportSubmissionPayload};

pub use jobs::JobSummary;

/// Supplies the jobs a report can be filed against.
#[async_trait]
pub trait JobDirectory {
    /// Jobs awaiting a report, optionally filtered by a search term.
    async fn list_jobs(&self, search: Option<&str>) -> Result<Vec<JobSummary>>;
}

/// Accepts an ordered batch of evidence files, all-or-nothing, and returns
/// stored-file references in the same order.
#[async_trait]
pub trait EvidenceStore {
    async fn upload_batch(&self, role: &str, files: &[&PendingFile]) -> Result<Vec<String>>;
}

/// Accepts the composed structured report.
#[async_trait]
pub trait ReportSink {
    async fn submit_report(&self, payload: &ReportSubmissionPayload) -> Result<()>;
}

/// The real backend over HTTP.
#[derive(Clone, Debug)]
pub struct HttpApi {
    http: Client,
    base_url: String,
}

impl HttpApi {
    /// New client against a base URL such as `https://api.example.com`.
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        // Paths are appended with a leading slash.
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }
}

#[async_trait]
impl JobDirectory for HttpApi {
    async fn list_jobs(&self, search: Option<&str>) -> Result<Vec<JobSummary>> {
        jobs::list_open_jobs(&self.http, &self.base_url, search).await
    }
}

#[async_trait]
impl EvidenceStore for HttpApi {
    async fn upload_batch(&self, role: &str, files: &[&PendingFile]) -> Result<Vec<String>> {
        uploads::upload_evidence_batch(&self.http, &self.base_url, role, files).await
    }
}

#[async_trait]
impl ReportSink for HttpApi {
    async fn submit_report(&self, payload: &ReportSubmissionPayload) -> Result<()> {
        reports::submit_report(&self.http, &self.base_url, payload).await
    }
}

/// Convert non-2xx responses into a structured error.
pub(crate) async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_else(|_| "".into());
    Err(anyhow::anyhow!("HTTP status {status} error: {body}"))
}

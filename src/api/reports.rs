//! Report submission API helper.

use anyhow::Result;
use reqwest::Client;

use super::ensure_success;
use crate::payload::ReportSubmissionPayload;

/// Post the composed report. On success the backend flips the job's report
/// status from pending to submitted as its own side effect.
pub async fn submit_report(
    http: &Client,
    base_url: &str,
    payload: &ReportSubmissionPayload,
) -> Result<()> {
    let url = format!("{base_url}/api/reports");
    let resp = http.post(url).json(payload).send().await?;
    ensure_success(resp).await?;
    Ok(())
}

//! Job directory API helpers.

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use super::ensure_success;

/// List response for pending jobs.
#[derive(Debug, Deserialize)]
struct JobListResp {
    jobs: Vec<JobSummary>,
}

/// Minimal job metadata needed to file a report.
#[derive(Clone, Debug, Deserialize)]
pub struct JobSummary {
    /// Identifier the report is submitted against.
    pub id: String,
    /// Display label, also used for template eligibility.
    pub label: String,
}

/// List jobs that still await a report, optionally filtered by a free-text
/// search over the label.
pub async fn list_open_jobs(
    http: &Client,
    base_url: &str,
    search: Option<&str>,
) -> Result<Vec<JobSummary>> {
    let mut url = format!("{base_url}/api/jobs?report_status=pending");
    if let Some(q) = search {
        url.push_str(&format!("&q={}", urlencoding::encode(q)));
    }

    let resp = http.get(url).send().await?;
    let resp = ensure_success(resp).await?;
    let resp = resp.json::<JobListResp>().await?;
    Ok(resp.jobs)
}

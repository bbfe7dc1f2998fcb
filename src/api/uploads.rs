//! Evidence upload API helper.

use anyhow::{Result, anyhow};
use reqwest::Client;
use serde::Deserialize;

use super::ensure_success;
use crate::evidence::PendingFile;

/// Upload response: stored-file references in request order.
#[derive(Debug, Deserialize)]
struct UploadResp {
    urls: Vec<String>,
}

/// Send one batched multipart upload for all pending files and return the
/// stored-file references in the same order.
///
/// The storage collaborator is all-or-nothing: either every file is stored
/// and referenced, or the whole call fails and the caller proceeds without
/// references.
pub async fn upload_evidence_batch(
    http: &Client,
    base_url: &str,
    role: &str,
    files: &[&PendingFile],
) -> Result<Vec<String>> {
    let mut form = reqwest::multipart::Form::new().text("role", role.to_string());
    for file in files {
        form = form.part(
            "files",
            reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.filename.clone())
                .mime_str(&file.mime)?,
        );
    }

    let url = format!("{base_url}/api/evidence/upload");
    let resp = http.post(url).multipart(form).send().await?;
    let resp = ensure_success(resp).await?;
    let resp = resp.json::<UploadResp>().await?;

    if resp.urls.len() != files.len() {
        return Err(anyhow!(
            "upload returned {} reference(s) for {} file(s)",
            resp.urls.len(),
            files.len()
        ));
    }
    Ok(resp.urls)
}

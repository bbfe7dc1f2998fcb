//! The submission pipeline: validate, upload evidence, submit.
//!
//! One submission runs `Validating → UploadingEvidence → Submitting` and
//! ends in `Succeeded` or `Failed`. The evidence upload always resolves,
//! success or explicit give-up, strictly before the structured submission
//! is sent, so references (if any) are available to embed in the payload.
//!
//! Upload failure does not abort the report: attachments are supplementary
//! and the report text is primary, so the pipeline warns and continues with
//! an empty reference list. A rejected submission leaves the draft intact
//! for retry.

use tokio::sync::mpsc;

use crate::{
    api::{EvidenceStore, ReportSink},
    draft::ReportDraft,
    engine::FormEngine,
    error::SubmitError,
    payload, templates, validate,
};

/// Where one submission attempt currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    /// Running the required-field policy.
    Validating,
    /// Waiting on the evidence storage collaborator.
    UploadingEvidence,
    /// Waiting on the report collaborator.
    Submitting,
    /// The report is filed; the draft may be discarded.
    Succeeded,
    /// The attempt ended; the draft is preserved.
    Failed,
}

/// Commands sent from the UI to the pipeline worker.
#[derive(Debug)]
pub enum PipelineCmd {
    /// Validate, upload evidence and submit the draft.
    Submit { draft: ReportDraft },
    /// Abort without any network call, releasing evidence previews.
    Discard { draft: ReportDraft },
}

/// Events emitted by the pipeline for UI updates.
#[derive(Debug)]
pub enum PipelineEvent {
    /// Phase transition, for the loading indicator.
    Phase(SubmitPhase),
    /// Non-fatal problem the operator should see (e.g. upload degraded).
    Warning(String),
    /// The report was filed; the job's report status flips server-side.
    Completed { job_id: String },
    /// The attempt failed; the draft comes back for further editing.
    Rejected {
        draft: Box<ReportDraft>,
        error: SubmitError,
    },
}

/// Main pipeline loop: handle submissions sequentially, one at a time.
pub async fn run<A>(
    mut rx: mpsc::Receiver<PipelineCmd>,
    tx: mpsc::Sender<PipelineEvent>,
    api: A,
    role: String,
) where
    A: EvidenceStore + ReportSink,
{
    tracing::info!("pipeline worker started");
    while let Some(cmd) = rx.recv().await {
        match cmd {
            PipelineCmd::Discard { draft } => {
                draft.discard();
            }
            PipelineCmd::Submit { draft } => {
                let Some(template) = templates::for_slug(&draft.form_slug) else {
                    tracing::error!("unknown form type: {}", draft.form_slug);
                    let _ = tx
                        .send(PipelineEvent::Rejected {
                            error: SubmitError::Submission(format!(
                                "unknown form type: {}",
                                draft.form_slug
                            )),
                            draft: Box::new(draft),
                        })
                        .await;
                    continue;
                };
                let engine = FormEngine::new(template);
                match submit(&api, &engine, &draft, &role, &tx).await {
                    Ok(()) => {
                        tracing::info!("report filed: job={}", draft.job_id);
                        let job_id = draft.job_id.clone();
                        // Consume the draft; previews are gone with it.
                        draft.discard();
                        let _ = tx.send(PipelineEvent::Completed { job_id }).await;
                    }
                    Err(error) => {
                        tracing::warn!("submission attempt failed: {error}");
                        let _ = tx
                            .send(PipelineEvent::Rejected {
                                draft: Box::new(draft),
                                error,
                            })
                            .await;
                    }
                }
            }
        }
    }
}

/// One submission attempt. The draft is only borrowed: on failure the
/// caller still holds it unchanged, ready for retry.
pub async fn submit<A>(
    api: &A,
    engine: &FormEngine,
    draft: &ReportDraft,
    role: &str,
    tx: &mpsc::Sender<PipelineEvent>,
) -> Result<(), SubmitError>
where
    A: EvidenceStore + ReportSink,
{
    let _ = tx.send(PipelineEvent::Phase(SubmitPhase::Validating)).await;
    let errors = validate::collect_errors(engine.template(), draft);
    if !errors.is_empty() {
        tracing::info!("validation blocked submission: {} finding(s)", errors.len());
        let _ = tx.send(PipelineEvent::Phase(SubmitPhase::Failed)).await;
        return Err(SubmitError::Validation(errors));
    }

    // Evidence upload resolves, success or give-up, before submission.
    let files = payload::collect_pending_evidence(engine.template(), draft);
    let photo_urls = if files.is_empty() {
        vec![]
    } else {
        let _ = tx
            .send(PipelineEvent::Phase(SubmitPhase::UploadingEvidence))
            .await;
        match api.upload_batch(role, &files).await {
            Ok(urls) => {
                tracing::info!("evidence uploaded: {} file(s)", urls.len());
                urls
            }
            Err(e) => {
                // Degrade rather than fail: the textual report still goes in.
                tracing::warn!("evidence upload failed, submitting without attachments: {e}");
                let _ = tx
                    .send(PipelineEvent::Warning(format!(
                        "photo upload failed ({e}); the report will be submitted without attachments"
                    )))
                    .await;
                vec![]
            }
        }
    };

    let _ = tx.send(PipelineEvent::Phase(SubmitPhase::Submitting)).await;
    let payload = payload::build_payload(engine.template(), draft, photo_urls);
    match api.submit_report(&payload).await {
        Ok(()) => {
            let _ = tx.send(PipelineEvent::Phase(SubmitPhase::Succeeded)).await;
            Ok(())
        }
        Err(e) => {
            let _ = tx.send(PipelineEvent::Phase(SubmitPhase::Failed)).await;
            Err(SubmitError::Submission(e.to_string()))
        }
    }
}

//! Form-engine core for the multi-day incident report forms.
//!
//! One generic engine evaluates a declarative field schema: which fields are
//! visible, which are required, what gets cleared when a gating answer
//! flips, and how the optional report days 2..=7 chain together. The
//! submission pipeline validates the draft, uploads pending photo evidence,
//! and posts the composed report to the backend, degrading gracefully when
//! the upload fails.
//!
//! The rendering layer is an external consumer: it reads
//! [`visibility::visible_fields`] on every render, funnels every edit
//! through [`engine::FormEngine`], and drives [`pipeline`] on submit.

pub mod api;
pub mod config;
pub mod days;
pub mod draft;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod logging;
pub mod payload;
pub mod pipeline;
pub mod schema;
pub mod templates;
pub mod validate;
pub mod visibility;

pub use draft::ReportDraft;
pub use engine::FormEngine;
pub use error::{EngineError, FieldError, Issue, SubmitError};
pub use evidence::PendingFile;
pub use payload::ReportSubmissionPayload;
pub use pipeline::{PipelineCmd, PipelineEvent, SubmitPhase};
pub use schema::{Condition, FieldDef, FieldKind, FormTemplate};

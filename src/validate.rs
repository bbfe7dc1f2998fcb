//! Conditional required-field policy.
//!
//! A field is required iff it is currently visible and marked
//! required-when-visible in the schema. Visibility is evaluated by the same
//! rules the rendering layer uses, so requiredness can never apply to a
//! field the operator cannot see.

use chrono::{NaiveDate, NaiveTime};

use crate::{
    draft::ReportDraft,
    error::{FieldError, Issue},
    schema::{FieldKind, FormTemplate},
    visibility,
};

/// Collect every validation finding for the draft. An empty list means the
/// draft is submittable.
pub fn collect_errors(template: &FormTemplate, draft: &ReportDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for def in &template.fields {
        if !visibility::holds(&def.shown_when, draft) {
            continue;
        }
        match def.kind {
            FieldKind::Text => {
                if def.required_when_visible && draft.value(def.id).trim().is_empty() {
                    errors.push(FieldError { field: def.id, issue: Issue::Required });
                }
            }
            FieldKind::Date => {
                let value = draft.value(def.id);
                if value.trim().is_empty() {
                    if def.required_when_visible {
                        errors.push(FieldError { field: def.id, issue: Issue::Required });
                    }
                } else if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                    errors.push(FieldError { field: def.id, issue: Issue::InvalidDate });
                }
            }
            FieldKind::Time => {
                let value = draft.value(def.id);
                if value.trim().is_empty() {
                    if def.required_when_visible {
                        errors.push(FieldError { field: def.id, issue: Issue::Required });
                    }
                } else if NaiveTime::parse_from_str(value, "%H:%M").is_err() {
                    errors.push(FieldError { field: def.id, issue: Issue::InvalidTime });
                }
            }
            FieldKind::ChoiceFact { .. } => {
                if def.required_when_visible && draft.choice_fact(def.id).is_none() {
                    errors.push(FieldError { field: def.id, issue: Issue::Required });
                }
            }
            // Yes/no facts always hold an answer (unanswered reads as no).
            FieldKind::BoolFact => {}
            FieldKind::EvidenceSlot { .. } => {
                if def.required_when_visible && draft.evidence.files(def.id).is_empty() {
                    errors.push(FieldError { field: def.id, issue: Issue::Required });
                }
            }
            FieldKind::Roster { day } => {
                // Only the lead slot is ever hard-required (day 1).
                let lead_missing = draft
                    .days
                    .roster(day)
                    .map(|r| r.lead().trim().is_empty())
                    .unwrap_or(true);
                if def.required_when_visible && lead_missing {
                    errors.push(FieldError { field: def.id, issue: Issue::Required });
                }
            }
            // Timeline notes are free text and never required.
            FieldKind::Timeline { .. } => {}
        }
    }

    errors
}

//! Pure field-visibility rules over the declarative schema.
//!
//! No side effects; safe to call on every render. Validation reuses the same
//! evaluation, so requiredness can never disagree with what is on screen.

use std::collections::BTreeSet;

use crate::{
    draft::ReportDraft,
    schema::{Condition, FormTemplate},
};

/// Whether a condition currently holds for the draft.
pub fn holds(cond: &Condition, draft: &ReportDraft) -> bool {
    match cond {
        Condition::Always => true,
        Condition::FactIs(id, want) => draft.bool_fact(id) == *want,
        Condition::FactEquals(id, option) => draft.choice_fact(id) == Some(*option),
        Condition::DayEnabled(day) => draft.days.is_enabled(*day),
        Condition::All(conds) => conds.iter().all(|c| holds(c, draft)),
    }
}

/// Whether one field is currently shown. Unknown ids are never shown.
pub fn is_visible(template: &FormTemplate, draft: &ReportDraft, id: &str) -> bool {
    template
        .field(id)
        .map(|f| holds(&f.shown_when, draft))
        .unwrap_or(false)
}

/// The set of currently relevant field ids, for the rendering layer.
pub fn visible_fields(template: &FormTemplate, draft: &ReportDraft) -> BTreeSet<&'static str> {
    template
        .fields
        .iter()
        .filter(|f| holds(&f.shown_when, draft))
        .map(|f| f.id)
        .collect()
}

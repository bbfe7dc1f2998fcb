//! The mutable working state of one in-progress report.

use std::collections::BTreeMap;

use crate::{days::DayChain, evidence::EvidenceBatches, schema::FormTemplate};

/// The current value of a yes/no or one-of-N answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactValue {
    /// Yes/no. Unanswered facts read as `false`.
    Bool(bool),
    /// One-of-N. `None` while unanswered.
    Choice(Option<String>),
}

/// One in-progress report, client-side only.
///
/// Created when the operator opens a report form for a job, mutated through
/// the engine while editing, and either discarded on cancel or consumed on
/// successful submission. There is no autosave and no identity beyond the
/// target job reference.
#[derive(Clone, Debug)]
pub struct ReportDraft {
    /// The job this report will be filed against.
    pub job_id: String,
    /// Slug of the template the draft was opened with.
    pub form_slug: String,
    /// Free-text, date and time values keyed by field id. Absent means empty.
    values: BTreeMap<&'static str, String>,
    /// Conditional answers keyed by field id. Absent means unanswered.
    facts: BTreeMap<&'static str, FactValue>,
    /// Day enablement, timelines and rosters.
    pub days: DayChain,
    /// Pending photo attachments per slot.
    pub evidence: EvidenceBatches,
}

impl ReportDraft {
    /// Fresh draft for a job, with only day 1 present and nothing answered.
    pub fn new(job_id: impl Into<String>, template: &FormTemplate) -> Self {
        Self {
            job_id: job_id.into(),
            form_slug: template.slug.to_string(),
            values: BTreeMap::new(),
            facts: BTreeMap::new(),
            days: DayChain::new(),
            evidence: EvidenceBatches::new(),
        }
    }

    /// A text/date/time value, empty string while unset.
    pub fn value(&self, id: &str) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or("")
    }

    /// A raw fact value, if answered.
    pub fn fact(&self, id: &str) -> Option<&FactValue> {
        self.facts.get(id)
    }

    /// A yes/no answer; unanswered reads as `false`.
    pub fn bool_fact(&self, id: &str) -> bool {
        matches!(self.facts.get(id), Some(FactValue::Bool(true)))
    }

    /// The selected option of a choice fact, if any.
    pub fn choice_fact(&self, id: &str) -> Option<&str> {
        match self.facts.get(id) {
            Some(FactValue::Choice(Some(v))) => Some(v.as_str()),
            _ => None,
        }
    }

    pub(crate) fn set_value_raw(&mut self, id: &'static str, text: String) {
        if text.is_empty() {
            self.values.remove(id);
        } else {
            self.values.insert(id, text);
        }
    }

    pub(crate) fn set_fact_raw(&mut self, id: &'static str, value: FactValue) {
        // Default-valued answers are stored as absence.
        match &value {
            FactValue::Bool(false) | FactValue::Choice(None) => {
                self.facts.remove(id);
            }
            _ => {
                self.facts.insert(id, value);
            }
        }
    }

    pub(crate) fn clear_field(&mut self, id: &str) -> bool {
        self.values.remove(id).is_some() | self.facts.remove(id).is_some()
    }

    /// Whether the field currently holds a non-default value.
    pub(crate) fn has_value(&self, id: &str) -> bool {
        self.values.contains_key(id) || self.facts.contains_key(id)
    }

    /// Abandon the draft, releasing all evidence previews. No network call
    /// is made; the report is simply gone.
    pub fn discard(mut self) {
        tracing::info!("draft discarded: job={}", self.job_id);
        self.evidence.release_all();
    }
}

//! The typed submission envelope and draft flattening.
//!
//! Exactly one place turns a draft into wire data, so nothing untyped ever
//! crosses the network boundary. Hidden fields are omitted (they are empty
//! or default by invariant), inherited rosters are resolved here by walking
//! back to the nearest explicit entry, and photo references are collected
//! only from slots whose gating condition currently holds.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::{
    draft::ReportDraft,
    evidence::PendingFile,
    schema::{FieldKind, FormTemplate},
    visibility,
};

/// What the report-submission collaborator receives.
#[derive(Clone, Debug, Serialize)]
pub struct ReportSubmissionPayload {
    /// The job the report is filed against.
    pub job_id: String,
    /// Template slug.
    pub form_type: String,
    /// The flattened draft.
    pub report_data: Value,
    /// Stored-file references obtained from the evidence upload, in the
    /// order the files were sent. Empty when there was nothing to upload or
    /// the upload failed and the pipeline degraded.
    pub photo_urls: Vec<String>,
}

/// Every pending file from currently visible evidence slots, in schema slot
/// order then attach order. This is the batch the pipeline uploads.
pub fn collect_pending_evidence<'a>(
    template: &FormTemplate,
    draft: &'a ReportDraft,
) -> Vec<&'a PendingFile> {
    template
        .fields
        .iter()
        .filter(|def| matches!(def.kind, FieldKind::EvidenceSlot { .. }))
        .filter(|def| visibility::holds(&def.shown_when, draft))
        .flat_map(|def| draft.evidence.files(def.id))
        .collect()
}

/// Compose the submission envelope from a validated draft.
pub fn build_payload(
    template: &FormTemplate,
    draft: &ReportDraft,
    photo_urls: Vec<String>,
) -> ReportSubmissionPayload {
    ReportSubmissionPayload {
        job_id: draft.job_id.clone(),
        form_type: draft.form_slug.clone(),
        report_data: flatten(template, draft),
        photo_urls,
    }
}

/// Flatten the draft into one key/value record.
fn flatten(template: &FormTemplate, draft: &ReportDraft) -> Value {
    let mut data = Map::new();
    data.insert("day_count".into(), json!(draft.days.last_enabled_day()));
    data.insert(
        "submitted_at".into(),
        json!(chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()),
    );

    for def in &template.fields {
        if !visibility::holds(&def.shown_when, draft) {
            continue;
        }
        match def.kind {
            FieldKind::Text | FieldKind::Date | FieldKind::Time => {
                data.insert(def.id.into(), json!(draft.value(def.id)));
            }
            FieldKind::BoolFact => {
                data.insert(def.id.into(), json!(draft.bool_fact(def.id)));
            }
            FieldKind::ChoiceFact { .. } => {
                data.insert(def.id.into(), json!(draft.choice_fact(def.id)));
            }
            // Uploaded separately; references travel in `photo_urls`.
            FieldKind::EvidenceSlot { .. } => {}
            FieldKind::Roster { day } => {
                data.insert(
                    format!("day{day}_same_agents"),
                    json!(draft.days.same_agents(day)),
                );
                if let Some(roster) = draft.days.resolve_roster(day) {
                    for (i, name) in roster.named().enumerate() {
                        data.insert(format!("day{day}_agent_{}", i + 1), json!(name));
                    }
                }
            }
            FieldKind::Timeline { day } => {
                if let Some(timeline) = draft.days.timeline(day) {
                    for (hour, note) in timeline.slots() {
                        data.insert(format!("day{day}_{hour:02}00"), json!(note));
                    }
                }
            }
        }
    }

    Value::Object(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::FormEngine, templates};

    fn engine() -> FormEngine {
        FormEngine::new(templates::traveller_eviction())
    }

    #[test]
    fn hidden_evidence_slots_contribute_no_files() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        engine.set_bool_fact(&mut draft, "property_damage", true).unwrap();
        engine
            .add_evidence(&mut draft, "damage_photos", PendingFile::new("dmg.jpg", "image/jpeg", vec![1]))
            .unwrap();
        engine
            .add_evidence(&mut draft, "general_photos_1", PendingFile::new("gen.jpg", "image/jpeg", vec![2]))
            .unwrap();
        assert_eq!(collect_pending_evidence(engine.template(), &draft).len(), 2);

        // Flipping the fact off hides the slot; its files stay attached but
        // must not be referenced by a submission.
        engine.set_bool_fact(&mut draft, "property_damage", false).unwrap();
        let files = collect_pending_evidence(engine.template(), &draft);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "gen.jpg");
    }

    #[test]
    fn flatten_resolves_inherited_rosters() {
        let engine = engine();
        let mut draft = engine.new_draft("job-7");
        engine.set_agent(&mut draft, 1, 0, "J. Harper").unwrap();
        engine.set_agent(&mut draft, 1, 1, "M. Okafor").unwrap();
        engine.set_day_enabled(&mut draft, 2, true).unwrap();
        engine.set_same_agents(&mut draft, 2, true).unwrap();

        let payload = build_payload(engine.template(), &draft, vec![]);
        let data = payload.report_data.as_object().unwrap();
        assert_eq!(data["day2_same_agents"], json!(true));
        assert_eq!(data["day2_agent_1"], json!("J. Harper"));
        assert_eq!(data["day2_agent_2"], json!("M. Okafor"));
        assert_eq!(data["day_count"], json!(2));
    }

    #[test]
    fn flatten_carries_all_timeline_slots_of_enabled_days() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        engine.set_note(&mut draft, 1, 9, "bailiffs arrive").unwrap();

        let payload = build_payload(engine.template(), &draft, vec![]);
        let data = payload.report_data.as_object().unwrap();
        assert_eq!(data["day1_0900"], json!("bailiffs arrive"));
        assert_eq!(data["day1_0600"], json!(""));
        assert!(!data.contains_key("day2_0600"));
    }

    #[test]
    fn hidden_fields_are_omitted_from_report_data() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        let payload = build_payload(engine.template(), &draft, vec![]);
        let data = payload.report_data.as_object().unwrap();
        assert!(!data.contains_key("damage_details"));

        engine.set_bool_fact(&mut draft, "property_damage", true).unwrap();
        engine.set_value(&mut draft, "damage_details", "cracked door").unwrap();
        let payload = build_payload(engine.template(), &draft, vec![]);
        let data = payload.report_data.as_object().unwrap();
        assert_eq!(data["damage_details"], json!("cracked door"));
    }
}

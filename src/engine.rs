//! The single mutation surface over a report draft.
//!
//! Every entry point applies one user edit, then re-sweeps the schema so
//! that no `clear_on_hide` field keeps a value while hidden. The sweep runs
//! to a fixpoint: clearing one fact can hide further fields (a parent
//! selector hides its sub-selector, which hides its own dependents), and all
//! of them must come out empty in the same synchronous transition.

use crate::{
    draft::{FactValue, ReportDraft},
    error::EngineError,
    evidence::PendingFile,
    schema::{FieldKind, FormTemplate},
    visibility,
};

/// One template bound to the generic engine.
pub struct FormEngine {
    template: FormTemplate,
}

impl FormEngine {
    /// Bind a template.
    pub fn new(template: FormTemplate) -> Self {
        Self { template }
    }

    /// The bound template.
    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    /// Open a fresh draft against a job.
    pub fn new_draft(&self, job_id: impl Into<String>) -> ReportDraft {
        ReportDraft::new(job_id, &self.template)
    }

    fn field(&self, id: &str) -> Result<&crate::schema::FieldDef, EngineError> {
        self.template
            .field(id)
            .ok_or_else(|| EngineError::UnknownField(id.to_string()))
    }

    /// Write a free-text, date or time field.
    pub fn set_value(
        &self,
        draft: &mut ReportDraft,
        id: &str,
        text: impl Into<String>,
    ) -> Result<(), EngineError> {
        let def = self.field(id)?;
        if !matches!(def.kind, FieldKind::Text | FieldKind::Date | FieldKind::Time) {
            return Err(EngineError::WrongKind(def.id));
        }
        draft.set_value_raw(def.id, text.into());
        self.sweep_hidden(draft);
        Ok(())
    }

    /// Answer a yes/no fact. Flipping a fact to `false` synchronously clears
    /// every dependent field gated on it.
    pub fn set_bool_fact(
        &self,
        draft: &mut ReportDraft,
        id: &str,
        value: bool,
    ) -> Result<(), EngineError> {
        let def = self.field(id)?;
        if !matches!(def.kind, FieldKind::BoolFact) {
            return Err(EngineError::WrongKind(def.id));
        }
        draft.set_fact_raw(def.id, FactValue::Bool(value));
        self.sweep_hidden(draft);
        Ok(())
    }

    /// Answer (or un-answer) a choice fact. Changing a parent selector
    /// clears all of its now-hidden sibling sub-selectors in the same sweep.
    pub fn set_choice_fact(
        &self,
        draft: &mut ReportDraft,
        id: &str,
        value: Option<&str>,
    ) -> Result<(), EngineError> {
        let def = self.field(id)?;
        let FieldKind::ChoiceFact { options } = def.kind else {
            return Err(EngineError::WrongKind(def.id));
        };
        if let Some(v) = value
            && !options.iter().any(|o| *o == v)
        {
            return Err(EngineError::UnknownOption {
                field: def.id,
                value: v.to_string(),
            });
        }
        draft.set_fact_raw(def.id, FactValue::Choice(value.map(str::to_string)));
        self.sweep_hidden(draft);
        Ok(())
    }

    /// Enable or disable one of days 2..=7. Enabling requires the previous
    /// day; disabling cascades to every later day and clears their state.
    pub fn set_day_enabled(
        &self,
        draft: &mut ReportDraft,
        day: u8,
        enabled: bool,
    ) -> Result<(), EngineError> {
        if enabled {
            draft.days.enable(day)
        } else {
            draft.days.disable(day)
        }
    }

    /// Toggle "same agents as previous day" for a day.
    pub fn set_same_agents(
        &self,
        draft: &mut ReportDraft,
        day: u8,
        inherit: bool,
    ) -> Result<(), EngineError> {
        draft.days.set_same_agents(day, inherit)
    }

    /// Write one hour slot of an enabled day's timeline.
    pub fn set_note(
        &self,
        draft: &mut ReportDraft,
        day: u8,
        hour: u8,
        text: impl Into<String>,
    ) -> Result<(), EngineError> {
        draft.days.set_note(day, hour, text)
    }

    /// Write one agent slot of an enabled, non-inheriting day.
    pub fn set_agent(
        &self,
        draft: &mut ReportDraft,
        day: u8,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), EngineError> {
        draft.days.set_agent(day, index, name)
    }

    /// Reveal or hide day 1's ten extra agent slots.
    pub fn set_more_agents(&self, draft: &mut ReportDraft, revealed: bool) {
        draft.days.set_day_one_overflow(revealed);
    }

    /// Attach a file to an evidence slot, enforcing the slot's capacity.
    pub fn add_evidence(
        &self,
        draft: &mut ReportDraft,
        slot: &str,
        file: PendingFile,
    ) -> Result<(), EngineError> {
        let def = self.field(slot)?;
        let FieldKind::EvidenceSlot { capacity } = def.kind else {
            return Err(EngineError::WrongKind(def.id));
        };
        draft.evidence.add(def.id, capacity, file)
    }

    /// Detach a file from an evidence slot, revoking its preview.
    pub fn remove_evidence(
        &self,
        draft: &mut ReportDraft,
        slot: &str,
        index: usize,
    ) -> Option<PendingFile> {
        draft.evidence.remove(slot, index)
    }

    /// Clear every hidden `clear_on_hide` field, repeating until stable.
    fn sweep_hidden(&self, draft: &mut ReportDraft) {
        loop {
            let mut changed = false;
            for def in &self.template.fields {
                if def.clear_on_hide
                    && draft.has_value(def.id)
                    && !visibility::holds(&def.shown_when, draft)
                {
                    draft.clear_field(def.id);
                    tracing::debug!("cleared hidden field: {}", def.id);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;

    fn engine() -> FormEngine {
        FormEngine::new(templates::traveller_eviction())
    }

    #[test]
    fn flipping_a_fact_false_clears_its_detail() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        engine.set_bool_fact(&mut draft, "property_damage", true).unwrap();
        engine.set_value(&mut draft, "damage_details", "cracked door").unwrap();
        assert_eq!(draft.value("damage_details"), "cracked door");

        engine.set_bool_fact(&mut draft, "property_damage", false).unwrap();
        assert_eq!(draft.value("damage_details"), "");
    }

    #[test]
    fn changing_a_parent_selector_clears_all_siblings() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        engine.set_choice_fact(&mut draft, "property_type", Some("Open Land")).unwrap();
        engine.set_choice_fact(&mut draft, "field_type", Some("Grass")).unwrap();

        engine.set_choice_fact(&mut draft, "property_type", Some("Car Park")).unwrap();
        assert_eq!(draft.choice_fact("field_type"), None);
        engine.set_choice_fact(&mut draft, "car_park_type", Some("Surface")).unwrap();

        engine.set_choice_fact(&mut draft, "property_type", None).unwrap();
        assert_eq!(draft.choice_fact("car_park_type"), None);
    }

    #[test]
    fn clears_cascade_through_chained_gates() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        // notice_served=false, locked_in=true reveals lock_type.
        engine.set_bool_fact(&mut draft, "locked_in", true).unwrap();
        engine.set_choice_fact(&mut draft, "lock_type", Some("Padlock")).unwrap();

        // Serving the notice hides locked_in, which in turn hides lock_type;
        // one transition must empty both.
        engine.set_bool_fact(&mut draft, "notice_served", true).unwrap();
        assert!(!draft.bool_fact("locked_in"));
        assert_eq!(draft.choice_fact("lock_type"), None);
    }

    #[test]
    fn writing_a_hidden_cleared_field_does_not_stick() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        // damage_details is hidden while property_damage is false; a write
        // that bypasses the UI gating is swept straight back out.
        engine.set_value(&mut draft, "damage_details", "stale").unwrap();
        assert_eq!(draft.value("damage_details"), "");
    }

    #[test]
    fn day_toggles_are_guarded_and_cascade() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        assert!(matches!(
            engine.set_day_enabled(&mut draft, 3, true),
            Err(EngineError::InvalidTransition(3))
        ));
        engine.set_day_enabled(&mut draft, 2, true).unwrap();
        engine.set_day_enabled(&mut draft, 3, true).unwrap();
        engine.set_note(&mut draft, 3, 7, "arrived on site").unwrap();

        engine.set_day_enabled(&mut draft, 2, false).unwrap();
        assert!(!draft.days.is_enabled(3));
        assert!(draft.days.timeline(3).is_none());
    }

    #[test]
    fn wrong_value_kinds_are_rejected() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        assert!(matches!(
            engine.set_value(&mut draft, "property_damage", "yes"),
            Err(EngineError::WrongKind("property_damage"))
        ));
        assert!(matches!(
            engine.set_bool_fact(&mut draft, "client_name", true),
            Err(EngineError::WrongKind("client_name"))
        ));
        assert!(matches!(
            engine.set_choice_fact(&mut draft, "property_type", Some("Castle")),
            Err(EngineError::UnknownOption { field: "property_type", .. })
        ));
        assert!(matches!(
            engine.set_value(&mut draft, "no_such_field", "x"),
            Err(EngineError::UnknownField(_))
        ));
    }

    #[test]
    fn evidence_slots_go_through_the_schema_capacity() {
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        for i in 0..4 {
            engine
                .add_evidence(&mut draft, "damage_photos", PendingFile::new(format!("{i}.jpg"), "image/jpeg", vec![1]))
                .unwrap();
        }
        assert!(matches!(
            engine.add_evidence(&mut draft, "damage_photos", PendingFile::new("4.jpg", "image/jpeg", vec![1])),
            Err(EngineError::CapacityExceeded { .. })
        ));
        assert!(matches!(
            engine.add_evidence(&mut draft, "client_name", PendingFile::new("x.jpg", "image/jpeg", vec![1])),
            Err(EngineError::WrongKind("client_name"))
        ));
    }

    #[test]
    fn evidence_survives_a_gating_flip() {
        // Deliberately permissive: hiding the slot keeps its attachments so
        // re-enabling the fact brings them back. The payload builder skips
        // hidden slots instead.
        let engine = engine();
        let mut draft = engine.new_draft("job-1");
        engine.set_bool_fact(&mut draft, "property_damage", true).unwrap();
        engine
            .add_evidence(&mut draft, "damage_photos", PendingFile::new("dmg.jpg", "image/jpeg", vec![1]))
            .unwrap();
        engine.set_bool_fact(&mut draft, "property_damage", false).unwrap();
        assert_eq!(draft.evidence.files("damage_photos").len(), 1);
        engine.set_bool_fact(&mut draft, "property_damage", true).unwrap();
        assert_eq!(draft.evidence.files("damage_photos").len(), 1);
    }
}

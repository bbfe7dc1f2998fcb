//! The concrete report templates and the form-type registry.
//!
//! Both eviction forms share one field core; the variants add their own
//! facts on top. Everything conditional is expressed as schema data so the
//! two templates can never drift apart in behaviour.

use crate::{
    days::MAX_DAYS,
    schema::{Condition, FieldDef, FieldKind, FormTemplate},
};

/// Photo slots hold up to four files each.
const PHOTO_SLOT_CAPACITY: usize = 4;

/// Stable id for a day's timeline block.
pub fn timeline_id(day: u8) -> &'static str {
    match day {
        1 => "day1_timeline",
        2 => "day2_timeline",
        3 => "day3_timeline",
        4 => "day4_timeline",
        5 => "day5_timeline",
        6 => "day6_timeline",
        _ => "day7_timeline",
    }
}

/// Stable id for a day's agent roster block.
pub fn roster_id(day: u8) -> &'static str {
    match day {
        1 => "day1_agents",
        2 => "day2_agents",
        3 => "day3_agents",
        4 => "day4_agents",
        5 => "day5_agents",
        6 => "day6_agents",
        _ => "day7_agents",
    }
}

/// Header, day blocks, incident facts, evidence and footer shared by both
/// eviction templates.
fn shared_fields() -> Vec<FieldDef> {
    use Condition::*;
    use FieldKind::*;

    let mut fields = vec![
        // Header, unconditionally required.
        FieldDef::new("client_name", "Client name", Text).required(),
        FieldDef::new("site_address", "Site address", Text).required(),
        FieldDef::new("postcode", "Postcode", Text).required(),
        FieldDef::new("report_date", "Date of report", Date).required(),
        FieldDef::new("arrival_time", "Time of arrival", Time).required(),
    ];

    // Day blocks: day 1 is always present and carries the lead agent; later
    // days appear as the chain is enabled.
    for day in 1..=MAX_DAYS {
        let shown = if day == 1 { Always } else { DayEnabled(day) };
        let roster = FieldDef::new(roster_id(day), "Agents on site", Roster { day })
            .shown_when(shown.clone());
        fields.push(if day == 1 { roster.required() } else { roster });
        fields.push(
            FieldDef::new(timeline_id(day), "Hourly activity", Timeline { day }).shown_when(shown),
        );
    }

    fields.extend([
        // Service of notice.
        FieldDef::new("notice_served", "Was the notice served?", BoolFact),
        FieldDef::new(
            "serve_photo",
            "Photo of the served notice",
            EvidenceSlot { capacity: PHOTO_SLOT_CAPACITY },
        )
        .shown_when(FactIs("notice_served", true)),
        FieldDef::new("locked_in", "Are the occupants locked in?", BoolFact)
            .shown_when(FactIs("notice_served", false))
            .cleared_on_hide(),
        FieldDef::new(
            "lock_type",
            "Type of lock",
            ChoiceFact { options: &["Padlock", "Deadlock", "Chain and padlock", "Other"] },
        )
        .shown_when(All(vec![FactIs("notice_served", false), FactIs("locked_in", true)]))
        .required()
        .cleared_on_hide(),
        // Property classification and its mutually exclusive sub-selectors.
        FieldDef::new(
            "property_type",
            "Property type",
            ChoiceFact { options: &["Residential", "Commercial", "Car Park", "Open Land"] },
        ),
        FieldDef::new(
            "field_type",
            "Field type",
            ChoiceFact { options: &["Grass", "Hardstanding", "Woodland"] },
        )
        .shown_when(FactEquals("property_type", "Open Land"))
        .required()
        .cleared_on_hide(),
        FieldDef::new(
            "car_park_type",
            "Car park type",
            ChoiceFact { options: &["Surface", "Multi-storey", "Underground"] },
        )
        .shown_when(FactEquals("property_type", "Car Park"))
        .required()
        .cleared_on_hide(),
        FieldDef::new(
            "commercial_type",
            "Commercial type",
            ChoiceFact { options: &["Retail", "Office", "Industrial", "Warehouse"] },
        )
        .shown_when(FactEquals("property_type", "Commercial"))
        .required()
        .cleared_on_hide(),
        // Incident facts with gated detail fields.
        FieldDef::new("property_damage", "Any damage to the property?", BoolFact),
        FieldDef::new("damage_details", "Describe the damage", Text)
            .shown_when(FactIs("property_damage", true))
            .required()
            .cleared_on_hide(),
        FieldDef::new(
            "damage_photos",
            "Photos of the damage",
            EvidenceSlot { capacity: PHOTO_SLOT_CAPACITY },
        )
        .shown_when(FactIs("property_damage", true)),
        FieldDef::new("aggression", "Was any aggression encountered?", BoolFact),
        FieldDef::new("aggression_details", "Describe the aggression", Text)
            .shown_when(FactIs("aggression", true))
            .required()
            .cleared_on_hide(),
        FieldDef::new("dogs_on_site", "Were dogs on site?", BoolFact),
        FieldDef::new("dog_details", "Describe the dogs", Text)
            .shown_when(FactIs("dogs_on_site", true))
            .cleared_on_hide(),
        FieldDef::new("police_attendance", "Did police attend?", BoolFact),
        FieldDef::new("police_details", "Police details / CAD reference", Text)
            .shown_when(FactIs("police_attendance", true))
            .required()
            .cleared_on_hide(),
        // General photo slots, always available.
        FieldDef::new(
            "general_photos_1",
            "General photos (1)",
            EvidenceSlot { capacity: PHOTO_SLOT_CAPACITY },
        ),
        FieldDef::new(
            "general_photos_2",
            "General photos (2)",
            EvidenceSlot { capacity: PHOTO_SLOT_CAPACITY },
        ),
        FieldDef::new(
            "general_photos_3",
            "General photos (3)",
            EvidenceSlot { capacity: PHOTO_SLOT_CAPACITY },
        ),
        // Footer, required on submit.
        FieldDef::new("additional_notes", "Additional notes", Text).required(),
        FieldDef::new("departure_time", "Time of departure", Time).required(),
        FieldDef::new("completion_date", "Date of completion", Date).required(),
    ]);
    fields
}

/// The traveller eviction report template.
pub fn traveller_eviction() -> FormTemplate {
    let mut fields = shared_fields();
    fields.extend([
        FieldDef::new("caravans_on_site", "Are caravans on site?", FieldKind::BoolFact),
        FieldDef::new("caravan_count", "Number of caravans", FieldKind::Text)
            .shown_when(Condition::FactIs("caravans_on_site", true))
            .required()
            .cleared_on_hide(),
    ]);
    FormTemplate {
        slug: "traveller_eviction",
        label: "Traveller Eviction Report",
        eligible: |job| job.to_ascii_lowercase().contains("traveller"),
        fields,
    }
}

/// The squatter eviction report template.
pub fn squatter_eviction() -> FormTemplate {
    let mut fields = shared_fields();
    fields.extend([
        FieldDef::new("occupant_count", "Number of occupants", FieldKind::Text).required(),
        FieldDef::new("forced_entry", "Was entry forced?", FieldKind::BoolFact),
        FieldDef::new("entry_details", "Describe how entry was gained", FieldKind::Text)
            .shown_when(Condition::FactIs("forced_entry", true))
            .required()
            .cleared_on_hide(),
    ]);
    FormTemplate {
        slug: "squatter_eviction",
        label: "Squatter Eviction Report",
        eligible: |job| job.to_ascii_lowercase().contains("squatter"),
        fields,
    }
}

/// Every known report template.
pub fn registry() -> Vec<FormTemplate> {
    vec![traveller_eviction(), squatter_eviction()]
}

/// Look up a template by its slug.
pub fn for_slug(slug: &str) -> Option<FormTemplate> {
    registry().into_iter().find(|t| t.slug == slug)
}

/// The templates applicable to a job, judged from its label.
pub fn eligible_for(job_label: &str) -> Vec<FormTemplate> {
    registry()
        .into_iter()
        .filter(|t| (t.eligible)(job_label))
        .collect()
}

//! Declarative field schema evaluated by the generic form engine.
//!
//! Each report template is a flat list of [`FieldDef`]s: what kind of value
//! the field holds, when it is shown, whether it is required while shown,
//! and whether hiding it clears its value. All conditional behaviour lives
//! here as data; the engine, visibility rules and validation policy share
//! one evaluation of it.

/// The kind of value a field holds and where the draft stores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (header, footer, or a gated detail field).
    Text,
    /// Calendar date entered as `YYYY-MM-DD`.
    Date,
    /// Time of day entered as `HH:MM`.
    Time,
    /// Yes/no answer.
    BoolFact,
    /// One-of-N answer.
    ChoiceFact {
        /// The selectable options, in display order.
        options: &'static [&'static str],
    },
    /// Capped, ordered batch of pending photo attachments.
    EvidenceSlot {
        /// Maximum number of files the slot accepts.
        capacity: usize,
    },
    /// The agent name list for one report day.
    Roster { day: u8 },
    /// The hourly activity timeline for one report day.
    Timeline { day: u8 },
}

/// When a field is shown (and, if required-when-visible, enforced).
#[derive(Clone, Debug)]
pub enum Condition {
    /// Always shown.
    Always,
    /// A yes/no fact has the given value. An unanswered fact counts as `false`.
    FactIs(&'static str, bool),
    /// A choice fact currently holds the given option.
    FactEquals(&'static str, &'static str),
    /// The given report day is enabled.
    DayEnabled(u8),
    /// Every sub-condition holds.
    All(Vec<Condition>),
}

/// One field of a report template.
#[derive(Clone, Debug)]
pub struct FieldDef {
    /// Stable id, used as the draft storage key and the payload key.
    pub id: &'static str,
    /// Human-readable label for the rendering layer.
    pub label: &'static str,
    /// Value kind.
    pub kind: FieldKind,
    /// Visibility condition.
    pub shown_when: Condition,
    /// Required whenever visible.
    pub required_when_visible: bool,
    /// Cleared back to its default whenever it becomes hidden.
    pub clear_on_hide: bool,
}

impl FieldDef {
    /// New field with default policy: always shown, optional, kept on hide.
    pub fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            shown_when: Condition::Always,
            required_when_visible: false,
            clear_on_hide: false,
        }
    }

    /// Restrict visibility to the given condition.
    pub fn shown_when(mut self, cond: Condition) -> Self {
        self.shown_when = cond;
        self
    }

    /// Mark the field required whenever it is visible.
    pub fn required(mut self) -> Self {
        self.required_when_visible = true;
        self
    }

    /// Clear the field's value whenever it becomes hidden.
    pub fn cleared_on_hide(mut self) -> Self {
        self.clear_on_hide = true;
        self
    }
}

/// A complete report template: identity, eligibility, and its field list.
#[derive(Clone, Debug)]
pub struct FormTemplate {
    /// Stable slug sent as `form_type` on submission.
    pub slug: &'static str,
    /// Display label for the template picker.
    pub label: &'static str,
    /// Whether this template applies to a job, judged from its label.
    pub eligible: fn(&str) -> bool,
    /// All fields, in display order.
    pub fields: Vec<FieldDef>,
}

impl FormTemplate {
    /// Look up a field definition by id.
    pub fn field(&self, id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }
}

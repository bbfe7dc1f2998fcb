//! Typed error kinds for the form engine and submission pipeline.

use thiserror::Error;

/// Recoverable errors raised by draft mutations.
///
/// None of these are fatal: every variant leaves the draft exactly as it was
/// before the offending call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A day was enabled while its predecessor was still disabled.
    ///
    /// Unreachable through the UI (the toggle for day *n* only appears once
    /// day *n-1* is on); guards against programmatic misuse.
    #[error("day {0} cannot be enabled while the previous day is disabled")]
    InvalidTransition(u8),

    /// An evidence slot already holds its maximum number of files.
    #[error("evidence slot '{slot}' is full (capacity {capacity})")]
    CapacityExceeded { slot: &'static str, capacity: usize },

    /// The field id is not part of the active template.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The field exists but does not accept this kind of value.
    #[error("field '{0}' does not accept this kind of value")]
    WrongKind(&'static str),

    /// A choice value outside the field's declared options.
    #[error("'{value}' is not an option for field '{field}'")]
    UnknownOption { field: &'static str, value: String },

    /// Day index outside 1..=7, or a day-2..7 operation aimed at day 1.
    #[error("day {0} is out of range")]
    DayOutOfRange(u8),

    /// Per-day state was touched while the day is disabled.
    #[error("day {0} is not enabled")]
    DayNotEnabled(u8),

    /// An agent slot was written on a day that inherits its roster.
    #[error("day {0} inherits its agent roster from the previous day")]
    RosterInherited(u8),

    /// Timeline hour outside the fixed 06:00..23:00 range.
    #[error("{hour:02}:00 is outside the timeline range")]
    HourOutOfRange { hour: u8 },

    /// Agent slot index beyond the day's roster capacity.
    #[error("agent slot {index} is out of range for day {day}")]
    AgentSlotOutOfRange { day: u8, index: usize },
}

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    /// Required while visible, but empty.
    #[error("required")]
    Required,
    /// Not a parseable calendar date.
    #[error("not a valid date (expected YYYY-MM-DD)")]
    InvalidDate,
    /// Not a parseable time of day.
    #[error("not a valid time (expected HH:MM)")]
    InvalidTime,
}

/// One validation finding, surfaced inline next to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Schema id of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub issue: Issue,
}

/// Terminal failures of one submission attempt.
///
/// Both variants preserve the draft: validation failures never leave the
/// client, and a rejected submission keeps the draft intact for retry.
/// Evidence-upload failure is deliberately absent — the pipeline degrades
/// to an empty reference list instead of failing (see `pipeline`).
#[derive(Debug, Error)]
pub enum SubmitError {
    /// One or more required-and-visible fields are missing or malformed.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The report collaborator rejected the structured payload.
    #[error("report submission failed: {0}")]
    Submission(String),
}

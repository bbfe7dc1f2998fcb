//! Per-day report state: the day chain, hourly timelines and agent rosters.

use std::collections::BTreeMap;

use crate::error::EngineError;

/// Highest report day. Days 2..=7 are optional and form a prefix chain.
pub const MAX_DAYS: u8 = 7;
/// First timeline hour slot (06:00).
pub const FIRST_HOUR: u8 = 6;
/// Last timeline hour slot (23:00).
pub const LAST_HOUR: u8 = 23;

/// Roster capacity for a day. Only day 1 has the ten-slot overflow reveal;
/// days 2..=7 cap at ten with no overflow toggle (preserved asymmetry).
pub fn roster_capacity(day: u8) -> usize {
    if day == 1 { 20 } else { 10 }
}

/// One day's activity timeline: a fixed slot per hour, 06:00 through 23:00.
///
/// Every slot exists from creation, defaulted to an empty string. The model
/// never has a missing slot, only an empty one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayTimeline {
    notes: BTreeMap<u8, String>,
}

impl DayTimeline {
    /// Fresh timeline with all 18 slots present and empty.
    pub fn new() -> Self {
        let notes = (FIRST_HOUR..=LAST_HOUR).map(|h| (h, String::new())).collect();
        Self { notes }
    }

    /// Replace the note for one hour slot. Free text, no validation.
    pub fn set_note(&mut self, hour: u8, text: impl Into<String>) -> Result<(), EngineError> {
        let slot = self
            .notes
            .get_mut(&hour)
            .ok_or(EngineError::HourOutOfRange { hour })?;
        *slot = text.into();
        Ok(())
    }

    /// The note for one hour slot, empty string when unset.
    pub fn note(&self, hour: u8) -> &str {
        self.notes.get(&hour).map(String::as_str).unwrap_or("")
    }

    /// All slots in hour order.
    pub fn slots(&self) -> impl Iterator<Item = (u8, &str)> {
        self.notes.iter().map(|(h, s)| (*h, s.as_str()))
    }

    /// True when every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.notes.values().all(String::is_empty)
    }
}

impl Default for DayTimeline {
    fn default() -> Self {
        Self::new()
    }
}

/// One day's agent name list: fixed-capacity ordered slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayRoster {
    names: Vec<String>,
}

impl DayRoster {
    /// Empty roster with the given slot capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            names: vec![String::new(); capacity],
        }
    }

    /// Replace one slot. The index must be within capacity.
    pub fn set_name(&mut self, index: usize, name: impl Into<String>) -> Option<()> {
        let slot = self.names.get_mut(index)?;
        *slot = name.into();
        Some(())
    }

    /// The lead agent slot (slot 1 of day 1 is the only hard-required name).
    pub fn lead(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    /// Every slot, in order, including empty ones.
    pub fn slots(&self) -> &[String] {
        &self.names
    }

    /// Non-empty names, in slot order.
    pub fn named(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter(|n| !n.is_empty()).map(String::as_str)
    }

    /// Clear the overflow slots (indexes 10 and above).
    fn clear_overflow(&mut self) {
        for name in self.names.iter_mut().skip(10) {
            name.clear();
        }
    }
}

/// The prefix-ordered chain of report days and their per-day state.
///
/// Day 1 is always present. Day *n* (n > 1) may only be enabled while day
/// *n-1* is enabled, and disabling a day disables and clears every later
/// day. Per-day state exists only while the day is enabled, so a disabled
/// day can never carry orphaned agents or timeline notes.
#[derive(Clone, Debug)]
pub struct DayChain {
    enabled: [bool; MAX_DAYS as usize],
    same_agents: [bool; MAX_DAYS as usize],
    timelines: [Option<DayTimeline>; MAX_DAYS as usize],
    rosters: [Option<DayRoster>; MAX_DAYS as usize],
    day_one_overflow: bool,
}

impl DayChain {
    /// Chain with only day 1 enabled and initialised.
    pub fn new() -> Self {
        let mut chain = Self {
            enabled: [false; MAX_DAYS as usize],
            same_agents: [false; MAX_DAYS as usize],
            timelines: Default::default(),
            rosters: Default::default(),
            day_one_overflow: false,
        };
        chain.enabled[0] = true;
        chain.timelines[0] = Some(DayTimeline::new());
        chain.rosters[0] = Some(DayRoster::new(roster_capacity(1)));
        chain
    }

    fn idx(day: u8) -> Result<usize, EngineError> {
        if (1..=MAX_DAYS).contains(&day) {
            Ok(usize::from(day) - 1)
        } else {
            Err(EngineError::DayOutOfRange(day))
        }
    }

    /// Whether the day is currently enabled. Out-of-range days are not.
    pub fn is_enabled(&self, day: u8) -> bool {
        Self::idx(day).map(|i| self.enabled[i]).unwrap_or(false)
    }

    /// Whether the UI may offer the enable toggle for this day.
    pub fn can_enable(&self, day: u8) -> bool {
        (2..=MAX_DAYS).contains(&day) && self.is_enabled(day - 1)
    }

    /// Enable day 2..=7. Requires the previous day to be enabled; refuses
    /// out-of-order enables with `InvalidTransition` instead of corrupting
    /// the chain. Enabling an already-enabled day is a no-op.
    pub fn enable(&mut self, day: u8) -> Result<(), EngineError> {
        let i = Self::idx(day)?;
        if day < 2 {
            return Err(EngineError::DayOutOfRange(day));
        }
        if self.enabled[i] {
            return Ok(());
        }
        if !self.enabled[i - 1] {
            return Err(EngineError::InvalidTransition(day));
        }
        self.enabled[i] = true;
        self.same_agents[i] = false;
        self.timelines[i] = Some(DayTimeline::new());
        self.rosters[i] = Some(DayRoster::new(roster_capacity(day)));
        Ok(())
    }

    /// Disable day 2..=7 and cascade: every later day is disabled too, and
    /// all their per-day state is discarded. Idempotent.
    pub fn disable(&mut self, day: u8) -> Result<(), EngineError> {
        let i = Self::idx(day)?;
        if day < 2 {
            return Err(EngineError::DayOutOfRange(day));
        }
        for m in i..MAX_DAYS as usize {
            self.enabled[m] = false;
            self.same_agents[m] = false;
            self.timelines[m] = None;
            self.rosters[m] = None;
        }
        Ok(())
    }

    /// Whether the day inherits its roster from the previous day.
    pub fn same_agents(&self, day: u8) -> bool {
        Self::idx(day).map(|i| self.same_agents[i]).unwrap_or(false)
    }

    /// Toggle roster inheritance for day 2..=7. Turning it on drops the
    /// day's own roster (the inherited names are resolved at read time, not
    /// copied); turning it off re-creates an empty roster.
    pub fn set_same_agents(&mut self, day: u8, inherit: bool) -> Result<(), EngineError> {
        let i = Self::idx(day)?;
        if day < 2 {
            return Err(EngineError::DayOutOfRange(day));
        }
        if !self.enabled[i] {
            return Err(EngineError::DayNotEnabled(day));
        }
        self.same_agents[i] = inherit;
        if inherit {
            self.rosters[i] = None;
        } else if self.rosters[i].is_none() {
            self.rosters[i] = Some(DayRoster::new(roster_capacity(day)));
        }
        Ok(())
    }

    /// Replace one hour slot of an enabled day's timeline.
    pub fn set_note(&mut self, day: u8, hour: u8, text: impl Into<String>) -> Result<(), EngineError> {
        let i = Self::idx(day)?;
        let timeline = self.timelines[i]
            .as_mut()
            .ok_or(EngineError::DayNotEnabled(day))?;
        timeline.set_note(hour, text)
    }

    /// The timeline of an enabled day, if any.
    pub fn timeline(&self, day: u8) -> Option<&DayTimeline> {
        Self::idx(day).ok().and_then(|i| self.timelines[i].as_ref())
    }

    /// Write one agent slot of an enabled, non-inheriting day.
    pub fn set_agent(&mut self, day: u8, index: usize, name: impl Into<String>) -> Result<(), EngineError> {
        let i = Self::idx(day)?;
        if !self.enabled[i] {
            return Err(EngineError::DayNotEnabled(day));
        }
        if self.same_agents[i] {
            return Err(EngineError::RosterInherited(day));
        }
        let roster = self.rosters[i]
            .as_mut()
            .ok_or(EngineError::DayNotEnabled(day))?;
        roster
            .set_name(index, name)
            .ok_or(EngineError::AgentSlotOutOfRange { day, index })
    }

    /// The day's own roster, if it stores one (disabled or inheriting days
    /// store none).
    pub fn roster(&self, day: u8) -> Option<&DayRoster> {
        Self::idx(day).ok().and_then(|i| self.rosters[i].as_ref())
    }

    /// Resolve the roster in effect for a day by walking backward to the
    /// nearest day with an explicit roster. Inherited rosters are never
    /// materialised, so there is exactly one copy to disagree with itself.
    pub fn resolve_roster(&self, day: u8) -> Option<&DayRoster> {
        let i = Self::idx(day).ok()?;
        if !self.enabled[i] {
            return None;
        }
        for d in (1..=day).rev() {
            if let Some(roster) = self.roster(d) {
                return Some(roster);
            }
        }
        None
    }

    /// Whether day 1's ten extra agent slots are revealed.
    pub fn day_one_overflow(&self) -> bool {
        self.day_one_overflow
    }

    /// Toggle the day-1 overflow reveal. Hiding it clears slots 11..20.
    pub fn set_day_one_overflow(&mut self, revealed: bool) {
        self.day_one_overflow = revealed;
        if !revealed && let Some(roster) = self.rosters[0].as_mut() {
            roster.clear_overflow();
        }
    }

    /// Enabled day numbers, ascending.
    pub fn enabled_days(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=MAX_DAYS).filter(|d| self.is_enabled(*d))
    }

    /// The highest enabled day number.
    pub fn last_enabled_day(&self) -> u8 {
        self.enabled_days().last().unwrap_or(1)
    }
}

impl Default for DayChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_chain_has_only_day_one() {
        let chain = DayChain::new();
        assert!(chain.is_enabled(1));
        for day in 2..=MAX_DAYS {
            assert!(!chain.is_enabled(day));
            assert!(chain.timeline(day).is_none());
            assert!(chain.roster(day).is_none());
        }
        assert_eq!(chain.last_enabled_day(), 1);
    }

    #[test]
    fn timeline_has_all_slots_from_creation() {
        let timeline = DayTimeline::new();
        assert_eq!(timeline.slots().count(), 18);
        assert!(timeline.slots().all(|(_, note)| note.is_empty()));
        assert_eq!(timeline.note(6), "");
        assert_eq!(timeline.note(23), "");
    }

    #[test]
    fn timeline_rejects_out_of_range_hours() {
        let mut timeline = DayTimeline::new();
        assert!(matches!(
            timeline.set_note(5, "too early"),
            Err(EngineError::HourOutOfRange { hour: 5 })
        ));
        assert!(timeline.set_note(23, "last walk round").is_ok());
    }

    #[test]
    fn enable_requires_previous_day() {
        let mut chain = DayChain::new();
        assert!(matches!(chain.enable(3), Err(EngineError::InvalidTransition(3))));
        chain.enable(2).unwrap();
        chain.enable(3).unwrap();
        assert!(chain.is_enabled(3));
    }

    #[test]
    fn chain_invariant_holds_after_any_toggle_sequence() {
        let mut chain = DayChain::new();
        for day in 2..=MAX_DAYS {
            chain.enable(day).unwrap();
        }
        chain.disable(4).unwrap();
        chain.enable(4).unwrap();
        chain.disable(2).unwrap();
        for day in 2..=MAX_DAYS {
            if chain.is_enabled(day) {
                assert!(chain.is_enabled(day - 1));
            }
        }
    }

    #[test]
    fn disable_cascades_and_clears_downstream_state() {
        let mut chain = DayChain::new();
        chain.enable(2).unwrap();
        chain.enable(3).unwrap();
        chain.set_note(3, 9, "bailiffs arrive").unwrap();
        chain.set_agent(3, 0, "J. Harper").unwrap();

        chain.disable(2).unwrap();
        for day in 2..=MAX_DAYS {
            assert!(!chain.is_enabled(day));
            assert!(chain.timeline(day).is_none());
            assert!(chain.roster(day).is_none());
            assert!(!chain.same_agents(day));
        }
    }

    #[test]
    fn disable_is_idempotent() {
        let mut chain = DayChain::new();
        chain.enable(2).unwrap();
        chain.enable(3).unwrap();
        chain.disable(2).unwrap();
        let snapshot = format!("{chain:?}");
        chain.disable(2).unwrap();
        assert_eq!(snapshot, format!("{chain:?}"));
    }

    #[test]
    fn re_enabling_a_day_starts_from_empty_state() {
        let mut chain = DayChain::new();
        chain.enable(2).unwrap();
        chain.set_note(2, 10, "gate secured").unwrap();
        chain.disable(2).unwrap();
        chain.enable(2).unwrap();
        assert_eq!(chain.timeline(2).unwrap().note(10), "");
    }

    #[test]
    fn same_agents_drops_the_stored_roster() {
        let mut chain = DayChain::new();
        chain.enable(2).unwrap();
        chain.set_agent(2, 0, "M. Okafor").unwrap();
        chain.set_same_agents(2, true).unwrap();
        assert!(chain.roster(2).is_none());
        assert!(matches!(
            chain.set_agent(2, 0, "M. Okafor"),
            Err(EngineError::RosterInherited(2))
        ));
        chain.set_same_agents(2, false).unwrap();
        assert_eq!(chain.roster(2).unwrap().lead(), "");
    }

    #[test]
    fn resolve_roster_walks_back_to_nearest_explicit_entry() {
        let mut chain = DayChain::new();
        chain.set_agent(1, 0, "A. Lead").unwrap();
        chain.enable(2).unwrap();
        chain.set_same_agents(2, true).unwrap();
        chain.enable(3).unwrap();
        chain.set_same_agents(3, true).unwrap();
        chain.enable(4).unwrap();
        chain.set_agent(4, 0, "B. Fresh").unwrap();

        assert_eq!(chain.resolve_roster(3).unwrap().lead(), "A. Lead");
        assert_eq!(chain.resolve_roster(4).unwrap().lead(), "B. Fresh");
        assert!(chain.resolve_roster(5).is_none());
    }

    #[test]
    fn day_one_overflow_reveal_and_clear() {
        let mut chain = DayChain::new();
        assert_eq!(roster_capacity(1), 20);
        assert_eq!(roster_capacity(2), 10);
        chain.set_day_one_overflow(true);
        chain.set_agent(1, 14, "Overflow agent").unwrap();
        chain.set_day_one_overflow(false);
        assert_eq!(chain.roster(1).unwrap().slots()[14], "");
        // Days 2..=7 have no overflow: slot 10 is simply out of range.
        chain.enable(2).unwrap();
        assert!(matches!(
            chain.set_agent(2, 10, "X"),
            Err(EngineError::AgentSlotOutOfRange { day: 2, index: 10 })
        ));
    }
}

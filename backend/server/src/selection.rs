//! # Selection Tracking
//!
//! Per-page state deciding which filter changes turn into a resolution cycle
//! and which finished cycles may still be shown.
//!
//! - A selection equal to the last one that started a cycle is skipped outright
//! - Every cycle that does start gets a larger [`CycleId`] than the one before
//! - Only the outcome of the latest started cycle is handed back, older ones are dropped
//! - A failed latest cycle forgets its key so picking the same filters again retries
use std::collections::BTreeMap;

use mealdb::Dimension;
use tracing::debug;

use crate::render::ListOutcome;

/// Area and category filters, `None` when a dimension is inactive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub area: Option<String>,
    pub category: Option<String>,
}

impl FilterSelection {
    pub fn new(area: &str, category: &str) -> Self {
        Self {
            area: active(area),
            category: active(category),
        }
    }

    pub fn active(&self) -> Vec<(Dimension, &str)> {
        [
            (Dimension::Area, self.area.as_deref()),
            (Dimension::Category, self.category.as_deref()),
        ]
        .into_iter()
        .filter_map(|(dimension, value)| value.map(|value| (dimension, value)))
        .collect()
    }

    pub fn key(&self) -> QueryKey {
        QueryKey {
            area: self.area.clone(),
            category: self.category.clone(),
        }
    }
}

fn active(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    area: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    last: Option<QueryKey>,
}

impl SelectionTracker {
    pub fn should_proceed(&mut self, selection: &FilterSelection) -> bool {
        let key = selection.key();

        if self.last.as_ref() == Some(&key) {
            return false;
        }

        self.last = Some(key);
        true
    }

    pub fn forget(&mut self) {
        self.last = None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CycleId(u64);

#[derive(Debug, Default)]
pub struct Session {
    tracker: SelectionTracker,
    latest: u64,
}

impl Session {
    /// Starts a resolution cycle, `None` when the selection changes nothing.
    pub fn begin(&mut self, selection: &FilterSelection) -> Option<CycleId> {
        if !self.tracker.should_proceed(selection) {
            return None;
        }

        self.latest += 1;
        Some(CycleId(self.latest))
    }

    pub fn is_current(&self, cycle: CycleId) -> bool {
        cycle.0 == self.latest
    }

    pub fn finish(&mut self, cycle: CycleId, outcome: ListOutcome) -> Option<ListOutcome> {
        if !self.is_current(cycle) {
            debug!("Dropping cycle {} superseded by {}", cycle.0, self.latest);
            return None;
        }

        if matches!(outcome, ListOutcome::Failed(_)) {
            self.tracker.forget();
        }

        Some(outcome)
    }
}

/// Live sessions by id, oldest evicted first once over capacity.
#[derive(Debug)]
pub struct Sessions {
    sessions: BTreeMap<u64, Session>,
    next_id: u64,
    capacity: usize,
}

impl Sessions {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: BTreeMap::new(),
            next_id: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn create(&mut self) -> u64 {
        self.next_id += 1;
        self.sessions.insert(self.next_id, Session::default());

        while self.sessions.len() > self.capacity {
            if let Some((evicted, _)) = self.sessions.pop_first() {
                debug!("Evicted session {evicted}");
            }
        }

        self.next_id
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Sessions currently held, after eviction.
    pub fn live(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_dimensions_inactive() {
        let selection = FilterSelection::new("  ", "");

        assert!(selection.active().is_empty());
        assert_eq!(selection, FilterSelection::default());
    }

    #[test]
    fn test_keys_follow_selection_equality() {
        let italian = FilterSelection::new("Italian", "");

        assert_eq!(italian.key(), FilterSelection::new(" Italian ", "").key());
        assert_ne!(italian.key(), FilterSelection::new("", "Italian").key());
        assert_ne!(italian.key(), FilterSelection::new("italian", "").key());
    }

    #[test]
    fn test_tracker_skips_repeats() {
        let mut tracker = SelectionTracker::default();
        let italian = FilterSelection::new("Italian", "");
        let seafood = FilterSelection::new("Italian", "Seafood");

        assert!(tracker.should_proceed(&italian));
        assert!(!tracker.should_proceed(&italian));
        assert!(tracker.should_proceed(&seafood));
        assert!(tracker.should_proceed(&italian));
    }

    #[test]
    fn test_tracker_first_empty_selection_proceeds() {
        let mut tracker = SelectionTracker::default();

        assert!(tracker.should_proceed(&FilterSelection::default()));
        assert!(!tracker.should_proceed(&FilterSelection::default()));
    }

    #[test]
    fn test_session_drops_superseded_cycles() {
        let mut session = Session::default();

        let first = session.begin(&FilterSelection::new("Italian", "")).unwrap();
        let second = session.begin(&FilterSelection::new("French", "")).unwrap();
        assert!(second > first);

        assert_eq!(session.finish(second, ListOutcome::Prompt), Some(ListOutcome::Prompt));
        assert_eq!(session.finish(first, ListOutcome::Prompt), None);
    }

    #[test]
    fn test_session_repeat_starts_no_cycle() {
        let mut session = Session::default();
        let italian = FilterSelection::new("Italian", "");

        let cycle = session.begin(&italian).unwrap();
        assert_eq!(session.begin(&italian), None);
        assert!(session.is_current(cycle));
    }

    #[test]
    fn test_failed_cycle_allows_retry() {
        let mut session = Session::default();
        let italian = FilterSelection::new("Italian", "");

        let cycle = session.begin(&italian).unwrap();
        let failed = ListOutcome::Failed("down".to_string());
        assert_eq!(session.finish(cycle, failed.clone()), Some(failed));

        assert!(session.begin(&italian).is_some());
    }

    #[test]
    fn test_stale_failure_keeps_newer_key() {
        let mut session = Session::default();
        let italian = FilterSelection::new("Italian", "");
        let french = FilterSelection::new("French", "");

        let stale = session.begin(&italian).unwrap();
        session.begin(&french).unwrap();

        assert_eq!(session.finish(stale, ListOutcome::Failed("down".to_string())), None);
        assert_eq!(session.begin(&french), None);
    }

    #[test]
    fn test_sessions_evict_oldest() {
        let mut sessions = Sessions::new(2);

        let first = sessions.create();
        let second = sessions.create();
        let third = sessions.create();

        assert_eq!(sessions.live(), 2);
        assert!(sessions.get_mut(first).is_none());
        assert!(sessions.get_mut(second).is_some());
        assert!(sessions.get_mut(third).is_some());
    }
}

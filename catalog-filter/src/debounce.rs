//! Quiet-interval debouncing of free-text edits.
//!
//! [`Debouncer`] is a plain state machine over caller-supplied instants; the
//! driver owns the timer and asks it when to wake up.

use crate::state::FilterState;
use std::time::Duration;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    last_edit: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_edit: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Records an edit at `now`, pushing the deadline out.
    pub fn touch(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.last_edit.map(|edit| edit + self.quiet)
    }

    /// Returns true exactly once per burst, when `now` is past the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.last_edit = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.last_edit = None;
    }
}

/// How a state transition should be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Unchanged,
    /// A non-text field changed; recompute now.
    Immediate,
    /// Only the free text changed; wait for the quiet interval.
    Debounced,
}

pub fn classify_change(before: &FilterState, after: &FilterState) -> Trigger {
    if !before.differs_only_in_text(after) {
        Trigger::Immediate
    } else if before.text != after.text {
        Trigger::Debounced
    } else {
        Trigger::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::FacetId;
    use crate::state::FilterPatch;
    use pretty_assertions::assert_eq;

    const QUIET: Duration = Duration::from_millis(350);

    #[test]
    fn fires_once_after_quiet_interval_from_newest_edit() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.touch(start);
        debouncer.touch(start + Duration::from_millis(200));

        assert!(!debouncer.fire_if_due(start + Duration::from_millis(400)));
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(550))
        );
        assert!(debouncer.fire_if_due(start + Duration::from_millis(550)));
        assert!(!debouncer.fire_if_due(start + Duration::from_millis(900)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_drops_pending_edit() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(QUIET);
        debouncer.touch(start);
        debouncer.cancel();
        assert_eq!(debouncer.deadline(), None);
        assert!(!debouncer.fire_if_due(start + QUIET));
    }

    #[test]
    fn classifies_text_and_non_text_changes() {
        let base = FilterState::default();
        let typed = base.apply_patch(&FilterPatch::new().text("ro"));
        let picked = base.apply_patch(&FilterPatch::new().select(FacetId::Age, ["a1"]));
        let both = base.apply_patch(
            &FilterPatch::new()
                .text("ro")
                .select(FacetId::Age, ["a1"]),
        );

        assert_eq!(classify_change(&base, &base), Trigger::Unchanged);
        assert_eq!(classify_change(&base, &typed), Trigger::Debounced);
        assert_eq!(classify_change(&base, &picked), Trigger::Immediate);
        assert_eq!(classify_change(&base, &both), Trigger::Immediate);
    }
}

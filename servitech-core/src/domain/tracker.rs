use std::fmt;

use crate::domain::models::{Incident, IncidentState, WorkDuration};

/// Where the local stopwatch stands. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrackerPhase {
    #[default]
    NotStarted,
    Running,
    Paused,
    Finalized,
}

impl fmt::Display for TrackerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackerPhase::NotStarted => "not started",
            TrackerPhase::Running => "running",
            TrackerPhase::Paused => "paused",
            TrackerPhase::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// In-memory stopwatch for a single incident.
///
/// Never talks to the backend. The displayed value only moves forward through
/// [`tick`](Self::tick) and is otherwise replaced wholesale by [`seed`](Self::seed)
/// with a value the server confirmed, or cleared by [`reset`](Self::reset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElapsedTimeTracker {
    phase: TrackerPhase,
    displayed: WorkDuration,
}

impl ElapsedTimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the server's view of the incident.
    pub fn seed(&mut self, incident: &Incident) {
        let displayed = incident.accumulated;
        let phase = if incident.state == IncidentState::Resolved {
            TrackerPhase::Finalized
        } else if incident.is_running() {
            TrackerPhase::Running
        } else if !displayed.is_zero() {
            TrackerPhase::Paused
        } else {
            TrackerPhase::NotStarted
        };

        tracing::trace!(incident_id = %incident.id, %phase, %displayed, "Seeded tracker");
        self.phase = phase;
        self.displayed = displayed;
    }

    /// Advance by one second if running. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        if self.phase != TrackerPhase::Running {
            return false;
        }
        self.displayed = self.displayed.saturating_add(WorkDuration::from_secs(1));
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn elapsed(&self) -> WorkDuration {
        self.displayed
    }

    pub fn displayed_seconds(&self) -> u64 {
        self.displayed.as_secs()
    }

    /// `HH:MM:SS`
    pub fn display(&self) -> String {
        self.displayed.to_string()
    }

    pub fn running(&self) -> bool {
        self.phase == TrackerPhase::Running
    }

    pub fn started(&self) -> bool {
        match self.phase {
            TrackerPhase::NotStarted => false,
            TrackerPhase::Running | TrackerPhase::Paused => true,
            TrackerPhase::Finalized => !self.displayed.is_zero(),
        }
    }

    pub fn finalized(&self) -> bool {
        self.phase == TrackerPhase::Finalized
    }

    pub fn status_label(&self) -> &'static str {
        match self.phase {
            TrackerPhase::NotStarted => "Not started",
            TrackerPhase::Running => "In progress",
            TrackerPhase::Paused => "Paused",
            TrackerPhase::Finalized => "Incident finalized",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IncidentId;
    use proptest::prelude::*;

    fn incident(state: IncidentState, paused: bool, secs: u64) -> Incident {
        Incident::new(IncidentId::new(7), state)
            .with_paused(paused)
            .with_accumulated(WorkDuration::from_secs(secs))
    }

    #[test]
    fn pending_incident_seeds_not_started() {
        let mut tracker = ElapsedTimeTracker::new();
        tracker.seed(&incident(IncidentState::Pending, false, 0));

        assert_eq!(tracker.phase(), TrackerPhase::NotStarted);
        assert!(!tracker.started());
        assert_eq!(tracker.display(), "00:00:00");
    }

    #[test]
    fn paused_incident_keeps_server_duration() {
        let mut tracker = ElapsedTimeTracker::new();
        tracker.seed(&incident(IncidentState::InRepair, true, 190));

        assert_eq!(tracker.phase(), TrackerPhase::Paused);
        assert!(tracker.started());
        assert!(!tracker.running());
        assert_eq!(tracker.display(), "00:03:10");
    }

    #[test]
    fn resolved_incident_is_finalized() {
        let mut tracker = ElapsedTimeTracker::new();
        tracker.seed(&incident(IncidentState::Resolved, false, 42));

        assert!(tracker.finalized());
        assert!(!tracker.running());
        assert!(tracker.started());
        assert_eq!(tracker.status_label(), "Incident finalized");
    }

    #[test]
    fn tick_only_counts_while_running() {
        let mut tracker = ElapsedTimeTracker::new();
        tracker.seed(&incident(IncidentState::InRepair, false, 10));
        assert!(tracker.tick());
        assert!(tracker.tick());
        assert_eq!(tracker.displayed_seconds(), 12);

        tracker.seed(&incident(IncidentState::InRepair, true, 12));
        assert!(!tracker.tick());
        assert_eq!(tracker.displayed_seconds(), 12);
    }

    #[test]
    fn seeding_twice_is_idempotent() {
        let snapshot = incident(IncidentState::InRepair, false, 300);
        let mut once = ElapsedTimeTracker::new();
        once.seed(&snapshot);
        let mut twice = once.clone();
        twice.seed(&snapshot);

        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_duration_seeds_running_at_zero() {
        let raw = Incident::new(IncidentId::new(1), IncidentState::InRepair)
            .with_accumulated(WorkDuration::parse_lenient(Some("")));
        let mut tracker = ElapsedTimeTracker::new();
        tracker.seed(&raw);

        assert_eq!(tracker.displayed_seconds(), 0);
        assert!(tracker.running());
        assert!(tracker.started());
    }

    #[test]
    fn reset_returns_to_not_started() {
        let mut tracker = ElapsedTimeTracker::new();
        tracker.seed(&incident(IncidentState::InRepair, false, 4));
        tracker.reset();

        assert_eq!(tracker, ElapsedTimeTracker::new());
    }

    #[derive(Debug, Clone)]
    enum Step {
        Seed(IncidentState, bool, u64),
        Tick,
        Reset,
    }

    fn step() -> impl Strategy<Value = Step> {
        let state = prop_oneof![
            Just(IncidentState::Pending),
            Just(IncidentState::InRepair),
            Just(IncidentState::Resolved),
        ];
        prop_oneof![
            (state, any::<bool>(), 0u64..10_000).prop_map(|(s, p, n)| Step::Seed(s, p, n)),
            Just(Step::Tick),
            Just(Step::Reset),
        ]
    }

    proptest! {
        #[test]
        fn running_never_coexists_with_finalized(steps in prop::collection::vec(step(), 0..64)) {
            let mut tracker = ElapsedTimeTracker::new();
            for step in steps {
                let before = tracker.displayed_seconds();
                let was_running = tracker.running();
                match step {
                    Step::Seed(state, paused, secs) => tracker.seed(&incident(state, paused, secs)),
                    Step::Tick => {
                        tracker.tick();
                        let expected = if was_running { before + 1 } else { before };
                        prop_assert_eq!(tracker.displayed_seconds(), expected);
                    }
                    Step::Reset => tracker.reset(),
                }

                if tracker.running() {
                    prop_assert!(tracker.started());
                    prop_assert!(!tracker.finalized());
                }
                if tracker.finalized() {
                    prop_assert!(!tracker.running());
                }
            }
        }
    }
}

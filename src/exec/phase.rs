// src/exec/phase.rs

//! Lifecycle phases of one supervised run.

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spawning,
    Running,
    Collecting,
    Aborting,
    Notifying,
    Done,
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Idle, Spawning)
                | (Spawning, Running)
                | (Running, Collecting)
                | (Collecting, Notifying)
                | (Spawning | Running | Collecting, Aborting)
                | (Aborting, Notifying)
                | (Notifying, Done)
        )
    }

    /// Phases from which a fault leads to `Aborting`.
    pub fn is_abortable(self) -> bool {
        matches!(self, Phase::Spawning | Phase::Running | Phase::Collecting)
    }
}

/// Records the phases a run went through.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    current: Phase,
    history: Vec<Phase>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: Phase::Idle,
            history: vec![Phase::Idle],
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    pub fn advance(&mut self, next: Phase) {
        if !self.current.can_advance_to(next) {
            warn!(from = ?self.current, to = ?next, "unexpected phase transition");
        }
        debug!(from = ?self.current, to = ?next, "phase transition");
        self.current = next;
        self.history.push(next);
    }

    /// Move to `Aborting` if a fault can still abort the run here.
    pub fn abort(&mut self) {
        if self.current.is_abortable() {
            self.advance(Phase::Aborting);
        }
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_linear() {
        let mut t = PhaseTracker::new();
        for p in [
            Phase::Spawning,
            Phase::Running,
            Phase::Collecting,
            Phase::Notifying,
            Phase::Done,
        ] {
            assert!(t.current().can_advance_to(p), "{:?} -> {:?}", t.current(), p);
            t.advance(p);
        }
        assert_eq!(t.history().len(), 6);
    }

    #[test]
    fn abort_only_from_active_phases() {
        for from in [Phase::Spawning, Phase::Running, Phase::Collecting] {
            assert!(from.can_advance_to(Phase::Aborting));
        }
        for from in [Phase::Idle, Phase::Notifying, Phase::Done, Phase::Aborting] {
            assert!(!from.can_advance_to(Phase::Aborting));
        }
        assert!(Phase::Aborting.can_advance_to(Phase::Notifying));
        assert!(!Phase::Aborting.can_advance_to(Phase::Done));
    }

    #[test]
    fn abort_is_a_noop_once_notifying() {
        let mut t = PhaseTracker::new();
        t.advance(Phase::Spawning);
        t.abort();
        assert_eq!(t.current(), Phase::Aborting);

        t.advance(Phase::Notifying);
        t.abort();
        assert_eq!(t.current(), Phase::Notifying);
    }

    #[test]
    fn done_is_terminal() {
        for next in [
            Phase::Idle,
            Phase::Spawning,
            Phase::Running,
            Phase::Collecting,
            Phase::Aborting,
            Phase::Notifying,
            Phase::Done,
        ] {
            assert!(!Phase::Done.can_advance_to(next));
        }
    }
}

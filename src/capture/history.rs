use super::sheet::StatSheet;
use super::types::CapturePhase;
use crate::clock::{PlayingTimeLedger, PullTimer};
use crate::domain::PlayerId;

/// Pre-mutation copy of the in-progress point, used only for undo
#[derive(Debug, Clone, PartialEq)]
pub struct PointStateSnapshot {
    pub stats: StatSheet,
    pub active_passer: Option<PlayerId>,
    pub phase: CapturePhase,
    pub subbed_out: StatSheet,
    pub(crate) ledger: PlayingTimeLedger,
    pub(crate) pull_timer: PullTimer,
    pub(crate) pull_duration_seconds: f64,
}

/// Last-in-first-out undo stack, scoped to a single point
#[derive(Debug, Clone, Default)]
pub struct History {
    stack: Vec<PointStateSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: PointStateSnapshot) {
        self.stack.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<PointStateSnapshot> {
        self.stack.pop()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerStat;

    fn snapshot(passer: &str) -> PointStateSnapshot {
        PointStateSnapshot {
            stats: StatSheet::from_stats(vec![PlayerStat::on_line(passer, passer)]),
            active_passer: Some(passer.to_string()),
            phase: CapturePhase::StartModeChoice,
            subbed_out: StatSheet::new(),
            ledger: PlayingTimeLedger::default(),
            pull_timer: PullTimer::default(),
            pull_duration_seconds: 0.0,
        }
    }

    #[test]
    fn test_pops_most_recent_first() {
        let mut history = History::new();
        history.push(snapshot("a"));
        history.push(snapshot("b"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().unwrap().active_passer.as_deref(), Some("b"));
        assert_eq!(history.pop().unwrap().active_passer.as_deref(), Some("a"));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_clear_empties_stack() {
        let mut history = History::new();
        history.push(snapshot("a"));
        history.clear();
        assert!(history.is_empty());
    }
}

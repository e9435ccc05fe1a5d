use std::mem;

use log::debug;

use crate::domain::{Stoppage, StoppageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveStoppage {
    stoppage_type: StoppageType,
    started_at: u64,
}

/// Match, point and stoppage counters driven by a once-per-second tick.
///
/// Match and point time advance together while running. A stoppage suspends
/// both and runs its own counter until it is ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchClock {
    match_seconds: u64,
    point_seconds: u64,
    stoppage_seconds: u64,
    running: bool,
    active_stoppage: Option<ActiveStoppage>,
    stoppages: Vec<Stoppage>,
}

impl MatchClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.advance(1);
    }

    /// Same as `seconds` ticks; a stoppage absorbs all of them
    pub fn advance(&mut self, seconds: u64) {
        if self.active_stoppage.is_some() {
            self.stoppage_seconds = self.stoppage_seconds.saturating_add(seconds);
        } else if self.running {
            self.match_seconds = self.match_seconds.saturating_add(seconds);
            self.point_seconds = self.point_seconds.saturating_add(seconds);
        }
    }

    /// Returns `false` when a stoppage blocks resuming
    pub fn set_running(&mut self, running: bool) -> bool {
        if running && self.active_stoppage.is_some() {
            debug!("Clock resume ignored during an active stoppage");
            return false;
        }
        self.running = running;
        true
    }

    pub fn toggle(&mut self) -> bool {
        self.set_running(!self.running)
    }

    pub fn start_stoppage(&mut self, stoppage_type: StoppageType) -> bool {
        if self.active_stoppage.is_some() {
            return false;
        }
        self.running = false;
        self.stoppage_seconds = 0;
        self.active_stoppage = Some(ActiveStoppage {
            stoppage_type,
            started_at: self.match_seconds,
        });
        true
    }

    /// Closes the active stoppage; the clock stays paused until resumed
    pub fn end_stoppage(&mut self) -> Option<Stoppage> {
        let active = self.active_stoppage.take()?;
        let stoppage = Stoppage {
            stoppage_type: active.stoppage_type,
            duration_seconds: self.stoppage_seconds,
            start_match_time_seconds: active.started_at,
        };
        self.stoppages.push(stoppage.clone());
        self.stoppage_seconds = 0;
        self.running = false;
        Some(stoppage)
    }

    /// Resets the point clock; stoppages recorded since the last point stay queued
    pub fn start_point(&mut self) {
        self.point_seconds = 0;
    }

    pub fn take_stoppages(&mut self) -> Vec<Stoppage> {
        mem::take(&mut self.stoppages)
    }

    pub fn reset_match(&mut self) {
        *self = Self::default();
    }

    pub fn match_seconds(&self) -> u64 {
        self.match_seconds
    }

    pub fn point_seconds(&self) -> u64 {
        self.point_seconds
    }

    pub fn stoppage_seconds(&self) -> u64 {
        self.stoppage_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn in_stoppage(&self) -> bool {
        self.active_stoppage.is_some()
    }

    pub fn stoppages(&self) -> &[Stoppage] {
        &self.stoppages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_only_while_running() {
        let mut clock = MatchClock::new();
        clock.advance(5);
        assert_eq!(clock.match_seconds(), 0);

        clock.set_running(true);
        clock.advance(5);
        assert_eq!((clock.match_seconds(), clock.point_seconds()), (5, 5));

        clock.toggle();
        clock.advance(3);
        assert_eq!(clock.match_seconds(), 5);
    }

    #[test]
    fn test_huge_advance_saturates_instead_of_looping() {
        let mut clock = MatchClock::new();
        clock.set_running(true);
        clock.advance(10);
        clock.advance(u64::MAX);
        assert_eq!((clock.match_seconds(), clock.point_seconds()), (u64::MAX, u64::MAX));

        clock.start_stoppage(StoppageType::Injury);
        clock.advance(u64::MAX);
        clock.tick();
        assert_eq!(clock.stoppage_seconds(), u64::MAX);
        assert_eq!(clock.match_seconds(), u64::MAX);
    }

    #[test]
    fn test_point_clock_resets_but_match_clock_persists() {
        let mut clock = MatchClock::new();
        clock.set_running(true);
        clock.advance(30);
        clock.start_point();
        clock.advance(10);

        assert_eq!(clock.match_seconds(), 40);
        assert_eq!(clock.point_seconds(), 10);
    }

    #[test]
    fn test_stoppage_suspends_match_time_and_records_duration() {
        let mut clock = MatchClock::new();
        clock.set_running(true);
        clock.advance(12);

        assert!(clock.start_stoppage(StoppageType::Timeout));
        assert!(!clock.start_stoppage(StoppageType::Call));
        clock.advance(70);
        assert_eq!(clock.match_seconds(), 12);
        assert!(!clock.set_running(true));

        let stoppage = clock.end_stoppage().unwrap();
        assert_eq!(stoppage.duration_seconds, 70);
        assert_eq!(stoppage.start_match_time_seconds, 12);
        assert_eq!(clock.stoppage_seconds(), 0);
        assert!(!clock.is_running());
        assert_eq!(clock.take_stoppages(), vec![stoppage]);
        assert!(clock.stoppages().is_empty());
    }
}

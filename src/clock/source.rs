use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Wall-clock milliseconds, injectable so timing logic runs without real waits
pub trait TimeSource: Debug + Send {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Virtual clock; clones share the same reading
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    millis: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_millis(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Measures pull hang time between "pull thrown" and "result recorded"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullTimer {
    started_at: Option<u64>,
}

impl PullTimer {
    pub fn start(&mut self, source: &dyn TimeSource) {
        self.started_at = Some(source.now_millis());
    }

    /// Elapsed fractional seconds; `None` if the timer was never started
    pub fn finish(&mut self, source: &dyn TimeSource) -> Option<f64> {
        let started = self.started_at.take()?;
        let elapsed = source.now_millis().saturating_sub(started);
        Some(elapsed as f64 / 1000.0)
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}

use std::collections::BTreeMap;

use crate::domain::PlayerId;

/// Substitution-aware playing time and disc possession bookkeeping,
/// in match-clock seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayingTimeLedger {
    entry_times: BTreeMap<PlayerId, u64>,
    possession_start: Option<u64>,
}

impl PlayingTimeLedger {
    pub fn seed<'a, I>(&mut self, player_ids: I, now: u64)
    where
        I: IntoIterator<Item = &'a PlayerId>,
    {
        self.entry_times = player_ids.into_iter().map(|id| (id.clone(), now)).collect();
        self.possession_start = None;
    }

    pub fn enter(&mut self, player_id: &str, now: u64) {
        self.entry_times.insert(player_id.to_string(), now);
    }

    /// Seconds on field since entry; `None` for players never entered
    pub fn leave(&mut self, player_id: &str, now: u64) -> Option<u64> {
        self.entry_times
            .remove(player_id)
            .map(|entered| now.saturating_sub(entered))
    }

    /// Drains every on-field entry into credited seconds
    pub fn settle(&mut self, now: u64) -> BTreeMap<PlayerId, u64> {
        std::mem::take(&mut self.entry_times)
            .into_iter()
            .map(|(id, entered)| (id, now.saturating_sub(entered)))
            .collect()
    }

    pub fn start_possession(&mut self, now: u64) {
        self.possession_start = Some(now);
    }

    /// Possession seconds since the marker, clearing it
    pub fn take_possession(&mut self, now: u64) -> Option<u64> {
        self.possession_start
            .take()
            .map(|started| now.saturating_sub(started))
    }

    pub fn has_possession_marker(&self) -> bool {
        self.possession_start.is_some()
    }

    pub fn entry_time(&self, player_id: &str) -> Option<u64> {
        self.entry_times.get(player_id).copied()
    }

    pub fn clear(&mut self) {
        self.entry_times.clear();
        self.possession_start = None;
    }
}

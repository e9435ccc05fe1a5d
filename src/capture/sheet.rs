use std::sync::Arc;

use crate::domain::{PlayerId, PlayerStat};

/// Ordered per-point stat list with structurally shared records.
///
/// Updates replace a player's record wholesale, so cloning the sheet for an
/// undo snapshot only copies pointers and older snapshots keep their records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatSheet {
    records: Vec<Arc<PlayerStat>>,
}

impl StatSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stats<I>(stats: I) -> Self
    where
        I: IntoIterator<Item = PlayerStat>,
    {
        Self {
            records: stats.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, player_id: &str) -> Option<&PlayerStat> {
        self.records
            .iter()
            .find(|r| r.player_id == player_id)
            .map(|r| r.as_ref())
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.position(player_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerStat> {
        self.records.iter().map(|r| r.as_ref())
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.iter().map(|s| s.player_id.clone()).collect()
    }

    /// Replaces the player's record with an edited copy; `false` if absent
    pub fn update<F>(&mut self, player_id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut PlayerStat),
    {
        let Some(idx) = self.position(player_id) else {
            return false;
        };
        let mut next = PlayerStat::clone(&self.records[idx]);
        edit(&mut next);
        self.records[idx] = Arc::new(next);
        true
    }

    pub fn update_all<F>(&mut self, mut edit: F)
    where
        F: FnMut(&mut PlayerStat),
    {
        for record in self.records.iter_mut() {
            let mut next = PlayerStat::clone(record);
            edit(&mut next);
            *record = Arc::new(next);
        }
    }

    pub fn push(&mut self, stat: PlayerStat) {
        self.records.push(Arc::new(stat));
    }

    pub fn remove(&mut self, player_id: &str) -> Option<PlayerStat> {
        let idx = self.position(player_id)?;
        let record = self.records.remove(idx);
        Some(Arc::unwrap_or_clone(record))
    }

    /// Puts `incoming` in the outgoing player's slot and returns the outgoing record
    pub fn swap(&mut self, outgoing_id: &str, incoming: PlayerStat) -> Option<PlayerStat> {
        let idx = self.position(outgoing_id)?;
        let outgoing = std::mem::replace(&mut self.records[idx], Arc::new(incoming));
        Some(Arc::unwrap_or_clone(outgoing))
    }

    pub fn to_vec(&self) -> Vec<PlayerStat> {
        self.iter().cloned().collect()
    }

    /// Whether both sheets hold the very same record for the player
    pub fn shares_record(&self, other: &StatSheet, player_id: &str) -> bool {
        match (self.position(player_id), other.position(player_id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(&self.records[a], &other.records[b]),
            _ => false,
        }
    }

    fn position(&self, player_id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.player_id == player_id)
    }
}

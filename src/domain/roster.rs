use std::collections::{HashMap, HashSet};

use super::models::{LINE_SIZE, Player, PlayerId};
use crate::config::settings::NameFormat;
use crate::errors::CaptureError;

pub const UNKNOWN_PLAYER_NAME: &str = "Unknown Player";

/// Candidate players for line selection, indexed by ID
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: HashMap<PlayerId, Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    /// Display name, or a placeholder for ids the roster no longer knows
    pub fn name_of(&self, id: &str) -> &str {
        self.players
            .get(id)
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PLAYER_NAME)
    }

    pub fn display_name(&self, id: &str, format: NameFormat) -> String {
        match self.players.get(id) {
            Some(player) => format.apply(player),
            None => UNKNOWN_PLAYER_NAME.to_string(),
        }
    }

    /// Handlers first, then hybrids and cutters; jersey number, then name
    pub fn sorted_for_selection(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by(|a, b| {
            a.position
                .sort_rank()
                .cmp(&b.position.sort_rank())
                .then_with(|| a.jersey_number.unwrap_or(u32::MAX).cmp(&b.jersey_number.unwrap_or(u32::MAX)))
                .then_with(|| a.name.cmp(&b.name))
        });
        players
    }

    /// Resolves a line selection, enforcing seven distinct known players
    pub fn select_line(&self, ids: &[PlayerId]) -> Result<Vec<Player>, CaptureError> {
        if ids.len() != LINE_SIZE {
            return Err(CaptureError::LineSize {
                expected: LINE_SIZE,
                actual: ids.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut line = Vec::with_capacity(LINE_SIZE);
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(CaptureError::DuplicatePlayer(id.clone()));
            }
            let player = self
                .get(id)
                .ok_or_else(|| CaptureError::UnknownPlayer(id.clone()))?;
            line.push(player.clone());
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Position;

    fn roster(count: usize) -> Roster {
        Roster::new(
            (0..count)
                .map(|i| Player::new(format!("p{i}"), format!("Player {i}")))
                .collect(),
        )
    }

    fn ids(range: std::ops::Range<usize>) -> Vec<PlayerId> {
        range.map(|i| format!("p{i}")).collect()
    }

    #[test]
    fn test_select_line_requires_seven() {
        let roster = roster(10);

        assert!(roster.select_line(&ids(0..7)).is_ok());
        assert_eq!(
            roster.select_line(&ids(0..6)),
            Err(CaptureError::LineSize { expected: 7, actual: 6 })
        );
        assert_eq!(
            roster.select_line(&ids(0..8)),
            Err(CaptureError::LineSize { expected: 7, actual: 8 })
        );
    }

    #[test]
    fn test_select_line_rejects_duplicates_and_strangers() {
        let roster = roster(10);

        let mut dup = ids(0..6);
        dup.push("p0".to_string());
        assert_eq!(roster.select_line(&dup), Err(CaptureError::DuplicatePlayer("p0".to_string())));

        let mut stranger = ids(0..6);
        stranger.push("ghost".to_string());
        assert_eq!(
            roster.select_line(&stranger),
            Err(CaptureError::UnknownPlayer("ghost".to_string()))
        );
    }

    #[test]
    fn test_sorted_for_selection_groups_handlers_first() {
        let mut cutter = Player::new("c", "Cara");
        cutter.position = Position::Cutter;
        let mut handler = Player::new("h", "Hugo");
        handler.position = Position::Handler;
        let roster = Roster::new(vec![cutter, handler, Player::new("y", "Yan")]);

        let order: Vec<&str> = roster.sorted_for_selection().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["h", "y", "c"]);
    }

    #[test]
    fn test_unknown_player_gets_placeholder() {
        let roster = roster(1);
        assert_eq!(roster.name_of("p0"), "Player 0");
        assert_eq!(roster.name_of("missing"), UNKNOWN_PLAYER_NAME);
    }
}

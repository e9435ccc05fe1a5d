//! Boundary to whatever keeps finished matches.
//!
//! Stores report success as a plain `bool`: failures are logged by the store and
//! never bubble into the capture engine.

use crate::domain::{Match, Tournament};

pub trait MatchStore {
    fn save_match(&self, team_id: &str, tournament_id: &str, game: &Match) -> bool;

    fn delete_match(&self, team_id: &str, tournament_id: &str, match_id: &str) -> bool;

    fn save_tournament(&self, team_id: &str, tournament: &Tournament) -> bool;
}

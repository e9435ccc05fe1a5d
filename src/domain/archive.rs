use serde::{Deserialize, Serialize};

use super::models::{Match, Player, TeamProfile, Tournament, Training};
use crate::errors::CaptureError;

/// Backup/restore document for one team.
///
/// Owned by the persistence layer; its shape follows the point archive so a
/// round trip through JSON keeps every recorded field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupArchive {
    pub team: TeamProfile,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub tournaments: Vec<Tournament>,
    #[serde(default)]
    pub trainings: Vec<Training>,
}

impl BackupArchive {
    pub fn new(team: TeamProfile) -> Self {
        Self {
            team,
            players: Vec::new(),
            tournaments: Vec::new(),
            trainings: Vec::new(),
        }
    }

    /// Checks score consistency and point validity of every archived match
    pub fn validate(&self) -> Result<(), CaptureError> {
        self.matches().try_for_each(Match::validate)
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.tournaments.iter().flat_map(|t| t.matches.iter())
    }

    pub fn point_count(&self) -> usize {
        self.matches().map(|m| m.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaptureMode, PlayerStat, PointData, WhoScored};

    fn archive_with_match(game: Match) -> BackupArchive {
        let mut tournament = Tournament::new("t1", "Spring Open");
        tournament.matches.push(game);
        let mut archive = BackupArchive::new(TeamProfile {
            id: "team".to_string(),
            name: "Discs".to_string(),
        });
        archive.tournaments.push(tournament);
        archive
    }

    #[test]
    fn test_validate_accepts_consistent_archive() {
        let mut game = Match::new("m1", "Rivals");
        game.append_point(PointData::new(
            vec![PlayerStat::on_line("a", "Ann")],
            WhoScored::Us,
            CaptureMode::Simple,
        ));

        let archive = archive_with_match(game);
        assert!(archive.validate().is_ok());
        assert_eq!(archive.point_count(), 1);
    }

    #[test]
    fn test_validate_rejects_mismatched_score() {
        let mut game = Match::new("m1", "Rivals");
        game.score_them = 3;

        let err = archive_with_match(game).validate().unwrap_err();
        assert!(matches!(err, CaptureError::InconsistentScore { .. }));
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let mut game = Match::new("m1", "Rivals");
        let mut stat = PlayerStat::on_line("a", "Ann");
        stat.pass_distribution.insert("b".to_string(), 2);
        stat.successful_pass = 2;
        stat.total_pull_time_seconds = 4.25;
        game.append_point(PointData::new(vec![stat], WhoScored::Them, CaptureMode::Pro));
        let archive = archive_with_match(game);

        let json = serde_json::to_string(&archive).unwrap();
        let restored: BackupArchive = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, archive);
    }
}

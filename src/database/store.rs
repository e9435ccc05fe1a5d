use anyhow::{Context, Result};
use log::{error, info, warn};

use super::connection::{DbPool, create_pool, get_connection};
use super::{matches, setup, teams, tournaments};
use crate::domain::{BackupArchive, Match, TeamProfile, Tournament};
use crate::errors::storage_context;
use crate::persistence::MatchStore;

/// SQLite-backed match store
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn open(database_path: &str) -> Result<Self> {
        let pool = create_pool(database_path)?;
        let conn = get_connection(&pool)?;
        setup::initialize_database(&conn)?;
        Ok(Self { pool })
    }

    pub fn try_save_match(&self, team_id: &str, tournament_id: &str, game: &Match) -> Result<()> {
        game.validate().with_context(|| format!("Refusing to save match {}", game.id))?;
        let conn = get_connection(&self.pool)?;
        matches::upsert_match(&conn, team_id, tournament_id, None, game)
            .with_context(|| storage_context("save", &game.id))
    }

    pub fn try_delete_match(&self, team_id: &str, tournament_id: &str, match_id: &str) -> Result<bool> {
        let conn = get_connection(&self.pool)?;
        let deleted = matches::delete_match(&conn, team_id, tournament_id, match_id)
            .with_context(|| storage_context("delete", match_id))?;
        Ok(deleted > 0)
    }

    pub fn try_save_tournament(&self, team_id: &str, tournament: &Tournament) -> Result<()> {
        for game in &tournament.matches {
            game.validate()
                .with_context(|| format!("Refusing to save tournament {}", tournament.id))?;
        }

        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        tournaments::upsert_tournament(&tx, team_id, None, tournament)
            .with_context(|| storage_context("save", &tournament.id))?;
        tx.commit().context("Failed to commit tournament")
    }

    /// Writes a whole backup after validating it; nothing is stored on failure
    pub fn import_archive(&self, archive: &BackupArchive) -> Result<()> {
        archive.validate().context("Archive failed validation")?;

        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        let team_id = &archive.team.id;

        teams::upsert_team(&tx, &archive.team)?;
        for (idx, player) in archive.players.iter().enumerate() {
            teams::upsert_player(&tx, team_id, idx, player)?;
        }
        for (idx, tournament) in archive.tournaments.iter().enumerate() {
            tournaments::upsert_tournament(&tx, team_id, Some(idx), tournament)?;
        }
        for (idx, training) in archive.trainings.iter().enumerate() {
            teams::upsert_training(&tx, team_id, idx, training)?;
        }
        tx.commit().context("Failed to commit archive import")?;

        info!(
            "Imported archive for {}: {} tournaments, {} points",
            archive.team.name,
            archive.tournaments.len(),
            archive.point_count()
        );
        Ok(())
    }

    pub fn export_archive(&self, team_id: &str) -> Result<BackupArchive> {
        let conn = get_connection(&self.pool)?;
        let team = teams::find_team(&conn, team_id)?.unwrap_or_else(|| {
            warn!("Team {team_id} has no profile, exporting with its id as name");
            TeamProfile {
                id: team_id.to_string(),
                name: team_id.to_string(),
            }
        });

        Ok(BackupArchive {
            team,
            players: teams::list_players(&conn, team_id)?,
            tournaments: tournaments::list_with_matches(&conn, team_id)?,
            trainings: teams::list_trainings(&conn, team_id)?,
        })
    }

    pub fn save_team(&self, team: &TeamProfile) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        teams::upsert_team(&conn, team)
    }
}

fn report<T>(result: Result<T>, operation: &str) -> Option<T> {
    result
        .inspect_err(|e| error!("{operation} failed: {e:#}"))
        .ok()
}

impl MatchStore for SqliteStore {
    fn save_match(&self, team_id: &str, tournament_id: &str, game: &Match) -> bool {
        report(self.try_save_match(team_id, tournament_id, game), "Saving match").is_some()
    }

    fn delete_match(&self, team_id: &str, tournament_id: &str, match_id: &str) -> bool {
        report(self.try_delete_match(team_id, tournament_id, match_id), "Deleting match").unwrap_or(false)
    }

    fn save_tournament(&self, team_id: &str, tournament: &Tournament) -> bool {
        report(self.try_save_tournament(team_id, tournament), "Saving tournament").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaptureMode, Player, PlayerStat, PointData, Training, WhoScored};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn store() -> (SqliteStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.db");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
        (store, dir)
    }

    fn game(id: &str) -> Match {
        let mut game = Match::new(id, "Rivals");
        let mut stat = PlayerStat::on_line("a", "Ann");
        stat.goal = 1;
        stat.pass_distribution.insert("b".to_string(), 2);
        game.append_point(PointData::new(vec![stat], WhoScored::Us, CaptureMode::Advanced));
        game.append_point(PointData::new(vec![], WhoScored::Them, CaptureMode::Simple));
        game
    }

    fn archive() -> BackupArchive {
        let mut archive = BackupArchive::new(TeamProfile {
            id: "team".to_string(),
            name: "Discs".to_string(),
        });
        archive.players.push(Player::new("a", "Ann"));
        let mut tournament = Tournament::new("open", "Open");
        tournament.start_date = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        tournament.matches.push(game("m1"));
        archive.tournaments.push(tournament);
        archive.trainings.push(Training {
            id: "t1".to_string(),
            date: Utc::now(),
            title: "Throwing".to_string(),
            attendee_ids: vec!["a".to_string()],
        });
        archive
    }

    #[test]
    fn test_archive_round_trip_is_lossless() {
        let (store, _dir) = store();
        let original = archive();
        store.import_archive(&original).unwrap();

        let exported = store.export_archive("team").unwrap();
        assert_eq!(exported, original);
    }

    #[test]
    fn test_round_trip_keeps_list_order() {
        let (store, _dir) = store();
        let mut original = archive();
        original.players = vec![Player::new("zed", "Zed"), Player::new("amy", "Amy")];

        let mut late = Tournament::new("spring", "Spring");
        late.start_date = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        late.matches = vec![game("m2"), game("m1")];
        original.tournaments.push(late);

        store.import_archive(&original).unwrap();
        let exported = store.export_archive("team").unwrap();

        let ids: Vec<&str> = exported.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["zed", "amy"]);
        assert_eq!(exported.tournaments[1].matches[0].id, "m2");
        assert_eq!(exported, original);
    }

    #[test]
    fn test_saved_matches_keep_insertion_order() {
        let (store, _dir) = store();
        assert!(store.save_match("team", "open", &game("m9")));
        assert!(store.save_match("team", "open", &game("m1")));
        assert!(store.save_match("team", "open", &game("m9")));

        let conn = get_connection(&store.pool).unwrap();
        let ids: Vec<String> = matches::list_by_tournament(&conn, "team", "open")
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, ["m9", "m1"]);
    }

    #[test]
    fn test_inconsistent_match_is_rejected() {
        let (store, _dir) = store();
        let mut broken = game("m1");
        broken.score_us = 5;

        assert!(!store.save_match("team", "open", &broken));
        assert!(store.save_match("team", "open", &game("m1")));
    }

    #[test]
    fn test_inconsistent_archive_is_not_imported() {
        let (store, _dir) = store();
        let mut broken = archive();
        broken.tournaments[0].matches[0].score_them = 9;

        assert!(store.import_archive(&broken).is_err());
        assert!(store.export_archive("team").unwrap().tournaments.is_empty());
    }

    #[test]
    fn test_tournament_with_inconsistent_match_is_rejected() {
        let (store, _dir) = store();
        let mut tournament = Tournament::new("open", "Open");
        let mut broken = Match::new("m1", "Rivals");
        broken.score_us = 7;
        tournament.matches.push(broken);

        assert!(!store.save_tournament("team", &tournament));
        assert!(store.export_archive("team").unwrap().tournaments.is_empty());

        tournament.matches[0] = game("m1");
        assert!(store.save_tournament("team", &tournament));
    }

    #[test]
    fn test_tournament_with_invalid_point_is_rejected() {
        let (store, _dir) = store();
        let mut tournament = Tournament::new("open", "Open");
        let mut twice = game("m1");
        let stat = twice.points[0].stats[0].clone();
        twice.points[0].stats.push(stat);
        tournament.matches.push(twice);

        assert!(!store.save_tournament("team", &tournament));
    }

    #[test]
    fn test_delete_reports_missing_match() {
        let (store, _dir) = store();
        assert!(store.save_tournament("team", &Tournament::new("open", "Open")));
        assert!(store.save_match("team", "open", &game("m1")));

        assert!(store.delete_match("team", "open", "m1"));
        assert!(!store.delete_match("team", "open", "m1"));
    }
}

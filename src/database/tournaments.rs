use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::matches;
use crate::domain::Tournament;

/// Stores the tournament header and every match it carries, in list order.
/// Without an `ordinal` the tournament is placed like `matches::upsert_match` places a match.
pub fn upsert_tournament(conn: &Connection, team_id: &str, ordinal: Option<usize>, tournament: &Tournament) -> Result<()> {
    let sql = "INSERT INTO tournaments (team_id, id, name, start_date, ordinal)
               VALUES (?1, ?2, ?3, ?4, COALESCE(?5,
                   (SELECT COALESCE(MAX(ordinal) + 1, 0) FROM tournaments WHERE team_id = ?1)))
               ON CONFLICT(team_id, id) DO UPDATE SET
                   name = excluded.name,
                   start_date = excluded.start_date,
                   ordinal = COALESCE(?5, ordinal)";

    conn.execute(sql, params![team_id, tournament.id, tournament.name, tournament.start_date, ordinal])
        .context("Failed to upsert tournament")?;

    for (idx, game) in tournament.matches.iter().enumerate() {
        matches::upsert_match(conn, team_id, &tournament.id, Some(idx), game)?;
    }
    Ok(())
}

/// Tournaments of a team with their matches, in stored list order
pub fn list_with_matches(conn: &Connection, team_id: &str) -> Result<Vec<Tournament>> {
    let sql = "SELECT id, name, start_date FROM tournaments WHERE team_id = ?1 ORDER BY ordinal, id";

    let mut stmt = conn.prepare(sql)?;
    let headers = stmt
        .query_map(params![team_id], |row| {
            Ok(Tournament {
                id: row.get(0)?,
                name: row.get(1)?,
                matches: Vec::new(),
                start_date: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    headers
        .into_iter()
        .map(|mut tournament| {
            tournament.matches = matches::list_by_tournament(conn, team_id, &tournament.id)?;
            Ok(tournament)
        })
        .collect()
}

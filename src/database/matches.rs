use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::domain::Match;
use crate::errors::with_parse_context;

/// Without an `ordinal` a new match is appended after the tournament's
/// existing ones and a stored match keeps its position.
pub fn upsert_match(
    conn: &Connection,
    team_id: &str,
    tournament_id: &str,
    ordinal: Option<usize>,
    game: &Match,
) -> Result<()> {
    let document = serde_json::to_string(game).context("Failed to serialize match")?;
    let sql = "INSERT INTO matches (team_id, tournament_id, id, opponent_name, score_us, score_them, played_at, document, ordinal)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, COALESCE(?9,
                   (SELECT COALESCE(MAX(ordinal) + 1, 0) FROM matches WHERE team_id = ?1 AND tournament_id = ?2)))
               ON CONFLICT(team_id, tournament_id, id) DO UPDATE SET
                   opponent_name = excluded.opponent_name,
                   score_us = excluded.score_us,
                   score_them = excluded.score_them,
                   played_at = excluded.played_at,
                   document = excluded.document,
                   ordinal = COALESCE(?9, ordinal),
                   updated_at = CURRENT_TIMESTAMP";

    conn.execute(
        sql,
        params![
            team_id,
            tournament_id,
            game.id,
            game.opponent_name,
            game.score_us,
            game.score_them,
            game.date,
            document,
            ordinal
        ],
    )
    .context("Failed to upsert match")
    .map(|_| ())
}

/// Number of deleted rows (0 or 1)
pub fn delete_match(conn: &Connection, team_id: &str, tournament_id: &str, match_id: &str) -> Result<usize> {
    let sql = "DELETE FROM matches WHERE team_id = ?1 AND tournament_id = ?2 AND id = ?3";

    conn.execute(sql, params![team_id, tournament_id, match_id])
        .context("Failed to delete match")
}

pub fn list_by_tournament(conn: &Connection, team_id: &str, tournament_id: &str) -> Result<Vec<Match>> {
    let sql = "SELECT document FROM matches WHERE team_id = ?1 AND tournament_id = ?2 ORDER BY ordinal, id";

    let mut stmt = conn.prepare(sql)?;
    let documents = stmt
        .query_map(params![team_id, tournament_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    documents
        .iter()
        .map(|doc| with_parse_context(serde_json::from_str(doc), "match"))
        .collect()
}

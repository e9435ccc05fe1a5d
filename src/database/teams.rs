use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Player, TeamProfile, Training};
use crate::errors::with_parse_context;

pub fn upsert_team(conn: &Connection, team: &TeamProfile) -> Result<()> {
    let sql = "INSERT INTO teams (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO UPDATE SET name = excluded.name";

    conn.execute(sql, params![team.id, team.name])
        .context("Failed to upsert team")
        .map(|_| ())
}

pub fn find_team(conn: &Connection, team_id: &str) -> Result<Option<TeamProfile>> {
    let sql = "SELECT id, name FROM teams WHERE id = ?1";

    conn.query_row(sql, params![team_id], |row| {
        Ok(TeamProfile {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })
    .optional()
    .context("Failed to query team by id")
}

/// `ordinal` is the player's position in the team list
pub fn upsert_player(conn: &Connection, team_id: &str, ordinal: usize, player: &Player) -> Result<()> {
    let document = serde_json::to_string(player).context("Failed to serialize player")?;
    let sql = "INSERT INTO players (team_id, id, ordinal, document) VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(team_id, id) DO UPDATE SET ordinal = excluded.ordinal, document = excluded.document";

    conn.execute(sql, params![team_id, player.id, ordinal, document])
        .context("Failed to upsert player")
        .map(|_| ())
}

pub fn list_players(conn: &Connection, team_id: &str) -> Result<Vec<Player>> {
    list_documents(conn, "SELECT document FROM players WHERE team_id = ?1 ORDER BY ordinal, id", team_id, "player")
}

pub fn upsert_training(conn: &Connection, team_id: &str, ordinal: usize, training: &Training) -> Result<()> {
    let document = serde_json::to_string(training).context("Failed to serialize training")?;
    let sql = "INSERT INTO trainings (team_id, id, ordinal, document) VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(team_id, id) DO UPDATE SET ordinal = excluded.ordinal, document = excluded.document";

    conn.execute(sql, params![team_id, training.id, ordinal, document])
        .context("Failed to upsert training")
        .map(|_| ())
}

pub fn list_trainings(conn: &Connection, team_id: &str) -> Result<Vec<Training>> {
    list_documents(conn, "SELECT document FROM trainings WHERE team_id = ?1 ORDER BY ordinal, id", team_id, "training")
}

pub(super) fn list_documents<T>(conn: &Connection, sql: &str, key: &str, data_type: &str) -> Result<Vec<T>>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let mut stmt = conn.prepare(sql)?;
    let documents = stmt
        .query_map(params![key], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    documents
        .iter()
        .map(|doc| with_parse_context(serde_json::from_str(doc), data_type))
        .collect()
}

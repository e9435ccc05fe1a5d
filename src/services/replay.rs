use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use serde::Deserialize;

use crate::cache::read_json;
use crate::capture::{PointCommand, PointEffect, PointSession};
use crate::clock::SystemTimeSource;
use crate::config::settings::AppConfig;
use crate::database::SqliteStore;
use crate::domain::{CaptureMode, Match, Player, Roster};
use crate::persistence::MatchStore;
use crate::spatial::{SpatialCommand, SpatialEffect, SpatialSession};

/// Recorded operator input for one match
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript<C> {
    pub opponent_name: String,
    pub players: Vec<Player>,
    pub commands: Vec<C>,
}

/// `team/tournament` pair a replayed match is stored under
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTarget {
    pub team_id: String,
    pub tournament_id: String,
}

impl SaveTarget {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once('/') {
            Some((team, tournament)) if !team.is_empty() && !tournament.is_empty() => Ok(Self {
                team_id: team.to_string(),
                tournament_id: tournament.to_string(),
            }),
            _ => bail!("expected <team>/<tournament>, got '{}'", raw),
        }
    }
}

pub struct ReplayService {
    config: AppConfig,
}

impl ReplayService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Capture mode PRO replays coordinate commands, every other mode point commands
    pub fn run(&self, script_path: &str, save: Option<&SaveTarget>) -> Result<Match> {
        info!("=== Replaying {} ===", script_path);

        let path = Path::new(script_path);
        let game = if self.config.capture.capture_mode == CaptureMode::Pro {
            self.replay_pro(read_json(path)?)?
        } else {
            self.replay(read_json(path)?)?
        };
        info!(
            "=== Replay Complete: {} points, {}-{} ===",
            game.points.len(),
            game.score_us,
            game.score_them
        );

        if let Some(target) = save {
            let store = SqliteStore::open(&self.config.storage.database_path)?;
            if !store.save_match(&target.team_id, &target.tournament_id, &game) {
                bail!("Failed to save match {} to {}/{}", game.id, target.team_id, target.tournament_id);
            }
            info!("Saved match {} to {}/{}", game.id, target.team_id, target.tournament_id);
        }
        Ok(game)
    }

    pub fn replay(&self, script: ReplayScript<PointCommand>) -> Result<Match> {
        let mut session = PointSession::new(
            Roster::new(script.players),
            self.config.capture.clone(),
            &script.opponent_name,
            Box::new(SystemTimeSource::new()),
        );

        for (idx, command) in script.commands.into_iter().enumerate() {
            let effects = session
                .apply(command)
                .with_context(|| format!("Command {} was rejected", idx + 1))?;
            for effect in effects {
                if let PointEffect::PointArchived { index, score_us, score_them, .. } = effect {
                    info!("  → Point {} archived, {}-{}", index + 1, score_us, score_them);
                }
            }
        }

        if session.phase().is_point_in_progress() {
            warn!("Script ended inside a point; the open point is dropped");
        }
        Ok(session.current_match().clone())
    }

    pub fn replay_pro(&self, script: ReplayScript<SpatialCommand>) -> Result<Match> {
        let mut session = SpatialSession::new(
            Roster::new(script.players),
            self.config.capture.clone(),
            &script.opponent_name,
        );

        for (idx, command) in script.commands.into_iter().enumerate() {
            let effects = session
                .apply(command)
                .with_context(|| format!("Command {} was rejected", idx + 1))?;
            for effect in effects {
                if let SpatialEffect::PointArchived { index, score_us, score_them, .. } = effect {
                    info!("  → Pro point {} archived, {}-{}", index + 1, score_us, score_them);
                }
            }
        }
        Ok(session.current_match().clone())
    }
}

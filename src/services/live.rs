use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use log::{info, warn};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::replay::SaveTarget;
use crate::capture::{PointCommand, PointEffect, PointSession};
use crate::clock::{ClockMessage, ClockTicker, MatchClock, SystemTimeSource};
use crate::config::settings::AppConfig;
use crate::database::SqliteStore;
use crate::domain::{CaptureMode, Match, Player, Roster};
use crate::errors::CaptureError;
use crate::persistence::MatchStore;
use crate::spatial::{SpatialCommand, SpatialEffect, SpatialSession};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Capture engine the live loop drives
trait LiveEngine {
    type Command: DeserializeOwned;

    /// Applies one command and prints its effects; `true` once a point is archived
    fn apply_printed(&mut self, command: Self::Command) -> Result<bool, CaptureError>;

    fn tick(&mut self);

    fn clock(&self) -> &MatchClock;

    fn current_match(&self) -> &Match;
}

impl LiveEngine for PointSession {
    type Command = PointCommand;

    fn apply_printed(&mut self, command: PointCommand) -> Result<bool, CaptureError> {
        let mut archived = false;
        for effect in self.apply(command)? {
            match effect {
                PointEffect::PhaseChanged(phase) => println!("{} {}", "now".dimmed(), phase),
                PointEffect::StoppageRecorded(stoppage) => println!(
                    "{} {:?} for {}s",
                    "stoppage".yellow(),
                    stoppage.stoppage_type,
                    stoppage.duration_seconds
                ),
                PointEffect::PointArchived { index, score_us, score_them, .. } => {
                    print_archived(index, score_us, score_them);
                    archived = true;
                }
            }
        }
        Ok(archived)
    }

    fn tick(&mut self) {
        if let Err(e) = self.apply(PointCommand::Tick { seconds: 1 }) {
            warn!("Tick rejected: {e}");
        }
    }

    fn clock(&self) -> &MatchClock {
        PointSession::clock(self)
    }

    fn current_match(&self) -> &Match {
        PointSession::current_match(self)
    }
}

impl LiveEngine for SpatialSession {
    type Command = SpatialCommand;

    fn apply_printed(&mut self, command: SpatialCommand) -> Result<bool, CaptureError> {
        let mut archived = false;
        for effect in self.apply(command)? {
            match effect {
                SpatialEffect::PhaseChanged(phase) => println!("{} {:?}", "now".dimmed(), phase),
                SpatialEffect::EventRecorded(event) => println!("{} {:?}", "event".cyan(), event.event_type),
                SpatialEffect::PointArchived { index, score_us, score_them, .. } => {
                    print_archived(index, score_us, score_them);
                    archived = true;
                }
            }
        }
        Ok(archived)
    }

    fn tick(&mut self) {
        if let Err(e) = self.apply(SpatialCommand::Tick { seconds: 1 }) {
            warn!("Tick rejected: {e}");
        }
    }

    fn clock(&self) -> &MatchClock {
        SpatialSession::clock(self)
    }

    fn current_match(&self) -> &Match {
        SpatialSession::current_match(self)
    }
}

fn print_archived(index: usize, score_us: u32, score_them: u32) {
    println!(
        "{} point {} archived, score {}-{}",
        "✓".green(),
        index + 1,
        score_us,
        score_them
    );
}

/// Interactive capture: JSON commands on stdin, one per line, with a
/// once-per-second clock tick merged into the same loop.
///
/// Capture mode PRO reads coordinate commands, every other mode point commands.
pub struct LiveService {
    config: AppConfig,
    save: Option<(SqliteStore, SaveTarget)>,
}

impl LiveService {
    pub fn new(config: AppConfig, save: Option<SaveTarget>) -> Result<Self> {
        let save = match save {
            Some(target) => Some((SqliteStore::open(&config.storage.database_path)?, target)),
            None => None,
        };
        Ok(Self { config, save })
    }

    pub async fn run(&self, players: Vec<Player>, opponent_name: &str) -> Result<Match> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with(players, opponent_name, stdin).await
    }

    pub async fn run_with<R>(&self, players: Vec<Player>, opponent_name: &str, input: R) -> Result<Match>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(
            "=== Live capture against {} ({}) ===",
            opponent_name,
            self.config.capture.capture_mode.as_str()
        );

        let roster = Roster::new(players);
        let settings = self.config.capture.clone();
        let game = if settings.capture_mode == CaptureMode::Pro {
            self.drive(SpatialSession::new(roster, settings, opponent_name), input)
                .await?
        } else {
            let session = PointSession::new(roster, settings, opponent_name, Box::new(SystemTimeSource::new()));
            self.drive(session, input).await?
        };

        info!("=== Live capture ended at {}-{} ===", game.score_us, game.score_them);
        Ok(game)
    }

    async fn drive<E, R>(&self, mut engine: E, input: R) -> Result<Match>
    where
        E: LiveEngine,
        R: AsyncBufRead + Unpin,
    {
        let (tick_tx, mut tick_rx) = mpsc::channel(8);
        let ticker = ClockTicker::start(TICK_PERIOD, false, tick_tx);
        let mut lines = input.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(&mut engine, &line),
                    None => break,
                },
                Some(ClockMessage::Tick) = tick_rx.recv() => engine.tick(),
            }

            let clock = engine.clock();
            ticker.set_running(clock.is_running() || clock.in_stoppage());
        }

        ticker.shutdown().await;
        Ok(engine.current_match().clone())
    }

    fn handle_line<E: LiveEngine>(&self, engine: &mut E, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let command = match serde_json::from_str::<E::Command>(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("Skipping unreadable command '{}': {}", line, e);
                return;
            }
        };

        match engine.apply_printed(command) {
            Ok(true) => self.persist(engine.current_match()),
            Ok(false) => {}
            Err(e) => println!("{} {}", "rejected:".red(), e),
        }
    }

    fn persist(&self, game: &Match) {
        if let Some((store, target)) = &self.save
            && !store.save_match(&target.team_id, &target.tournament_id, game)
        {
            warn!("Match {} could not be saved; it stays in memory", game.id);
        }
    }
}

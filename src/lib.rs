pub mod cache;
pub mod capture;
pub mod cli;
pub mod clock;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod persistence;
pub mod services;
pub mod spatial;
pub mod stats;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::CaptureMode;
use crate::services::archive::ArchiveService;
use crate::services::live::LiveService;
use crate::services::replay::{ReplayService, SaveTarget};
use crate::services::report::StatsReportService;
use crate::services::review::ReviewService;
use crate::spatial::FieldPoint;
use crate::stats::TeamStatsFilter;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_stats(archive: &str, tournaments: &[String], opponent: Option<&str>) -> Result<()> {
    let config = AppConfig::from_env();
    let filter = TeamStatsFilter {
        tournament_ids: tournaments.to_vec(),
        opponent_name: opponent.map(str::to_string),
    };
    StatsReportService::new(config).run(archive, &filter)
}

pub fn handle_replay(script: &str, pro: bool, save: Option<&str>) -> Result<()> {
    let mut config = AppConfig::from_env();
    if pro {
        config.capture.capture_mode = CaptureMode::Pro;
    }
    let target = save.map(SaveTarget::parse).transpose()?;
    let game = ReplayService::new(config).run(script, target.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&game)?);
    Ok(())
}

pub fn handle_live(opponent: &str, roster: &str, save: Option<&str>) -> Result<()> {
    let config = AppConfig::from_env();
    let target = save.map(SaveTarget::parse).transpose()?;
    let players = cache::read_json(Path::new(roster))?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = LiveService::new(config, target)?;
        service.run(players, opponent).await.map(|_| ())
    })
}

pub fn handle_review(archive: &str, match_id: &str, point: usize, x: f64, y: f64) -> Result<()> {
    let config = AppConfig::from_env();
    ReviewService::new(config).run(archive, match_id, point, FieldPoint::new(x, y))
}

pub fn handle_import(archive: &str) -> Result<()> {
    let config = AppConfig::from_env();
    ArchiveService::new(&config)?.import(archive)
}

pub fn handle_export(team: &str, out: &str) -> Result<()> {
    let config = AppConfig::from_env();
    ArchiveService::new(&config)?.export(team, out)
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

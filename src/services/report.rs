use anyhow::Result;
use colored::Colorize;
use log::{info, warn};

use crate::cache::ArchiveFile;
use crate::config::settings::AppConfig;
use crate::domain::{BackupArchive, PointData, Roster};
use crate::stats::{AdvancedPlayerStats, AdvancedTeamStats, TeamStatsFilter, format_percentage, player_leaderboard};

/// Team and player statistics for a backup archive
pub struct StatsReportService {
    config: AppConfig,
}

/// Everything the report prints, computed up front
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub team_name: String,
    pub team: AdvancedTeamStats,
    pub players: Vec<AdvancedPlayerStats>,
}

impl StatsReportService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, archive_path: &str, filter: &TeamStatsFilter) -> Result<()> {
        let archive = ArchiveFile::new(archive_path).load()?;
        let report = self.build(&archive, filter);
        println!("{}", render_report(&report));
        Ok(())
    }

    pub fn build(&self, archive: &BackupArchive, filter: &TeamStatsFilter) -> StatsReport {
        if let Err(e) = archive.validate() {
            warn!("Archive is inconsistent, statistics may be off: {e}");
        }

        let matches = filter.select(&archive.tournaments);
        info!("Aggregating {} matches for {}", matches.len(), archive.team.name);

        let points: Vec<PointData> = matches.iter().flat_map(|m| m.points.iter().cloned()).collect();
        let roster = Roster::new(archive.players.clone());

        let mut players = player_leaderboard(&points, &roster);
        for player in &mut players {
            player.name = roster.display_name(&player.player_id, self.config.capture.name_format);
        }

        StatsReport {
            team_name: archive.team.name.clone(),
            team: AdvancedTeamStats::from_matches(matches),
            players,
        }
    }
}

fn render_report(report: &StatsReport) -> String {
    let mut out = String::new();
    out.push_str(&render_team(report));
    out.push('\n');
    out.push_str(&render_players(report));
    out
}

fn render_team(report: &StatsReport) -> String {
    let team = &report.team;
    let mut lines = vec![format!("{}", report.team_name.bold())];

    lines.push(format!(
        "Matches {}  W {}  L {}",
        team.matches_played,
        team.wins.to_string().green(),
        team.losses.to_string().red()
    ));
    lines.push(format!(
        "Points {} (won {}, lost {})",
        team.points_played, team.points_won, team.points_lost
    ));
    lines.push(format!(
        "Holds {}/{} ({})  clean {}",
        team.holds,
        team.offense_points,
        format_percentage(team.hold_rate()),
        team.clean_holds
    ));
    lines.push(format!(
        "Breaks {}/{} ({})",
        team.breaks,
        team.defense_points,
        format_percentage(team.break_rate())
    ));
    lines.push(format!(
        "Passing {} of {} ({})  turnovers {}",
        team.completions + team.assists,
        team.pass_attempts,
        format_percentage(team.completion_percentage()),
        team.turnovers()
    ));
    lines.push(format!(
        "Blocks {}  callahans {}  block conversion {}",
        team.blocks,
        team.callahans,
        format_percentage(team.block_conversion_rate())
    ));
    lines.join("\n")
}

fn render_players(report: &StatsReport) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<24} {:>7} {:>3} {:>3} {:>3} {:>3} {:>7} {:>6}",
        "#", "Player", "Score", "G", "A", "D", "T", "Comp", "O/D"
    )
    .bold()
    .to_string()];

    for (rank, player) in report.players.iter().enumerate() {
        let score = format!("{:>7.2}", player.efficiency_score());
        let score = if player.efficiency_score() >= 0.0 {
            score.green()
        } else {
            score.red()
        };
        lines.push(format!(
            "{:<4} {:<24} {} {:>3} {:>3} {:>3} {:>3} {:>7} {:>6}",
            rank + 1,
            player.name,
            score,
            player.goal,
            player.assist,
            player.block,
            player.turnovers(),
            format_percentage(player.completion_percentage()),
            format!("{}/{}", player.o_points_played, player.d_points_played)
        ));
    }
    lines.join("\n")
}

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::efficiency::{EfficiencyInputs, efficiency_score};
use super::percentage::ratio;
use crate::domain::{PlayerId, PlayerStat, PointData, Roster, StartMode};

/// Per-player totals folded over any number of archived points
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedPlayerStats {
    pub player_id: PlayerId,
    pub name: String,
    pub catch_stat: u32,
    pub drop: u32,
    pub throwaway: u32,
    pub goal: u32,
    pub assist: u32,
    pub block: u32,
    pub callahan: u32,
    pub successful_pass: u32,
    pub pull_attempts: u32,
    pub successful_pulls: u32,
    pub pass_distribution: BTreeMap<PlayerId, u32>,
    pub seconds_played: u64,
    pub total_tempo_seconds: u64,
    pub total_pull_time_seconds: f64,
    pub points_played: u32,
    pub o_points_played: u32,
    pub d_points_played: u32,
}

impl AdvancedPlayerStats {
    pub fn empty(player_id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    fn add_point(&mut self, stat: &PlayerStat, start_mode: Option<StartMode>) {
        self.catch_stat += stat.catch_stat;
        self.drop += stat.drop;
        self.throwaway += stat.throwaway;
        self.goal += stat.goal;
        self.assist += stat.assist;
        self.block += stat.block;
        self.callahan += stat.callahan;
        self.successful_pass += stat.successful_pass;
        self.pull_attempts += stat.pull_attempts;
        self.successful_pulls += stat.successful_pulls;
        self.seconds_played += stat.seconds_played;
        self.total_tempo_seconds += stat.total_tempo_seconds;
        self.total_pull_time_seconds += stat.total_pull_time_seconds;
        self.points_played += stat.points_played;
        for (receiver, count) in &stat.pass_distribution {
            *self.pass_distribution.entry(receiver.clone()).or_insert(0) += count;
        }
        if stat.points_played > 0 {
            match start_mode {
                Some(StartMode::Offense) => self.o_points_played += 1,
                Some(StartMode::Defense) => self.d_points_played += 1,
                None => {}
            }
        }
    }

    /// Combines two partial aggregates of the same player
    pub fn merge(mut self, other: &AdvancedPlayerStats) -> Self {
        self.catch_stat += other.catch_stat;
        self.drop += other.drop;
        self.throwaway += other.throwaway;
        self.goal += other.goal;
        self.assist += other.assist;
        self.block += other.block;
        self.callahan += other.callahan;
        self.successful_pass += other.successful_pass;
        self.pull_attempts += other.pull_attempts;
        self.successful_pulls += other.successful_pulls;
        self.seconds_played += other.seconds_played;
        self.total_tempo_seconds += other.total_tempo_seconds;
        self.total_pull_time_seconds += other.total_pull_time_seconds;
        self.points_played += other.points_played;
        self.o_points_played += other.o_points_played;
        self.d_points_played += other.d_points_played;
        for (receiver, count) in &other.pass_distribution {
            *self.pass_distribution.entry(receiver.clone()).or_insert(0) += count;
        }
        if self.name.is_empty() {
            self.name = other.name.clone();
        }
        self
    }

    pub fn efficiency_score(&self) -> f64 {
        efficiency_score(&EfficiencyInputs {
            goals: self.goal,
            assists: self.assist,
            blocks: self.block,
            callahans: self.callahan,
            throwaways: self.throwaway,
            drops: self.drop,
            successful_passes: self.successful_pass,
        })
    }

    pub fn pass_attempts(&self) -> u32 {
        self.successful_pass + self.assist + self.throwaway
    }

    /// Completed passes (assists included) over pass attempts
    pub fn completion_percentage(&self) -> f64 {
        ratio(
            f64::from(self.successful_pass + self.assist),
            f64::from(self.pass_attempts()),
        )
    }

    /// Caught passes (goals included) over catchable passes
    pub fn catching_percentage(&self) -> f64 {
        let caught = self.catch_stat + self.goal;
        ratio(f64::from(caught), f64::from(caught + self.drop))
    }

    /// Seconds with the disc per throw
    pub fn average_tempo_seconds(&self) -> f64 {
        ratio(self.total_tempo_seconds as f64, f64::from(self.pass_attempts()))
    }

    pub fn average_seconds_per_point(&self) -> f64 {
        ratio(self.seconds_played as f64, f64::from(self.points_played))
    }

    pub fn average_pull_time_seconds(&self) -> f64 {
        ratio(self.total_pull_time_seconds, f64::from(self.pull_attempts))
    }

    pub fn turnovers(&self) -> u32 {
        self.throwaway + self.drop
    }
}

/// Folds every point the player appears in into one aggregate
pub fn calculate_stats_from_points(player_id: &str, name: &str, points: &[PointData]) -> AdvancedPlayerStats {
    points
        .iter()
        .fold(AdvancedPlayerStats::empty(player_id, name), |mut acc, point| {
            if let Some(stat) = point.stat_for(player_id) {
                acc.add_point(stat, point.start_mode);
            }
            acc
        })
}

/// Aggregates every player seen in `points`, best efficiency first.
///
/// Names come from the roster; ids it no longer knows get the placeholder name.
pub fn player_leaderboard(points: &[PointData], roster: &Roster) -> Vec<AdvancedPlayerStats> {
    let ids: BTreeSet<&str> = points
        .iter()
        .flat_map(|p| p.stats.iter().map(|s| s.player_id.as_str()))
        .collect();

    let mut board: Vec<AdvancedPlayerStats> = ids
        .into_iter()
        .map(|id| calculate_stats_from_points(id, roster.name_of(id), points))
        .collect();

    board.sort_by(|a, b| {
        b.efficiency_score()
            .total_cmp(&a.efficiency_score())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaptureMode, Player, UNKNOWN_PLAYER_NAME, WhoScored};

    fn stat(id: &str, edit: impl FnOnce(&mut PlayerStat)) -> PlayerStat {
        let mut stat = PlayerStat::on_line(id, id);
        edit(&mut stat);
        stat
    }

    fn point(stats: Vec<PlayerStat>, who: WhoScored, start: StartMode) -> PointData {
        let mut point = PointData::new(stats, who, CaptureMode::Advanced);
        point.start_mode = Some(start);
        point
    }

    fn points() -> Vec<PointData> {
        vec![
            point(
                vec![
                    stat("a", |s| {
                        s.successful_pass = 3;
                        s.assist = 1;
                        s.pass_distribution.insert("b".into(), 4);
                        s.seconds_played = 40;
                    }),
                    stat("b", |s| {
                        s.catch_stat = 3;
                        s.goal = 1;
                    }),
                ],
                WhoScored::Us,
                StartMode::Offense,
            ),
            point(
                vec![stat("a", |s| {
                    s.throwaway = 1;
                    s.pass_distribution.clear();
                    s.seconds_played = 20;
                })],
                WhoScored::Them,
                StartMode::Defense,
            ),
            point(
                vec![stat("a", |s| {
                    s.block = 1;
                    s.goal = 1;
                    s.callahan = 1;
                })],
                WhoScored::Us,
                StartMode::Defense,
            ),
        ]
    }

    fn additive(stats: &AdvancedPlayerStats) -> AdvancedPlayerStats {
        AdvancedPlayerStats {
            name: String::new(),
            ..stats.clone()
        }
    }

    #[test]
    fn test_fold_counts_offense_and_defense_points() {
        let stats = calculate_stats_from_points("a", "Ann", &points());

        assert_eq!(stats.points_played, 3);
        assert_eq!((stats.o_points_played, stats.d_points_played), (1, 2));
        assert_eq!(stats.seconds_played, 60);
        assert_eq!(stats.pass_distribution.get("b"), Some(&4));
        assert_eq!(stats.pass_attempts(), 5);
        assert!((stats.completion_percentage() - 0.8).abs() < 1e-12);
        assert_eq!(stats.average_seconds_per_point(), 20.0);
    }

    #[test]
    fn test_split_fold_then_merge_matches_whole_fold() {
        let all = points();
        let whole = calculate_stats_from_points("a", "Ann", &all);
        let merged = calculate_stats_from_points("a", "Ann", &all[..2])
            .merge(&calculate_stats_from_points("a", "Ann", &all[2..]));

        assert_eq!(additive(&merged), additive(&whole));
    }

    #[test]
    fn test_absent_player_yields_empty_totals() {
        let stats = calculate_stats_from_points("zzz", "Nobody", &points());
        assert_eq!(stats.points_played, 0);
        assert_eq!(stats.completion_percentage(), 0.0);
        assert_eq!(stats.catching_percentage(), 0.0);
    }

    #[test]
    fn test_leaderboard_orders_by_efficiency_with_placeholder_names() {
        let roster = Roster::new(vec![Player::new("b", "Bea")]);
        let board = player_leaderboard(&points(), &roster);

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].player_id, "a");
        assert_eq!(board[0].name, UNKNOWN_PLAYER_NAME);
        assert!((board[0].efficiency_score() - 3.65).abs() < 1e-9);
        assert_eq!(board[1].name, "Bea");
    }
}

//! Read-only folds over archived points.

mod efficiency;
mod percentage;
mod player;
mod team;

pub use efficiency::{EfficiencyInputs, efficiency_score};
pub use percentage::{SafePercentage, calculate_safe_percentage, format_percentage, ratio};
pub use player::{AdvancedPlayerStats, calculate_stats_from_points, player_leaderboard};
pub use team::{AdvancedTeamStats, TeamStatsFilter};

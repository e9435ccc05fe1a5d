use serde::Serialize;

use super::percentage::ratio;
use crate::domain::{Match, PointData, StartMode, Tournament};

/// Restricts team aggregation to some tournaments and/or one opponent.
///
/// An empty filter selects every match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStatsFilter {
    pub tournament_ids: Vec<String>,
    pub opponent_name: Option<String>,
}

impl TeamStatsFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn includes_tournament(&self, tournament: &Tournament) -> bool {
        self.tournament_ids.is_empty() || self.tournament_ids.iter().any(|id| *id == tournament.id)
    }

    pub fn includes_match(&self, game: &Match) -> bool {
        match &self.opponent_name {
            Some(opponent) => game.opponent_name.eq_ignore_ascii_case(opponent),
            None => true,
        }
    }

    pub fn select<'a>(&self, tournaments: &'a [Tournament]) -> Vec<&'a Match> {
        tournaments
            .iter()
            .filter(|t| self.includes_tournament(t))
            .flat_map(|t| t.matches.iter())
            .filter(|m| self.includes_match(m))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedTeamStats {
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_played: u32,
    pub points_won: u32,
    pub points_lost: u32,
    pub offense_points: u32,
    pub defense_points: u32,
    pub holds: u32,
    pub clean_holds: u32,
    pub breaks: u32,
    pub completions: u32,
    pub assists: u32,
    pub throwaways: u32,
    pub drops: u32,
    pub blocks: u32,
    pub callahans: u32,
    pub pass_attempts: u32,
    pub points_with_block: u32,
    pub points_with_block_won: u32,
}

impl AdvancedTeamStats {
    pub fn from_tournaments(tournaments: &[Tournament], filter: &TeamStatsFilter) -> Self {
        Self::from_matches(filter.select(tournaments))
    }

    pub fn from_matches<'a, I>(matches: I) -> Self
    where
        I: IntoIterator<Item = &'a Match>,
    {
        let mut stats = Self::default();
        for game in matches {
            stats.add_match(game);
        }
        stats
    }

    fn add_match(&mut self, game: &Match) {
        self.matches_played += 1;
        if game.is_won() {
            self.wins += 1;
        } else if game.is_lost() {
            self.losses += 1;
        }
        for point in &game.points {
            self.add_point(point);
        }
    }

    fn add_point(&mut self, point: &PointData) {
        let won = point.is_won();
        self.points_played += 1;
        if won {
            self.points_won += 1;
        } else {
            self.points_lost += 1;
        }

        match point.start_mode {
            Some(StartMode::Offense) => {
                self.offense_points += 1;
                if won {
                    self.holds += 1;
                    if point.turnovers() == 0 {
                        self.clean_holds += 1;
                    }
                }
            }
            Some(StartMode::Defense) => {
                self.defense_points += 1;
                if won {
                    self.breaks += 1;
                }
            }
            None => {}
        }

        for stat in &point.stats {
            self.completions += stat.successful_pass;
            self.assists += stat.assist;
            self.throwaways += stat.throwaway;
            self.drops += stat.drop;
            self.blocks += stat.block;
            self.callahans += stat.callahan;
            self.pass_attempts += stat.successful_pass + stat.assist + stat.throwaway;
        }

        if point.blocks() > 0 {
            self.points_with_block += 1;
            if won {
                self.points_with_block_won += 1;
            }
        }
    }

    pub fn turnovers(&self) -> u32 {
        self.throwaways + self.drops
    }

    pub fn hold_rate(&self) -> f64 {
        ratio(f64::from(self.holds), f64::from(self.offense_points))
    }

    pub fn clean_hold_rate(&self) -> f64 {
        ratio(f64::from(self.clean_holds), f64::from(self.offense_points))
    }

    pub fn break_rate(&self) -> f64 {
        ratio(f64::from(self.breaks), f64::from(self.defense_points))
    }

    pub fn completion_percentage(&self) -> f64 {
        ratio(
            f64::from(self.completions + self.assists),
            f64::from(self.pass_attempts),
        )
    }

    /// Share of points with at least one block that were won
    pub fn block_conversion_rate(&self) -> f64 {
        ratio(
            f64::from(self.points_with_block_won),
            f64::from(self.points_with_block),
        )
    }
}

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CaptureError;
use crate::spatial::ProEvent;

pub type PlayerId = String;

/// Players on the field for one point.
pub const LINE_SIZE: usize = 7;

/// Position role, used for grouping and sort order during line selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Handler,
    Cutter,
    #[default]
    Hybrid,
}

impl Position {
    pub fn sort_rank(&self) -> u8 {
        match self {
            Position::Handler => 0,
            Position::Hybrid => 1,
            Position::Cutter => 2,
        }
    }
}

/// Roster entry supplied by the roster collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub jersey_number: Option<u32>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: Position::default(),
            jersey_number: None,
        }
    }
}

/// Per-player accumulator scoped to one point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStat {
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
    /// Receiver id -> completed passes (including assists)
    pub pass_distribution: BTreeMap<PlayerId, u32>,
    pub seconds_played: u64,
    pub total_tempo_seconds: u64,
    pub total_pull_time_seconds: f64,
    pub points_played: u32,
}

impl PlayerStat {
    /// Fresh record for a player who takes the field for a point
    pub fn on_line(player_id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            points_played: 1,
            ..Self::default()
        }
    }

    pub fn distributed_passes(&self) -> u32 {
        self.pass_distribution.values().sum()
    }

    /// `assist + successful_pass` must match the distribution map
    pub fn is_distribution_consistent(&self) -> bool {
        self.assist + self.successful_pass == self.distributed_passes()
    }

    pub fn turnovers(&self) -> u32 {
        self.throwaway + self.drop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WhoScored {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "THEM")]
    Them,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartMode {
    Offense,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureMode {
    Simple,
    #[default]
    Advanced,
    Pro,
}

impl CaptureMode {
    /// Parses the free-form stored setting, falling back to `Advanced`
    pub fn from_setting(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SIMPLE" | "BASIC" => CaptureMode::Simple,
            "ADVANCED" => CaptureMode::Advanced,
            "PRO" => CaptureMode::Pro,
            _ => CaptureMode::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CaptureMode::Simple => "SIMPLE",
            CaptureMode::Advanced => "ADVANCED",
            CaptureMode::Pro => "PRO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoppageType {
    Timeout,
    Call,
    Injury,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stoppage {
    #[serde(rename = "type")]
    pub stoppage_type: StoppageType,
    pub duration_seconds: u64,
    pub start_match_time_seconds: u64,
}

/// Immutable record of one completed point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointData {
    pub stats: Vec<PlayerStat>,
    pub who_scored: WhoScored,
    #[serde(default)]
    pub start_mode: Option<StartMode>,
    #[serde(default)]
    pub capture_mode: CaptureMode,
    #[serde(default)]
    pub duration_seconds: u64,
    #[serde(default)]
    pub pull_duration_seconds: f64,
    #[serde(default)]
    pub stoppages: Vec<Stoppage>,
    #[serde(default)]
    pub pro_events: Option<Vec<ProEvent>>,
}

impl PointData {
    pub fn new(stats: Vec<PlayerStat>, who_scored: WhoScored, capture_mode: CaptureMode) -> Self {
        Self {
            stats,
            who_scored,
            start_mode: None,
            capture_mode,
            duration_seconds: 0,
            pull_duration_seconds: 0.0,
            stoppages: Vec::new(),
            pro_events: None,
        }
    }

    /// Rejects records that can only come from a programming error
    pub fn validated(self) -> Result<Self, CaptureError> {
        if !self.pull_duration_seconds.is_finite() || self.pull_duration_seconds < 0.0 {
            return Err(CaptureError::InvalidPoint(format!(
                "pull duration {} is not a non-negative number",
                self.pull_duration_seconds
            )));
        }

        let mut seen = HashSet::new();
        for stat in &self.stats {
            if !seen.insert(stat.player_id.as_str()) {
                return Err(CaptureError::InvalidPoint(format!(
                    "player {} appears twice in the point",
                    stat.player_id
                )));
            }
        }

        Ok(self)
    }

    pub fn is_won(&self) -> bool {
        self.who_scored == WhoScored::Us
    }

    pub fn stat_for(&self, player_id: &str) -> Option<&PlayerStat> {
        self.stats.iter().find(|s| s.player_id == player_id)
    }

    pub fn turnovers(&self) -> u32 {
        self.stats.iter().map(PlayerStat::turnovers).sum()
    }

    pub fn blocks(&self) -> u32 {
        self.stats.iter().map(|s| s.block).sum()
    }
}

static MATCH_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Fresh match id, unique within the process even for matches started in the same millisecond
pub fn new_match_id() -> String {
    let sequence = MATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("match-{}-{}", Utc::now().timestamp_millis(), sequence)
}

/// Append-only archive of points against one opponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub opponent_name: String,
    pub points: Vec<PointData>,
    pub score_us: u32,
    pub score_them: u32,
    pub duration_seconds: u64,
    pub date: DateTime<Utc>,
}

impl Match {
    pub fn new(id: impl Into<String>, opponent_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            opponent_name: opponent_name.into(),
            points: Vec::new(),
            score_us: 0,
            score_them: 0,
            duration_seconds: 0,
            date: Utc::now(),
        }
    }

    /// Appends a finished point and returns its index
    pub fn append_point(&mut self, point: PointData) -> usize {
        match point.who_scored {
            WhoScored::Us => self.score_us += 1,
            WhoScored::Them => self.score_them += 1,
        }
        self.points.push(point);
        self.points.len() - 1
    }

    /// Replaces one archived point wholesale and recomputes the score
    pub fn replace_point(&mut self, index: usize, point: PointData) -> bool {
        let Some(slot) = self.points.get_mut(index) else {
            return false;
        };
        *slot = point;
        self.recompute_score();
        true
    }

    pub fn recompute_score(&mut self) {
        let (us, them) = self.counted_score();
        self.score_us = us;
        self.score_them = them;
    }

    pub fn counted_score(&self) -> (u32, u32) {
        self.points.iter().fold((0, 0), |(us, them), p| match p.who_scored {
            WhoScored::Us => (us + 1, them),
            WhoScored::Them => (us, them + 1),
        })
    }

    pub fn is_score_consistent(&self) -> bool {
        self.counted_score() == (self.score_us, self.score_them)
    }

    /// Score agrees with the archive and every point passes `PointData::validated`
    pub fn validate(&self) -> Result<(), CaptureError> {
        let counted = self.counted_score();
        if counted != (self.score_us, self.score_them) {
            return Err(CaptureError::InconsistentScore {
                match_id: self.id.clone(),
                recorded: (self.score_us, self.score_them),
                counted,
            });
        }

        for point in &self.points {
            point.clone().validated()?;
        }
        Ok(())
    }

    pub fn is_won(&self) -> bool {
        self.score_us > self.score_them
    }

    pub fn is_lost(&self) -> bool {
        self.score_them > self.score_us
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub matches: Vec<Match>,
    pub start_date: DateTime<Utc>,
}

impl Tournament {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            matches: Vec::new(),
            start_date: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamProfile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub attendee_ids: Vec<PlayerId>,
}

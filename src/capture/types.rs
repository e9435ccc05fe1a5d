use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{CaptureMode, PlayerId, PointData, Stoppage, StoppageType};

/// Detailed-capture sub-state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameMode {
    Offense,
    Defense,
    PullSelect,
    PullInFlight { puller: PlayerId },
}

impl GameMode {
    pub fn is_defensive(&self) -> bool {
        !matches!(self, GameMode::Offense)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturePhase {
    RosterSelection,
    StartModeChoice,
    SimpleEntry,
    Detailed(GameMode),
}

impl CapturePhase {
    pub fn is_point_in_progress(&self) -> bool {
        !matches!(self, CapturePhase::RosterSelection)
    }
}

impl fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapturePhase::RosterSelection => write!(f, "selecting a line"),
            CapturePhase::StartModeChoice => write!(f, "choosing offense or defense"),
            CapturePhase::SimpleEntry => write!(f, "in simple entry"),
            CapturePhase::Detailed(GameMode::Offense) => write!(f, "on offense"),
            CapturePhase::Detailed(GameMode::Defense) => write!(f, "on defense"),
            CapturePhase::Detailed(GameMode::PullSelect) => write!(f, "selecting the puller"),
            CapturePhase::Detailed(GameMode::PullInFlight { puller }) => {
                write!(f, "waiting for the pull by {puller}")
            }
        }
    }
}

fn one_second() -> u64 {
    1
}

/// Operator input for the point state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointCommand {
    ConfirmLine { player_ids: Vec<PlayerId> },
    ChooseCaptureMode { mode: CaptureMode },
    StartOffense,
    StartDefense,
    SelectPasser { player_id: PlayerId },
    Catch { receiver_id: PlayerId },
    Drop { receiver_id: PlayerId },
    Throwaway,
    Goal { receiver_id: PlayerId },
    SelectPuller { player_id: PlayerId },
    PullResult { success: bool },
    SkipPull,
    Block { player_id: PlayerId },
    Callahan { player_id: PlayerId },
    OpponentTurnover,
    OpponentGoal,
    SimpleGoal {
        scorer_id: PlayerId,
        #[serde(default)]
        assist_id: Option<PlayerId>,
    },
    Substitute { out_id: PlayerId, in_id: PlayerId },
    StartStoppage { stoppage_type: StoppageType },
    EndStoppage,
    SetClockRunning { running: bool },
    Tick {
        #[serde(default = "one_second")]
        seconds: u64,
    },
    Undo,
}

/// Outputs forwarded to persistence and rendering
#[derive(Debug, Clone, PartialEq)]
pub enum PointEffect {
    PhaseChanged(CapturePhase),
    StoppageRecorded(Stoppage),
    PointArchived {
        index: usize,
        point: PointData,
        score_us: u32,
        score_them: u32,
    },
}

use crate::domain::PlayerStat;

const GOAL_WEIGHT: f64 = 1.0;
const ASSIST_WEIGHT: f64 = 1.0;
const BLOCK_WEIGHT: f64 = 1.5;
// Replaces the goal and block credit a callahan also carries
const CALLAHAN_WEIGHT: f64 = 3.5;
const TURNOVER_WEIGHT: f64 = 1.0;
const PASS_WEIGHT: f64 = 0.05;

/// Counters the efficiency score is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EfficiencyInputs {
    pub goals: u32,
    pub assists: u32,
    pub blocks: u32,
    pub callahans: u32,
    pub throwaways: u32,
    pub drops: u32,
    pub successful_passes: u32,
}

impl From<&PlayerStat> for EfficiencyInputs {
    fn from(stat: &PlayerStat) -> Self {
        Self {
            goals: stat.goal,
            assists: stat.assist,
            blocks: stat.block,
            callahans: stat.callahan,
            throwaways: stat.throwaway,
            drops: stat.drop,
            successful_passes: stat.successful_pass,
        }
    }
}

pub fn efficiency_score(inputs: &EfficiencyInputs) -> f64 {
    let goals = f64::from(inputs.goals);
    let blocks = f64::from(inputs.blocks);
    let callahans = f64::from(inputs.callahans);
    let turnovers = f64::from(inputs.throwaways) + f64::from(inputs.drops);

    (goals - callahans) * GOAL_WEIGHT
        + f64::from(inputs.assists) * ASSIST_WEIGHT
        + (blocks - callahans) * BLOCK_WEIGHT
        + callahans * CALLAHAN_WEIGHT
        - turnovers * TURNOVER_WEIGHT
        + f64::from(inputs.successful_passes) * PASS_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_line() {
        let inputs = EfficiencyInputs {
            goals: 2,
            assists: 1,
            blocks: 1,
            throwaways: 1,
            successful_passes: 10,
            ..Default::default()
        };
        assert!((efficiency_score(&inputs) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_callahan_has_flat_weight() {
        let mut stat = PlayerStat::on_line("x", "X");
        stat.block = 1;
        stat.goal = 1;
        stat.callahan = 1;

        assert_eq!(efficiency_score(&EfficiencyInputs::from(&stat)), 3.5);
    }

    #[test]
    fn test_turnovers_are_negative() {
        let inputs = EfficiencyInputs {
            throwaways: 2,
            drops: 1,
            ..Default::default()
        };
        assert_eq!(efficiency_score(&inputs), -3.0);
    }
}

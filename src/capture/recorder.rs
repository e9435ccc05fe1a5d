//! Stat deltas for single domain events.
//!
//! Each function either applies its whole delta or nothing: when a referenced
//! player is missing from the sheet it returns `false` and leaves the sheet as is.

use super::sheet::StatSheet;

fn all_present(sheet: &StatSheet, ids: &[&str]) -> bool {
    ids.iter().all(|id| sheet.contains(id))
}

fn credit_completion(sheet: &mut StatSheet, passer: &str, receiver: &str, assist: bool) {
    sheet.update(passer, |s| {
        if assist {
            s.assist += 1;
        } else {
            s.successful_pass += 1;
        }
        *s.pass_distribution.entry(receiver.to_string()).or_insert(0) += 1;
    });
}

pub fn credit_catch(sheet: &mut StatSheet, passer: &str, receiver: &str) -> bool {
    if !all_present(sheet, &[passer, receiver]) {
        return false;
    }
    credit_completion(sheet, passer, receiver, false);
    sheet.update(receiver, |s| s.catch_stat += 1)
}

pub fn credit_drop(sheet: &mut StatSheet, receiver: &str) -> bool {
    sheet.update(receiver, |s| s.drop += 1)
}

pub fn credit_throwaway(sheet: &mut StatSheet, thrower: &str) -> bool {
    sheet.update(thrower, |s| s.throwaway += 1)
}

/// Goal for `scorer`, assist for `passer` when there is one
pub fn credit_goal(sheet: &mut StatSheet, passer: Option<&str>, scorer: &str) -> bool {
    let passer = passer.filter(|p| *p != scorer && sheet.contains(p));
    if !sheet.contains(scorer) {
        return false;
    }
    if let Some(passer) = passer {
        credit_completion(sheet, passer, scorer, true);
    }
    sheet.update(scorer, |s| s.goal += 1)
}

pub fn credit_block(sheet: &mut StatSheet, defender: &str) -> bool {
    sheet.update(defender, |s| s.block += 1)
}

/// A callahan counts as block, goal and callahan for the same defender
pub fn credit_callahan(sheet: &mut StatSheet, defender: &str) -> bool {
    sheet.update(defender, |s| {
        s.block += 1;
        s.goal += 1;
        s.callahan += 1;
    })
}

/// Attributes the single pull attempt of the point to `puller`.
///
/// Every other player's pull counters are reset so a re-recorded pull never
/// yields two attempts in one point.
pub fn credit_pull(sheet: &mut StatSheet, puller: &str, success: bool, hang_time_seconds: f64) -> bool {
    if !sheet.contains(puller) {
        return false;
    }
    sheet.update_all(|s| {
        if s.player_id == puller {
            s.pull_attempts = 1;
            s.successful_pulls = u32::from(success);
            s.total_pull_time_seconds = hang_time_seconds;
        } else {
            s.pull_attempts = 0;
            s.successful_pulls = 0;
            s.total_pull_time_seconds = 0.0;
        }
    });
    true
}

pub fn credit_tempo(sheet: &mut StatSheet, passer: &str, seconds: u64) -> bool {
    sheet.update(passer, |s| s.total_tempo_seconds += seconds)
}

pub fn credit_playing_time(sheet: &mut StatSheet, player: &str, seconds: u64) -> bool {
    sheet.update(player, |s| s.seconds_played += seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerStat;

    fn sheet() -> StatSheet {
        StatSheet::from_stats(["a", "b", "c"].map(|id| PlayerStat::on_line(id, id.to_uppercase())))
    }

    #[test]
    fn test_catch_updates_passer_and_receiver() {
        let mut sheet = sheet();
        assert!(credit_catch(&mut sheet, "a", "b"));

        let passer = sheet.get("a").unwrap();
        assert_eq!(passer.successful_pass, 1);
        assert_eq!(passer.pass_distribution.get("b"), Some(&1));
        assert_eq!(sheet.get("b").unwrap().catch_stat, 1);
    }

    #[test]
    fn test_missing_player_leaves_sheet_untouched() {
        let mut sheet = sheet();
        let before = sheet.clone();

        assert!(!credit_catch(&mut sheet, "a", "ghost"));
        assert!(!credit_block(&mut sheet, "ghost"));
        assert!(!credit_pull(&mut sheet, "ghost", true, 3.0));
        assert_eq!(sheet, before);
    }

    #[test]
    fn test_goal_keeps_distribution_consistent() {
        let mut sheet = sheet();
        credit_catch(&mut sheet, "a", "b");
        credit_goal(&mut sheet, Some("a"), "c");

        let passer = sheet.get("a").unwrap();
        assert_eq!((passer.assist, passer.successful_pass), (1, 1));
        assert!(passer.is_distribution_consistent());
        assert_eq!(sheet.get("c").unwrap().goal, 1);
    }

    #[test]
    fn test_callahan_from_clean_record() {
        let mut sheet = sheet();
        credit_callahan(&mut sheet, "b");

        let stat = sheet.get("b").unwrap();
        assert_eq!((stat.block, stat.goal, stat.callahan), (1, 1, 1));
    }

    #[test]
    fn test_pull_is_attributed_once() {
        let mut sheet = sheet();
        credit_pull(&mut sheet, "a", true, 5.5);
        credit_pull(&mut sheet, "b", false, 4.0);

        let attempts: u32 = sheet.iter().map(|s| s.pull_attempts).sum();
        assert_eq!(attempts, 1);
        let puller = sheet.get("b").unwrap();
        assert_eq!((puller.successful_pulls, puller.total_pull_time_seconds), (0, 4.0));
    }
}

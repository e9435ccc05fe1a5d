use log::{debug, info, warn};

use super::history::{History, PointStateSnapshot};
use super::recorder;
use super::sheet::StatSheet;
use super::types::{CapturePhase, GameMode, PointCommand, PointEffect};
use crate::clock::{MatchClock, PlayingTimeLedger, PullTimer, TimeSource};
use crate::config::CaptureSettings;
use crate::domain::{
    CaptureMode, Match, PlayerId, PlayerStat, PointData, Roster, StartMode, StoppageType, WhoScored,
    new_match_id,
};
use crate::errors::CaptureError;

/// Point capture state machine.
///
/// Owns the in-progress point exclusively. Every command goes through
/// [`PointSession::apply`], which returns the effects the host should forward
/// (archived points to persistence, phase changes to the view). Actions that
/// make no sense in the current phase, or that name a player who is not on
/// the field, are ignored without touching any state.
#[derive(Debug)]
pub struct PointSession {
    roster: Roster,
    settings: CaptureSettings,
    point_settings: CaptureSettings,
    phase: CapturePhase,
    capture_mode: CaptureMode,
    start_mode: Option<StartMode>,
    stats: StatSheet,
    subbed_out: StatSheet,
    active_passer: Option<PlayerId>,
    history: History,
    clock: MatchClock,
    ledger: PlayingTimeLedger,
    pull_timer: PullTimer,
    pull_duration_seconds: f64,
    time_source: Box<dyn TimeSource>,
    current_match: Match,
}

impl PointSession {
    pub fn new(
        roster: Roster,
        settings: CaptureSettings,
        opponent_name: &str,
        time_source: Box<dyn TimeSource>,
    ) -> Self {
        Self {
            roster,
            point_settings: settings.clone(),
            capture_mode: counter_mode(settings.capture_mode),
            settings,
            phase: CapturePhase::RosterSelection,
            start_mode: None,
            stats: StatSheet::new(),
            subbed_out: StatSheet::new(),
            active_passer: None,
            history: History::new(),
            clock: MatchClock::new(),
            ledger: PlayingTimeLedger::default(),
            pull_timer: PullTimer::default(),
            pull_duration_seconds: 0.0,
            time_source,
            current_match: Match::new(new_match_id(), opponent_name),
        }
    }

    pub fn apply(&mut self, command: PointCommand) -> Result<Vec<PointEffect>, CaptureError> {
        let phase_before = self.phase.clone();

        let mut effects = match command {
            PointCommand::ConfirmLine { player_ids } => self.confirm_line(&player_ids)?,
            PointCommand::ChooseCaptureMode { mode } => self.choose_capture_mode(mode)?,
            PointCommand::StartOffense => self.start_point(StartMode::Offense)?,
            PointCommand::StartDefense => self.start_point(StartMode::Defense)?,
            PointCommand::SelectPasser { player_id } => self.select_passer(player_id),
            PointCommand::Catch { receiver_id } => self.catch(receiver_id),
            PointCommand::Drop { receiver_id } => self.drop_pass(receiver_id),
            PointCommand::Throwaway => self.throwaway(),
            PointCommand::Goal { receiver_id } => self.goal(receiver_id),
            PointCommand::SelectPuller { player_id } => self.select_puller(player_id),
            PointCommand::PullResult { success } => self.pull_result(success),
            PointCommand::SkipPull => self.skip_pull(),
            PointCommand::Block { player_id } => self.block(player_id),
            PointCommand::Callahan { player_id } => self.callahan(player_id),
            PointCommand::OpponentTurnover => self.opponent_turnover(),
            PointCommand::OpponentGoal => self.opponent_goal(),
            PointCommand::SimpleGoal { scorer_id, assist_id } => self.simple_goal(scorer_id, assist_id),
            PointCommand::Substitute { out_id, in_id } => self.substitute(&out_id, &in_id),
            PointCommand::StartStoppage { stoppage_type } => self.start_stoppage(stoppage_type),
            PointCommand::EndStoppage => self.end_stoppage(),
            PointCommand::SetClockRunning { running } => {
                self.clock.set_running(running);
                Vec::new()
            }
            PointCommand::Tick { seconds } => {
                self.clock.advance(seconds);
                Vec::new()
            }
            PointCommand::Undo => self.undo(),
        };

        if self.phase != phase_before {
            effects.push(PointEffect::PhaseChanged(self.phase.clone()));
        }
        Ok(effects)
    }

    // --- Line selection and start ---

    fn confirm_line(&mut self, player_ids: &[PlayerId]) -> Result<Vec<PointEffect>, CaptureError> {
        self.require_phase(&CapturePhase::RosterSelection, "line confirmation")?;
        let line = self.roster.select_line(player_ids)?;

        self.point_settings = self.settings.clone();
        self.capture_mode = counter_mode(self.point_settings.capture_mode);
        self.start_mode = None;
        self.stats = StatSheet::from_stats(line.iter().map(|p| PlayerStat::on_line(&p.id, &p.name)));
        self.subbed_out = StatSheet::new();
        self.active_passer = None;
        self.pull_timer = PullTimer::default();
        self.pull_duration_seconds = 0.0;
        self.clock.start_point();

        self.ledger.clear();
        if self.point_settings.time_tracking {
            self.ledger.seed(line.iter().map(|p| &p.id), self.clock.match_seconds());
        }

        self.history.clear();
        self.phase = CapturePhase::StartModeChoice;
        info!("Line confirmed: {}", player_ids.join(", "));
        Ok(Vec::new())
    }

    fn choose_capture_mode(&mut self, mode: CaptureMode) -> Result<Vec<PointEffect>, CaptureError> {
        self.require_phase(&CapturePhase::StartModeChoice, "capture mode choice")?;
        self.capture_mode = counter_mode(mode);
        Ok(Vec::new())
    }

    fn start_point(&mut self, start_mode: StartMode) -> Result<Vec<PointEffect>, CaptureError> {
        self.require_phase(&CapturePhase::StartModeChoice, "start mode choice")?;
        self.start_mode = Some(start_mode);
        self.phase = match (self.capture_mode, start_mode) {
            (CaptureMode::Simple, _) => CapturePhase::SimpleEntry,
            (_, StartMode::Offense) => CapturePhase::Detailed(GameMode::Offense),
            (_, StartMode::Defense) => CapturePhase::Detailed(GameMode::PullSelect),
        };
        Ok(Vec::new())
    }

    // --- Offense ---

    fn select_passer(&mut self, player_id: PlayerId) -> Vec<PointEffect> {
        if !self.in_mode(&GameMode::Offense) || !self.stats.contains(&player_id) {
            return self.ignored("passer selection");
        }
        if self.active_passer.as_deref() == Some(player_id.as_str()) {
            return Vec::new();
        }

        self.checkpoint();
        self.record_tempo_for_passer();
        self.active_passer = Some(player_id);
        self.start_possession();
        Vec::new()
    }

    fn catch(&mut self, receiver_id: PlayerId) -> Vec<PointEffect> {
        let Some(passer) = self.offense_passer_for(&receiver_id) else {
            return self.ignored("catch");
        };

        self.checkpoint();
        self.record_tempo_for_passer();
        recorder::credit_catch(&mut self.stats, &passer, &receiver_id);
        self.active_passer = Some(receiver_id);
        self.start_possession();
        Vec::new()
    }

    fn drop_pass(&mut self, receiver_id: PlayerId) -> Vec<PointEffect> {
        if self.offense_passer_for(&receiver_id).is_none() {
            return self.ignored("drop");
        }

        self.checkpoint();
        self.record_tempo_for_passer();
        recorder::credit_drop(&mut self.stats, &receiver_id);
        self.turn_over();
        Vec::new()
    }

    fn throwaway(&mut self) -> Vec<PointEffect> {
        let Some(thrower) = self.active_passer.clone().filter(|_| self.in_mode(&GameMode::Offense)) else {
            return self.ignored("throwaway");
        };

        self.checkpoint();
        self.record_tempo_for_passer();
        recorder::credit_throwaway(&mut self.stats, &thrower);
        self.turn_over();
        Vec::new()
    }

    fn goal(&mut self, receiver_id: PlayerId) -> Vec<PointEffect> {
        let Some(passer) = self.offense_passer_for(&receiver_id) else {
            return self.ignored("goal");
        };

        self.checkpoint();
        self.record_tempo_for_passer();
        recorder::credit_goal(&mut self.stats, Some(&passer), &receiver_id);
        self.active_passer = None;
        self.finish_point(WhoScored::Us)
    }

    // --- Defense ---

    fn select_puller(&mut self, player_id: PlayerId) -> Vec<PointEffect> {
        if !self.in_mode(&GameMode::PullSelect) || !self.stats.contains(&player_id) {
            return self.ignored("puller selection");
        }

        self.checkpoint();
        self.pull_timer.start(self.time_source.as_ref());
        self.phase = CapturePhase::Detailed(GameMode::PullInFlight { puller: player_id });
        Vec::new()
    }

    fn pull_result(&mut self, success: bool) -> Vec<PointEffect> {
        let CapturePhase::Detailed(GameMode::PullInFlight { puller }) = self.phase.clone() else {
            return self.ignored("pull result");
        };

        self.checkpoint();
        let hang_time = self.pull_timer.finish(self.time_source.as_ref()).unwrap_or(0.0);
        recorder::credit_pull(&mut self.stats, &puller, success, hang_time);
        self.pull_duration_seconds = hang_time;
        self.phase = CapturePhase::Detailed(GameMode::Defense);
        Vec::new()
    }

    fn skip_pull(&mut self) -> Vec<PointEffect> {
        if !self.in_mode(&GameMode::PullSelect) {
            return self.ignored("pull skip");
        }

        self.checkpoint();
        self.phase = CapturePhase::Detailed(GameMode::Defense);
        Vec::new()
    }

    fn block(&mut self, player_id: PlayerId) -> Vec<PointEffect> {
        if !self.in_mode(&GameMode::Defense) || !self.stats.contains(&player_id) {
            return self.ignored("block");
        }

        self.checkpoint();
        recorder::credit_block(&mut self.stats, &player_id);
        self.gain_possession();
        Vec::new()
    }

    fn callahan(&mut self, player_id: PlayerId) -> Vec<PointEffect> {
        if !self.in_mode(&GameMode::Defense) || !self.stats.contains(&player_id) {
            return self.ignored("callahan");
        }

        self.checkpoint();
        recorder::credit_callahan(&mut self.stats, &player_id);
        self.finish_point(WhoScored::Us)
    }

    fn opponent_turnover(&mut self) -> Vec<PointEffect> {
        if !self.in_mode(&GameMode::Defense) {
            return self.ignored("opponent turnover");
        }

        self.checkpoint();
        self.gain_possession();
        Vec::new()
    }

    fn opponent_goal(&mut self) -> Vec<PointEffect> {
        let defending = match &self.phase {
            CapturePhase::Detailed(mode) => mode.is_defensive(),
            CapturePhase::SimpleEntry => true,
            _ => false,
        };
        if !defending {
            return self.ignored("opponent goal");
        }

        self.checkpoint();
        self.finish_point(WhoScored::Them)
    }

    // --- Simple entry ---

    fn simple_goal(&mut self, scorer_id: PlayerId, assist_id: Option<PlayerId>) -> Vec<PointEffect> {
        if self.phase != CapturePhase::SimpleEntry || !self.stats.contains(&scorer_id) {
            return self.ignored("simple goal");
        }

        let assist_id = assist_id.filter(|id| {
            let valid = *id != scorer_id && self.stats.contains(id);
            if !valid {
                debug!("Dropping unknown assist {id}");
            }
            valid
        });

        self.checkpoint();
        recorder::credit_goal(&mut self.stats, assist_id.as_deref(), &scorer_id);
        self.finish_point(WhoScored::Us)
    }

    // --- Substitution ---

    fn substitute(&mut self, out_id: &str, in_id: &str) -> Vec<PointEffect> {
        let valid = self.phase.is_point_in_progress()
            && self.stats.contains(out_id)
            && !self.stats.contains(in_id)
            && self.roster.contains(in_id);
        if !valid {
            return self.ignored("substitution");
        }

        self.checkpoint();
        let now = self.clock.match_seconds();

        if self.point_settings.time_tracking
            && let Some(seconds) = self.ledger.leave(out_id, now)
        {
            recorder::credit_playing_time(&mut self.stats, out_id, seconds);
        }

        let passer_leaving = self.active_passer.as_deref() == Some(out_id);
        if passer_leaving {
            self.record_tempo_for_passer();
        }

        let incoming = self
            .subbed_out
            .remove(in_id)
            .unwrap_or_else(|| PlayerStat::on_line(in_id, self.roster.name_of(in_id)));
        if let Some(outgoing) = self.stats.swap(out_id, incoming) {
            self.subbed_out.push(outgoing);
        }

        if self.point_settings.time_tracking {
            self.ledger.enter(in_id, now);
        }
        if passer_leaving {
            self.active_passer = Some(in_id.to_string());
            self.start_possession();
        }
        if let CapturePhase::Detailed(GameMode::PullInFlight { puller }) = &mut self.phase
            && *puller == out_id
        {
            *puller = in_id.to_string();
        }

        info!("Substitution: {out_id} off, {in_id} on");
        Vec::new()
    }

    // --- Stoppages ---

    fn start_stoppage(&mut self, stoppage_type: StoppageType) -> Vec<PointEffect> {
        if self.clock.in_stoppage() {
            return self.ignored("stoppage start");
        }
        if self.phase.is_point_in_progress() {
            self.checkpoint();
        }
        self.clock.start_stoppage(stoppage_type);
        Vec::new()
    }

    fn end_stoppage(&mut self) -> Vec<PointEffect> {
        match self.clock.end_stoppage() {
            Some(stoppage) => vec![PointEffect::StoppageRecorded(stoppage)],
            None => self.ignored("stoppage end"),
        }
    }

    // --- Undo ---

    fn undo(&mut self) -> Vec<PointEffect> {
        match self.history.pop() {
            Some(snapshot) => self.restore(snapshot),
            None => {
                debug!("Undo with empty history, resetting to line selection");
                self.reset_point();
            }
        }
        Vec::new()
    }

    fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    fn restore(&mut self, snapshot: PointStateSnapshot) {
        self.stats = snapshot.stats;
        self.active_passer = snapshot.active_passer;
        self.phase = snapshot.phase;
        self.subbed_out = snapshot.subbed_out;
        self.ledger = snapshot.ledger;
        self.pull_timer = snapshot.pull_timer;
        self.pull_duration_seconds = snapshot.pull_duration_seconds;
    }

    fn reset_point(&mut self) {
        self.phase = CapturePhase::RosterSelection;
        self.capture_mode = counter_mode(self.settings.capture_mode);
        self.start_mode = None;
        self.stats = StatSheet::new();
        self.subbed_out = StatSheet::new();
        self.active_passer = None;
        self.ledger.clear();
        self.pull_timer = PullTimer::default();
        self.pull_duration_seconds = 0.0;
        self.history.clear();
    }

    // --- Point end ---

    fn finish_point(&mut self, who_scored: WhoScored) -> Vec<PointEffect> {
        let mut effects = Vec::new();
        if let Some(stoppage) = self.clock.end_stoppage() {
            effects.push(PointEffect::StoppageRecorded(stoppage));
        }

        let now = self.clock.match_seconds();
        if self.point_settings.time_tracking {
            for (player_id, seconds) in self.ledger.settle(now) {
                recorder::credit_playing_time(&mut self.stats, &player_id, seconds);
            }
        }

        let mut stats = self.stats.to_vec();
        stats.extend(self.subbed_out.to_vec());

        let point = PointData {
            stats,
            who_scored,
            start_mode: self.start_mode,
            capture_mode: self.capture_mode,
            duration_seconds: self.clock.point_seconds(),
            pull_duration_seconds: self.pull_duration_seconds,
            stoppages: self.clock.take_stoppages(),
            pro_events: None,
        };

        match point.validated() {
            Ok(point) => {
                let index = self.current_match.append_point(point.clone());
                self.current_match.duration_seconds = now;
                info!(
                    "Point {} archived ({:?}), score {}-{}",
                    index + 1,
                    who_scored,
                    self.current_match.score_us,
                    self.current_match.score_them
                );
                effects.push(PointEffect::PointArchived {
                    index,
                    point,
                    score_us: self.current_match.score_us,
                    score_them: self.current_match.score_them,
                });
            }
            Err(e) => warn!("Point discarded: {e}"),
        }

        self.reset_point();
        effects
    }

    // --- Tempo and possession ---

    /// Credits possession time to the active passer and clears the marker
    fn record_tempo_for_passer(&mut self) {
        if !self.point_settings.time_tracking {
            return;
        }
        let Some(passer) = self.active_passer.clone() else {
            return;
        };
        if let Some(seconds) = self.ledger.take_possession(self.clock.match_seconds()) {
            recorder::credit_tempo(&mut self.stats, &passer, seconds);
        }
    }

    fn start_possession(&mut self) {
        if self.point_settings.time_tracking {
            self.ledger.start_possession(self.clock.match_seconds());
        }
    }

    fn turn_over(&mut self) {
        self.active_passer = None;
        self.phase = CapturePhase::Detailed(GameMode::Defense);
    }

    fn gain_possession(&mut self) {
        self.active_passer = None;
        self.phase = CapturePhase::Detailed(GameMode::Offense);
    }

    // --- Guards ---

    fn require_phase(&self, expected: &CapturePhase, operation: &'static str) -> Result<(), CaptureError> {
        if &self.phase == expected {
            Ok(())
        } else {
            Err(CaptureError::WrongPhase {
                operation,
                phase: self.phase.to_string(),
            })
        }
    }

    fn in_mode(&self, mode: &GameMode) -> bool {
        matches!(&self.phase, CapturePhase::Detailed(current) if current == mode)
    }

    /// Active passer when a pass to `receiver_id` can be recorded
    fn offense_passer_for(&self, receiver_id: &str) -> Option<PlayerId> {
        if !self.in_mode(&GameMode::Offense) || !self.stats.contains(receiver_id) {
            return None;
        }
        self.active_passer.clone().filter(|passer| passer != receiver_id)
    }

    fn ignored(&self, action: &str) -> Vec<PointEffect> {
        debug!("Ignoring {action} while {}", self.phase);
        Vec::new()
    }

    // --- Match management and accessors ---

    /// Settings take effect at the next line confirmation
    pub fn replace_settings(&mut self, settings: CaptureSettings) {
        self.settings = settings;
    }

    pub fn replace_roster(&mut self, roster: Roster) {
        self.roster = roster;
    }

    /// Starts a fresh match, discarding any in-progress point
    pub fn new_match(&mut self, opponent_name: &str) -> Match {
        self.reset_point();
        self.clock.reset_match();
        std::mem::replace(&mut self.current_match, Match::new(new_match_id(), opponent_name))
    }

    /// Replaces one archived point of the current match
    pub fn edit_point(&mut self, index: usize, point: PointData) -> Result<bool, CaptureError> {
        let point = point.validated()?;
        Ok(self.current_match.replace_point(index, point))
    }

    pub fn snapshot(&self) -> PointStateSnapshot {
        PointStateSnapshot {
            stats: self.stats.clone(),
            active_passer: self.active_passer.clone(),
            phase: self.phase.clone(),
            subbed_out: self.subbed_out.clone(),
            ledger: self.ledger.clone(),
            pull_timer: self.pull_timer,
            pull_duration_seconds: self.pull_duration_seconds,
        }
    }

    pub fn phase(&self) -> &CapturePhase {
        &self.phase
    }

    pub fn capture_mode(&self) -> CaptureMode {
        self.capture_mode
    }

    pub fn start_mode(&self) -> Option<StartMode> {
        self.start_mode
    }

    pub fn stats(&self) -> &StatSheet {
        &self.stats
    }

    pub fn subbed_out(&self) -> &StatSheet {
        &self.subbed_out
    }

    pub fn active_passer(&self) -> Option<&str> {
        self.active_passer.as_deref()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn current_match(&self) -> &Match {
        &self.current_match
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}

/// The counter machine has no coordinates, so PRO points are recorded as ADVANCED
fn counter_mode(mode: CaptureMode) -> CaptureMode {
    match mode {
        CaptureMode::Pro => {
            debug!("Coordinate capture runs in the spatial session, recording this point as ADVANCED");
            CaptureMode::Advanced
        }
        other => other,
    }
}

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::events::{ProEvent, ProEventType, stats_from_events};
use super::field::{AttackDirection, FieldPoint};
use crate::capture::StatSheet;
use crate::clock::MatchClock;
use crate::config::CaptureSettings;
use crate::domain::{
    CaptureMode, Match, PlayerId, PlayerStat, PointData, Roster, StartMode, WhoScored, new_match_id,
};
use crate::errors::CaptureError;

#[derive(Debug, Clone, PartialEq)]
pub enum SpatialPhase {
    LineSelection,
    StartModeSelection,
    DirectionSelection,
    PullSetup,
    PullLanding { puller: PlayerId, origin: FieldPoint },
    DefensePhase,
    SetDiscStart,
    ActionPhase,
}

/// Throw outcome picked in the action selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThrowAction {
    Pass,
    Goal,
    Drop,
    Throwaway,
}

impl ThrowAction {
    fn event_type(self) -> ProEventType {
        match self {
            ThrowAction::Pass => ProEventType::Pass,
            ThrowAction::Goal => ProEventType::Goal,
            ThrowAction::Drop => ProEventType::Drop,
            ThrowAction::Throwaway => ProEventType::Throwaway,
        }
    }

    fn needs_receiver(self) -> bool {
        !matches!(self, ThrowAction::Throwaway)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpatialCommand {
    ConfirmLine { player_ids: Vec<PlayerId> },
    StartOffense,
    StartDefense,
    ChooseDirection { direction: AttackDirection },
    Tap { x: f64, y: f64 },
    SelectPlayer { player_id: PlayerId },
    ChooseAction {
        action: ThrowAction,
        #[serde(default)]
        receiver_id: Option<PlayerId>,
    },
    RegainPossession {
        #[serde(default)]
        blocker_id: Option<PlayerId>,
    },
    OpponentGoal,
    SetClockRunning { running: bool },
    Tick {
        #[serde(default = "one_second")]
        seconds: u64,
    },
    Undo,
}

fn one_second() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpatialEffect {
    PhaseChanged(SpatialPhase),
    EventRecorded(ProEvent),
    PointArchived {
        index: usize,
        point: PointData,
        score_us: u32,
        score_them: u32,
    },
}

/// Pro-mode capture: every event carries field coordinates.
///
/// Taps leave a pending location that becomes an event once a player (and in
/// the action phase a throw outcome) is chosen. Counters are derived from the
/// event list when the point is archived.
#[derive(Debug)]
pub struct SpatialSession {
    roster: Roster,
    settings: CaptureSettings,
    time_tracking: bool,
    phase: SpatialPhase,
    start_mode: Option<StartMode>,
    direction: Option<AttackDirection>,
    line: StatSheet,
    events: Vec<ProEvent>,
    // Blocks with the event count at the time they were recorded
    blocks: Vec<(usize, PlayerId)>,
    holder: Option<PlayerId>,
    disc: Option<FieldPoint>,
    pending: Option<FieldPoint>,
    clock: MatchClock,
    current_match: Match,
}

impl SpatialSession {
    pub fn new(roster: Roster, settings: CaptureSettings, opponent_name: &str) -> Self {
        Self {
            roster,
            time_tracking: settings.time_tracking,
            settings,
            phase: SpatialPhase::LineSelection,
            start_mode: None,
            direction: None,
            line: StatSheet::new(),
            events: Vec::new(),
            blocks: Vec::new(),
            holder: None,
            disc: None,
            pending: None,
            clock: MatchClock::new(),
            current_match: Match::new(new_match_id(), opponent_name),
        }
    }

    pub fn apply(&mut self, command: SpatialCommand) -> Result<Vec<SpatialEffect>, CaptureError> {
        let phase_before = self.phase.clone();
        let event_count = self.events.len();

        let mut effects = match command {
            SpatialCommand::ConfirmLine { player_ids } => {
                self.confirm_line(&player_ids)?;
                Vec::new()
            }
            SpatialCommand::StartOffense => self.start(StartMode::Offense)?,
            SpatialCommand::StartDefense => self.start(StartMode::Defense)?,
            SpatialCommand::ChooseDirection { direction } => self.choose_direction(direction),
            SpatialCommand::Tap { x, y } => self.tap(FieldPoint::new(x, y)),
            SpatialCommand::SelectPlayer { player_id } => self.select_player(player_id),
            SpatialCommand::ChooseAction { action, receiver_id } => self.choose_action(action, receiver_id),
            SpatialCommand::RegainPossession { blocker_id } => self.regain_possession(blocker_id),
            SpatialCommand::OpponentGoal => self.opponent_goal(),
            SpatialCommand::SetClockRunning { running } => {
                self.clock.set_running(running);
                Vec::new()
            }
            SpatialCommand::Tick { seconds } => {
                self.clock.advance(seconds);
                Vec::new()
            }
            SpatialCommand::Undo => {
                self.undo();
                Vec::new()
            }
        };

        if self.events.len() > event_count
            && let Some(event) = self.events.last()
        {
            effects.insert(0, SpatialEffect::EventRecorded(event.clone()));
        }
        if self.phase != phase_before {
            effects.push(SpatialEffect::PhaseChanged(self.phase.clone()));
        }
        Ok(effects)
    }

    fn confirm_line(&mut self, player_ids: &[PlayerId]) -> Result<(), CaptureError> {
        self.require_phase(SpatialPhase::LineSelection, "line confirmation")?;
        let line = self.roster.select_line(player_ids)?;

        self.time_tracking = self.settings.time_tracking;
        self.line = StatSheet::from_stats(line.iter().map(|p| PlayerStat::on_line(&p.id, &p.name)));
        self.clock.start_point();
        self.phase = SpatialPhase::StartModeSelection;
        Ok(())
    }

    fn start(&mut self, start_mode: StartMode) -> Result<Vec<SpatialEffect>, CaptureError> {
        self.require_phase(SpatialPhase::StartModeSelection, "start mode choice")?;
        self.start_mode = Some(start_mode);
        self.phase = SpatialPhase::DirectionSelection;
        Ok(Vec::new())
    }

    fn choose_direction(&mut self, direction: AttackDirection) -> Vec<SpatialEffect> {
        if self.phase != SpatialPhase::DirectionSelection {
            return self.ignored("direction choice");
        }
        self.direction = Some(direction);
        self.phase = match self.start_mode {
            Some(StartMode::Defense) => SpatialPhase::PullSetup,
            _ => SpatialPhase::SetDiscStart,
        };
        Vec::new()
    }

    fn tap(&mut self, point: FieldPoint) -> Vec<SpatialEffect> {
        match self.phase.clone() {
            SpatialPhase::PullSetup | SpatialPhase::SetDiscStart => {
                self.pending = Some(point);
            }
            SpatialPhase::ActionPhase => {
                if self.holder.is_none() {
                    return self.ignored("tap");
                }
                self.pending = Some(point);
            }
            SpatialPhase::PullLanding { puller, origin } => {
                self.events.push(ProEvent::pull(&puller, origin, point));
                self.phase = SpatialPhase::DefensePhase;
            }
            _ => return self.ignored("tap"),
        }
        Vec::new()
    }

    fn select_player(&mut self, player_id: PlayerId) -> Vec<SpatialEffect> {
        if !self.line.contains(&player_id) {
            return self.ignored("player selection");
        }
        let Some(spot) = self.pending else {
            return self.ignored("player selection");
        };

        match self.phase {
            SpatialPhase::PullSetup => {
                self.pending = None;
                self.phase = SpatialPhase::PullLanding {
                    puller: player_id,
                    origin: spot,
                };
            }
            SpatialPhase::SetDiscStart => {
                self.pending = None;
                self.events.push(ProEvent::pickup(&player_id, spot));
                self.holder = Some(player_id);
                self.disc = Some(spot);
                self.phase = SpatialPhase::ActionPhase;
            }
            _ => return self.ignored("player selection"),
        }
        Vec::new()
    }

    fn choose_action(&mut self, action: ThrowAction, receiver_id: Option<PlayerId>) -> Vec<SpatialEffect> {
        if self.phase != SpatialPhase::ActionPhase {
            return self.ignored("throw");
        }
        let (Some(thrower), Some(origin), Some(target)) = (self.holder.clone(), self.disc, self.pending) else {
            return self.ignored("throw");
        };
        let receiver = receiver_id.filter(|id| action.needs_receiver() && *id != thrower && self.line.contains(id));
        if action.needs_receiver() && receiver.is_none() {
            return self.ignored("throw");
        }

        self.pending = None;
        let event = ProEvent::throw(action.event_type(), &thrower, receiver.as_deref(), origin, target);
        if action == ThrowAction::Goal
            && let Some(direction) = self.direction
            && !direction.is_in_scoring_zone(&target)
        {
            warn!("Goal recorded outside the attacked end zone");
        }
        self.events.push(event);

        match action {
            ThrowAction::Pass => {
                self.holder = receiver;
                self.disc = Some(target);
                Vec::new()
            }
            ThrowAction::Goal => self.finish_point(WhoScored::Us),
            ThrowAction::Drop | ThrowAction::Throwaway => {
                self.holder = None;
                self.disc = None;
                self.phase = SpatialPhase::DefensePhase;
                Vec::new()
            }
        }
    }

    fn regain_possession(&mut self, blocker_id: Option<PlayerId>) -> Vec<SpatialEffect> {
        if self.phase != SpatialPhase::DefensePhase {
            return self.ignored("possession change");
        }
        if let Some(blocker) = blocker_id {
            if !self.line.contains(&blocker) {
                return self.ignored("block");
            }
            self.blocks.push((self.events.len(), blocker));
        }
        self.pending = None;
        self.phase = SpatialPhase::SetDiscStart;
        Vec::new()
    }

    fn opponent_goal(&mut self) -> Vec<SpatialEffect> {
        if self.phase != SpatialPhase::DefensePhase {
            return self.ignored("opponent goal");
        }
        self.finish_point(WhoScored::Them)
    }

    /// Steps back one recorded block or event and re-derives the phase
    fn undo(&mut self) {
        self.pending = None;

        let block_is_last = matches!(self.blocks.last(), Some((at, _)) if *at == self.events.len());
        if self.phase == SpatialPhase::SetDiscStart && block_is_last {
            self.blocks.pop();
            self.phase = SpatialPhase::DefensePhase;
            return;
        }

        let Some(event) = self.events.pop() else {
            debug!("Nothing to undo");
            return;
        };
        self.blocks.retain(|(at, _)| *at <= self.events.len());

        match event.event_type {
            ProEventType::Pass | ProEventType::Pickup => {
                self.holder = None;
                self.disc = None;
                self.phase = SpatialPhase::SetDiscStart;
            }
            ProEventType::Drop | ProEventType::Throwaway => {
                self.holder = event.thrower_id;
                self.disc = event.origin;
                self.phase = SpatialPhase::ActionPhase;
            }
            ProEventType::Pull => {
                self.phase = SpatialPhase::PullSetup;
            }
            ProEventType::Goal => {
                warn!("A goal event was still pending in an open point");
            }
        }
    }

    fn finish_point(&mut self, who_scored: WhoScored) -> Vec<SpatialEffect> {
        let blockers: Vec<PlayerId> = self.blocks.iter().map(|(_, id)| id.clone()).collect();
        let mut stats = stats_from_events(&self.line, &self.events, &blockers);

        let duration = self.clock.point_seconds();
        if self.time_tracking {
            stats.update_all(|s| s.seconds_played += duration);
        }

        let point = PointData {
            stats: stats.to_vec(),
            who_scored,
            start_mode: self.start_mode,
            capture_mode: CaptureMode::Pro,
            duration_seconds: duration,
            pull_duration_seconds: 0.0,
            stoppages: self.clock.take_stoppages(),
            pro_events: Some(std::mem::take(&mut self.events)),
        };

        let mut effects = Vec::new();
        match point.validated() {
            Ok(point) => {
                let index = self.current_match.append_point(point.clone());
                self.current_match.duration_seconds = self.clock.match_seconds();
                info!(
                    "Pro point {} archived, score {}-{}",
                    index + 1,
                    self.current_match.score_us,
                    self.current_match.score_them
                );
                effects.push(SpatialEffect::PointArchived {
                    index,
                    point,
                    score_us: self.current_match.score_us,
                    score_them: self.current_match.score_them,
                });
            }
            Err(e) => warn!("Pro point discarded: {e}"),
        }

        self.reset_point();
        effects
    }

    fn reset_point(&mut self) {
        self.phase = SpatialPhase::LineSelection;
        self.start_mode = None;
        self.direction = None;
        self.line = StatSheet::new();
        self.events.clear();
        self.blocks.clear();
        self.holder = None;
        self.disc = None;
        self.pending = None;
    }

    fn require_phase(&self, expected: SpatialPhase, operation: &'static str) -> Result<(), CaptureError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CaptureError::WrongPhase {
                operation,
                phase: format!("{:?}", self.phase),
            })
        }
    }

    fn ignored(&self, action: &str) -> Vec<SpatialEffect> {
        debug!("Ignoring {action} in {:?}", self.phase);
        Vec::new()
    }

    pub fn replace_settings(&mut self, settings: CaptureSettings) {
        self.settings = settings;
    }

    pub fn phase(&self) -> &SpatialPhase {
        &self.phase
    }

    pub fn events(&self) -> &[ProEvent] {
        &self.events
    }

    pub fn holder(&self) -> Option<&str> {
        self.holder.as_deref()
    }

    pub fn disc_position(&self) -> Option<FieldPoint> {
        self.disc
    }

    pub fn pending_location(&self) -> Option<FieldPoint> {
        self.pending
    }

    pub fn direction(&self) -> Option<AttackDirection> {
        self.direction
    }

    /// Counters of the open point as they would be archived now
    pub fn live_stats(&self) -> StatSheet {
        let blockers: Vec<PlayerId> = self.blocks.iter().map(|(_, id)| id.clone()).collect();
        stats_from_events(&self.line, &self.events, &blockers)
    }

    pub fn current_match(&self) -> &Match {
        &self.current_match
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Player;

    fn session() -> SpatialSession {
        let roster = Roster::new(
            ["a", "b", "c", "d", "e", "f", "g", "h"]
                .iter()
                .map(|id| Player::new(*id, id.to_uppercase()))
                .collect(),
        );
        SpatialSession::new(roster, CaptureSettings::default(), "Rivals")
    }

    fn line() -> Vec<PlayerId> {
        ["a", "b", "c", "d", "e", "f", "g"].iter().map(|s| s.to_string()).collect()
    }

    fn run(session: &mut SpatialSession, commands: Vec<SpatialCommand>) -> Vec<SpatialEffect> {
        commands
            .into_iter()
            .flat_map(|c| session.apply(c).unwrap())
            .collect()
    }

    fn tap(x: f64, y: f64) -> SpatialCommand {
        SpatialCommand::Tap { x, y }
    }

    fn pick(id: &str) -> SpatialCommand {
        SpatialCommand::SelectPlayer { player_id: id.to_string() }
    }

    fn throw(action: ThrowAction, receiver: Option<&str>) -> SpatialCommand {
        SpatialCommand::ChooseAction {
            action,
            receiver_id: receiver.map(str::to_string),
        }
    }

    #[test]
    fn test_tick_defaults_to_one_second() {
        let command: SpatialCommand = serde_json::from_str(r#"{"type": "tick"}"#).unwrap();
        assert_eq!(command, SpatialCommand::Tick { seconds: 1 });
    }

    fn start_offense(session: &mut SpatialSession) {
        run(
            session,
            vec![
                SpatialCommand::ConfirmLine { player_ids: line() },
                SpatialCommand::StartOffense,
                SpatialCommand::ChooseDirection {
                    direction: AttackDirection::Up,
                },
            ],
        );
    }

    #[test]
    fn test_offense_point_ends_with_goal() {
        let mut session = session();
        start_offense(&mut session);
        assert_eq!(session.phase(), &SpatialPhase::SetDiscStart);

        run(&mut session, vec![tap(0.5, 0.25), pick("a")]);
        assert_eq!(session.holder(), Some("a"));
        assert_eq!(session.phase(), &SpatialPhase::ActionPhase);

        run(&mut session, vec![tap(0.3, 0.5), throw(ThrowAction::Pass, Some("b"))]);
        assert_eq!(session.holder(), Some("b"));

        let effects = run(&mut session, vec![tap(0.4, 0.9), throw(ThrowAction::Goal, Some("c"))]);
        let point = effects
            .iter()
            .find_map(|e| match e {
                SpatialEffect::PointArchived { point, .. } => Some(point.clone()),
                _ => None,
            })
            .expect("archived");

        assert_eq!(point.capture_mode, CaptureMode::Pro);
        assert_eq!(point.who_scored, WhoScored::Us);
        assert_eq!(point.pro_events.as_ref().map(Vec::len), Some(3));
        assert_eq!(point.stat_for("a").unwrap().successful_pass, 1);
        assert_eq!(point.stat_for("b").unwrap().assist, 1);
        assert_eq!(point.stat_for("c").unwrap().goal, 1);
        assert_eq!(session.current_match().score_us, 1);
        assert_eq!(session.phase(), &SpatialPhase::LineSelection);
    }

    #[test]
    fn test_tap_alone_records_nothing() {
        let mut session = session();
        start_offense(&mut session);
        run(&mut session, vec![tap(0.5, 0.25), pick("a"), tap(0.3, 0.5)]);

        assert_eq!(session.events().len(), 1);
        assert!(session.pending_location().is_some());

        run(&mut session, vec![throw(ThrowAction::Pass, Some("a"))]);
        assert_eq!(session.events().len(), 1);
    }

    #[test]
    fn test_undo_rederives_phase_from_popped_event() {
        let mut session = session();
        start_offense(&mut session);
        run(
            &mut session,
            vec![
                tap(0.5, 0.25),
                pick("a"),
                tap(0.3, 0.5),
                throw(ThrowAction::Throwaway, None),
            ],
        );
        assert_eq!(session.phase(), &SpatialPhase::DefensePhase);

        run(&mut session, vec![SpatialCommand::Undo]);
        assert_eq!(session.phase(), &SpatialPhase::ActionPhase);
        assert_eq!(session.holder(), Some("a"));
        assert_eq!(session.disc_position(), Some(FieldPoint::new(0.5, 0.25)));

        run(&mut session, vec![SpatialCommand::Undo]);
        assert_eq!(session.phase(), &SpatialPhase::SetDiscStart);
        assert_eq!(session.holder(), None);

        run(&mut session, vec![SpatialCommand::Undo]);
        assert_eq!(session.phase(), &SpatialPhase::SetDiscStart);
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_defense_with_pull_block_and_opponent_goal() {
        let mut session = session();
        run(
            &mut session,
            vec![
                SpatialCommand::ConfirmLine { player_ids: line() },
                SpatialCommand::StartDefense,
                SpatialCommand::ChooseDirection {
                    direction: AttackDirection::Down,
                },
                tap(0.5, 0.95),
                pick("e"),
                tap(0.5, 0.1),
            ],
        );
        assert_eq!(session.phase(), &SpatialPhase::DefensePhase);
        assert_eq!(session.events()[0].event_type, ProEventType::Pull);

        run(
            &mut session,
            vec![SpatialCommand::RegainPossession {
                blocker_id: Some("f".to_string()),
            }],
        );
        assert_eq!(session.live_stats().get("f").unwrap().block, 1);

        run(&mut session, vec![SpatialCommand::Undo]);
        assert_eq!(session.phase(), &SpatialPhase::DefensePhase);
        assert_eq!(session.live_stats().get("f").unwrap().block, 0);

        let effects = run(&mut session, vec![SpatialCommand::OpponentGoal]);
        let SpatialEffect::PointArchived { point, score_them, .. } = &effects[0] else {
            panic!("expected archived point, got {effects:?}");
        };
        assert_eq!(*score_them, 1);
        assert_eq!(point.stat_for("e").unwrap().pull_attempts, 1);
        assert_eq!(point.start_mode, Some(StartMode::Defense));
    }

    #[test]
    fn test_undo_pull_returns_to_setup() {
        let mut session = session();
        run(
            &mut session,
            vec![
                SpatialCommand::ConfirmLine { player_ids: line() },
                SpatialCommand::StartDefense,
                SpatialCommand::ChooseDirection {
                    direction: AttackDirection::Up,
                },
                tap(0.5, 0.05),
                pick("e"),
                tap(0.5, 0.9),
                SpatialCommand::Undo,
            ],
        );
        assert_eq!(session.phase(), &SpatialPhase::PullSetup);
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_line_gate() {
        let mut session = session();
        let short: Vec<PlayerId> = line().into_iter().take(6).collect();
        assert!(session.apply(SpatialCommand::ConfirmLine { player_ids: short }).is_err());
        assert!(session.apply(SpatialCommand::StartOffense).is_err());
    }
}

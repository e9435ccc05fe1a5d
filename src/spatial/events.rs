use serde::{Deserialize, Serialize};

use super::field::FieldPoint;
use crate::capture::{StatSheet, recorder};
use crate::domain::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProEventType {
    Pull,
    Pickup,
    Pass,
    Goal,
    Drop,
    Throwaway,
}

/// One located event of a Pro-mode point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProEvent {
    #[serde(rename = "type")]
    pub event_type: ProEventType,
    #[serde(default)]
    pub origin: Option<FieldPoint>,
    pub destination: FieldPoint,
    #[serde(default)]
    pub thrower_id: Option<PlayerId>,
    #[serde(default)]
    pub receiver_id: Option<PlayerId>,
}

impl ProEvent {
    pub fn pull(puller: &str, origin: FieldPoint, landing: FieldPoint) -> Self {
        Self {
            event_type: ProEventType::Pull,
            origin: Some(origin),
            destination: landing,
            thrower_id: Some(puller.to_string()),
            receiver_id: None,
        }
    }

    pub fn pickup(player: &str, spot: FieldPoint) -> Self {
        Self {
            event_type: ProEventType::Pickup,
            origin: None,
            destination: spot,
            thrower_id: None,
            receiver_id: Some(player.to_string()),
        }
    }

    pub fn throw(
        event_type: ProEventType,
        thrower: &str,
        receiver: Option<&str>,
        origin: FieldPoint,
        destination: FieldPoint,
    ) -> Self {
        Self {
            event_type,
            origin: Some(origin),
            destination,
            thrower_id: Some(thrower.to_string()),
            receiver_id: receiver.map(str::to_string),
        }
    }

    /// Throw length in yards, `None` for events without an origin
    pub fn throw_yards(&self) -> Option<f64> {
        self.origin.map(|o| o.yards_to(&self.destination))
    }
}

/// Replays located events onto a fresh line sheet.
///
/// Spatial points keep only their events; counters are always derived from
/// them, so removing the last event is enough to undo its stats.
pub fn stats_from_events(line: &StatSheet, events: &[ProEvent], blockers: &[PlayerId]) -> StatSheet {
    let mut sheet = line.clone();
    for event in events {
        let thrower = event.thrower_id.as_deref();
        let receiver = event.receiver_id.as_deref();
        match (event.event_type, thrower, receiver) {
            (ProEventType::Pull, Some(puller), _) => {
                recorder::credit_pull(&mut sheet, puller, true, 0.0);
            }
            (ProEventType::Pass, Some(thrower), Some(receiver)) => {
                recorder::credit_catch(&mut sheet, thrower, receiver);
            }
            (ProEventType::Goal, thrower, Some(receiver)) => {
                recorder::credit_goal(&mut sheet, thrower, receiver);
            }
            (ProEventType::Drop, _, Some(receiver)) => {
                recorder::credit_drop(&mut sheet, receiver);
            }
            (ProEventType::Throwaway, Some(thrower), _) => {
                recorder::credit_throwaway(&mut sheet, thrower);
            }
            _ => {}
        }
    }
    for blocker in blockers {
        recorder::credit_block(&mut sheet, blocker);
    }
    sheet
}

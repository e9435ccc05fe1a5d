mod events;
pub mod field;
mod hit_test;
mod machine;

pub use events::{ProEvent, ProEventType, stats_from_events};
pub use field::{AttackDirection, FieldPoint, FieldZone};
pub use hit_test::{distance_to_segment, hit_test};
pub use machine::{SpatialCommand, SpatialEffect, SpatialPhase, SpatialSession, ThrowAction};

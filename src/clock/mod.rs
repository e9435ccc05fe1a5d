mod ledger;
mod match_clock;
pub mod source;
pub mod ticker;

pub use ledger::PlayingTimeLedger;
pub use match_clock::MatchClock;
pub use source::{ManualTimeSource, PullTimer, SystemTimeSource, TimeSource};
pub use ticker::{ClockMessage, ClockTicker};

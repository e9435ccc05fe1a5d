mod history;
mod machine;
pub mod recorder;
mod sheet;
pub mod types;

pub use history::{History, PointStateSnapshot};
pub use machine::PointSession;
pub use sheet::StatSheet;
pub use types::{CapturePhase, GameMode, PointCommand, PointEffect};

mod archive;
pub mod models;
mod roster;

pub use archive::BackupArchive;
pub use models::*;
pub use roster::{Roster, UNKNOWN_PLAYER_NAME};

mod archive_file;

pub use archive_file::{ArchiveFile, read_json};

pub mod settings;

pub use settings::{AppConfig, CaptureSettings, HitTestSettings, NameFormat, StorageSettings};

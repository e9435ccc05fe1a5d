use crate::domain::{CaptureMode, Player};

/// How player names are rendered; display-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameFormat {
    #[default]
    Full,
    FirstName,
    FirstNameWithJersey,
}

impl NameFormat {
    pub fn from_setting(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FIRST" | "FIRST_NAME" => NameFormat::FirstName,
            "JERSEY" | "FIRST_NAME_JERSEY" => NameFormat::FirstNameWithJersey,
            _ => NameFormat::Full,
        }
    }

    pub fn apply(&self, player: &Player) -> String {
        let first = player.name.split_whitespace().next().unwrap_or(&player.name);
        match self {
            NameFormat::Full => player.name.clone(),
            NameFormat::FirstName => first.to_string(),
            NameFormat::FirstNameWithJersey => match player.jersey_number {
                Some(number) => format!("{first} #{number}"),
                None => first.to_string(),
            },
        }
    }
}

/// Settings the point state machine reads when a line is confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    pub capture_mode: CaptureMode,
    pub time_tracking: bool,
    pub keep_screen_on: bool,
    pub left_handed: bool,
    pub name_format: NameFormat,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            capture_mode: CaptureMode::Advanced,
            time_tracking: true,
            keep_screen_on: false,
            left_handed: false,
            name_format: NameFormat::Full,
        }
    }
}

/// Review-mode tap tolerances, in normalized field units
#[derive(Debug, Clone, PartialEq)]
pub struct HitTestSettings {
    pub destination_radius: f64,
    pub segment_threshold: f64,
}

impl Default for HitTestSettings {
    fn default() -> Self {
        Self {
            destination_radius: 0.05,
            segment_threshold: 0.025,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: "ultimate_stats.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub capture: CaptureSettings,
    pub hit_test: HitTestSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            capture: CaptureSettings::default(),
            hit_test: HitTestSettings::default(),
            storage: StorageSettings::default(),
        }
    }

    /// Defaults overlaid with `ULTIMATE_STATS_*` and `DATABASE_PATH` variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        let capture = &mut config.capture;

        if let Some(raw) = lookup("ULTIMATE_STATS_CAPTURE_MODE") {
            capture.capture_mode = CaptureMode::from_setting(&raw);
        }
        if let Some(raw) = lookup("ULTIMATE_STATS_NAME_FORMAT") {
            capture.name_format = NameFormat::from_setting(&raw);
        }
        capture.time_tracking = flag(&lookup, "ULTIMATE_STATS_TIME_TRACKING", capture.time_tracking);
        capture.keep_screen_on = flag(&lookup, "ULTIMATE_STATS_KEEP_SCREEN_ON", capture.keep_screen_on);
        capture.left_handed = flag(&lookup, "ULTIMATE_STATS_LEFT_HANDED", capture.left_handed);

        if let Some(path) = lookup("DATABASE_PATH").filter(|p| !p.trim().is_empty()) {
            config.storage.database_path = path;
        }

        config
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_overrides() {
        assert_eq!(config_from(&[]), AppConfig::new());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("ULTIMATE_STATS_CAPTURE_MODE", "simple"),
            ("ULTIMATE_STATS_TIME_TRACKING", "no"),
            ("ULTIMATE_STATS_LEFT_HANDED", "1"),
            ("DATABASE_PATH", "/tmp/stats.db"),
        ]);

        assert_eq!(config.capture.capture_mode, CaptureMode::Simple);
        assert!(!config.capture.time_tracking);
        assert!(config.capture.left_handed);
        assert_eq!(config.storage.database_path, "/tmp/stats.db");
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let config = config_from(&[
            ("ULTIMATE_STATS_CAPTURE_MODE", "turbo"),
            ("ULTIMATE_STATS_TIME_TRACKING", "maybe"),
            ("ULTIMATE_STATS_NAME_FORMAT", "???"),
        ]);

        assert_eq!(config.capture.capture_mode, CaptureMode::Advanced);
        assert!(config.capture.time_tracking);
        assert_eq!(config.capture.name_format, NameFormat::Full);
    }

    #[test]
    fn test_name_format_with_jersey() {
        let mut player = Player::new("p", "Robin Hart");
        player.jersey_number = Some(12);

        assert_eq!(NameFormat::FirstNameWithJersey.apply(&player), "Robin #12");
        assert_eq!(NameFormat::FirstName.apply(&player), "Robin");
        assert_eq!(NameFormat::Full.apply(&player), "Robin Hart");
    }
}

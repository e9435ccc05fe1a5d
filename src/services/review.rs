use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

use crate::cache::ArchiveFile;
use crate::config::settings::AppConfig;
use crate::domain::BackupArchive;
use crate::spatial::{FieldPoint, ProEvent, hit_test};

/// Looks up the recorded Pro event under a tap on the review field
pub struct ReviewService {
    config: AppConfig,
}

impl ReviewService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, archive_path: &str, match_id: &str, point_number: usize, tap: FieldPoint) -> Result<()> {
        let archive = ArchiveFile::new(archive_path).load()?;
        match self.pick(&archive, match_id, point_number, &tap)? {
            Some((idx, event)) => println!(
                "{} event {} {:?} {} → {} ({:.1} yd)",
                "hit".green(),
                idx + 1,
                event.event_type,
                event.thrower_id.as_deref().unwrap_or("-"),
                event.receiver_id.as_deref().unwrap_or("-"),
                event.throw_yards().unwrap_or(0.0)
            ),
            None => println!("{} nothing near ({:.2}, {:.2})", "miss".yellow(), tap.x, tap.y),
        }
        Ok(())
    }

    /// `point_number` counts from 1, as printed in capture output
    pub fn pick(
        &self,
        archive: &BackupArchive,
        match_id: &str,
        point_number: usize,
        tap: &FieldPoint,
    ) -> Result<Option<(usize, ProEvent)>> {
        let game = archive
            .matches()
            .find(|m| m.id == match_id)
            .with_context(|| format!("Match {} is not in the archive", match_id))?;
        let point = point_number
            .checked_sub(1)
            .and_then(|idx| game.points.get(idx))
            .with_context(|| format!("Match {} has no point {}", match_id, point_number))?;
        let events = point
            .pro_events
            .as_deref()
            .with_context(|| format!("Point {} was not captured with coordinates", point_number))?;

        info!("Hit-testing {} events of point {}", events.len(), point_number);
        Ok(hit_test(events, tap, &self.config.hit_test).map(|idx| (idx, events[idx].clone())))
    }
}

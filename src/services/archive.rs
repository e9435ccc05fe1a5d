use anyhow::{Context, Result};
use log::info;

use crate::cache::ArchiveFile;
use crate::config::settings::AppConfig;
use crate::database::SqliteStore;

/// Moves backup archives between JSON files and the SQLite store
pub struct ArchiveService {
    store: SqliteStore,
}

impl ArchiveService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            store: SqliteStore::open(&config.storage.database_path)?,
        })
    }

    pub fn import(&self, path: &str) -> Result<()> {
        info!("=== Importing archive {} ===", path);

        let archive = ArchiveFile::new(path).load()?;
        self.store
            .import_archive(&archive)
            .with_context(|| format!("Failed to import {}", path))?;

        info!("=== Import Complete: {} matches ===", archive.matches().count());
        Ok(())
    }

    pub fn export(&self, team_id: &str, out: &str) -> Result<()> {
        info!("=== Exporting team {} ===", team_id);

        let archive = self.store.export_archive(team_id)?;
        ArchiveFile::new(out).save(&archive)?;

        info!("=== Export Complete: {} points ===", archive.point_count());
        Ok(())
    }
}

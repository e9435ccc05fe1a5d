use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::BackupArchive;

/// Backup archive kept as a pretty-printed JSON file
pub struct ArchiveFile {
    path: PathBuf,
}

impl ArchiveFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, archive: &BackupArchive) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create archive directory")?;
        }
        write_json(&self.path, archive)?;
        info!("Saved archive to {}", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<BackupArchive> {
        let archive = read_json(&self.path)?;
        info!("Loaded archive from {}", self.path.display());
        Ok(archive)
    }
}

/// Reads and parses a JSON document, naming the file in errors
pub fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json).context("Failed to write archive file")?;
    Ok(())
}

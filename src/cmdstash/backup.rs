//! Backup, listing and restore of the catalog's backing file.
//!
//! Backups are plain copies of the SQLite file named
//! `<stem>_backup_<YYYYMMDD_HHMMSS>.db`, each accompanied by a JSON
//! manifest recording when it was taken and how large it was. Restoring
//! first snapshots the live file so a bad restore is always reversible.

use crate::error::{Result, StashError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    pub backup_time: String,
    pub original_file: PathBuf,
    pub backup_file: PathBuf,
    pub file_size: u64,
}

#[derive(Debug, Clone)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    pub size: u64,
}

/// Copies the live database to a timestamped archive under `backup_dir`
/// and writes the manifest alongside it.
pub fn create_backup(db_path: &Path, backup_dir: &Path) -> Result<BackupManifest> {
    if !db_path.exists() {
        return Err(missing_file("database file", db_path));
    }
    fs::create_dir_all(backup_dir)?;

    let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let stem = db_stem(db_path);
    let backup_file = backup_dir.join(format!("{}_backup_{}.db", stem, timestamp));

    fs::copy(db_path, &backup_file)?;

    let manifest = BackupManifest {
        backup_time: timestamp.clone(),
        original_file: db_path.to_path_buf(),
        backup_file: backup_file.clone(),
        file_size: fs::metadata(&backup_file)?.len(),
    };

    let manifest_path = backup_dir.join(format!("backup_info_{}.json", timestamp));
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    Ok(manifest)
}

/// Archives under `backup_dir`, newest first by modification time.
pub fn list_backups(backup_dir: &Path) -> Result<Vec<BackupEntry>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.contains("_backup_") || path.extension().map_or(true, |ext| ext != "db") {
            continue;
        }
        let metadata = entry.metadata()?;
        entries.push(BackupEntry {
            path,
            modified: DateTime::<Utc>::from(metadata.modified()?),
            size: metadata.len(),
        });
    }

    entries.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(entries)
}

/// Replaces the live database with `backup_file`, snapshotting the live
/// file first. Returns the snapshot path when one was taken.
pub fn restore_backup(db_path: &Path, backup_file: &Path) -> Result<Option<PathBuf>> {
    if !backup_file.exists() {
        return Err(missing_file("backup file", backup_file));
    }

    let snapshot = if db_path.exists() {
        let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let mut name = db_path.as_os_str().to_owned();
        name.push(format!(".auto_backup_{}", timestamp));
        let snapshot = PathBuf::from(name);
        fs::copy(db_path, &snapshot)?;
        Some(snapshot)
    } else {
        None
    };

    fs::copy(backup_file, db_path)?;
    Ok(snapshot)
}

fn db_stem(db_path: &Path) -> String {
    db_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cmdstash".to_string())
}

fn missing_file(what: &str, path: &Path) -> StashError {
    StashError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist: {}", what, path.display()),
    ))
}

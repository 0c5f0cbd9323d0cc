use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const WIDTHS_FILENAME: &str = "column_widths.json";

/// Persisted per-column display widths for list views, keyed
/// `{view_id}_{column}`. Purely presentational; unknown keys fall back to
/// the caller's default.
#[derive(Debug, Clone, Default)]
pub struct ColumnWidths {
    widths: HashMap<String, usize>,
    path: Option<PathBuf>,
}

impl ColumnWidths {
    /// Load widths from `data_dir`, or start empty when the file is
    /// missing or unreadable (a corrupt preference file is not worth
    /// failing startup over).
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Self {
        let path = data_dir.as_ref().join(WIDTHS_FILENAME);
        let widths = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            widths,
            path: Some(path),
        }
    }

    pub fn get(&self, view_id: &str, column: &str, default: usize) -> usize {
        self.widths
            .get(&key(view_id, column))
            .copied()
            .unwrap_or(default)
    }

    pub fn set(&mut self, view_id: &str, column: &str, width: usize) {
        self.widths.insert(key(view_id, column), width);
    }

    /// Write the current widths back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, serde_json::to_string_pretty(&self.widths)?)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &usize)> {
        self.widths.iter()
    }
}

fn key(view_id: &str, column: &str) -> String {
    format!("{}_{}", view_id, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let widths = ColumnWidths::load(dir.path());
        assert_eq!(widths.get("commands", "name", 20), 20);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();

        let mut widths = ColumnWidths::load(dir.path());
        widths.set("commands", "command", 60);
        widths.save().unwrap();

        let reloaded = ColumnWidths::load(dir.path());
        assert_eq!(reloaded.get("commands", "command", 40), 60);
        assert_eq!(reloaded.get("commands", "name", 20), 20);
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(WIDTHS_FILENAME), "not json").unwrap();

        let widths = ColumnWidths::load(dir.path());
        assert_eq!(widths.get("notes", "title", 30), 30);
    }

    #[test]
    fn keys_combine_view_and_column() {
        let mut widths = ColumnWidths::default();
        widths.set("commands", "name", 25);
        widths.set("notes", "name", 35);
        assert_eq!(widths.get("commands", "name", 0), 25);
        assert_eq!(widths.get("notes", "name", 0), 35);
    }
}

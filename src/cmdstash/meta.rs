use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const ABOUT_FILENAME: &str = "about.json";

/// Display-only product metadata, optionally overridden by an
/// `about.json` next to the database. Every field has a compiled-in
/// default so the file is never required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AboutInfo {
    pub name: String,
    pub version: String,
    pub author: String,
    pub project_url: String,
    pub description: String,
    pub build_date: String,
}

impl Default for AboutInfo {
    fn default() -> Self {
        Self {
            name: "cmdstash".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            author: "cmdstash contributors".to_string(),
            project_url: env!("CARGO_PKG_REPOSITORY").to_string(),
            description: env!("CARGO_PKG_DESCRIPTION").to_string(),
            build_date: String::new(),
        }
    }
}

impl AboutInfo {
    /// Load from `data_dir/about.json`, falling back to defaults when the
    /// file is absent or malformed.
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Self {
        let path = data_dir.as_ref().join(ABOUT_FILENAME);
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }
}

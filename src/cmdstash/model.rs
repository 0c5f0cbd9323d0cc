use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category name shown for commands with no category reference.
/// Display-only; never written to the database.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub id: i64,
    pub name: String,
    pub command: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A command row prepared for list display: the command text is collapsed
/// to a single line and truncated, and the category reference is resolved
/// to a name. The stored record is never modified by view building.
#[derive(Debug, Clone)]
pub struct CommandView {
    pub id: i64,
    pub name: String,
    pub display_command: String,
    pub category_name: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

/// A validated edit request for creating or updating a command.
#[derive(Debug, Clone, Default)]
pub struct CommandEdit {
    pub name: String,
    pub command: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
}

impl CommandEdit {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            category_id: None,
            description: None,
        }
    }

    pub fn with_category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Returns the trimmed name and command text, rejecting empty fields.
    pub fn validated(&self) -> crate::error::Result<(&str, &str)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(crate::error::StashError::Validation("command name"));
        }
        let command = self.command.trim();
        if command.is_empty() {
            return Err(crate::error::StashError::Validation("command text"));
        }
        Ok((name, command))
    }

    /// Trimmed description, with the empty string mapped to None.
    pub fn description(&self) -> Option<&str> {
        match self.description.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(d) => Some(d),
        }
    }
}

/// A validated edit request for creating or updating a note.
#[derive(Debug, Clone, Default)]
pub struct NoteEdit {
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl NoteEdit {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
            category: None,
        }
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn validated(&self) -> crate::error::Result<&str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(crate::error::StashError::Validation("note title"));
        }
        Ok(title)
    }
}

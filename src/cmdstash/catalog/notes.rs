use crate::catalog::{note_from_row, NOTE_COLUMNS};
use crate::error::{Result, StashError};
use crate::model::{Note, NoteEdit};
use crate::store::Store;
use chrono::Utc;

/// CRUD over free-form notes. A note's category is a plain label with no
/// referential tie to the category registry.
pub struct NoteCatalog<'a> {
    store: &'a Store,
}

impl<'a> NoteCatalog<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn create(&self, edit: &NoteEdit) -> Result<Note> {
        let title = edit.validated()?;
        let now = Utc::now();
        self.store.execute(
            "INSERT INTO notes (title, content, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            (title, normalized(&edit.content), normalized(&edit.category), now),
        )?;
        self.get(self.store.last_insert_id())
    }

    pub fn update(&self, id: i64, edit: &NoteEdit) -> Result<Note> {
        let title = edit.validated()?;
        let affected = self.store.execute(
            "UPDATE notes SET title = ?1, content = ?2, category = ?3, updated_at = ?4
             WHERE id = ?5",
            (
                title,
                normalized(&edit.content),
                normalized(&edit.category),
                Utc::now(),
                id,
            ),
        )?;
        if affected == 0 {
            return Err(StashError::not_found("note", id));
        }
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.store.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(StashError::not_found("note", id));
        }
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Note> {
        self.store
            .query_optional(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                [id],
                note_from_row,
            )?
            .ok_or_else(|| StashError::not_found("note", id))
    }

    /// Exact-match title lookup; ties broken by lowest identifier, like
    /// [`CommandCatalog::find_by_name`](crate::catalog::commands::CommandCatalog::find_by_name).
    pub fn find_by_title(&self, title: &str) -> Result<Option<Note>> {
        self.store.query_optional(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE title = ?1 ORDER BY id ASC LIMIT 1"),
            [title],
            note_from_row,
        )
    }
}

fn normalized(value: &Option<String>) -> Option<&str> {
    match value.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(v) => Some(v),
    }
}

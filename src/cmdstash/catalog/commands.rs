use crate::catalog::{command_from_row, COMMAND_COLUMNS};
use crate::error::{Result, StashError};
use crate::model::{Command, CommandEdit};
use crate::store::Store;
use chrono::Utc;

/// CRUD over stored commands. A command's category reference, when set,
/// must resolve to an existing category at write time; `updated_at` is
/// refreshed on every successful mutation.
pub struct CommandCatalog<'a> {
    store: &'a Store,
}

impl<'a> CommandCatalog<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn create(&self, edit: &CommandEdit) -> Result<Command> {
        let (name, command) = edit.validated()?;
        self.check_category(edit.category_id)?;

        let now = Utc::now();
        self.store.execute(
            "INSERT INTO commands (name, command, category_id, description, is_favorite,
                                   created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
            (name, command, edit.category_id, edit.description(), now),
        )?;
        self.get(self.store.last_insert_id())
    }

    pub fn update(&self, id: i64, edit: &CommandEdit) -> Result<Command> {
        let (name, command) = edit.validated()?;
        self.check_category(edit.category_id)?;

        let affected = self.store.execute(
            "UPDATE commands
             SET name = ?1, command = ?2, category_id = ?3, description = ?4, updated_at = ?5
             WHERE id = ?6",
            (name, command, edit.category_id, edit.description(), Utc::now(), id),
        )?;
        if affected == 0 {
            return Err(StashError::not_found("command", id));
        }
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self
            .store
            .execute("DELETE FROM commands WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(StashError::not_found("command", id));
        }
        Ok(())
    }

    /// Flips the favorite flag and returns the new state. Applying the
    /// toggle twice restores the original value.
    pub fn toggle_favorite(&self, id: i64) -> Result<bool> {
        let affected = self.store.execute(
            "UPDATE commands SET is_favorite = 1 - is_favorite, updated_at = ?1 WHERE id = ?2",
            (Utc::now(), id),
        )?;
        if affected == 0 {
            return Err(StashError::not_found("command", id));
        }
        Ok(self.get(id)?.is_favorite)
    }

    pub fn get(&self, id: i64) -> Result<Command> {
        self.store
            .query_optional(
                &format!("SELECT {COMMAND_COLUMNS} FROM commands WHERE id = ?1"),
                [id],
                command_from_row,
            )?
            .ok_or_else(|| StashError::not_found("command", id))
    }

    /// Exact-match name lookup. Command names are not unique; ties are
    /// broken deterministically by lowest identifier.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Command>> {
        self.store.query_optional(
            &format!(
                "SELECT {COMMAND_COLUMNS} FROM commands WHERE name = ?1 ORDER BY id ASC LIMIT 1"
            ),
            [name],
            command_from_row,
        )
    }

    fn check_category(&self, category_id: Option<i64>) -> Result<()> {
        if let Some(id) = category_id {
            let exists = self
                .store
                .query_optional("SELECT 1 FROM categories WHERE id = ?1", [id], |_| Ok(()))?
                .is_some();
            if !exists {
                return Err(StashError::DanglingReference(id));
            }
        }
        Ok(())
    }
}

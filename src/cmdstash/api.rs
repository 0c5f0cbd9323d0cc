//! # API Facade
//!
//! [`StashApi`] is a thin facade over the catalog components. It owns the
//! [`Store`] and exposes one method per user-visible operation, returning
//! structured [`CmdResult`] values. It performs no terminal I/O and holds
//! no business logic of its own; validation and integrity rules live in
//! the catalog layer.

use crate::catalog::categories::CategoryRegistry;
use crate::catalog::commands::CommandCatalog;
use crate::catalog::notes::NoteCatalog;
use crate::catalog::query::{CommandFilter, QueryFilterEngine};
use crate::error::Result;
use crate::model::{Category, Command, CommandEdit, CommandView, Note, NoteEdit};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Structured outcome of an API call. Clients render whichever parts are
/// relevant to them; empty collections mean the operation produced none.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub commands: Vec<Command>,
    pub command_views: Vec<CommandView>,
    pub categories: Vec<Category>,
    pub notes: Vec<Note>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_command_views(mut self, views: Vec<CommandView>) -> Self {
        self.command_views = views;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_notes(mut self, notes: Vec<Note>) -> Self {
        self.notes = notes;
        self
    }
}

pub struct StashApi {
    store: Store,
}

impl StashApi {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn categories(&self) -> CategoryRegistry<'_> {
        CategoryRegistry::new(&self.store)
    }

    fn commands(&self) -> CommandCatalog<'_> {
        CommandCatalog::new(&self.store)
    }

    fn notes(&self) -> NoteCatalog<'_> {
        NoteCatalog::new(&self.store)
    }

    fn engine(&self) -> QueryFilterEngine<'_> {
        QueryFilterEngine::new(&self.store)
    }

    // --- commands ---

    pub fn add_command(&self, edit: CommandEdit) -> Result<CmdResult> {
        let command = self.commands().create(&edit)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Added command #{}: {}",
            command.id, command.name
        )));
        Ok(result.with_commands(vec![command]))
    }

    pub fn edit_command(&self, id: i64, edit: CommandEdit) -> Result<CmdResult> {
        let command = self.commands().update(id, &edit)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Updated command #{}: {}",
            command.id, command.name
        )));
        Ok(result.with_commands(vec![command]))
    }

    pub fn remove_command(&self, id: i64) -> Result<CmdResult> {
        self.commands().delete(id)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Deleted command #{}", id)));
        Ok(result)
    }

    pub fn toggle_favorite(&self, id: i64) -> Result<CmdResult> {
        let is_favorite = self.commands().toggle_favorite(id)?;
        let verb = if is_favorite { "Favorited" } else { "Unfavorited" };
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("{} command #{}", verb, id)));
        Ok(result.with_commands(vec![self.commands().get(id)?]))
    }

    pub fn list_commands(&self, filter: &CommandFilter) -> Result<CmdResult> {
        Ok(CmdResult::default().with_command_views(self.engine().list_commands(filter)?))
    }

    pub fn show_command(&self, id: i64) -> Result<CmdResult> {
        Ok(CmdResult::default().with_commands(vec![self.commands().get(id)?]))
    }

    /// Full stored command text, e.g. for clipboard use.
    pub fn command_text(&self, id: i64) -> Result<String> {
        Ok(self.commands().get(id)?.command)
    }

    /// Resolves a category selector typed by the user to an identifier.
    /// Category names are unique, so this lookup is unambiguous.
    pub fn resolve_category(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.categories().find_by_name(name)?.map(|c| c.id))
    }

    pub fn get_command(&self, id: i64) -> Result<Command> {
        self.commands().get(id)
    }

    /// Resolved category name for display, with the placeholder for
    /// uncategorized commands.
    pub fn describe_category(&self, category_id: Option<i64>) -> Result<String> {
        match category_id {
            Some(id) => Ok(self.categories().get(id)?.name),
            None => Ok(crate::model::UNCATEGORIZED.to_string()),
        }
    }

    // --- categories ---

    pub fn add_category(&self, name: &str, description: Option<&str>) -> Result<CmdResult> {
        let category = self.categories().create(name, description)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Added category: {}",
            category.name
        )));
        Ok(result.with_categories(vec![category]))
    }

    pub fn rename_category(
        &self,
        existing_name: &str,
        new_name: &str,
        new_description: Option<&str>,
    ) -> Result<CmdResult> {
        let category = self
            .categories()
            .rename(existing_name, new_name, new_description)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Updated category: {}",
            category.name
        )));
        Ok(result.with_categories(vec![category]))
    }

    pub fn remove_category(&self, name: &str) -> Result<CmdResult> {
        self.categories().delete(name)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Deleted category: {}", name)));
        Ok(result)
    }

    pub fn list_categories(&self) -> Result<CmdResult> {
        Ok(CmdResult::default().with_categories(self.categories().list()?))
    }

    // --- notes ---

    pub fn add_note(&self, edit: NoteEdit) -> Result<CmdResult> {
        let note = self.notes().create(&edit)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Added note #{}: {}",
            note.id, note.title
        )));
        Ok(result.with_notes(vec![note]))
    }

    pub fn edit_note(&self, id: i64, edit: NoteEdit) -> Result<CmdResult> {
        let note = self.notes().update(id, &edit)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Updated note #{}: {}",
            note.id, note.title
        )));
        Ok(result.with_notes(vec![note]))
    }

    pub fn remove_note(&self, id: i64) -> Result<CmdResult> {
        self.notes().delete(id)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Deleted note #{}", id)));
        Ok(result)
    }

    pub fn list_notes(&self, category_substring: &str) -> Result<CmdResult> {
        Ok(CmdResult::default().with_notes(self.engine().list_notes(category_substring)?))
    }

    pub fn show_note(&self, id: i64) -> Result<CmdResult> {
        Ok(CmdResult::default().with_notes(vec![self.notes().get(id)?]))
    }

    /// Note content for clipboard use; empty when the note has none.
    pub fn note_text(&self, id: i64) -> Result<String> {
        Ok(self.notes().get(id)?.content.unwrap_or_default())
    }
}

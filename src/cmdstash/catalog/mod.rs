//! # Catalog Layer
//!
//! The registries in this module own the integrity rules of the catalog:
//!
//! - [`categories::CategoryRegistry`]: category name uniqueness and the
//!   dependent-row guard on deletion
//! - [`commands::CommandCatalog`]: field validation, category-reference
//!   resolution, favorite flag and timestamps
//! - [`notes::NoteCatalog`]: note CRUD (no cross-entity invariants)
//! - [`query::QueryFilterEngine`]: filtered, sorted read views
//!
//! Every registry borrows an explicitly constructed [`Store`](crate::store::Store)
//! handle rather than reaching for ambient state, so tests build each one
//! against an in-memory store.

use crate::model::{Category, Command, Note};
use rusqlite::Row;

pub mod categories;
pub mod commands;
pub mod notes;
pub mod query;

pub(crate) fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub(crate) fn command_from_row(row: &Row<'_>) -> rusqlite::Result<Command> {
    Ok(Command {
        id: row.get(0)?,
        name: row.get(1)?,
        command: row.get(2)?,
        category_id: row.get(3)?,
        description: row.get(4)?,
        is_favorite: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub(crate) const CATEGORY_COLUMNS: &str = "id, name, description, created_at";
pub(crate) const COMMAND_COLUMNS: &str =
    "id, name, command, category_id, description, is_favorite, created_at, updated_at";
pub(crate) const NOTE_COLUMNS: &str = "id, title, content, category, created_at, updated_at";

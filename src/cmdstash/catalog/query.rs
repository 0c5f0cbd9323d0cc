use crate::catalog::{note_from_row, NOTE_COLUMNS};
use crate::error::Result;
use crate::model::{CommandView, Note, UNCATEGORIZED};
use crate::store::Store;

/// Width limit beyond which the collapsed command text is truncated.
const DISPLAY_LIMIT: usize = 80;
/// Characters kept in front of the ellipsis marker when truncating.
const DISPLAY_KEEP: usize = 77;

/// Category predicate for [`CommandFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

/// Configuration for [`QueryFilterEngine::list_commands`].
///
/// A non-empty `search_term` overrides `favorite_only` and `category` and
/// matches name, command text, or description as a case-sensitive
/// substring.
#[derive(Debug, Clone, Default)]
pub struct CommandFilter {
    pub favorite_only: bool,
    pub category: CategoryFilter,
    pub search_term: Option<String>,
}

impl CommandFilter {
    pub fn favorites() -> Self {
        Self {
            favorite_only: true,
            ..Self::default()
        }
    }

    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: CategoryFilter::Named(name.into()),
            ..Self::default()
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    fn active_search(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|term| !term.is_empty())
    }
}

/// Read-side engine producing the ordered, display-formatted rows behind
/// list views. Sort order is fixed: favorite descending, then name
/// ascending, regardless of filtering.
pub struct QueryFilterEngine<'a> {
    store: &'a Store,
}

impl<'a> QueryFilterEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn list_commands(&self, filter: &CommandFilter) -> Result<Vec<CommandView>> {
        let mut sql = String::from(
            "SELECT c.id, c.name, c.command, cat.name, c.is_favorite, c.created_at
             FROM commands c
             LEFT JOIN categories cat ON c.category_id = cat.id",
        );
        let mut params: Vec<String> = Vec::new();

        // SQLite LIKE is case-insensitive for ASCII; INSTR keeps the
        // substring match case-sensitive.
        if let Some(term) = filter.active_search() {
            sql.push_str(
                " WHERE INSTR(c.name, ?1) > 0
                     OR INSTR(c.command, ?1) > 0
                     OR INSTR(COALESCE(c.description, ''), ?1) > 0",
            );
            params.push(term.to_string());
        } else {
            let mut conditions: Vec<String> = Vec::new();
            if filter.favorite_only {
                conditions.push("c.is_favorite = 1".to_string());
            }
            if let CategoryFilter::Named(name) = &filter.category {
                params.push(name.clone());
                conditions.push(format!("cat.name = ?{}", params.len()));
            }
            if !conditions.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&conditions.join(" AND "));
            }
        }

        sql.push_str(" ORDER BY c.is_favorite DESC, c.name ASC");

        self.store
            .query(&sql, rusqlite::params_from_iter(params.iter()), |row| {
                let command: String = row.get(2)?;
                let category: Option<String> = row.get(3)?;
                Ok(CommandView {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    display_command: display_command(&command),
                    category_name: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
                    is_favorite: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })
    }

    /// Notes whose category label contains the given substring
    /// (case-sensitive); an empty filter returns everything. Always
    /// sorted by creation time, newest first.
    pub fn list_notes(&self, category_substring: &str) -> Result<Vec<Note>> {
        if category_substring.is_empty() {
            self.store.query(
                &format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC"),
                [],
                note_from_row,
            )
        } else {
            self.store.query(
                &format!(
                    "SELECT {NOTE_COLUMNS} FROM notes
                     WHERE INSTR(COALESCE(category, ''), ?1) > 0
                     ORDER BY created_at DESC"
                ),
                [category_substring],
                note_from_row,
            )
        }
    }
}

/// Collapses a stored command text to a single display line: newlines and
/// carriage returns become spaces, runs of whitespace collapse to one
/// space, and text longer than 80 characters is cut to 77 plus `...`.
/// Display-only; the stored value is never touched.
pub fn display_command(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > DISPLAY_LIMIT {
        let kept: String = collapsed.chars().take(DISPLAY_KEEP).collect();
        format!("{}...", kept)
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::categories::CategoryRegistry;
    use crate::catalog::commands::CommandCatalog;
    use crate::catalog::notes::NoteCatalog;
    use crate::model::{CommandEdit, NoteEdit};

    fn fixture() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn sort_is_favorite_desc_then_name_asc() {
        let store = fixture();
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        catalog.create(&CommandEdit::new("zeta", "z")).unwrap();
        catalog.create(&CommandEdit::new("alpha", "a")).unwrap();
        let fav = catalog.create(&CommandEdit::new("mid", "m")).unwrap();
        catalog.toggle_favorite(fav.id).unwrap();

        let names: Vec<String> = engine
            .list_commands(&CommandFilter::default())
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["mid", "alpha", "zeta"]);
    }

    #[test]
    fn favorite_only_restricts_and_keeps_name_order() {
        let store = fixture();
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        for name in ["b", "a", "c"] {
            let cmd = catalog.create(&CommandEdit::new(name, "x")).unwrap();
            if name != "c" {
                catalog.toggle_favorite(cmd.id).unwrap();
            }
        }

        let views = engine.list_commands(&CommandFilter::favorites()).unwrap();
        assert!(views.iter().all(|v| v.is_favorite));
        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn category_filter_matches_resolved_name() {
        let store = fixture();
        let registry = CategoryRegistry::new(&store);
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        let net = registry.find_by_name("network").unwrap().unwrap();
        catalog
            .create(&CommandEdit::new("ping test", "ping -c 4 8.8.8.8").with_category(Some(net.id)))
            .unwrap();
        catalog.create(&CommandEdit::new("loose", "ls")).unwrap();

        let views = engine
            .list_commands(&CommandFilter::category("network"))
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "ping test");
        assert_eq!(views[0].category_name, "network");
    }

    #[test]
    fn uncategorized_commands_get_placeholder_name() {
        let store = fixture();
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        catalog.create(&CommandEdit::new("loose", "ls")).unwrap();
        let views = engine.list_commands(&CommandFilter::default()).unwrap();
        assert_eq!(views[0].category_name, UNCATEGORIZED);
    }

    #[test]
    fn search_matches_description_only_hits() {
        let store = fixture();
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        catalog
            .create(
                &CommandEdit::new("du", "du -sh *")
                    .with_description(Some("disk usage breakdown".into())),
            )
            .unwrap();
        catalog.create(&CommandEdit::new("free", "free -m")).unwrap();

        let views = engine
            .list_commands(&CommandFilter::search("breakdown"))
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "du");
    }

    #[test]
    fn search_is_case_sensitive() {
        let store = fixture();
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        catalog.create(&CommandEdit::new("Restart", "systemctl restart nginx")).unwrap();

        assert_eq!(
            engine
                .list_commands(&CommandFilter::search("Restart"))
                .unwrap()
                .len(),
            1
        );
        // Lowercase probe only matches the command text, not the name.
        let views = engine
            .list_commands(&CommandFilter::search("restart nginx"))
            .unwrap();
        assert_eq!(views.len(), 1);
        assert!(engine
            .list_commands(&CommandFilter::search("RESTART"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn search_overrides_other_predicates() {
        let store = fixture();
        let registry = CategoryRegistry::new(&store);
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        let net = registry.find_by_name("network").unwrap().unwrap();
        catalog
            .create(&CommandEdit::new("curl", "curl -v example.com").with_category(Some(net.id)))
            .unwrap();

        // favorite_only and a non-matching category would exclude the row,
        // but the search term takes precedence.
        let filter = CommandFilter {
            favorite_only: true,
            category: CategoryFilter::Named("database".into()),
            search_term: Some("curl".into()),
        };
        assert_eq!(engine.list_commands(&filter).unwrap().len(), 1);

        // An empty term is no search at all.
        let filter = CommandFilter {
            search_term: Some(String::new()),
            ..CommandFilter::default()
        };
        assert_eq!(engine.list_commands(&filter).unwrap().len(), 1);
    }

    #[test]
    fn empty_result_is_an_empty_sequence() {
        let store = fixture();
        let engine = QueryFilterEngine::new(&store);
        assert!(engine
            .list_commands(&CommandFilter::search("no such term"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(display_command("ls -la\n\n  /tmp"), "ls -la /tmp");
        assert_eq!(display_command("a\r\nb\tc"), "a b c");
    }

    #[test]
    fn display_truncates_long_text_without_touching_storage() {
        let store = fixture();
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        let long: String = "x".repeat(90);
        let cmd = catalog.create(&CommandEdit::new("long", long.as_str())).unwrap();

        let views = engine.list_commands(&CommandFilter::default()).unwrap();
        assert_eq!(views[0].display_command.chars().count(), 80);
        assert!(views[0].display_command.ends_with("..."));
        assert_eq!(&views[0].display_command[..77], &long[..77]);

        // The stored value is unchanged on a subsequent read.
        assert_eq!(catalog.get(cmd.id).unwrap().command.chars().count(), 90);
    }

    #[test]
    fn display_keeps_exactly_eighty_characters() {
        let exact: String = "y".repeat(80);
        assert_eq!(display_command(&exact), exact);
    }

    #[test]
    fn notes_filter_by_category_substring() {
        let store = fixture();
        let notes = NoteCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        notes
            .create(&NoteEdit::new("a").with_category(Some("infra/aws".into())))
            .unwrap();
        notes
            .create(&NoteEdit::new("b").with_category(Some("infra/gcp".into())))
            .unwrap();
        notes.create(&NoteEdit::new("c")).unwrap();

        assert_eq!(engine.list_notes("").unwrap().len(), 3);
        assert_eq!(engine.list_notes("infra").unwrap().len(), 2);
        assert_eq!(engine.list_notes("aws").unwrap().len(), 1);
        // Case-sensitive, like command search.
        assert!(engine.list_notes("AWS").unwrap().is_empty());
    }

    #[test]
    fn notes_are_listed_newest_first() {
        let store = fixture();
        let notes = NoteCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        notes.create(&NoteEdit::new("older")).unwrap();
        notes.create(&NoteEdit::new("newer")).unwrap();

        let titles: Vec<String> = engine
            .list_notes("")
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["newer", "older"]);
    }

    #[test]
    fn reference_scenario_end_to_end() {
        let store = fixture();
        let registry = CategoryRegistry::new(&store);
        let catalog = CommandCatalog::new(&store);
        let engine = QueryFilterEngine::new(&store);

        // "system" and "network" are part of the seed data.
        let net = registry.find_by_name("network").unwrap().unwrap();
        let cmd = catalog
            .create(&CommandEdit::new("ping test", "ping -c 4 8.8.8.8").with_category(Some(net.id)))
            .unwrap();

        let views = engine
            .list_commands(&CommandFilter::category("network"))
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, cmd.id);

        let err = registry.delete("network").unwrap_err();
        assert!(matches!(
            err,
            crate::error::StashError::DependentRows { count: 1 }
        ));

        catalog.delete(cmd.id).unwrap();
        registry.delete("network").unwrap();
    }
}

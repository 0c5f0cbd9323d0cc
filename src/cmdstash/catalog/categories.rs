use crate::catalog::{category_from_row, CATEGORY_COLUMNS};
use crate::error::{Result, StashError};
use crate::model::Category;
use crate::store::Store;
use chrono::Utc;

/// CRUD over categories. Name uniqueness is case-sensitive, and a
/// category cannot be deleted while any command still references it.
pub struct CategoryRegistry<'a> {
    store: &'a Store,
}

impl<'a> CategoryRegistry<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn create(&self, name: &str, description: Option<&str>) -> Result<Category> {
        let name = validated_name(name)?;
        if self.find_by_name(name)?.is_some() {
            return Err(StashError::DuplicateName(name.to_string()));
        }

        self.store.execute(
            "INSERT INTO categories (name, description, created_at) VALUES (?1, ?2, ?3)",
            (name, normalized(description), Utc::now()),
        )?;
        self.get(self.store.last_insert_id())
    }

    /// Renames `existing_name` and replaces its description. Renaming a
    /// category to its current name is allowed (description-only edit).
    pub fn rename(
        &self,
        existing_name: &str,
        new_name: &str,
        new_description: Option<&str>,
    ) -> Result<Category> {
        let new_name = validated_name(new_name)?;
        let current = self
            .find_by_name(existing_name)?
            .ok_or_else(|| StashError::NotFound(format!("category '{}'", existing_name)))?;

        if let Some(collision) = self.find_by_name(new_name)? {
            if collision.id != current.id {
                return Err(StashError::DuplicateName(new_name.to_string()));
            }
        }

        self.store.execute(
            "UPDATE categories SET name = ?1, description = ?2 WHERE id = ?3",
            (new_name, normalized(new_description), current.id),
        )?;
        self.get(current.id)
    }

    /// Deletes a category, refusing while any command references it.
    pub fn delete(&self, name: &str) -> Result<()> {
        let category = self
            .find_by_name(name)?
            .ok_or_else(|| StashError::NotFound(format!("category '{}'", name)))?;

        let count = self.dependent_count(category.id)?;
        if count > 0 {
            return Err(StashError::DependentRows { count });
        }

        self.store
            .execute("DELETE FROM categories WHERE id = ?1", [category.id])?;
        Ok(())
    }

    /// All categories, ordered by name ascending.
    pub fn list(&self) -> Result<Vec<Category>> {
        self.store.query(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name ASC"),
            [],
            category_from_row,
        )
    }

    pub fn get(&self, id: i64) -> Result<Category> {
        self.store
            .query_optional(
                &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
                [id],
                category_from_row,
            )?
            .ok_or_else(|| StashError::not_found("category", id))
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.store.query_optional(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = ?1"),
            [name],
            category_from_row,
        )
    }

    /// Number of commands currently referencing the category.
    pub fn dependent_count(&self, id: i64) -> Result<i64> {
        Ok(self
            .store
            .query_optional(
                "SELECT COUNT(*) FROM commands WHERE category_id = ?1",
                [id],
                |row| row.get(0),
            )?
            .unwrap_or(0))
    }
}

fn validated_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StashError::Validation("category name"));
    }
    Ok(name)
}

fn normalized(description: Option<&str>) -> Option<&str> {
    match description.map(str::trim) {
        Some("") | None => None,
        Some(d) => Some(d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::commands::CommandCatalog;
    use crate::model::CommandEdit;

    #[test]
    fn create_assigns_id_and_timestamp() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);

        let cat = registry.create("docker", Some("Container commands")).unwrap();
        assert!(cat.id > 0);
        assert_eq!(cat.name, "docker");
        assert_eq!(cat.description.as_deref(), Some("Container commands"));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);

        registry.create("docker", None).unwrap();
        let err = registry.create("docker", None).unwrap_err();
        assert!(matches!(err, StashError::DuplicateName(name) if name == "docker"));
    }

    #[test]
    fn names_are_case_sensitive() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);

        registry.create("Docker", None).unwrap();
        assert!(registry.create("docker", None).is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);
        assert!(matches!(
            registry.create("   ", None),
            Err(StashError::Validation(_))
        ));
    }

    #[test]
    fn rename_detects_collisions_with_other_categories() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);

        registry.create("docker", None).unwrap();
        registry.create("podman", None).unwrap();

        let err = registry.rename("podman", "docker", None).unwrap_err();
        assert!(matches!(err, StashError::DuplicateName(_)));

        // Renaming onto itself just updates the description.
        let cat = registry.rename("docker", "docker", Some("new")).unwrap();
        assert_eq!(cat.description.as_deref(), Some("new"));
    }

    #[test]
    fn rename_missing_category_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);
        assert!(matches!(
            registry.rename("nope", "whatever", None),
            Err(StashError::NotFound(_))
        ));
    }

    #[test]
    fn delete_refuses_while_referenced() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);
        let catalog = CommandCatalog::new(&store);

        let cat = registry.create("docker", None).unwrap();
        let cmd = catalog
            .create(&CommandEdit::new("ps", "docker ps").with_category(Some(cat.id)))
            .unwrap();

        let err = registry.delete("docker").unwrap_err();
        assert!(matches!(err, StashError::DependentRows { count: 1 }));

        catalog.delete(cmd.id).unwrap();
        registry.delete("docker").unwrap();
        assert!(registry.find_by_name("docker").unwrap().is_none());
    }

    #[test]
    fn dependent_count_matches_live_references() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);
        let catalog = CommandCatalog::new(&store);

        let cat = registry.create("docker", None).unwrap();
        for i in 0..3 {
            catalog
                .create(
                    &CommandEdit::new(format!("cmd{}", i), "docker ps")
                        .with_category(Some(cat.id)),
                )
                .unwrap();
        }

        let err = registry.delete("docker").unwrap_err();
        assert!(matches!(err, StashError::DependentRows { count: 3 }));
    }

    #[test]
    fn list_is_sorted_by_name() {
        let store = Store::open_in_memory().unwrap();
        let registry = CategoryRegistry::new(&store);

        registry.create("zsh", None).unwrap();
        registry.create("awk", None).unwrap();

        let names: Vec<String> = registry.list().unwrap().into_iter().map(|c| c.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"awk".to_string()));
        // The five seeded defaults are present alongside the new ones.
        assert_eq!(names.len(), 7);
    }
}

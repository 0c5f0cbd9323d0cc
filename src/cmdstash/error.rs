use thiserror::Error;

#[derive(Error, Debug)]
pub enum StashError {
    #[error("{0} cannot be empty")]
    Validation(&'static str),

    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Category does not exist: {0}")]
    DanglingReference(i64),

    #[error("Category still has {count} command(s); reassign or delete them first")]
    DependentRows { count: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),
}

impl StashError {
    /// NotFound for an entity referenced by identifier.
    pub fn not_found(entity: &str, id: i64) -> Self {
        StashError::NotFound(format!("{} #{}", entity, id))
    }
}

pub type Result<T> = std::result::Result<T, StashError>;

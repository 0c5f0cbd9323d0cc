use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cmdstash")]
#[command(about = "Personal catalog of reusable shell commands", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a command to the catalog
    #[command(alias = "a")]
    Add {
        /// Display name (not required to be unique)
        name: String,

        /// The shell command text; may span multiple lines
        command: String,

        /// Category name (must already exist)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List commands
    #[command(alias = "ls")]
    List {
        /// Restrict to one category by name
        #[arg(short, long)]
        category: Option<String>,

        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,

        /// Substring search over name, command text and description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Search commands (dedicated form of `list --search`)
    Search { term: String },

    /// Show one command in full, untruncated
    #[command(alias = "v")]
    Show { id: i64 },

    /// Edit fields of a command; omitted flags keep current values
    #[command(alias = "e")]
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        command: Option<String>,

        /// Move to this category
        #[arg(long, conflicts_with = "no_category")]
        category: Option<String>,

        /// Clear the category reference
        #[arg(long)]
        no_category: bool,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a command
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Toggle the favorite flag
    #[command(alias = "f")]
    Fav { id: i64 },

    /// Copy the full command text to the clipboard
    #[command(alias = "cp")]
    Copy { id: i64 },

    /// Manage categories
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Manage notes
    #[command(subcommand, alias = "n")]
    Note(NoteCommands),

    /// Back up, list or restore catalog snapshots
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Get or set column widths for list views (e.g. commands_name 24)
    Config {
        /// Width key, `{view}_{column}`
        key: Option<String>,

        /// Width to set (prints the current value if omitted)
        value: Option<usize>,
    },

    /// Show product information
    About,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Rename a category and replace its description
    Rename {
        name: String,
        new_name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a category (refused while commands reference it)
    #[command(alias = "rm")]
    Delete { name: String },

    /// List categories
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Add a note
    Add {
        title: String,

        #[arg(long)]
        content: Option<String>,

        /// Free-form category label (no registry tie)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Edit fields of a note; omitted flags keep current values
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a note
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// List notes, optionally filtered by category substring
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show a note with its content
    Show { id: i64 },

    /// Copy a note's content to the clipboard
    #[command(alias = "cp")]
    Copy { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Copy the database to a timestamped archive
    Create,

    /// List archives, newest first
    #[command(alias = "ls")]
    List,

    /// Overwrite the database from an archive (snapshots the live file first)
    Restore { path: PathBuf },
}

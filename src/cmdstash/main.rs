use chrono::{DateTime, Utc};
use clap::Parser;
use cmdstash::api::{CmdMessage, MessageLevel, StashApi};
use cmdstash::backup::{create_backup, list_backups, restore_backup};
use cmdstash::catalog::query::{CategoryFilter, CommandFilter};
use cmdstash::clipboard::copy_to_clipboard;
use cmdstash::config::ColumnWidths;
use cmdstash::error::{Result, StashError};
use cmdstash::meta::AboutInfo;
use cmdstash::model::{Category, Command, CommandEdit, CommandView, Note, NoteEdit};
use cmdstash::store::Store;
use colored::*;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{BackupCommands, CategoryCommands, Cli, Commands, NoteCommands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct StashPaths {
    db_path: PathBuf,
    data_dir: PathBuf,
    backup_dir: PathBuf,
}

struct AppContext {
    api: StashApi,
    widths: ColumnWidths,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = resolve_paths()?;

    match cli.command {
        // Backup, config and about operate on files beside the database
        // and must not open (or create) the database itself.
        Some(Commands::Backup(cmd)) => handle_backup(&paths, cmd),
        Some(Commands::Config { key, value }) => handle_config(&paths, key, value),
        Some(Commands::About) => handle_about(&paths),
        command => {
            let ctx = init_context(&paths)?;
            match command {
                Some(Commands::Add {
                    name,
                    command,
                    category,
                    description,
                }) => handle_add(&ctx, name, command, category, description),
                Some(Commands::List {
                    category,
                    favorites,
                    search,
                }) => handle_list(&ctx, category, favorites, search),
                Some(Commands::Search { term }) => handle_list(&ctx, None, false, Some(term)),
                Some(Commands::Show { id }) => handle_show(&ctx, id),
                Some(Commands::Edit {
                    id,
                    name,
                    command,
                    category,
                    no_category,
                    description,
                }) => handle_edit(&ctx, id, name, command, category, no_category, description),
                Some(Commands::Delete { id }) => handle_delete(&ctx, id),
                Some(Commands::Fav { id }) => handle_fav(&ctx, id),
                Some(Commands::Copy { id }) => handle_copy(&ctx, id),
                Some(Commands::Category(cmd)) => handle_category(&ctx, cmd),
                Some(Commands::Note(cmd)) => handle_note(&ctx, cmd),
                Some(Commands::Backup(_))
                | Some(Commands::Config { .. })
                | Some(Commands::About) => unreachable!("handled before opening the store"),
                None => handle_list(&ctx, None, false, None),
            }
        }
    }
}

fn resolve_paths() -> Result<StashPaths> {
    let db_path = match std::env::var_os("CMDSTASH_DB") {
        Some(path) => PathBuf::from(path),
        None => {
            let dirs = ProjectDirs::from("com", "cmdstash", "cmdstash")
                .ok_or_else(|| StashError::Api("Could not determine data directory".into()))?;
            dirs.data_dir().join("cmdstash.db")
        }
    };
    let data_dir = db_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let backup_dir = data_dir.join("backups");
    Ok(StashPaths {
        db_path,
        data_dir,
        backup_dir,
    })
}

fn init_context(paths: &StashPaths) -> Result<AppContext> {
    let store = Store::open(&paths.db_path)?;
    let widths = ColumnWidths::load(&paths.data_dir);
    Ok(AppContext {
        api: StashApi::new(store),
        widths,
    })
}

fn resolve_category_arg(ctx: &AppContext, name: &str) -> Result<i64> {
    ctx.api
        .resolve_category(name)?
        .ok_or_else(|| StashError::NotFound(format!("category '{}'", name)))
}

fn handle_add(
    ctx: &AppContext,
    name: String,
    command: String,
    category: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let category_id = match category {
        Some(name) => Some(resolve_category_arg(ctx, &name)?),
        None => None,
    };
    let edit = CommandEdit::new(name, command)
        .with_category(category_id)
        .with_description(description);
    let result = ctx.api.add_command(edit)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    category: Option<String>,
    favorites: bool,
    search: Option<String>,
) -> Result<()> {
    let filter = CommandFilter {
        favorite_only: favorites,
        category: category.map_or(CategoryFilter::All, CategoryFilter::Named),
        search_term: search,
    };
    let result = ctx.api.list_commands(&filter)?;
    print_command_views(&result.command_views, &ctx.widths);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, id: i64) -> Result<()> {
    let result = ctx.api.show_command(id)?;
    for command in &result.commands {
        print_full_command(ctx, command)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_edit(
    ctx: &AppContext,
    id: i64,
    name: Option<String>,
    command: Option<String>,
    category: Option<String>,
    no_category: bool,
    description: Option<String>,
) -> Result<()> {
    let current = ctx.api.get_command(id)?;

    let category_id = if no_category {
        None
    } else {
        match category {
            Some(name) => Some(resolve_category_arg(ctx, &name)?),
            None => current.category_id,
        }
    };

    let edit = CommandEdit {
        name: name.unwrap_or(current.name),
        command: command.unwrap_or(current.command),
        category_id,
        description: description.or(current.description),
    };

    let result = ctx.api.edit_command(id, edit)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, id: i64) -> Result<()> {
    let result = ctx.api.remove_command(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_fav(ctx: &AppContext, id: i64) -> Result<()> {
    let result = ctx.api.toggle_favorite(id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_copy(ctx: &AppContext, id: i64) -> Result<()> {
    let text = ctx.api.command_text(id)?;
    copy_to_clipboard(&text)?;
    print_messages(&[CmdMessage::success(format!(
        "Command #{} copied to clipboard",
        id
    ))]);
    Ok(())
}

fn handle_category(ctx: &AppContext, cmd: CategoryCommands) -> Result<()> {
    match cmd {
        CategoryCommands::Add { name, description } => {
            let result = ctx.api.add_category(&name, description.as_deref())?;
            print_messages(&result.messages);
        }
        CategoryCommands::Rename {
            name,
            new_name,
            description,
        } => {
            let result = ctx
                .api
                .rename_category(&name, &new_name, description.as_deref())?;
            print_messages(&result.messages);
        }
        CategoryCommands::Delete { name } => {
            let result = ctx.api.remove_category(&name)?;
            print_messages(&result.messages);
        }
        CategoryCommands::List => {
            let result = ctx.api.list_categories()?;
            print_categories(&result.categories, &ctx.widths);
        }
    }
    Ok(())
}

fn handle_note(ctx: &AppContext, cmd: NoteCommands) -> Result<()> {
    match cmd {
        NoteCommands::Add {
            title,
            content,
            category,
        } => {
            let edit = NoteEdit::new(title)
                .with_content(content)
                .with_category(category);
            let result = ctx.api.add_note(edit)?;
            print_messages(&result.messages);
        }
        NoteCommands::Edit {
            id,
            title,
            content,
            category,
        } => {
            let mut shown = ctx.api.show_note(id)?;
            let current = shown.notes.remove(0);
            let edit = NoteEdit {
                title: title.unwrap_or(current.title),
                content: content.or(current.content),
                category: category.or(current.category),
            };
            let result = ctx.api.edit_note(id, edit)?;
            print_messages(&result.messages);
        }
        NoteCommands::Delete { id } => {
            let result = ctx.api.remove_note(id)?;
            print_messages(&result.messages);
        }
        NoteCommands::List { category } => {
            let result = ctx.api.list_notes(category.as_deref().unwrap_or(""))?;
            print_notes(&result.notes, &ctx.widths);
        }
        NoteCommands::Show { id } => {
            let result = ctx.api.show_note(id)?;
            for note in &result.notes {
                print_full_note(note);
            }
        }
        NoteCommands::Copy { id } => {
            let text = ctx.api.note_text(id)?;
            copy_to_clipboard(&text)?;
            print_messages(&[CmdMessage::success(format!(
                "Note #{} copied to clipboard",
                id
            ))]);
        }
    }
    Ok(())
}

fn handle_backup(paths: &StashPaths, cmd: BackupCommands) -> Result<()> {
    match cmd {
        BackupCommands::Create => {
            let manifest = create_backup(&paths.db_path, &paths.backup_dir)?;
            print_messages(&[
                CmdMessage::success(format!(
                    "Backed up to {}",
                    manifest.backup_file.display()
                )),
                CmdMessage::info(format!("{:.1} KB", manifest.file_size as f64 / 1024.0)),
            ]);
        }
        BackupCommands::List => {
            let entries = list_backups(&paths.backup_dir)?;
            if entries.is_empty() {
                println!("No backups found.");
                return Ok(());
            }
            for entry in entries {
                let name = entry
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                println!(
                    "{}  {}  {}",
                    pad_to_width(&name, 44),
                    entry.modified.format("%Y-%m-%d %H:%M:%S"),
                    format!("{:.1} KB", entry.size as f64 / 1024.0).dimmed()
                );
            }
        }
        BackupCommands::Restore { path } => {
            let snapshot = restore_backup(&paths.db_path, &path)?;
            if let Some(snapshot) = snapshot {
                print_messages(&[CmdMessage::info(format!(
                    "Current database saved to {}",
                    snapshot.display()
                ))]);
            }
            print_messages(&[CmdMessage::success(format!(
                "Database restored from {}",
                path.display()
            ))]);
        }
    }
    Ok(())
}

fn handle_config(paths: &StashPaths, key: Option<String>, value: Option<usize>) -> Result<()> {
    let mut widths = ColumnWidths::load(&paths.data_dir);
    match (key, value) {
        (None, _) => {
            let mut entries: Vec<(String, usize)> = widths
                .entries()
                .map(|(k, v)| (k.clone(), *v))
                .collect();
            if entries.is_empty() {
                println!("No column widths configured.");
                return Ok(());
            }
            entries.sort();
            for (key, width) in entries {
                println!("{} = {}", key, width);
            }
        }
        (Some(key), None) => match key.split_once('_') {
            Some((view, column)) => {
                println!("{} = {}", key, widths.get(view, column, 0));
            }
            None => println!("Unknown config key: {}", key),
        },
        (Some(key), Some(width)) => match key.split_once('_') {
            Some((view, column)) => {
                widths.set(view, column, width);
                widths.save()?;
                print_messages(&[CmdMessage::success(format!("{} = {}", key, width))]);
            }
            None => println!("Unknown config key: {}", key),
        },
    }
    Ok(())
}

fn handle_about(paths: &StashPaths) -> Result<()> {
    let info = AboutInfo::load(&paths.data_dir);
    println!("{} v{}", info.name.bold(), info.version);
    if !info.description.is_empty() {
        println!("{}", info.description);
    }
    println!();
    println!("Author:  {}", info.author);
    if !info.project_url.is_empty() {
        println!("URL:     {}", info.project_url);
    }
    if !info.build_date.is_empty() {
        println!("Built:   {}", info.build_date);
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const TIME_WIDTH: usize = 14;
const FAV_MARKER: &str = "★";

fn print_command_views(views: &[CommandView], widths: &ColumnWidths) {
    if views.is_empty() {
        println!("No commands found.");
        return;
    }

    let name_width = widths.get("commands", "name", 20);
    let command_width = widths.get("commands", "command", 44);
    let category_width = widths.get("commands", "category", 12);

    for view in views {
        let marker = if view.is_favorite {
            format!("{} ", FAV_MARKER).yellow()
        } else {
            "  ".normal()
        };
        println!(
            "{:>4}. {}{} {} {} {}",
            view.id,
            marker,
            pad_to_width(&view.name, name_width),
            pad_to_width(&view.display_command, command_width),
            pad_to_width(&view.category_name, category_width).cyan(),
            format_time_ago(view.created_at).dimmed()
        );
    }
}

fn print_categories(categories: &[Category], widths: &ColumnWidths) {
    if categories.is_empty() {
        println!("No categories found.");
        return;
    }

    let name_width = widths.get("categories", "name", 16);
    let description_width = widths.get("categories", "description", 42);

    for category in categories {
        println!(
            "{} {} {}",
            pad_to_width(&category.name, name_width),
            pad_to_width(category.description.as_deref().unwrap_or(""), description_width),
            format_time_ago(category.created_at).dimmed()
        );
    }
}

fn print_notes(notes: &[Note], widths: &ColumnWidths) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let title_width = widths.get("notes", "title", 28);
    let category_width = widths.get("notes", "category", 14);

    for note in notes {
        println!(
            "{:>4}. {} {} {}",
            note.id,
            pad_to_width(&note.title, title_width),
            pad_to_width(note.category.as_deref().unwrap_or(""), category_width).cyan(),
            format_time_ago(note.created_at).dimmed()
        );
    }
}

fn print_full_command(ctx: &AppContext, command: &Command) -> Result<()> {
    println!(
        "{} {}",
        format!("#{}", command.id).yellow(),
        command.name.bold()
    );
    println!("--------------------------------");
    println!("Category:  {}", ctx.api.describe_category(command.category_id)?);
    if let Some(description) = &command.description {
        println!("About:     {}", description);
    }
    println!(
        "Favorite:  {}",
        if command.is_favorite { "yes" } else { "no" }
    );
    println!("Created:   {}", command.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:   {}", command.updated_at.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", command.command);
    Ok(())
}

fn print_full_note(note: &Note) {
    println!("{} {}", format!("#{}", note.id).yellow(), note.title.bold());
    println!("--------------------------------");
    if let Some(category) = &note.category {
        println!("Category:  {}", category);
    }
    println!("Created:   {}", note.created_at.format("%Y-%m-%d %H:%M"));
    println!();
    if let Some(content) = &note.content {
        println!("{}", content);
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

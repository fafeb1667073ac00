//! # tasker
//!
//! Terminal front end for the task tracker. Loads settings, opens the task
//! board over a file-backed slot, runs one command, and exits.

#![deny(unsafe_code)]

mod render;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tasker_settings::TaskerSettings;
use tasker_tasks::messages::footer_message;
use tasker_tasks::{
    Deadline, EmptyStateMessages, FileSlot, Priority, Repeat, SortKey, TaskBoard, TaskDraft,
    TaskQuery, TaskStore,
};
use tracing::warn;

/// Personal task tracker.
#[derive(Parser, Debug)]
#[command(name = "tasker", about = "Personal task tracker", version)]
struct Cli {
    /// Directory holding the task list (overrides settings).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level or filter directive (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task.
    Add {
        /// Task name.
        name: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit the task at a store index; omitted fields keep their value.
    Edit {
        /// Store index shown by `list`.
        index: usize,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
        /// Remove the deadline.
        #[arg(long, conflicts_with_all = ["due", "at"])]
        clear_due: bool,
    },
    /// Mark a task done, or open again if it is done.
    Toggle {
        /// Store index shown by `list`.
        index: usize,
    },
    /// Delete a task.
    Delete {
        /// Store index shown by `list`.
        index: usize,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the filtered, sorted task list.
    List {
        /// Substring to look for in names and categories.
        #[arg(long, short, default_value = "")]
        search: String,
        /// Only show this exact category.
        #[arg(long, short, default_value = "")]
        category: String,
        /// Sort key (priority-asc, name-desc, due-asc, ...).
        #[arg(long)]
        sort: Option<String>,
    },
    /// List the distinct categories in use.
    Categories,
    /// Export all tasks.
    Export {
        /// Output format.
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace all tasks with a JSON export.
    Import {
        /// JSON file produced by `export --format json`.
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

/// Editable task fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Category label.
    #[arg(long)]
    category: Option<String>,
    /// Deadline date (YYYY-MM-DD), or a full date-time.
    #[arg(long)]
    due: Option<String>,
    /// Deadline time of day (HH:MM), combined with --due.
    #[arg(long, requires = "due")]
    at: Option<String>,
    /// Priority: high, medium, low, or none.
    #[arg(long)]
    priority: Option<String>,
    /// Repeat policy: none, daily, weekly.
    #[arg(long)]
    repeat: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (settings, settings_error) = match tasker_settings::load_settings() {
        Ok(settings) => (settings, None),
        Err(e) => (TaskerSettings::default(), Some(e)),
    };
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    tasker_core::logging::init_subscriber(&level);
    if let Some(e) = settings_error {
        warn!(error = %e, path = ?tasker_settings::settings_path(), "invalid settings, using defaults");
    }

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| settings.storage.resolved_data_dir());
    let store = TaskStore::with_key(FileSlot::new(&data_dir), settings.storage.key.clone());
    let mut board = TaskBoard::open(store);

    run(cli.command, &mut board, &settings)
}

fn run(command: Command, board: &mut TaskBoard<FileSlot>, settings: &TaskerSettings) -> Result<()> {
    match command {
        Command::Add { name, fields } => {
            let draft = fields.apply_to(TaskDraft::named(name))?;
            match board.add(draft)? {
                Some(index) => println!("Added task [{index}]"),
                None => println!("Task name is required; nothing added."),
            }
        }
        Command::Edit {
            index,
            name,
            fields,
            clear_due,
        } => {
            let task = board
                .get(index)
                .with_context(|| format!("no task at index {index}"))?;
            let mut draft = TaskDraft {
                name: name.unwrap_or_else(|| task.name.clone()),
                category: task.category.clone(),
                deadline: task.deadline,
                priority: task.priority,
                repeat: task.repeat,
            };
            if clear_due {
                draft.deadline = None;
            }
            let draft = fields.apply_to(draft)?;
            if board.edit(index, draft)? {
                println!("Updated task [{index}]");
            } else {
                println!("Task name is required; nothing changed.");
            }
        }
        Command::Toggle { index } => {
            let outcome = board.toggle(index, Utc::now())?;
            let state = if outcome.done { "completed" } else { "incomplete" };
            println!("Marked task [{index}] as {state}");
            if let Some(spawned) = outcome.spawned {
                println!("Next occurrence added as [{spawned}]");
            }
        }
        Command::Delete { index, yes } => {
            let name = &board
                .get(index)
                .with_context(|| format!("no task at index {index}"))?
                .name;
            if yes || confirm(&format!("Delete this task? ({name})"))? {
                let removed = board.delete(index)?;
                println!("Deleted \"{}\"", removed.name);
            }
        }
        Command::List {
            search,
            category,
            sort,
        } => {
            let sort: SortKey = sort
                .as_deref()
                .unwrap_or(&settings.view.default_sort)
                .parse()
                .unwrap_or_default();
            let query = TaskQuery {
                search,
                category,
                sort,
            };
            let view = board.query(&query);
            let messages = settings
                .messages
                .path
                .as_deref()
                .map(|p| EmptyStateMessages::load_or_default(Path::new(p)))
                .unwrap_or_default();
            let footer = footer_message(&view, &query.search, &messages, &mut rand::rng());
            println!("{}", render::render_view(&view, Local::now().naive_local(), &footer));
        }
        Command::Categories => {
            for category in board.query(&TaskQuery::default()).categories {
                println!("{category}");
            }
        }
        Command::Export { format, output } => {
            let content = match format {
                ExportFormat::Text => board.export_text()?,
                ExportFormat::Json => board.export_json()?,
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported {} tasks to {}", board.len(), path.display());
                }
                None => println!("{content}"),
            }
        }
        Command::Import { file, yes } => {
            let payload = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let pending = board.stage_import(&payload)?;
            let prompt = format!(
                "Replace current tasks with imported ones? ({} -> {})",
                board.len(),
                pending.len()
            );
            if yes || confirm(&prompt)? {
                let count = board.apply_import(pending)?;
                println!("Imported {count} tasks");
            } else {
                println!("Import cancelled");
            }
        }
    }
    Ok(())
}

impl FieldArgs {
    /// Overlay the given flags onto `draft`.
    fn apply_to(self, mut draft: TaskDraft) -> Result<TaskDraft> {
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(due) = self.due {
            draft.deadline = parse_deadline(&due, self.at.as_deref())?;
        }
        if let Some(priority) = self.priority {
            draft.priority = parse_priority(&priority)?;
        }
        if let Some(repeat) = self.repeat {
            draft.repeat = parse_repeat(&repeat)?;
        }
        Ok(draft)
    }
}

/// Combine a date and optional time into a deadline; an empty date clears it.
fn parse_deadline(date: &str, time: Option<&str>) -> Result<Option<Deadline>> {
    let date = date.trim();
    if date.is_empty() {
        return Ok(None);
    }
    let raw = match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) => format!("{date}T{time}"),
        None => date.to_string(),
    };
    Ok(Some(raw.parse()?))
}

fn parse_priority(raw: &str) -> Result<Option<Priority>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match Priority::parse_lossy(trimmed) {
        Some(priority) => Ok(Some(priority)),
        None => bail!("unknown priority {raw:?} (expected high, medium, low, or none)"),
    }
}

fn parse_repeat(raw: &str) -> Result<Repeat> {
    let repeat: Repeat = raw.parse().unwrap_or_default();
    let trimmed = raw.trim();
    if repeat == Repeat::None && !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("none") {
        bail!("unknown repeat {raw:?} (expected none, daily, or weekly)");
    }
    Ok(repeat)
}

fn confirm(prompt: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    confirm_with(prompt, &mut stdin.lock(), &mut std::io::stdout())
}

fn confirm_with(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    let _ = input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

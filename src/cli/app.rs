//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::{engine, Document, EngineError, Outcome};
use crate::storage::{Config, DocumentStore};

use super::output::{Output, OutputFormat};
use super::{external, view};

#[derive(Parser)]
#[command(name = "tick")]
#[command(author, version, about = "Markdown-backed todo lists for the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the todo file (overrides the configured one)
    #[arg(long, short = 'F')]
    pub file: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, env = "TICK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View todo lists and tasks
    View {
        /// Show only todo items
        #[arg(long, conflicts_with_all = ["done", "list"])]
        todo: bool,

        /// Show only done items
        #[arg(long, conflicts_with = "list")]
        done: bool,

        /// Show a single list (searched in todo first, then done)
        #[arg(long, short = 'l')]
        list: Option<String>,
    },

    /// Add a task to a list, creating the list when needed
    Add {
        /// Name of the list
        list: String,

        /// Task description
        task: String,
    },

    /// Add a new empty list
    AddList {
        /// Name of the new list
        list: String,
    },

    /// Mark a task as done
    Done {
        /// Name of the list
        list: String,

        /// Task number to mark as done
        position: usize,
    },

    /// Mark every task of a list as done
    DoneList {
        /// Name of the list
        list: String,
    },

    /// Restore a done task back to todo
    Restore {
        /// Name of the list
        list: String,

        /// Task number to restore
        position: usize,
    },

    /// Restore every task of a done list back to todo
    RestoreList {
        /// Name of the list
        list: String,
    },

    /// Move a task to a new position within its list
    Order {
        /// Name of the list
        list: String,

        /// Current position of the task
        from: usize,

        /// New position for the task
        to: usize,
    },

    /// Clear all done tasks (the lists stay, empty)
    ClearDone,

    /// Open the todo file in an editor
    Edit {
        /// Editor to use instead of the configured one
        #[arg(long, short = 'e')]
        editor: Option<String>,
    },

    /// Rewrite the todo file in canonical form
    Save,

    /// Persist editor / viewer / file settings
    Config {
        /// Set the default editor
        #[arg(long)]
        editor: Option<String>,

        /// Set the default viewer
        #[arg(long)]
        viewer: Option<String>,

        /// Set the default todo file path
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let config_path = match cli.config.or_else(Config::default_path) {
        Some(path) => path,
        None => anyhow::bail!("Could not determine config directory"),
    };
    output.verbose(&format!("Config file: {}", config_path.display()));

    let config = Config::load(&config_path)?;
    let todo_path = config.todo_file(cli.file)?;
    output.verbose(&format!("Todo file: {}", todo_path.display()));

    let store = DocumentStore::new(&todo_path);

    // bare `tick` shows the todo section
    let command = cli.command.unwrap_or(Commands::View {
        todo: true,
        done: false,
        list: None,
    });

    match command {
        Commands::View { todo, done, list } => view::run(
            &output,
            &store,
            config.viewer.as_deref(),
            todo,
            done,
            list.as_deref(),
        ),

        Commands::Add { list, task } => {
            mutate(&output, &store, |doc| engine::add_task(doc, &list, &task))
        }
        Commands::AddList { list } => {
            mutate(&output, &store, |doc| engine::add_list(doc, &list))
        }
        Commands::Done { list, position } => {
            mutate(&output, &store, |doc| engine::complete_task(doc, &list, position))
        }
        Commands::DoneList { list } => {
            mutate(&output, &store, |doc| engine::complete_list(doc, &list))
        }
        Commands::Restore { list, position } => {
            mutate(&output, &store, |doc| engine::restore_task(doc, &list, position))
        }
        Commands::RestoreList { list } => {
            mutate(&output, &store, |doc| engine::restore_list(doc, &list))
        }
        Commands::Order { list, from, to } => {
            mutate(&output, &store, |doc| engine::reorder_task(doc, &list, from, to))
        }
        Commands::ClearDone => mutate(&output, &store, |doc| Ok(engine::clear_done(doc))),

        Commands::Edit { editor } => edit(&output, &config, &store, editor),
        Commands::Save => save(&output, &store),
        Commands::Config { editor, viewer, file } => {
            save_config(&output, &config_path, editor, viewer, file)
        }
    }
}

/// Applies one engine operation and writes the file back
///
/// The file is left untouched when the operation fails.
fn mutate<F>(output: &Output, store: &DocumentStore, op: F) -> Result<()>
where
    F: FnOnce(&mut Document) -> Result<Outcome, EngineError>,
{
    let mut doc = store.load()?;
    let outcome = op(&mut doc)?;
    store.save(&doc)?;

    if output.is_json() {
        output.data(&outcome_json(&outcome));
    } else {
        output.success(&outcome.to_string());
    }
    Ok(())
}

fn outcome_json(outcome: &Outcome) -> serde_json::Value {
    use serde_json::json;

    match outcome {
        Outcome::TaskAdded { list, task, new_list } => {
            json!({"op": "add", "list": list, "task": task, "new_list": new_list})
        }
        Outcome::ListAdded { list } => json!({"op": "add-list", "list": list}),
        Outcome::TaskCompleted { list, task } => {
            json!({"op": "done", "list": list, "task": task})
        }
        Outcome::ListCompleted { list, moved } => {
            json!({"op": "done-list", "list": list, "moved": moved})
        }
        Outcome::TaskRestored { list, task } => {
            json!({"op": "restore", "list": list, "task": task})
        }
        Outcome::ListRestored { list, moved } => {
            json!({"op": "restore-list", "list": list, "moved": moved})
        }
        Outcome::TaskReordered { list, task, from, to } => {
            json!({"op": "order", "list": list, "task": task, "from": from, "to": to})
        }
        Outcome::DoneCleared { tasks } => json!({"op": "clear-done", "tasks": tasks}),
    }
}

fn edit(
    output: &Output,
    config: &Config,
    store: &DocumentStore,
    editor_flag: Option<String>,
) -> Result<()> {
    let editor = match editor_flag.or_else(|| config.editor.clone()) {
        Some(editor) => editor,
        None => anyhow::bail!("No editor configured. Set one with 'tick config --editor'."),
    };

    output.verbose(&format!(
        "Opening {} with '{}'",
        store.path().display(),
        editor
    ));
    external::edit(&editor, store.path())
}

/// Rewrites the file from its parsed form, normalizing numbering and spacing
fn save(output: &Output, store: &DocumentStore) -> Result<()> {
    let doc = store.load()?;
    store.save(&doc)?;
    output.success(&format!("Saved {}", store.path().display()));
    Ok(())
}

fn save_config(
    output: &Output,
    path: &std::path::Path,
    editor: Option<String>,
    viewer: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    let mut config = Config::load(path)?;

    if editor.is_none() && viewer.is_none() && file.is_none() {
        output.success(&format!("Config file: {}", path.display()));
        return Ok(());
    }

    if editor.is_some() {
        config.editor = editor;
    }
    if viewer.is_some() {
        config.viewer = viewer;
    }
    if file.is_some() {
        config.file = file;
    }

    config.save(path)?;
    output.success(&format!("Configuration saved to {}", path.display()));
    Ok(())
}

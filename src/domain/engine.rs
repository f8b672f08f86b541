//! List and task mutations
//!
//! Every user-facing command maps to one operation here. Operations resolve
//! list names through the [resolver](super::resolver), validate 1-based
//! positions before touching anything, and return a structured [`Outcome`].
//! Expected misuse (unknown list, bad index, blank input) comes back as an
//! [`EngineError`], never a panic, and leaves the document unchanged.

use std::fmt;

use thiserror::Error;

use super::document::{Document, Section};
use super::resolver::{self, Match};

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("No list named '{0}'")]
    ListNotFound(String),

    #[error("Invalid task number {position} in list '{list}'")]
    InvalidPosition { list: String, position: usize },

    #[error("Empty {0} is not allowed")]
    EmptyInput(&'static str),

    #[error("List '{0}' already exists")]
    DuplicateList(String),
}

/// What a successful operation did, for reporting
///
/// `list` always carries the canonical name the operation acted on, which
/// may differ from what the user typed when the resolver stepped in.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    TaskAdded { list: String, task: String, new_list: bool },
    ListAdded { list: String },
    TaskCompleted { list: String, task: String },
    ListCompleted { list: String, moved: usize },
    TaskRestored { list: String, task: String },
    ListRestored { list: String, moved: usize },
    TaskReordered { list: String, task: String, from: usize, to: usize },
    DoneCleared { tasks: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::TaskAdded { list, task, new_list: true } => {
                write!(f, "Added task '{}' to new list '{}'", task, list)
            }
            Outcome::TaskAdded { list, task, new_list: false } => {
                write!(f, "Added task '{}' to list '{}'", task, list)
            }
            Outcome::ListAdded { list } => write!(f, "Added new list '{}'", list),
            Outcome::TaskCompleted { list, task } => {
                write!(f, "Done task '{}' in list '{}'", task, list)
            }
            Outcome::ListCompleted { list, moved } => {
                write!(f, "Done list '{}' ({} tasks)", list, moved)
            }
            Outcome::TaskRestored { list, task } => {
                write!(f, "Restored task '{}' to list '{}'", task, list)
            }
            Outcome::ListRestored { list, moved } => {
                write!(f, "Restored list '{}' ({} tasks)", list, moved)
            }
            Outcome::TaskReordered { list, task, from, to } => {
                write!(
                    f,
                    "Moved task '{}' from position {} to {} in list '{}'",
                    task, from, to, list
                )
            }
            Outcome::DoneCleared { tasks } => write!(f, "Cleared {} done tasks", tasks),
        }
    }
}

/// Appends a task to a todo list, creating the list when no existing one
/// resolves
///
/// This is the only name-taking operation that tolerates an unknown list.
pub fn add_task(doc: &mut Document, list: &str, text: &str) -> Result<Outcome, EngineError> {
    let task = normalize(text);
    if task.is_empty() {
        return Err(EngineError::EmptyInput("task text"));
    }
    let list = list.trim();
    if list.is_empty() {
        return Err(EngineError::EmptyInput("list name"));
    }

    let (name, new_list) = match resolver::resolve(list, doc.todo.names()) {
        Match::NotFound => (list.to_string(), true),
        found => (found.name().unwrap_or(list).to_string(), false),
    };

    doc.todo.open_list(&name).push(task.clone());
    Ok(Outcome::TaskAdded { list: name, task, new_list })
}

/// Creates a new empty list in the todo section
pub fn add_list(doc: &mut Document, name: &str) -> Result<Outcome, EngineError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::EmptyInput("list name"));
    }

    let lowered = name.to_lowercase();
    if let Some(existing) = doc.todo.names().find(|n| n.to_lowercase() == lowered) {
        return Err(EngineError::DuplicateList(existing.to_string()));
    }

    doc.todo.open_list(name);
    Ok(Outcome::ListAdded { list: name.to_string() })
}

/// Moves the task at `position` from a todo list to the same-named done list
pub fn complete_task(doc: &mut Document, list: &str, position: usize) -> Result<Outcome, EngineError> {
    let (list, task) = move_task(&mut doc.todo, &mut doc.done, list, position)?;
    Ok(Outcome::TaskCompleted { list, task })
}

/// Moves every task of a todo list to the same-named done list
///
/// The source list stays behind, empty.
pub fn complete_list(doc: &mut Document, list: &str) -> Result<Outcome, EngineError> {
    let (list, moved) = move_all(&mut doc.todo, &mut doc.done, list)?;
    Ok(Outcome::ListCompleted { list, moved })
}

/// Moves the task at `position` from a done list back to todo
pub fn restore_task(doc: &mut Document, list: &str, position: usize) -> Result<Outcome, EngineError> {
    let (list, task) = move_task(&mut doc.done, &mut doc.todo, list, position)?;
    Ok(Outcome::TaskRestored { list, task })
}

/// Moves every task of a done list back to the same-named todo list
pub fn restore_list(doc: &mut Document, list: &str) -> Result<Outcome, EngineError> {
    let (list, moved) = move_all(&mut doc.done, &mut doc.todo, list)?;
    Ok(Outcome::ListRestored { list, moved })
}

/// Moves a task within a todo list from one 1-based position to another
///
/// Both positions are validated against the list length before removal.
pub fn reorder_task(
    doc: &mut Document,
    list: &str,
    from: usize,
    to: usize,
) -> Result<Outcome, EngineError> {
    let name = resolve_required(&doc.todo, list)?;
    let tasks = doc
        .todo
        .tasks_mut(&name)
        .ok_or_else(|| EngineError::ListNotFound(name.clone()))?;

    let len = tasks.len();
    for position in [from, to] {
        if !(1..=len).contains(&position) {
            return Err(EngineError::InvalidPosition { list: name.clone(), position });
        }
    }

    let task = tasks.remove(from - 1);
    tasks.insert(to - 1, task.clone());
    Ok(Outcome::TaskReordered { list: name, task, from, to })
}

/// Empties every done list, keeping the lists themselves
pub fn clear_done(doc: &mut Document) -> Outcome {
    Outcome::DoneCleared { tasks: doc.done.clear_tasks() }
}

/// Resolves a list name that must already exist in `section`
fn resolve_required(section: &Section, list: &str) -> Result<String, EngineError> {
    resolver::resolve(list, section.names())
        .name()
        .map(str::to_string)
        .ok_or_else(|| EngineError::ListNotFound(list.to_string()))
}

fn move_task(
    source: &mut Section,
    target: &mut Section,
    list: &str,
    position: usize,
) -> Result<(String, String), EngineError> {
    let name = resolve_required(source, list)?;
    let tasks = source
        .tasks_mut(&name)
        .ok_or_else(|| EngineError::ListNotFound(name.clone()))?;

    if !(1..=tasks.len()).contains(&position) {
        return Err(EngineError::InvalidPosition { list: name, position });
    }

    let task = tasks.remove(position - 1);
    target.open_list(&name).push(task.clone());
    Ok((name, task))
}

fn move_all(
    source: &mut Section,
    target: &mut Section,
    list: &str,
) -> Result<(String, usize), EngineError> {
    let name = resolve_required(source, list)?;
    let tasks = source
        .tasks_mut(&name)
        .ok_or_else(|| EngineError::ListNotFound(name.clone()))?;

    let moved = std::mem::take(tasks);
    let count = moved.len();
    target.open_list(&name).extend(moved);
    Ok((name, count))
}

/// Collapses task text onto a single line with single spaces
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(list: &str, tasks: &[&str]) -> Document {
        let mut doc = Document::new();
        let entry = doc.todo.open_list(list);
        entry.extend(tasks.iter().map(|t| t.to_string()));
        doc
    }

    #[test]
    fn shopping_scenario() {
        let mut doc = Document::new();
        add_list(&mut doc, "Shopping").unwrap();
        add_task(&mut doc, "Shopping", "Buy milk").unwrap();
        complete_task(&mut doc, "Shopping", 1).unwrap();

        assert!(doc.todo.tasks("Shopping").unwrap().is_empty());
        assert_eq!(doc.done.tasks("Shopping").unwrap(), ["Buy milk"]);
    }

    #[test]
    fn reorder_scenario() {
        let mut doc = Document::new();
        add_task(&mut doc, "Work", "A").unwrap();
        add_task(&mut doc, "Work", "B").unwrap();
        add_task(&mut doc, "Work", "C").unwrap();

        reorder_task(&mut doc, "Work", 1, 3).unwrap();
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["B", "C", "A"]);
    }

    #[test]
    fn complete_on_unknown_list_leaves_document_unchanged() {
        let mut doc = doc_with("Work", &["a"]);
        let before = doc.clone();

        let err = complete_task(&mut doc, "NoSuchList", 1).unwrap_err();
        assert_eq!(err, EngineError::ListNotFound("NoSuchList".to_string()));
        assert_eq!(doc, before);
    }

    #[test]
    fn reorder_out_of_range_leaves_document_unchanged() {
        let mut doc = doc_with("Work", &["a", "b"]);
        let before = doc.clone();

        for (from, to) in [(0, 1), (3, 1), (1, 0), (1, 3)] {
            let err = reorder_task(&mut doc, "Work", from, to).unwrap_err();
            assert!(matches!(err, EngineError::InvalidPosition { .. }));
            assert_eq!(doc, before);
        }
    }

    #[test]
    fn complete_then_restore_conserves_order() {
        let mut doc = doc_with("Work", &["a", "b", "c"]);

        complete_task(&mut doc, "Work", 2).unwrap();
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a", "c"]);

        // the restored task comes back at the end of the todo list
        restore_task(&mut doc, "Work", 1).unwrap();
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a", "c", "b"]);
        assert!(doc.done.tasks("Work").unwrap().is_empty());
    }

    #[test]
    fn complete_then_restore_last_position_is_identity() {
        let mut doc = doc_with("Work", &["a", "b", "c"]);

        complete_task(&mut doc, "Work", 3).unwrap();
        restore_task(&mut doc, "Work", 1).unwrap();
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn complete_list_empties_but_keeps_source() {
        let mut doc = doc_with("Work", &["a", "b"]);

        let outcome = complete_list(&mut doc, "Work").unwrap();
        assert_eq!(outcome, Outcome::ListCompleted { list: "Work".to_string(), moved: 2 });
        assert!(doc.todo.contains("Work"));
        assert!(doc.todo.tasks("Work").unwrap().is_empty());
        assert_eq!(doc.done.tasks("Work").unwrap(), ["a", "b"]);
    }

    #[test]
    fn restore_list_is_the_inverse() {
        let mut doc = doc_with("Work", &["a", "b"]);
        complete_list(&mut doc, "Work").unwrap();
        restore_list(&mut doc, "Work").unwrap();

        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a", "b"]);
        assert!(doc.done.tasks("Work").unwrap().is_empty());
    }

    #[test]
    fn completing_appends_to_existing_done_list() {
        let mut doc = doc_with("Work", &["new"]);
        doc.done.open_list("Work").push("old".to_string());

        complete_task(&mut doc, "Work", 1).unwrap();
        assert_eq!(doc.done.tasks("Work").unwrap(), ["old", "new"]);
    }

    #[test]
    fn clear_done_is_idempotent() {
        let mut doc = Document::new();
        doc.done.open_list("Work").push("a".to_string());
        doc.done.open_list("Home").push("b".to_string());

        assert_eq!(clear_done(&mut doc), Outcome::DoneCleared { tasks: 2 });
        let after_first = doc.clone();

        assert_eq!(clear_done(&mut doc), Outcome::DoneCleared { tasks: 0 });
        assert_eq!(doc, after_first);
        assert_eq!(doc.done.len(), 2);
    }

    #[test]
    fn add_task_resolves_close_names() {
        let mut doc = doc_with("Shopping", &[]);

        let outcome = add_task(&mut doc, "shoping", "Buy milk").unwrap();
        assert_eq!(
            outcome,
            Outcome::TaskAdded {
                list: "Shopping".to_string(),
                task: "Buy milk".to_string(),
                new_list: false,
            }
        );
        assert_eq!(doc.todo.len(), 1);
    }

    #[test]
    fn add_task_creates_unmatched_list() {
        let mut doc = doc_with("Work", &[]);

        let outcome = add_task(&mut doc, "Groceries", "Milk").unwrap();
        assert_eq!(
            outcome,
            Outcome::TaskAdded {
                list: "Groceries".to_string(),
                task: "Milk".to_string(),
                new_list: true,
            }
        );
        assert_eq!(doc.todo.tasks("Groceries").unwrap(), ["Milk"]);
    }

    #[test]
    fn add_task_rejects_blank_text() {
        let mut doc = Document::new();
        let err = add_task(&mut doc, "Work", "   ").unwrap_err();
        assert_eq!(err, EngineError::EmptyInput("task text"));
        assert!(doc.is_empty());
    }

    #[test]
    fn add_task_normalizes_whitespace() {
        let mut doc = Document::new();
        add_task(&mut doc, "Work", "  buy\n milk  ").unwrap();
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["buy milk"]);
    }

    #[test]
    fn add_list_rejects_case_insensitive_duplicates() {
        let mut doc = Document::new();
        add_list(&mut doc, "Work").unwrap();

        let err = add_list(&mut doc, "WORK").unwrap_err();
        assert_eq!(err, EngineError::DuplicateList("Work".to_string()));
        assert_eq!(doc.todo.len(), 1);
    }

    #[test]
    fn add_list_only_checks_todo_section() {
        let mut doc = Document::new();
        doc.done.open_list("Work");

        // a done list with the same name does not block creation
        add_list(&mut doc, "Work").unwrap();
        assert!(doc.todo.contains("Work"));
    }
}

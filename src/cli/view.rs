//! View command rendering
//!
//! Renders the document (or a slice of it) in the same markdown dialect the
//! file uses, optionally piped through a configured pager. JSON mode emits
//! the sections as ordered arrays instead of rendered text.

use anyhow::Result;
use serde_json::json;

use crate::domain::{self, Document, EngineError, Section, SectionKind};
use crate::storage::{self, DocumentStore};

use super::external;
use super::output::Output;

pub fn run(
    output: &Output,
    store: &DocumentStore,
    viewer: Option<&str>,
    todo_only: bool,
    done_only: bool,
    list: Option<&str>,
) -> Result<()> {
    let doc = store.load()?;

    if output.is_json() {
        output.data(&to_json(&doc, todo_only, done_only, list)?);
        return Ok(());
    }

    let rendered = if let Some(requested) = list {
        let (kind, name) = find_list(&doc, requested)?;
        let tasks = doc.section(kind).tasks(&name).unwrap_or(&[]);
        storage::serialize_list(kind.label(), &name, tasks)
    } else if todo_only {
        storage::serialize_section(SectionKind::Todo.label(), &doc.todo)
    } else if done_only {
        storage::serialize_section(SectionKind::Done.label(), &doc.done)
    } else {
        storage::serialize(&doc)
    };

    match viewer {
        Some(viewer) => {
            if let Err(e) = external::pipe_to_viewer(viewer, &rendered) {
                output.warning(&format!("{:#}; falling back to stdout", e));
                print!("{}", rendered);
            }
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Finds a list by name, searching the todo section before done
fn find_list(doc: &Document, requested: &str) -> Result<(SectionKind, String), EngineError> {
    for kind in [SectionKind::Todo, SectionKind::Done] {
        if let Some(name) = domain::resolve(requested, doc.section(kind).names()).name() {
            return Ok((kind, name.to_string()));
        }
    }
    Err(EngineError::ListNotFound(requested.to_string()))
}

fn to_json(
    doc: &Document,
    todo_only: bool,
    done_only: bool,
    list: Option<&str>,
) -> Result<serde_json::Value> {
    if let Some(requested) = list {
        let (kind, name) = find_list(doc, requested)?;
        let tasks = doc.section(kind).tasks(&name).unwrap_or(&[]);
        return Ok(json!({
            "section": kind.label(),
            "name": name,
            "tasks": tasks,
        }));
    }

    let value = if todo_only {
        json!({"todo": section_json(&doc.todo)})
    } else if done_only {
        json!({"done": section_json(&doc.done)})
    } else {
        json!({
            "todo": section_json(&doc.todo),
            "done": section_json(&doc.done),
        })
    };
    Ok(value)
}

/// Sections serialize as arrays so insertion order survives JSON
fn section_json(section: &Section) -> serde_json::Value {
    json!(section
        .iter()
        .map(|(name, tasks)| json!({"name": name, "tasks": tasks}))
        .collect::<Vec<_>>())
}

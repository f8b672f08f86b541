//! Markdown storage for the todo file
//!
//! The whole document lives in one human-editable markdown file:
//!
//! ```text
//! # Todo
//!
//! ## Shopping
//! 1. Buy milk
//! 2. Buy bread
//!
//! # Done
//!
//! ## Shopping
//! 1. Order groceries
//! ```
//!
//! Parsing is total: malformed content degrades to empty sections instead of
//! failing, so a hand-edited file can always be read back. Serialization
//! regenerates item numbers and is round-trip stable for any document the
//! mutation engine can produce.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{Document, Section, SectionKind};

/// Parses markdown text into a document
///
/// Line rules, applied after trimming each line:
/// - `# Todo` / `# Done` switch the current section; any other top-level
///   heading is ignored and closes the current section, so its items cannot
///   leak into a preceding list.
/// - `## <name>` starts a list in the current section. A repeated heading
///   re-opens the existing list and later items append to it.
/// - `<number>. <text>` appends `<text>` to the open list; the printed
///   number is ignored, only line order counts.
/// - Any other non-blank line while a list is open is appended verbatim as
///   a task. Non-blank lines with no open list are ignored, as is anything
///   before the first recognized section heading.
pub fn parse(text: &str) -> Document {
    let mut doc = Document::new();
    let mut section: Option<SectionKind> = None;
    let mut list: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(heading) = line.strip_prefix("# ") {
            section = match heading.trim() {
                label if label == SectionKind::Todo.label() => Some(SectionKind::Todo),
                label if label == SectionKind::Done.label() => Some(SectionKind::Done),
                _ => None,
            };
            list = None;
        } else if let Some(heading) = line.strip_prefix("## ") {
            if let Some(kind) = section {
                // trimming the line guarantees a non-empty name here
                let name = heading.trim().to_string();
                doc.section_mut(kind).open_list(&name);
                list = Some(name);
            }
        } else if let (Some(kind), Some(name)) = (section, list.as_deref()) {
            let task = strip_item_number(line);
            if !task.is_empty() {
                doc.section_mut(kind).open_list(name).push(task.to_string());
            }
        }
    }

    doc
}

/// Serializes a document back to markdown
///
/// Item numbers are regenerated from sequence order; lists with no tasks
/// still emit their heading. Output is byte-stable for a given document.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    render_section(&mut out, SectionKind::Todo.label(), &doc.todo);
    render_section(&mut out, SectionKind::Done.label(), &doc.done);
    out
}

/// Renders one section in the file dialect, heading included
pub fn serialize_section(label: &str, section: &Section) -> String {
    let mut out = String::new();
    render_section(&mut out, label, section);
    out
}

/// Renders a single named list under a section heading
pub fn serialize_list(label: &str, name: &str, tasks: &[String]) -> String {
    let mut out = format!("# {}\n\n## {}\n", label, name);
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, task));
    }
    out
}

fn render_section(out: &mut String, label: &str, section: &Section) {
    out.push_str(&format!("# {}\n\n", label));
    for (name, tasks) in section.iter() {
        out.push_str(&format!("## {}\n", name));
        for (i, task) in tasks.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, task));
        }
        out.push('\n');
    }
}

/// Strips a `<number>. ` prefix from an item line, if present
fn strip_item_number(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < line.len() {
        if let Some(text) = rest.strip_prefix('.') {
            if text.starts_with(char::is_whitespace) {
                return text.trim_start();
            }
        }
    }
    line
}

/// Store for the document as a single markdown file
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the todo file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads and parses the file; a missing file yields an empty document
    pub fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read todo file: {}", self.path.display()))?;

        Ok(parse(&content))
    }

    /// Serializes and writes the document atomically (temp file + rename)
    pub fn save(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let temp_path = self.path.with_extension("md.tmp");
        fs::write(&temp_path, serialize(doc))
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::engine;
    use tempfile::TempDir;

    #[test]
    fn parse_both_sections() {
        let doc = parse(
            "# Todo\n\n## Work\n1. write report\n2. send mail\n\n# Done\n\n## Work\n1. standup\n",
        );

        assert_eq!(doc.todo.tasks("Work").unwrap(), ["write report", "send mail"]);
        assert_eq!(doc.done.tasks("Work").unwrap(), ["standup"]);
    }

    #[test]
    fn parse_missing_done_section() {
        let doc = parse("# Todo\n\n## Work\n1. a\n");
        assert_eq!(doc.todo.len(), 1);
        assert!(doc.done.is_empty());
    }

    #[test]
    fn parse_empty_input_yields_empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("random text\nwith no headings\n").is_empty());
    }

    #[test]
    fn parse_list_heading_without_items() {
        let doc = parse("# Todo\n\n## Empty\n\n# Done\n");
        assert!(doc.todo.contains("Empty"));
        assert!(doc.todo.tasks("Empty").unwrap().is_empty());
    }

    #[test]
    fn parse_ignores_printed_numbers() {
        // order is line order, the numbers are display only
        let doc = parse("# Todo\n\n## Work\n9. first\n1. second\n");
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["first", "second"]);
    }

    #[test]
    fn parse_keeps_unnumbered_lines_as_tasks() {
        let doc = parse("# Todo\n\n## Work\n1. a\nhand-written item\n");
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a", "hand-written item"]);
    }

    #[test]
    fn parse_ignores_tasks_without_a_list() {
        let doc = parse("# Todo\n1. orphan\n\n## Work\n1. a\n");
        assert_eq!(doc.todo.len(), 1);
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a"]);
    }

    #[test]
    fn parse_unknown_section_does_not_leak_items() {
        let doc = parse("# Todo\n\n## Work\n1. a\n\n# Notes\nstray line\n1. stray item\n");
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a"]);
    }

    #[test]
    fn parse_bare_marker_line_is_a_task() {
        // "##" without a trailing space is not a heading
        let doc = parse("# Todo\n\n## Work\n1. a\n##\n");
        assert_eq!(doc.todo.len(), 1);
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a", "##"]);
    }

    #[test]
    fn parse_repeated_list_heading_appends() {
        let doc = parse("# Todo\n\n## Work\n1. a\n\n## Work\n1. b\n");
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["a", "b"]);
    }

    #[test]
    fn parse_same_name_in_both_sections() {
        let doc = parse("# Todo\n\n## Work\n1. open\n\n# Done\n\n## Work\n1. closed\n");
        assert_eq!(doc.todo.tasks("Work").unwrap(), ["open"]);
        assert_eq!(doc.done.tasks("Work").unwrap(), ["closed"]);
    }

    #[test]
    fn serialize_empty_document() {
        assert_eq!(serialize(&Document::new()), "# Todo\n\n# Done\n\n");
    }

    #[test]
    fn serialize_renumbers_from_one() {
        let mut doc = Document::new();
        engine::add_task(&mut doc, "Work", "a").unwrap();
        engine::add_task(&mut doc, "Work", "b").unwrap();
        engine::complete_task(&mut doc, "Work", 1).unwrap();

        let text = serialize(&doc);
        assert!(text.contains("# Todo\n\n## Work\n1. b\n"));
        assert!(text.contains("# Done\n\n## Work\n1. a\n"));
    }

    #[test]
    fn serialize_keeps_empty_lists() {
        let mut doc = Document::new();
        engine::add_list(&mut doc, "Empty").unwrap();

        let text = serialize(&doc);
        assert!(text.contains("## Empty\n"));
        assert_eq!(parse(&text), doc);
    }

    #[test]
    fn round_trip_is_stable() {
        let mut doc = Document::new();
        engine::add_task(&mut doc, "Work", "write report").unwrap();
        engine::add_task(&mut doc, "Work", "2. looks numbered").unwrap();
        engine::add_task(&mut doc, "Home", "# looks like a heading").unwrap();
        engine::complete_task(&mut doc, "Work", 1).unwrap();

        let text = serialize(&doc);
        assert_eq!(parse(&text), doc);
        // serializing the reparsed document is byte-identical
        assert_eq!(serialize(&parse(&text)), text);
    }

    #[test]
    fn store_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("TODO.md"));

        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn store_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("nested").join("TODO.md"));

        let mut doc = Document::new();
        engine::add_task(&mut doc, "Work", "a").unwrap();
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), doc);
        // temp file from the atomic write is gone
        assert!(!dir.path().join("nested").join("TODO.md.tmp").exists());
    }
}

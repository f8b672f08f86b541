//! Tick - a markdown-backed todo list manager
//!
//! Tick keeps per-list todo and done items in one human-editable markdown
//! file. The domain layer owns the document model and its mutations, the
//! storage layer owns the file dialect and configuration, and the CLI wires
//! them to the terminal.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Document, EngineError, Match, Outcome, Section, SectionKind};

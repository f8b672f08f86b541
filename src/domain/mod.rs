//! Domain models for tick
//!
//! Contains the document model and the operations over it, free of any I/O
//! concerns.

mod document;
pub mod engine;
mod resolver;

pub use document::{Document, Section, SectionKind};
pub use engine::{EngineError, Outcome};
pub use resolver::{resolve, similarity, Match, SIMILARITY_THRESHOLD};

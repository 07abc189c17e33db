//! Flashcard note scanning for markdown documents.
//!
//! Provides:
//! - Span bookkeeping and offset-stable text insertion
//! - Block, inline and custom-pattern note extraction
//! - Document scanning into notes to add, edit and delete
//! - Writing assigned note IDs back into the document
//! - AnkiConnect request payloads for a finished scan

pub mod anki;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod parser;
pub mod patch;
pub mod scanner;
pub mod span;
pub mod types;
pub mod writer;

pub use config::{CustomRegexp, ScanConfig, ScanSettings, Syntax};
pub use context::{context_at_index, Heading};
pub use error::{Result, ScanError};
pub use format::{FieldFormatter, PlainFormatter};
pub use parser::{BlockNote, InlineNote, NoteExtractor, ParseContext, RegexNote};
pub use patch::{insert_into_string, Insertion};
pub use scanner::{Document, PendingNote, ScanResult, ScanState, Scanner};
pub use span::{contained_in, findignore, spans, FindIgnore, IgnoreSpans, Span};
pub use types::{AnkiNote, NoteEdit, NoteId, NoteIdentifier, NoteTemplate, ParsedNote, ScanWarning};
pub use writer::{id_string, remove_empties};

//! Core types for note scanning.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// External note-store identifier.
pub type NoteId = i64;

/// Field name to field content, as sent to the note store.
pub type Fields = BTreeMap<String, String>;

/// Outcome of extracting a single note from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteIdentifier {
    /// The note carries no ID marker and must be created.
    New,
    /// The note carries an `ID: <n>` marker.
    Declared(NoteId),
    /// The note carries an ID marker whose digits are not a valid [`NoteId`].
    InvalidId(String),
    /// The matched text is not a well-formed note of this kind (e.g. a cloze
    /// note type without any cloze deletion).
    NotANote,
    /// The note type is not configured.
    UnrecognizedModel,
}

/// Duplicate handling options for note creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    pub allow_duplicate: bool,
    pub duplicate_scope: String,
}

impl Default for NoteOptions {
    fn default() -> Self {
        Self {
            allow_duplicate: false,
            duplicate_scope: "deck".to_string(),
        }
    }
}

/// A note in the note store's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnkiNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: Fields,
    pub options: NoteOptions,
    pub tags: Vec<String>,
}

/// Defaults every extracted note starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NoteTemplate {
    pub deck_name: String,
    pub model_name: String,
    pub tags: Vec<String>,
    pub options: NoteOptions,
}

impl Default for NoteTemplate {
    fn default() -> Self {
        Self {
            deck_name: "Default".to_string(),
            model_name: "Basic".to_string(),
            tags: vec!["Obsidian_to_Anki".to_string()],
            options: NoteOptions::default(),
        }
    }
}

impl NoteTemplate {
    /// Start a note of `model_name` from this template.
    pub fn note(&self, model_name: &str) -> AnkiNote {
        AnkiNote {
            deck_name: self.deck_name.clone(),
            model_name: model_name.to_string(),
            fields: Fields::new(),
            options: self.options.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Extractor output: the note payload plus what the document says about its ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub identifier: NoteIdentifier,
    pub note: AnkiNote,
}

/// A note that already exists in the note store and should be overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEdit {
    pub id: NoteId,
    pub note: AnkiNote,
}

/// Which extraction pass produced a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Block,
    Inline,
    Regex,
}

/// A note excluded from the scan, reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanWarning {
    UnrecognizedModel { path: String, model: String },
    UnknownId { path: String, id: NoteId },
    InvalidId { path: String, id: String },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedModel { path, model } => {
                write!(f, "did not recognise note type {} in file {}", model, path)
            }
            Self::UnknownId { path, id } => {
                write!(f, "note with id {} in file {} does not exist in Anki", id, path)
            }
            Self::InvalidId { path, id } => {
                write!(f, "note id {} in file {} is not a valid note id", id, path)
            }
        }
    }
}

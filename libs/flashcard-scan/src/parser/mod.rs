//! Note extraction from matched document text.
//!
//! Each note syntax carves its raw pieces (note type, identifier, tags, field
//! text) out of a match differently; everything after that is shared and
//! lives in [`NoteExtractor::extract`].
//!
//! # Block note
//! ```markdown
//! START
//! Basic
//! Front: What is Rust?
//! Back: A systems programming language.
//! Tags: lang
//! ID: 1566052191670
//! END
//! ```
//!
//! # Inline note
//! ```markdown
//! STARTI [Basic] What is Rust? Back: A language. ENDI
//! ```

pub mod block;
pub mod custom;
pub mod inline;

pub use block::BlockNote;
pub use custom::RegexNote;
pub use inline::InlineNote;

use crate::config::{ScanSettings, TAG_SEP};
use crate::format::{has_cloze, FieldFormatter};
use crate::types::{Fields, NoteIdentifier, ParsedNote};
use std::collections::BTreeMap;

/// Note type to the field defaults declared by `FROZEN` blocks.
pub type FrozenFields = BTreeMap<String, Fields>;

/// Everything an extractor needs besides the matched text.
pub struct ParseContext<'a> {
    pub settings: &'a ScanSettings,
    pub formatter: &'a dyn FieldFormatter,
    pub deck: &'a str,
    pub url: Option<&'a str>,
    pub frozen_fields: &'a FrozenFields,
    /// Heading breadcrumb, when context is enabled.
    pub context: Option<&'a str>,
}

/// Pieces of a note before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNote {
    pub note_type: String,
    pub identifier: NoteIdentifier,
    pub tags: Vec<String>,
    pub fields: Fields,
}

/// Turns one matched region into a note.
pub trait NoteExtractor {
    /// Split the match into note type, identifier, tags and field text.
    fn raw_note(&self, settings: &ScanSettings) -> RawNote;

    fn extract(&self, ctx: &ParseContext<'_>) -> ParsedNote {
        finish(self.raw_note(ctx.settings), ctx)
    }
}

fn finish(raw: RawNote, ctx: &ParseContext<'_>) -> ParsedNote {
    let settings = ctx.settings;
    let mut note = settings.template.note(&raw.note_type);
    if settings.field_names(&raw.note_type).is_none() {
        return ParsedNote {
            identifier: NoteIdentifier::UnrecognizedModel,
            note,
        };
    }

    note.fields = raw
        .fields
        .iter()
        .map(|(name, text)| {
            let formatted =
                ctx.formatter
                    .format(text, settings.curly_cloze, settings.highlights_to_cloze);
            (name.clone(), formatted)
        })
        .collect();

    if let (true, Some(url)) = (settings.add_file_link, ctx.url) {
        if let Some(field) = settings
            .file_link_field(&raw.note_type)
            .and_then(|name| note.fields.get_mut(name))
        {
            field.push_str(&format!(
                "<br><a href=\"{}\" class=\"obsidian-link\">Obsidian</a>",
                url
            ));
        }
    }

    if let Some(frozen) = ctx.frozen_fields.get(&raw.note_type) {
        for (name, extra) in frozen {
            if let Some(field) = note.fields.get_mut(name) {
                field.push_str(extra);
            }
        }
    }

    if let Some(context) = ctx.context {
        if let Some(field) = settings
            .context_field(&raw.note_type)
            .and_then(|name| note.fields.get_mut(name))
        {
            field.push_str(context);
        }
    }

    note.tags.extend(raw.tags);
    note.deck_name = ctx.deck.to_string();

    let identifier = if raw.note_type.contains("Cloze") && !note.fields.values().any(|f| has_cloze(f)) {
        NoteIdentifier::NotANote
    } else {
        raw.identifier
    };

    ParsedNote { identifier, note }
}

/// Empty entries for every field of `names`.
pub(crate) fn empty_fields(names: &[String]) -> Fields {
    names.iter().map(|name| (name.clone(), String::new())).collect()
}

pub(crate) fn split_tags(tags: &str) -> Vec<String> {
    tags.split(TAG_SEP)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

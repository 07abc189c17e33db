//! Inline notes: `[Type] first field Field2: second field Tags: a b ID: n`.

use super::{empty_fields, split_tags, NoteExtractor, RawNote};
use crate::config::ScanSettings;
use crate::types::{Fields, NoteIdentifier};
use once_cell::sync::Lazy;
use regex::Regex;

static ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:<!--)?ID: (\d+)").expect("inline id pattern"));
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"Tags: (.*)").expect("inline tags pattern"));
static TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("inline type pattern"));

/// The text between an inline note's begin and end markers.
#[derive(Debug, Clone, Copy)]
pub struct InlineNote<'a> {
    text: &'a str,
}

impl<'a> InlineNote<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl NoteExtractor for InlineNote<'_> {
    fn raw_note(&self, settings: &ScanSettings) -> RawNote {
        let mut text = self.text.trim();

        let mut identifier = NoteIdentifier::New;
        if let Some(caps) = ID.captures(text) {
            identifier = caps[1]
                .parse()
                .map_or_else(|_| NoteIdentifier::InvalidId(caps[1].to_string()), NoteIdentifier::Declared);
            text = text[..caps.get(0).map_or(0, |m| m.start())].trim();
        }

        let mut tags = Vec::new();
        if let Some(caps) = TAGS.captures(text) {
            tags = split_tags(&caps[1]);
            text = text[..caps.get(0).map_or(0, |m| m.start())].trim();
        }

        let mut note_type = String::new();
        if let Some(caps) = TYPE.captures(text) {
            note_type = caps[1].trim().to_string();
            text = &text[caps.get(0).map_or(0, |m| m.end())..];
        }

        let fields = settings
            .field_names(&note_type)
            .map(|names| split_fields(text, names))
            .unwrap_or_default();

        RawNote {
            note_type,
            identifier,
            tags,
            fields,
        }
    }
}

/// Split single-line `text` on `<Field>:` markers that start a word.
fn split_fields(text: &str, names: &[String]) -> Fields {
    let mut fields = empty_fields(names);
    let mut current = names.first();
    let mut segment_start = 0;
    let bytes = text.as_bytes();

    let word_starts = (0..text.len()).filter(|&i| i == 0 || bytes[i - 1] == b' ');
    for start in word_starts {
        if start < segment_start {
            continue;
        }
        let rest = &text[start..];
        let marker = names.iter().find_map(|name| {
            let after = rest.strip_prefix(name.as_str())?.strip_prefix(':')?;
            (after.is_empty() || after.starts_with(' ')).then_some((name, name.len() + 1))
        });
        if let Some((name, marker_len)) = marker {
            append(&mut fields, current, &text[segment_start..start]);
            current = Some(name);
            segment_start = start + marker_len;
        }
    }
    append(&mut fields, current, &text[segment_start..]);

    for value in fields.values_mut() {
        *value = value.trim().to_string();
    }
    fields
}

fn append(fields: &mut Fields, current: Option<&String>, segment: &str) {
    if let Some(field) = current.and_then(|name| fields.get_mut(name)) {
        field.push_str(segment);
    }
}

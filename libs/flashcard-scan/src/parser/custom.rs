//! Notes matched by a user-defined pattern, one capture group per field.

use super::{empty_fields, split_tags, NoteExtractor, RawNote};
use crate::config::{ScanSettings, TAG_PREFIX};
use crate::types::NoteIdentifier;
use regex::Captures;

/// A custom-pattern match.
///
/// With `search_id` the last group is the identifier; with `search_tags` the
/// group before it (or the last group) is the tag line. Remaining groups fill
/// the note type's fields in order.
pub struct RegexNote<'a, 't> {
    captures: &'a Captures<'t>,
    note_type: &'a str,
    search_id: bool,
    search_tags: bool,
}

impl<'a, 't> RegexNote<'a, 't> {
    pub fn new(
        captures: &'a Captures<'t>,
        note_type: &'a str,
        search_id: bool,
        search_tags: bool,
    ) -> Self {
        Self {
            captures,
            note_type,
            search_id,
            search_tags,
        }
    }
}

impl NoteExtractor for RegexNote<'_, '_> {
    fn raw_note(&self, settings: &ScanSettings) -> RawNote {
        let groups: Vec<&str> = (1..self.captures.len())
            .map(|i| self.captures.get(i).map_or("", |m| m.as_str()))
            .collect();
        let mut groups = groups.as_slice();

        let mut identifier = NoteIdentifier::New;
        if self.search_id {
            if let Some((last, rest)) = groups.split_last() {
                identifier = last
                    .parse()
                    .map_or_else(|_| NoteIdentifier::InvalidId(last.to_string()), NoteIdentifier::Declared);
                groups = rest;
            }
        }

        let mut tags = Vec::new();
        if self.search_tags {
            if let Some((last, rest)) = groups.split_last() {
                tags = split_tags(last.strip_prefix(TAG_PREFIX).unwrap_or(*last));
                groups = rest;
            }
        }

        let fields = settings
            .field_names(self.note_type)
            .map(|names| {
                let mut fields = empty_fields(names);
                for (name, text) in names.iter().zip(groups) {
                    if let Some(field) = fields.get_mut(name) {
                        field.push_str(text);
                    }
                }
                fields
            })
            .unwrap_or_default();

        RawNote {
            note_type: self.note_type.to_string(),
            identifier,
            tags,
            fields,
        }
    }
}

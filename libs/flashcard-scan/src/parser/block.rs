//! Block notes: one line per field, note type first.

use super::{empty_fields, split_tags, NoteExtractor, RawNote};
use crate::config::{ScanSettings, TAG_PREFIX};
use crate::types::{Fields, NoteIdentifier};
use once_cell::sync::Lazy;
use regex::Regex;

static ID_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<!--)?ID: (\d+)").expect("block id pattern"));

/// The text between a block note's begin and end markers.
#[derive(Debug, Clone, Copy)]
pub struct BlockNote<'a> {
    text: &'a str,
}

impl<'a> BlockNote<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl NoteExtractor for BlockNote<'_> {
    fn raw_note(&self, settings: &ScanSettings) -> RawNote {
        let mut lines: Vec<&str> = self.text.trim().split('\n').collect();
        let note_type = lines.first().map(|l| l.trim().to_string()).unwrap_or_default();

        let mut identifier = NoteIdentifier::New;
        if lines.len() > 1 {
            if let Some(caps) = lines.last().and_then(|line| ID_LINE.captures(line)) {
                identifier = caps[1]
                    .parse()
                    .map_or_else(|_| NoteIdentifier::InvalidId(caps[1].to_string()), NoteIdentifier::Declared);
                lines.pop();
            }
        }

        let mut tags = Vec::new();
        if lines.len() > 1 {
            if let Some(rest) = lines.last().and_then(|l| l.strip_prefix(TAG_PREFIX)) {
                tags = split_tags(rest);
                lines.pop();
            }
        }

        let fields = settings
            .field_names(&note_type)
            .map(|names| parse_fields(&lines[1..], names))
            .unwrap_or_default();

        RawNote {
            note_type,
            identifier,
            tags,
            fields,
        }
    }
}

/// Assign `lines` to fields: a line starting with `<Field>:` opens that field,
/// other lines continue the open one. Text before any prefix belongs to the
/// first field.
pub fn parse_fields(lines: &[&str], names: &[String]) -> Fields {
    let mut fields = empty_fields(names);
    let mut current = names.first();

    for line in lines {
        let mut content = *line;
        for name in names {
            if let Some(rest) = line.strip_prefix(name.as_str()).and_then(|r| r.strip_prefix(':')) {
                current = Some(name);
                content = rest;
                break;
            }
        }
        if let Some(field) = current.and_then(|name| fields.get_mut(name)) {
            field.push_str(content);
            field.push('\n');
        }
    }

    for value in fields.values_mut() {
        *value = value.trim().to_string();
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_support::settings;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_fields_with_id_and_tags() {
        let raw = BlockNote::new("Basic\nFront: Q\nBack: A\nmore\nTags: x y\nID: 42\n")
            .raw_note(&settings());
        assert_eq!(raw.note_type, "Basic");
        assert_eq!(raw.identifier, NoteIdentifier::Declared(42));
        assert_eq!(raw.tags, vec!["x", "y"]);
        assert_eq!(raw.fields["Front"], "Q");
        assert_eq!(raw.fields["Back"], "A\nmore");
    }

    #[test]
    fn commented_id_is_recognized() {
        let raw = BlockNote::new("Basic\nFront: Q\n<!--ID: 7-->").raw_note(&settings());
        assert_eq!(raw.identifier, NoteIdentifier::Declared(7));
    }

    #[test]
    fn oversized_id_is_invalid_not_new() {
        let raw = BlockNote::new("Basic\nFront: q\nID: 99999999999999999999\n").raw_note(&settings());
        assert_eq!(
            raw.identifier,
            NoteIdentifier::InvalidId("99999999999999999999".to_string())
        );
        assert_eq!(raw.fields["Front"], "q");
    }

    #[test]
    fn text_before_prefix_goes_to_first_field() {
        let raw = BlockNote::new("Basic\nJust a question\nBack: answer").raw_note(&settings());
        assert_eq!(raw.identifier, NoteIdentifier::New);
        assert_eq!(raw.fields["Front"], "Just a question");
        assert_eq!(raw.fields["Back"], "answer");
    }

    #[test]
    fn multi_word_field_names() {
        let raw = BlockNote::new("Cloze\nText: {{c1::x}}\nBack Extra: more").raw_note(&settings());
        assert_eq!(raw.fields["Text"], "{{c1::x}}");
        assert_eq!(raw.fields["Back Extra"], "more");
    }

    #[test]
    fn type_line_alone_is_never_an_id() {
        let raw = BlockNote::new("ID: 5").raw_note(&settings());
        assert_eq!(raw.identifier, NoteIdentifier::New);
        assert_eq!(raw.note_type, "ID: 5");
    }

    #[test]
    fn unknown_type_has_no_fields() {
        let raw = BlockNote::new("Nope\nFront: x").raw_note(&settings());
        assert!(raw.fields.is_empty());
    }
}

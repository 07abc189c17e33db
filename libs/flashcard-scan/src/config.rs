//! Scan configuration.
//!
//! [`ScanSettings`] is the user-facing bundle, deserialized from JSON.
//! [`ScanConfig`] is the same bundle with every pattern compiled, so a scan
//! itself never fails on a bad pattern.

use crate::error::{Result, ScanError};
use crate::types::{NoteId, NoteTemplate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Prefix of the identifier marker written into documents.
pub const ID_PREFIX: &str = "ID: ";
/// Prefix of a tag line inside a note.
pub const TAG_PREFIX: &str = "Tags: ";
/// Separator between tags.
pub const TAG_SEP: char = ' ';

/// Suffix matching an optional tag line after a custom note.
pub const TAG_REGEXP_STR: &str = r"(Tags: .*)";
/// Suffix matching an identifier line after a custom note.
pub const ID_REGEXP_STR: &str = r"\n?(?:<!--)?(?:ID: (\d+).*)";

pub(crate) static INLINE_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[^\s$](?:[^$]*[^\s$])?\$").expect("inline math pattern"));
pub(crate) static DISPLAY_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$[\s\S]*?\$\$").expect("display math pattern"));
pub(crate) static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]+`").expect("inline code pattern"));
pub(crate) static DISPLAY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[\s\S]*?```").expect("code fence pattern"));

/// Marker keywords of the document grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    pub begin_note: String,
    pub end_note: String,
    pub begin_inline_note: String,
    pub end_inline_note: String,
    pub target_deck_line: String,
    pub file_tags_line: String,
    pub frozen_fields_line: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            begin_note: "START".to_string(),
            end_note: "END".to_string(),
            begin_inline_note: "STARTI".to_string(),
            end_inline_note: "ENDI".to_string(),
            target_deck_line: "TARGET DECK".to_string(),
            file_tags_line: "FILE TAGS".to_string(),
            frozen_fields_line: "FROZEN".to_string(),
        }
    }
}

/// A user-defined pattern whose capture groups are the fields of `note_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRegexp {
    pub note_type: String,
    pub pattern: String,
}

/// Configuration bundle supplied with each document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Note type to its ordered field names.
    pub fields: BTreeMap<String, Vec<String>>,
    /// Identifiers known to exist in the note store.
    pub existing_ids: HashSet<NoteId>,
    /// Scanned in order; earlier entries claim text first.
    pub custom_regexps: Vec<CustomRegexp>,
    pub syntax: Syntax,
    pub template: NoteTemplate,
    /// Note type to the field that receives the heading breadcrumb.
    pub context_fields: BTreeMap<String, String>,
    /// Note type to the field that receives the source link.
    pub file_link_fields: BTreeMap<String, String>,
    pub add_context: bool,
    pub add_file_link: bool,
    /// Wrap written ID markers in an HTML comment.
    pub comment: bool,
    pub curly_cloze: bool,
    pub highlights_to_cloze: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
            existing_ids: HashSet::new(),
            custom_regexps: Vec::new(),
            syntax: Syntax::default(),
            template: NoteTemplate::default(),
            context_fields: BTreeMap::new(),
            file_link_fields: BTreeMap::new(),
            add_context: false,
            add_file_link: false,
            comment: false,
            curly_cloze: false,
            highlights_to_cloze: false,
        }
    }
}

impl ScanSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn field_names(&self, note_type: &str) -> Option<&[String]> {
        self.fields.get(note_type).map(Vec::as_slice)
    }

    /// Field that receives the breadcrumb, defaulting to the first field.
    pub fn context_field(&self, note_type: &str) -> Option<&str> {
        self.context_fields
            .get(note_type)
            .map(String::as_str)
            .or_else(|| self.first_field(note_type))
    }

    /// Field that receives the source link, defaulting to the first field.
    pub fn file_link_field(&self, note_type: &str) -> Option<&str> {
        self.file_link_fields
            .get(note_type)
            .map(String::as_str)
            .or_else(|| self.first_field(note_type))
    }

    fn first_field(&self, note_type: &str) -> Option<&str> {
        self.fields
            .get(note_type)
            .and_then(|names| names.first())
            .map(String::as_str)
    }
}

/// One identifier/tag combination of a custom pattern.
#[derive(Debug, Clone)]
pub struct PatternVariant {
    pub search_id: bool,
    pub search_tags: bool,
    pub regex: Regex,
}

/// A custom pattern compiled into its four search variants, most specific
/// first.
#[derive(Debug, Clone)]
pub struct CustomPattern {
    pub note_type: String,
    pub variants: Vec<PatternVariant>,
}

impl CustomPattern {
    fn compile(custom: &CustomRegexp) -> Result<Self> {
        let mut variants = Vec::with_capacity(4);
        for search_id in [true, false] {
            for search_tags in [true, false] {
                let source = format!(
                    "(?m){}{}{}",
                    custom.pattern,
                    if search_tags { TAG_REGEXP_STR } else { "" },
                    if search_id { ID_REGEXP_STR } else { "" },
                );
                let regex = Regex::new(&source)
                    .map_err(|e| ScanError::pattern(format!("custom {}", custom.note_type), e))?;
                variants.push(PatternVariant {
                    search_id,
                    search_tags,
                    regex,
                });
            }
        }
        Ok(Self {
            note_type: custom.note_type.clone(),
            variants,
        })
    }
}

/// Settings with all document patterns compiled.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub settings: ScanSettings,
    pub note_regex: Regex,
    pub inline_regex: Regex,
    pub empty_regex: Regex,
    pub deck_regex: Regex,
    pub tag_regex: Regex,
    pub frozen_regex: Regex,
    pub custom: Vec<CustomPattern>,
}

impl ScanConfig {
    pub fn from_settings(settings: ScanSettings) -> Result<Self> {
        let syntax = &settings.syntax;
        let begin = regex::escape(&syntax.begin_note);
        let end = regex::escape(&syntax.end_note);

        let note_regex = compile("block note", &format!(r"(?m)^{}\n([\s\S]*?\n){}", begin, end))?;
        let inline_regex = compile(
            "inline note",
            &format!(
                r"{} (.*?) {}",
                regex::escape(&syntax.begin_inline_note),
                regex::escape(&syntax.end_inline_note)
            ),
        )?;
        let empty_regex = compile(
            "empty note",
            &format!(r"(?m)^{}\n(?:<!--)?{}(\d+)[\s\S]*?\n{}", begin, ID_PREFIX, end),
        )?;
        let deck_regex = compile(
            "target deck",
            &format!(r"(?m)^{}(?:\n|: )(.*)", regex::escape(&syntax.target_deck_line)),
        )?;
        let tag_regex = compile(
            "file tags",
            &format!(r"(?m)^{}(?:\n|: )(.*)", regex::escape(&syntax.file_tags_line)),
        )?;
        let frozen_regex = compile(
            "frozen fields",
            &format!(
                r"{} - (.*?):\n((?:[^\n][\n]?)+)",
                regex::escape(&syntax.frozen_fields_line)
            ),
        )?;

        let custom = settings
            .custom_regexps
            .iter()
            .filter(|custom| !custom.pattern.is_empty())
            .map(CustomPattern::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            settings,
            note_regex,
            inline_regex,
            empty_regex,
            deck_regex,
            tag_regex,
            frozen_regex,
            custom,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_settings(ScanSettings::from_json(json)?)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from_settings(ScanSettings::default()).expect("default syntax compiles")
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ScanError::pattern(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn settings_default_from_empty_json() {
        let settings = ScanSettings::from_json("{}").unwrap();
        assert_eq!(settings, ScanSettings::default());
        assert_eq!(settings.syntax.begin_note, "START");
    }

    #[test]
    fn settings_from_json() {
        let settings = ScanSettings::from_json(
            r#"{
                "fields": {"Basic": ["Front", "Back"]},
                "existing_ids": [1, 2],
                "custom_regexps": [{"note_type": "Basic", "pattern": "^Q: (.*)\\nA: (.*)"}],
                "comment": true
            }"#,
        )
        .unwrap();
        assert_eq!(settings.field_names("Basic").unwrap(), ["Front", "Back"]);
        assert!(settings.existing_ids.contains(&2));
        assert_eq!(settings.custom_regexps.len(), 1);
        assert!(settings.comment);
    }

    #[test]
    fn context_and_link_fields_default_to_first_field() {
        let mut settings = ScanSettings::default();
        settings
            .fields
            .insert("Basic".to_string(), vec!["Front".to_string(), "Back".to_string()]);
        settings
            .context_fields
            .insert("Basic".to_string(), "Back".to_string());
        assert_eq!(settings.context_field("Basic"), Some("Back"));
        assert_eq!(settings.file_link_field("Basic"), Some("Front"));
        assert_eq!(settings.file_link_field("Missing"), None);
    }

    #[test]
    fn custom_variants_are_ordered_most_specific_first() {
        let mut settings = ScanSettings::default();
        settings.custom_regexps.push(CustomRegexp {
            note_type: "Basic".to_string(),
            pattern: r"^(.*) :: (.*)".to_string(),
        });
        settings.custom_regexps.push(CustomRegexp {
            note_type: "Skipped".to_string(),
            pattern: String::new(),
        });
        let config = ScanConfig::from_settings(settings).unwrap();
        assert_eq!(config.custom.len(), 1);
        let order: Vec<(bool, bool)> = config.custom[0]
            .variants
            .iter()
            .map(|v| (v.search_id, v.search_tags))
            .collect();
        assert_eq!(
            order,
            vec![(true, true), (true, false), (false, true), (false, false)]
        );
    }

    #[test]
    fn bad_custom_pattern_is_rejected() {
        let mut settings = ScanSettings::default();
        settings.custom_regexps.push(CustomRegexp {
            note_type: "Basic".to_string(),
            pattern: "(?<=x)y".to_string(),
        });
        let err = ScanConfig::from_settings(settings).unwrap_err();
        assert!(matches!(err, ScanError::InvalidPattern { .. }));
    }

    #[test]
    fn markers_are_escaped() {
        let mut settings = ScanSettings::default();
        settings.syntax.begin_note = "+++".to_string();
        settings.syntax.end_note = "---".to_string();
        let config = ScanConfig::from_settings(settings).unwrap();
        assert!(config.note_regex.is_match("+++\nBasic\n---"));
    }

    #[test]
    fn deck_line_accepts_colon_or_newline() {
        let config = ScanConfig::default();
        let caps = config.deck_regex.captures("x\nTARGET DECK: Maths\n").unwrap();
        assert_eq!(&caps[1], "Maths");
        let caps = config.deck_regex.captures("TARGET DECK\nPhysics").unwrap();
        assert_eq!(&caps[1], "Physics");
    }
}

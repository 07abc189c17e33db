//! Document scanning.
//!
//! A scan runs a fixed sequence over one document: setup (frozen fields,
//! target deck, file tags, ignore regions), block notes, inline notes, each
//! custom pattern, then deletion markers. The ignore set lives in
//! [`ScanState`] and is threaded through every pass; it is dropped when the
//! scan finishes.

use crate::config::{
    CustomPattern, ScanConfig, ScanSettings, DISPLAY_CODE, DISPLAY_MATH, INLINE_CODE, INLINE_MATH,
};
use crate::context::{context_at_index, Heading};
use crate::format::{FieldFormatter, PlainFormatter};
use crate::parser::{
    empty_fields, split_tags, BlockNote, FrozenFields, InlineNote, NoteExtractor, ParseContext,
    RegexNote,
};
use crate::span::{findignore, spans, IgnoreSpans, Span};
use crate::types::{AnkiNote, NoteEdit, NoteId, NoteIdentifier, NoteKind, ParsedNote, ScanWarning};

/// A document as supplied by the file/editor side.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub text: &'a str,
    pub path: &'a str,
    /// Link back to the source, appended to notes when enabled.
    pub url: Option<&'a str>,
    /// Outline in document order, if the document has one.
    pub headings: Option<&'a [Heading]>,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str, path: &'a str) -> Self {
        Self {
            text,
            path,
            url: None,
            headings: None,
        }
    }

    pub fn with_url(mut self, url: &'a str) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_headings(mut self, headings: &'a [Heading]) -> Self {
        self.headings = Some(headings);
        self
    }
}

/// A note to create, and where its ID marker goes once it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNote {
    pub note: AnkiNote,
    /// Insertion offset in the scanned text.
    pub position: usize,
}

/// What happened to one extracted note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Routed {
    Added,
    Edited,
    Rejected,
    NotANote,
}

/// Runs scans with one configuration.
pub struct Scanner<'c> {
    config: &'c ScanConfig,
    formatter: &'c dyn FieldFormatter,
}

impl<'c> Scanner<'c> {
    pub fn new(config: &'c ScanConfig) -> Self {
        Self {
            config,
            formatter: &PlainFormatter,
        }
    }

    pub fn with_formatter(config: &'c ScanConfig, formatter: &'c dyn FieldFormatter) -> Self {
        Self { config, formatter }
    }

    /// Scan `doc` start to finish.
    pub fn scan(&self, doc: &Document<'_>) -> ScanResult {
        let mut state = ScanState::setup(self.config, self.formatter, doc);
        state.scan_notes();
        state.scan_inline_notes();
        for pattern in &self.config.custom {
            state.search(pattern);
        }
        state.scan_deletions();
        state.finish()
    }
}

/// Mutable state of one in-progress scan.
pub struct ScanState<'a> {
    config: &'a ScanConfig,
    formatter: &'a dyn FieldFormatter,
    doc: Document<'a>,
    frozen_fields: FrozenFields,
    target_deck: String,
    global_tags: String,
    ignore: IgnoreSpans,
    empty_blocks: Vec<Span>,
    block_notes: Vec<PendingNote>,
    inline_notes: Vec<PendingNote>,
    regex_notes: Vec<PendingNote>,
    notes_to_edit: Vec<NoteEdit>,
    notes_to_delete: Vec<NoteId>,
    warnings: Vec<ScanWarning>,
}

impl<'a> ScanState<'a> {
    /// Resolve frozen fields, target deck and file tags, and mark every region
    /// custom patterns must not claim.
    pub fn setup(
        config: &'a ScanConfig,
        formatter: &'a dyn FieldFormatter,
        doc: &Document<'a>,
    ) -> Self {
        let text = doc.text;
        let settings = &config.settings;

        let frozen_fields = frozen_fields(config, formatter, text);
        let deck_match = config.deck_regex.captures(text);
        let tag_match = config.tag_regex.captures(text);

        let target_deck = deck_match
            .as_ref()
            .and_then(|caps| caps.get(1))
            .map_or_else(|| settings.template.deck_name.clone(), |m| m.as_str().to_string());
        let global_tags = tag_match
            .as_ref()
            .and_then(|caps| caps.get(1))
            .map_or_else(String::new, |m| m.as_str().to_string());

        let mut ignore = IgnoreSpans::new();
        ignore.extend(spans(&config.frozen_regex, text));
        ignore.extend(deck_match.as_ref().and_then(|caps| caps.get(0)).map(Span::from));
        ignore.extend(tag_match.as_ref().and_then(|caps| caps.get(0)).map(Span::from));
        ignore.extend(spans(&config.note_regex, text));
        ignore.extend(spans(&config.inline_regex, text));
        ignore.extend(spans(&INLINE_MATH, text));
        ignore.extend(spans(&DISPLAY_MATH, text));
        ignore.extend(spans(&INLINE_CODE, text));
        ignore.extend(spans(&DISPLAY_CODE, text));

        Self {
            config,
            formatter,
            doc: *doc,
            frozen_fields,
            target_deck,
            global_tags,
            ignore,
            empty_blocks: spans(&config.empty_regex, text),
            block_notes: Vec::new(),
            inline_notes: Vec::new(),
            regex_notes: Vec::new(),
            notes_to_edit: Vec::new(),
            notes_to_delete: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn settings(&self) -> &'a ScanSettings {
        &self.config.settings
    }

    pub fn ignore_spans(&self) -> &IgnoreSpans {
        &self.ignore
    }

    pub fn target_deck(&self) -> &str {
        &self.target_deck
    }

    /// Block notes. The ID marker goes right after the captured body, i.e.
    /// on its own line before the end marker.
    pub fn scan_notes(&mut self) {
        let (config, text) = (self.config, self.doc.text);
        for caps in config.note_regex.captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // Deletion markers share the block syntax; they are not notes.
            if self.empty_blocks.contains(&Span::from(whole)) {
                continue;
            }
            let parsed = self.extract(&BlockNote::new(body.as_str()), whole.start());
            self.route(parsed, NoteKind::Block, body.end());
        }
        tracing::debug!(path = self.doc.path, count = self.block_notes.len(), "block notes to add");
    }

    /// Inline notes, same routing as block notes.
    pub fn scan_inline_notes(&mut self) {
        let (config, text) = (self.config, self.doc.text);
        for caps in config.inline_regex.captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let parsed = self.extract(&InlineNote::new(body.as_str()), whole.start());
            self.route(parsed, NoteKind::Inline, body.end());
        }
        tracing::debug!(path = self.doc.path, count = self.inline_notes.len(), "inline notes to add");
    }

    /// Run every variant of a custom pattern, most specific first.
    ///
    /// Each match claims its span before it is parsed, so a later, less
    /// specific variant cannot match the same text. A match that turns out not
    /// to be a note gives its claim back.
    pub fn search(&mut self, pattern: &CustomPattern) {
        let text = self.doc.text;
        for variant in &pattern.variants {
            let mut matches = findignore(&variant.regex, text);
            while let Some(caps) = matches.next_match(&self.ignore) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                let span = Span::from(whole);
                self.ignore.claim(span);

                let note = RegexNote::new(&caps, &pattern.note_type, variant.search_id, variant.search_tags);
                let parsed = self.extract(&note, whole.start());
                if self.route(parsed, NoteKind::Regex, whole.end()) == Routed::NotANote {
                    self.ignore.release(span);
                }
            }
        }
        tracing::debug!(
            path = self.doc.path,
            note_type = pattern.note_type.as_str(),
            count = self.regex_notes.len(),
            "regex notes to add"
        );
    }

    /// Every deletion marker names a note to delete.
    pub fn scan_deletions(&mut self) {
        let (config, text) = (self.config, self.doc.text);
        for caps in config.empty_regex.captures_iter(text) {
            let Some(digits) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            match digits.parse::<NoteId>() {
                Ok(id) => self.notes_to_delete.push(id),
                Err(_) => {
                    tracing::warn!(path = self.doc.path, id = digits, "deletion marker has an invalid note id");
                    self.warnings.push(ScanWarning::InvalidId {
                        path: self.doc.path.to_string(),
                        id: digits.to_string(),
                    });
                }
            }
        }
    }

    pub fn finish(self) -> ScanResult {
        ScanResult {
            path: self.doc.path.to_string(),
            original: self.doc.text.to_string(),
            target_deck: self.target_deck,
            global_tags: self.global_tags,
            frozen_fields: self.frozen_fields,
            block_notes: self.block_notes,
            inline_notes: self.inline_notes,
            regex_notes: self.regex_notes,
            notes_to_edit: self.notes_to_edit,
            notes_to_delete: self.notes_to_delete,
            warnings: self.warnings,
            comment: self.config.settings.comment,
        }
    }

    fn extract(&self, extractor: &dyn NoteExtractor, index: usize) -> ParsedNote {
        let settings = self.settings();
        let context = settings
            .add_context
            .then(|| context_at_index(self.doc.path, self.doc.headings, index));
        let ctx = ParseContext {
            settings,
            formatter: self.formatter,
            deck: &self.target_deck,
            url: self.doc.url,
            frozen_fields: &self.frozen_fields,
            context: context.as_deref(),
        };
        extractor.extract(&ctx)
    }

    /// Queue a parsed note as new or edit, or report why it was dropped.
    fn route(&mut self, parsed: ParsedNote, kind: NoteKind, position: usize) -> Routed {
        let ParsedNote { identifier, mut note } = parsed;
        match identifier {
            NoteIdentifier::New => {
                note.tags.extend(split_tags(&self.global_tags));
                let pending = PendingNote { note, position };
                match kind {
                    NoteKind::Block => self.block_notes.push(pending),
                    NoteKind::Inline => self.inline_notes.push(pending),
                    NoteKind::Regex => self.regex_notes.push(pending),
                }
                Routed::Added
            }
            NoteIdentifier::Declared(id) if self.settings().existing_ids.contains(&id) => {
                self.notes_to_edit.push(NoteEdit { id, note });
                Routed::Edited
            }
            NoteIdentifier::Declared(id) => {
                tracing::warn!(path = self.doc.path, id, "note does not exist in Anki");
                self.warnings.push(ScanWarning::UnknownId {
                    path: self.doc.path.to_string(),
                    id,
                });
                Routed::Rejected
            }
            NoteIdentifier::InvalidId(id) => {
                tracing::warn!(path = self.doc.path, id = id.as_str(), "note has an invalid note id");
                self.warnings.push(ScanWarning::InvalidId {
                    path: self.doc.path.to_string(),
                    id,
                });
                Routed::Rejected
            }
            NoteIdentifier::UnrecognizedModel => {
                tracing::warn!(path = self.doc.path, model = note.model_name.as_str(), "did not recognise note type");
                self.warnings.push(ScanWarning::UnrecognizedModel {
                    path: self.doc.path.to_string(),
                    model: note.model_name,
                });
                Routed::Rejected
            }
            NoteIdentifier::NotANote => {
                tracing::trace!(path = self.doc.path, ?kind, "match is not a note");
                Routed::NotANote
            }
        }
    }
}

/// Field defaults for every note type: empty, unless a `FROZEN` block in the
/// document declares them.
fn frozen_fields(config: &ScanConfig, formatter: &dyn FieldFormatter, text: &str) -> FrozenFields {
    let settings = &config.settings;
    let mut frozen: FrozenFields = settings
        .fields
        .iter()
        .map(|(note_type, names)| (note_type.clone(), empty_fields(names)))
        .collect();

    for caps in config.frozen_regex.captures_iter(text) {
        let note_type = &caps[1];
        let virtual_note = format!("{}\n{}", note_type, &caps[2]);
        let fields = BlockNote::new(&virtual_note)
            .raw_note(settings)
            .fields
            .into_iter()
            .map(|(name, value)| {
                let value = formatter.format(&value, settings.curly_cloze, settings.highlights_to_cloze);
                (name, value)
            })
            .collect();
        frozen.insert(note_type.to_string(), fields);
    }
    frozen
}

/// Everything a finished scan produced.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub path: String,
    /// The scanned text; all recorded positions refer to it.
    pub original: String,
    pub target_deck: String,
    pub global_tags: String,
    pub frozen_fields: FrozenFields,
    pub block_notes: Vec<PendingNote>,
    pub inline_notes: Vec<PendingNote>,
    pub regex_notes: Vec<PendingNote>,
    pub notes_to_edit: Vec<NoteEdit>,
    pub notes_to_delete: Vec<NoteId>,
    pub warnings: Vec<ScanWarning>,
    pub(crate) comment: bool,
}

impl ScanResult {
    /// Notes to create, block then inline then regex. Assigned IDs must come
    /// back in this order.
    pub fn notes_to_add(&self) -> impl Iterator<Item = &AnkiNote> {
        self.block_notes
            .iter()
            .chain(&self.inline_notes)
            .chain(&self.regex_notes)
            .map(|pending| &pending.note)
    }

    pub fn new_note_count(&self) -> usize {
        self.block_notes.len() + self.inline_notes.len() + self.regex_notes.len()
    }

    /// File tags as a list.
    pub fn global_tag_list(&self) -> Vec<String> {
        split_tags(&self.global_tags)
    }
}

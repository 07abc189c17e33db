//! Writing assigned note IDs back into the scanned text.

use crate::config::{ScanConfig, ID_PREFIX};
use crate::error::{Result, ScanError};
use crate::patch::{insert_into_string, Insertion};
use crate::scanner::{PendingNote, ScanResult};
use crate::types::NoteId;

/// The `ID: <n>` marker, optionally wrapped in an HTML comment.
pub fn id_string(id: NoteId, comment: bool) -> String {
    if comment {
        format!("<!--{}{}-->", ID_PREFIX, id)
    } else {
        format!("{}{}", ID_PREFIX, id)
    }
}

impl ScanResult {
    /// Insert the IDs the note store assigned to [`ScanResult::notes_to_add`].
    ///
    /// `ids` must line up with `notes_to_add`: block notes, then inline, then
    /// regex. `None` means creation failed and nothing is written for that
    /// note. Block markers get a trailing newline, inline markers none, and
    /// regex markers a leading newline.
    pub fn write_ids(&self, ids: &[Option<NoteId>]) -> Result<String> {
        let expected = self.new_note_count();
        if ids.len() != expected {
            return Err(ScanError::IdCountMismatch {
                expected,
                actual: ids.len(),
            });
        }

        let (block_ids, rest) = ids.split_at(self.block_notes.len());
        let (inline_ids, regex_ids) = rest.split_at(self.inline_notes.len());

        let comment = self.comment;
        let mut insertions = Vec::with_capacity(ids.len());
        insertions.extend(marker_insertions(&self.block_notes, block_ids, move |id| {
            format!("{}\n", id_string(id, comment))
        }));
        insertions.extend(marker_insertions(&self.inline_notes, inline_ids, move |id| {
            id_string(id, comment)
        }));
        insertions.extend(marker_insertions(&self.regex_notes, regex_ids, move |id| {
            format!("\n{}", id_string(id, comment))
        }));

        Ok(insert_into_string(&self.original, insertions))
    }
}

fn marker_insertions<'a>(
    notes: &'a [PendingNote],
    ids: &'a [Option<NoteId>],
    marker: impl Fn(NoteId) -> String + 'a,
) -> impl Iterator<Item = Insertion> + 'a {
    notes
        .iter()
        .zip(ids)
        .filter_map(move |(pending, &id)| id.map(|id| Insertion::new(pending.position, marker(id))))
}

/// Strip every deletion marker from `text`.
pub fn remove_empties(config: &ScanConfig, text: &str) -> String {
    config.empty_regex.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanSettings;
    use crate::scanner::{Document, Scanner};
    use pretty_assertions::assert_eq;

    fn config() -> ScanConfig {
        let mut settings = ScanSettings::default();
        settings
            .fields
            .insert("Basic".to_string(), vec!["Front".to_string(), "Back".to_string()]);
        ScanConfig::from_settings(settings).unwrap()
    }

    #[test]
    fn id_string_forms() {
        assert_eq!(id_string(12, false), "ID: 12");
        assert_eq!(id_string(12, true), "<!--ID: 12-->");
    }

    #[test]
    fn block_id_goes_before_end() {
        let config = config();
        let text = "START\nBasic\nFront: q\nEND\n";
        let result = Scanner::new(&config).scan(&Document::new(text, "a.md"));
        let written = result.write_ids(&[Some(1000)]).unwrap();
        assert_eq!(written, "START\nBasic\nFront: q\nID: 1000\nEND\n");
    }

    #[test]
    fn failed_creation_writes_nothing() {
        let config = config();
        let text = "START\nBasic\nFront: q\nEND\n";
        let result = Scanner::new(&config).scan(&Document::new(text, "a.md"));
        assert_eq!(result.write_ids(&[None]).unwrap(), text);
    }

    #[test]
    fn wrong_id_count_is_an_error() {
        let config = config();
        let result = Scanner::new(&config).scan(&Document::new("plain", "a.md"));
        let err = result.write_ids(&[Some(1)]).unwrap_err();
        assert!(matches!(
            err,
            ScanError::IdCountMismatch {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[test]
    fn remove_empties_strips_markers() {
        let config = config();
        let text = "before\nSTART\nID: 9\nEND\nafter";
        assert_eq!(remove_empties(&config, text), "before\n\nafter");
    }
}

//! Request payloads for the AnkiConnect note store.
//!
//! Requests are only built here; sending them and reading responses is up to
//! the caller.

use crate::scanner::ScanResult;
use crate::types::{AnkiNote, Fields, NoteId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// AnkiConnect API version the payloads target.
pub const API_VERSION: u8 = 6;

/// One AnkiConnect action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub action: String,
    pub version: u8,
    pub params: Value,
}

impl Request {
    pub fn new(action: &str, params: Value) -> Self {
        Self {
            action: action.to_string(),
            version: API_VERSION,
            params,
        }
    }
}

pub fn add_note(note: &AnkiNote) -> Request {
    Request::new("addNote", json!({ "note": note }))
}

pub fn delete_notes(ids: &[NoteId]) -> Request {
    Request::new("deleteNotes", json!({ "notes": ids }))
}

pub fn update_note_fields(id: NoteId, fields: &Fields) -> Request {
    Request::new(
        "updateNoteFields",
        json!({ "note": { "id": id, "fields": fields } }),
    )
}

pub fn notes_info(ids: &[NoteId]) -> Request {
    Request::new("notesInfo", json!({ "notes": ids }))
}

pub fn change_deck(card_ids: &[NoteId], deck: &str) -> Request {
    Request::new("changeDeck", json!({ "cards": card_ids, "deck": deck }))
}

pub fn remove_tags(ids: &[NoteId], tags: &str) -> Request {
    Request::new("removeTags", json!({ "notes": ids, "tags": tags }))
}

pub fn add_tags(ids: &[NoteId], tags: &str) -> Request {
    Request::new("addTags", json!({ "notes": ids, "tags": tags }))
}

/// Batch several actions into one call.
pub fn multi(actions: Vec<Request>) -> Request {
    Request::new("multi", json!({ "actions": actions }))
}

impl ScanResult {
    fn edit_ids(&self) -> Vec<NoteId> {
        self.notes_to_edit.iter().map(|edit| edit.id).collect()
    }

    pub fn add_notes_request(&self) -> Request {
        multi(self.notes_to_add().map(add_note).collect())
    }

    pub fn delete_notes_request(&self) -> Request {
        delete_notes(&self.notes_to_delete)
    }

    pub fn update_fields_request(&self) -> Request {
        multi(
            self.notes_to_edit
                .iter()
                .map(|edit| update_note_fields(edit.id, &edit.note.fields))
                .collect(),
        )
    }

    pub fn note_info_request(&self) -> Request {
        notes_info(&self.edit_ids())
    }

    /// Move the cards of edited notes into the target deck. Card IDs come from
    /// the note store's answer to [`ScanResult::note_info_request`].
    pub fn change_decks_request(&self, card_ids: &[NoteId]) -> Request {
        change_deck(card_ids, &self.target_deck)
    }

    /// Remove `all_tags` (every tag the note store knows) from edited notes
    /// before their current tags are added back.
    pub fn clear_tags_request(&self, all_tags: &[String]) -> Request {
        remove_tags(&self.edit_ids(), &all_tags.join(" "))
    }

    /// Each edited note's tags plus the file tags.
    pub fn add_tags_request(&self) -> Request {
        multi(
            self.notes_to_edit
                .iter()
                .map(|edit| {
                    let tags = format!("{} {}", edit.note.tags.join(" "), self.global_tags);
                    add_tags(&[edit.id], tags.trim())
                })
                .collect(),
        )
    }
}

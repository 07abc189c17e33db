//! JSON summary of one scan.

use flashcard_scan::anki::Request;
use flashcard_scan::ScanResult;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report {
    pub path: String,
    pub target_deck: String,
    pub global_tags: Vec<String>,
    pub new_notes: usize,
    pub edited_notes: usize,
    pub deleted_notes: usize,
    pub warnings: Vec<String>,
    pub requests: Requests,
}

/// Payloads in the order a sync sends them.
#[derive(Debug, Serialize)]
pub struct Requests {
    pub add_notes: Request,
    pub update_fields: Request,
    pub notes_info: Request,
    pub add_tags: Request,
    pub delete_notes: Request,
}

impl From<&ScanResult> for Report {
    fn from(result: &ScanResult) -> Self {
        Self {
            path: result.path.clone(),
            target_deck: result.target_deck.clone(),
            global_tags: result.global_tag_list(),
            new_notes: result.new_note_count(),
            edited_notes: result.notes_to_edit.len(),
            deleted_notes: result.notes_to_delete.len(),
            warnings: result.warnings.iter().map(ToString::to_string).collect(),
            requests: Requests {
                add_notes: result.add_notes_request(),
                update_fields: result.update_fields_request(),
                notes_info: result.note_info_request(),
                add_tags: result.add_tags_request(),
                delete_notes: result.delete_notes_request(),
            },
        }
    }
}

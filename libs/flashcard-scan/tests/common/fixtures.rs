//! Test fixtures and factory functions.

use flashcard_scan::{CustomRegexp, Heading, NoteId, ScanSettings};

/// Settings with Basic and Cloze note types and a `Q:`/`A:` custom pattern.
pub fn settings(existing_ids: &[NoteId]) -> ScanSettings {
    let mut settings = ScanSettings::default();
    settings.fields.insert(
        "Basic".to_string(),
        vec!["Front".to_string(), "Back".to_string()],
    );
    settings.fields.insert(
        "Cloze".to_string(),
        vec!["Text".to_string(), "Back Extra".to_string()],
    );
    settings.existing_ids = existing_ids.iter().copied().collect();
    settings.custom_regexps.push(CustomRegexp {
        note_type: "Basic".to_string(),
        pattern: r"^Q: (.*)\nA: (.*)".to_string(),
    });
    settings
}

/// A document with two new block notes, one new inline note, one new regex
/// note, an existing note, a note with an unknown ID and a deletion marker.
pub fn sample_document() -> String {
    [
        "TARGET DECK: Rust",
        "FILE TAGS: lang",
        "",
        "# Basics",
        "",
        "START",
        "Basic",
        "Front: What is Rust?",
        "Back: A language.",
        "END",
        "",
        "START",
        "Basic",
        "Front: Ownership?",
        "Back: One owner.",
        "END",
        "",
        "## Inline",
        "",
        "STARTI [Basic] Borrowing? Back: References. ENDI",
        "",
        "Q: Lifetimes?",
        "A: Scopes of references.",
        "",
        "START",
        "Basic",
        "Front: Old",
        "ID: 500",
        "END",
        "",
        "START",
        "Basic",
        "Front: Ghost",
        "ID: 777",
        "END",
        "",
        "START",
        "ID: 111",
        "END",
        "",
    ]
    .join("\n")
}

/// ATX headings of `text`, with byte offsets.
pub fn headings(text: &str) -> Vec<Heading> {
    let mut offset = 0;
    let mut headings = Vec::new();
    for line in text.split_inclusive('\n') {
        let hashes = line.chars().take_while(|&c| c == '#').count();
        if hashes > 0 && line[hashes..].starts_with(' ') {
            headings.push(Heading::new(line[hashes..].trim(), hashes as u8, offset));
        }
        offset += line.len();
    }
    headings
}

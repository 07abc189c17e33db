//! Field text formatting seam.
//!
//! Turning captured markdown into note-store HTML is owned by the caller;
//! scans only need something implementing [`FieldFormatter`]. The bundled
//! [`PlainFormatter`] handles the cloze shorthands and line breaks and leaves
//! everything else untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static CLOZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{c\d+::").expect("cloze pattern"));
static CURLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("curly pattern"));
static HIGHLIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"==(.+?)==").expect("highlight pattern"));

/// Converts raw captured field text into note-store field content.
pub trait FieldFormatter {
    fn format(&self, text: &str, curly_cloze: bool, highlights_to_cloze: bool) -> String;
}

/// Whether `text` contains an Anki cloze deletion.
pub fn has_cloze(text: &str) -> bool {
    CLOZE.is_match(text)
}

/// Cloze shorthand expansion and `<br>` line breaks, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl FieldFormatter for PlainFormatter {
    fn format(&self, text: &str, curly_cloze: bool, highlights_to_cloze: bool) -> String {
        let mut number = 1;
        let mut text = text.to_string();
        if curly_cloze {
            text = curly_to_cloze(&text, &mut number);
        }
        if highlights_to_cloze {
            text = HIGHLIGHT
                .replace_all(&text, |caps: &regex::Captures<'_>| {
                    let cloze = format!("{{{{c{}::{}}}}}", number, &caps[1]);
                    number += 1;
                    cloze
                })
                .into_owned();
        }
        text.replace('\n', "<br>")
    }
}

// `{text}` only; braces belonging to an existing `{{c1::...}}` are left alone.
fn curly_to_cloze(text: &str, number: &mut usize) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in CURLY.find_iter(text) {
        let doubled = (m.start() > 0 && bytes[m.start() - 1] == b'{')
            || bytes.get(m.end()) == Some(&b'}');
        if doubled {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        out.push_str(&format!("{{{{c{}::{}}}}}", number, &text[m.start() + 1..m.end() - 1]));
        *number += 1;
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

//! Character-range bookkeeping for scans.
//!
//! All offsets are byte offsets into the scanned `&str`.

use regex::{CaptureMatches, Captures, Regex};

/// Half-open `[start, end)` range into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} past end {}", start, end);
        Self { start, end }
    }

    /// Whether this span lies within `outer`, allowing one character of
    /// slack on either side.
    pub fn within(&self, outer: &Span) -> bool {
        self.start + 1 >= outer.start && self.end <= outer.end + 1
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(m: regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }
}

/// Spans of every non-overlapping match of `pattern`, left to right.
pub fn spans(pattern: &Regex, text: &str) -> Vec<Span> {
    pattern.find_iter(text).map(Span::from).collect()
}

/// Whether `span` lies within any element of `set` (±1 tolerance).
pub fn contained_in(span: Span, set: &[Span]) -> bool {
    set.iter().any(|outer| span.within(outer))
}

/// Regions of a document that no further pass may claim.
///
/// Grows during a scan; the only removal is [`IgnoreSpans::release`], which
/// undoes the claim made for the match currently being parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSpans {
    spans: Vec<Span>,
}

impl IgnoreSpans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, spans: impl IntoIterator<Item = Span>) {
        self.spans.extend(spans);
    }

    /// Claim `span` for the match about to be parsed.
    pub fn claim(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Give back the most recent claim. Must be paired with the
    /// [`IgnoreSpans::claim`] for the same match, with no claim in between.
    pub fn release(&mut self, span: Span) {
        let popped = self.spans.pop();
        debug_assert_eq!(popped, Some(span), "released span was not the last claim");
    }

    pub fn contains(&self, span: Span) -> bool {
        contained_in(span, &self.spans)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Matches of a pattern that skip anything inside the ignore set.
///
/// The ignore set is passed to every [`FindIgnore::next_match`] call rather than
/// borrowed up front: callers claim spans between steps, and each step checks
/// the set as it is at that moment. A match whose span was claimed after the
/// iterator was created is therefore skipped.
pub struct FindIgnore<'r, 't> {
    matches: CaptureMatches<'r, 't>,
}

impl<'r, 't> FindIgnore<'r, 't> {
    pub fn new(pattern: &'r Regex, text: &'t str) -> Self {
        Self {
            matches: pattern.captures_iter(text),
        }
    }

    /// Next match not contained in the current state of `ignore`.
    pub fn next_match(&mut self, ignore: &IgnoreSpans) -> Option<Captures<'t>> {
        self.matches.by_ref().find(|caps| {
            let whole = caps.get(0).map(Span::from);
            whole.is_some_and(|span| !ignore.contains(span))
        })
    }
}

/// Start a [`FindIgnore`] over `text`.
pub fn findignore<'r, 't>(pattern: &'r Regex, text: &'t str) -> FindIgnore<'r, 't> {
    FindIgnore::new(pattern, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn spans_are_left_to_right() {
        let re = Regex::new("ab").unwrap();
        assert_eq!(
            spans(&re, "ab ab"),
            vec![Span::new(0, 2), Span::new(3, 5)]
        );
    }

    #[test]
    fn contained_with_one_char_slack() {
        let outer = [Span::new(5, 10)];
        assert!(contained_in(Span::new(4, 11), &outer));
        assert!(contained_in(Span::new(6, 9), &outer));
        assert!(!contained_in(Span::new(3, 9), &outer));
        assert!(!contained_in(Span::new(6, 12), &outer));
    }

    #[test]
    fn contained_at_text_start_does_not_underflow() {
        assert!(contained_in(Span::new(0, 3), &[Span::new(0, 3)]));
        assert!(contained_in(Span::new(0, 2), &[Span::new(1, 3)]));
    }

    #[test]
    fn empty_set_contains_nothing() {
        assert!(!contained_in(Span::new(0, 0), &[]));
    }

    #[test]
    fn findignore_skips_ignored_matches() {
        let re = Regex::new(r"\d+").unwrap();
        let text = "1 22 333";
        let mut ignore = IgnoreSpans::new();
        ignore.extend([Span::new(2, 4)]);

        let mut found = Vec::new();
        let mut iter = findignore(&re, text);
        while let Some(caps) = iter.next_match(&ignore) {
            found.push(caps[0].to_string());
        }
        assert_eq!(found, vec!["1", "333"]);
    }

    #[test]
    fn findignore_sees_claims_made_mid_iteration() {
        let re = Regex::new(r"\w+").unwrap();
        let text = "one two";
        let mut ignore = IgnoreSpans::new();

        let mut iter = findignore(&re, text);
        let first = iter.next_match(&ignore).unwrap();
        assert_eq!(&first[0], "one");
        // Claim the rest of the text before asking for the next match.
        ignore.claim(Span::new(4, 7));
        assert!(iter.next_match(&ignore).is_none());
    }

    #[test]
    fn release_restores_length() {
        let mut ignore = IgnoreSpans::new();
        ignore.extend([Span::new(0, 1)]);
        let before = ignore.len();
        ignore.claim(Span::new(3, 8));
        ignore.release(Span::new(3, 8));
        assert_eq!(ignore.len(), before);
    }

    proptest! {
        #[test]
        fn slack_bounds(start in 2usize..100, len in 0usize..50, inner_len in 0usize..50, shift in 0usize..3) {
            let outer = Span::new(start, start + len + inner_len + 2);
            let inside = Span::new(start - 1 + shift.min(1), start + len);
            prop_assert!(contained_in(inside, &[outer]));

            let too_early = Span::new(start - 2, start + len);
            prop_assert!(!contained_in(too_early, &[outer]));

            let too_late = Span::new(start, outer.end + 2);
            prop_assert!(!contained_in(too_late, &[outer]));
        }
    }
}

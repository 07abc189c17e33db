//! Offset-stable string insertion.

/// A string to splice into a text at a position in the text's original
/// coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub position: usize,
    pub text: String,
}

impl Insertion {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Apply all `insertions` to `text` at once.
///
/// Positions refer to the unmodified `text`. Insertions are stably sorted by
/// position and applied left to right while tracking how far earlier
/// insertions have shifted the buffer, so each lands where it would have in
/// the original. Two insertions at the same position keep their input order.
pub fn insert_into_string(text: &str, mut insertions: Vec<Insertion>) -> String {
    if insertions.is_empty() {
        return text.to_string();
    }

    insertions.sort_by_key(|insertion| insertion.position);

    let extra: usize = insertions.iter().map(|i| i.text.len()).sum();
    let mut result = String::with_capacity(text.len() + extra);
    result.push_str(text);

    let mut offset = 0;
    for insertion in insertions {
        result.insert_str(insertion.position + offset, &insertion.text);
        offset += insertion.text.len();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn no_insertions_returns_text() {
        assert_eq!(insert_into_string("abc", vec![]), "abc");
    }

    #[test]
    fn insertions_land_at_original_positions() {
        let result = insert_into_string(
            "0123456789",
            vec![Insertion::new(3, "X"), Insertion::new(7, "Y")],
        );
        assert_eq!(result, "012X3456Y789");
    }

    #[test]
    fn unsorted_input_is_normalized() {
        let result = insert_into_string(
            "0123456789",
            vec![Insertion::new(7, "Y"), Insertion::new(3, "X")],
        );
        assert_eq!(result, "012X3456Y789");
    }

    #[test]
    fn same_position_keeps_input_order() {
        let result = insert_into_string(
            "ab",
            vec![Insertion::new(1, "first"), Insertion::new(1, "second")],
        );
        assert_eq!(result, "afirstsecondb");
    }

    #[test]
    fn insert_at_both_ends() {
        let result = insert_into_string(
            "mid",
            vec![Insertion::new(3, ">"), Insertion::new(0, "<")],
        );
        assert_eq!(result, "<mid>");
    }

    proptest! {
        #[test]
        fn order_independent_for_distinct_positions(
            text in "[a-z]{0,40}",
            p1 in 0usize..=40,
            p2 in 0usize..=40,
            a in "[A-Z]{1,5}",
            b in "[A-Z]{1,5}",
        ) {
            let p1 = p1.min(text.len());
            let p2 = p2.min(text.len());
            prop_assume!(p1 != p2);
            let forward = insert_into_string(
                &text,
                vec![Insertion::new(p1, a.clone()), Insertion::new(p2, b.clone())],
            );
            let backward = insert_into_string(
                &text,
                vec![Insertion::new(p2, b), Insertion::new(p1, a)],
            );
            prop_assert_eq!(forward, backward);
        }
    }
}

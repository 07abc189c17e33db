//! Heading outline of a markdown file.

use flashcard_scan::Heading;

const FENCE: &str = "```";

/// ATX headings (`#` through `######`) in document order, with the byte
/// offset of each heading line. Lines inside code fences are skipped.
pub fn headings(text: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut offset = 0;
    let mut in_fence = false;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        if line.trim_start().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let level = line.bytes().take_while(|&b| b == b'#').count();
        if !(1..=6).contains(&level) {
            continue;
        }
        let rest = &line[level..];
        if !(rest.starts_with(' ') || rest.trim().is_empty()) {
            continue;
        }
        let title = rest.trim().trim_end_matches('#').trim_end();
        headings.push(Heading::new(title, level as u8, start));
    }
    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_levels_and_offsets() {
        let text = "# One\ntext\n## Two ##\n";
        assert_eq!(
            headings(text),
            vec![Heading::new("One", 1, 0), Heading::new("Two", 2, 11)]
        );
    }

    #[test]
    fn skips_tags_and_fenced_lines() {
        let text = "#tag\n```\n# not a heading\n```\n### Real\n";
        assert_eq!(headings(text), vec![Heading::new("Real", 3, 29)]);
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        assert!(headings("####### deep\n").is_empty());
    }
}

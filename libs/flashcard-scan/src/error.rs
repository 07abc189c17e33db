//! Error types for flashcard-scan.

use thiserror::Error;

/// Result type alias using ScanError.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while configuring or running a scan.
///
/// Malformed notes are not errors: they are reported through
/// [`NoteIdentifier`](crate::types::NoteIdentifier) and dropped from the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid {name} pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("expected {expected} note ids, got {actual}")]
    IdCountMismatch { expected: usize, actual: usize },
}

impl ScanError {
    pub(crate) fn pattern(name: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_id_count_mismatch() {
        let error = ScanError::IdCountMismatch {
            expected: 3,
            actual: 1,
        };
        assert_eq!(error.to_string(), "expected 3 note ids, got 1");
    }

    #[test]
    fn display_invalid_pattern_names_the_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let error = ScanError::pattern("custom Basic", source);
        assert!(error.to_string().starts_with("invalid custom Basic pattern:"));
    }
}

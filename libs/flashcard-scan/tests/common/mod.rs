//! Shared helpers for integration tests.

pub mod fixtures;

use flashcard_scan::{Document, ScanConfig, ScanResult, ScanSettings, Scanner};

/// Compile `settings` and scan `text` as `path`.
pub fn scan(settings: ScanSettings, text: &str, path: &str) -> ScanResult {
    let config = ScanConfig::from_settings(settings).expect("test settings compile");
    Scanner::new(&config).scan(&Document::new(text, path))
}

use anyhow::{Context, Result};
use clap::Parser;
use flashcard_scan::{remove_empties, Document, NoteId, ScanConfig, ScanResult, Scanner};
use std::fs;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;
mod outline;
mod report;

use args::{Cli, Commands};
use report::Report;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Scan { file, config, url } => {
            let config = load_config(&config)?;
            let text = read(&file)?;
            let result = scan(&config, &file, &text, url.as_deref());
            let report = Report::from(&result);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::WriteIds {
            file,
            config,
            ids,
            remove_empties: strip,
            dry_run,
        } => {
            let config = load_config(&config)?;
            let text = read(&file)?;
            let ids: Vec<Option<NoteId>> = serde_json::from_str(&read(&ids)?)
                .with_context(|| format!("IDs in {} must be a JSON array", ids.display()))?;

            let result = scan(&config, &file, &text, None);
            let mut written = result.write_ids(&ids)?;
            if strip {
                written = remove_empties(&config, &written);
            }

            if dry_run {
                print!("{}", written);
            } else {
                fs::write(&file, &written)
                    .with_context(|| format!("failed to write {}", file.display()))?;
                tracing::info!(
                    path = %file.display(),
                    written = ids.iter().flatten().count(),
                    "note ids written"
                );
            }
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_config(path: &Path) -> Result<ScanConfig> {
    let json = read(path)?;
    ScanConfig::from_json(&json).with_context(|| format!("failed to load settings from {}", path.display()))
}

fn scan(config: &ScanConfig, file: &Path, text: &str, url: Option<&str>) -> ScanResult {
    let path = file.to_string_lossy();
    let headings = outline::headings(text);
    let mut doc = Document::new(text, &path).with_headings(&headings);
    if let Some(url) = url {
        doc = doc.with_url(url);
    }

    let result = Scanner::new(config).scan(&doc);
    tracing::info!(
        path = %path,
        new = result.new_note_count(),
        edited = result.notes_to_edit.len(),
        deleted = result.notes_to_delete.len(),
        "scanned"
    );
    result
}

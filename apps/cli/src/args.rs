use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flashcard-scan")]
#[command(about = "Find flashcard notes in markdown files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a file and print what would be sent to Anki
    Scan {
        /// Markdown file to scan
        file: PathBuf,

        /// Scan settings as JSON
        #[arg(short, long)]
        config: PathBuf,

        /// Link back to the file, appended to notes when file links are on
        #[arg(long)]
        url: Option<String>,
    },

    /// Write note IDs assigned by Anki back into a file
    WriteIds {
        /// Markdown file to update
        file: PathBuf,

        /// Scan settings as JSON
        #[arg(short, long)]
        config: PathBuf,

        /// JSON array of IDs, one per new note, `null` where creation failed
        #[arg(long)]
        ids: PathBuf,

        /// Also strip deletion markers
        #[arg(long)]
        remove_empties: bool,

        /// Print the result instead of writing the file
        #[arg(long)]
        dry_run: bool,
    },
}

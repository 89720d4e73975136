//! CLI argument parsing with subcommands.

use crate::entry::EntryType;
use clap::{Parser, Subcommand};

/// Personal Telegram bot that files entries into a private Well API.
#[derive(Parser)]
#[command(name = "bucketbot")]
#[command(about = "Files tasks, notes, and bookmarks into the Well")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (long polling)
    Bot,

    /// File a single entry from the command line, without the bot
    Submit {
        /// Entry type: task, note or bookmark
        entry_type: EntryType,

        /// Entry text
        content: String,
    },

    /// Show current configuration status
    Status,
}

//! Bucket Bot library.
//!
//! A personal Telegram bot that forwards short pieces of text (tasks,
//! notes, bookmarks) to a private Well API and relays the API's response
//! back to the single authorized user.

pub mod access;
pub mod bot;
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod flow;
pub mod well;

// Re-export commonly used types
pub use access::AccessGuard;
pub use config::Config;
pub use entry::{EntryType, NewEntry};
pub use flow::ChatState;
pub use well::{Receipt, WellApi, WellClient};

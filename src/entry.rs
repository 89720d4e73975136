//! Entry types and the pending-entry payload sent to the Well API.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of content the user is filing.
///
/// Serializes to the lowercase wire form the Well API expects
/// (`"task"`, `"note"`, `"bookmark"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Task,
    Note,
    Bookmark,
}

impl EntryType {
    /// Every selectable entry type, in menu order.
    pub const ALL: [EntryType; 3] = [EntryType::Task, EntryType::Note, EntryType::Bookmark];

    /// Capitalized display label, as shown on the selection buttons.
    pub fn label(self) -> &'static str {
        match self {
            EntryType::Task => "Task",
            EntryType::Note => "Note",
            EntryType::Bookmark => "Bookmark",
        }
    }

    /// Lowercase wire form, also used as the noun in prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Task => "task",
            EntryType::Note => "note",
            EntryType::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known entry type.
#[derive(Debug, Error)]
#[error("unknown entry type: {0}")]
pub struct UnknownEntryType(String);

impl FromStr for EntryType {
    type Err = UnknownEntryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(EntryType::Task),
            "note" => Ok(EntryType::Note),
            "bookmark" => Ok(EntryType::Bookmark),
            other => Err(UnknownEntryType(other.to_string())),
        }
    }
}

/// A completed entry, ready for exactly one submission call.
///
/// Wire format: `{"type": "<entry type>", "body": "<content>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub body: String,
}

impl NewEntry {
    /// Create an entry, trimming surrounding whitespace from the body.
    pub fn new(entry_type: EntryType, body: impl Into<String>) -> Self {
        Self {
            entry_type,
            body: body.into().trim().to_string(),
        }
    }
}

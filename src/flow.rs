//! Conversation flow state machine.
//!
//! One chat moves `Idle → AwaitingType → AwaitingContent → Idle`. The
//! reducer functions here are pure: they take the current state and an
//! inbound event and return a [`Step`] saying what to reply and where the
//! dialogue goes next. Telegram wiring lives in [`crate::bot`]; the only
//! side effect, the submission call, goes through [`submit`].

use crate::entry::{EntryType, NewEntry};
use crate::well::{Receipt, WellApi};

/// Per-chat conversation state, held in the dialogue storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChatState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// The type menu has been shown; waiting for a selection.
    AwaitingType,
    /// A type has been chosen; waiting for the entry text.
    AwaitingContent { entry_type: EntryType },
}

/// Outcome of feeding one inbound event to the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Send `text` and move the dialogue to `next`. `menu` attaches the
    /// type-selection keyboard to the reply.
    Reply {
        text: String,
        next: ChatState,
        menu: bool,
    },
    /// The entry is complete: issue exactly one submission call, relay
    /// the outcome, and return to `Idle`.
    Submit(NewEntry),
}

impl Step {
    fn stay(text: String, state: &ChatState) -> Self {
        Step::Reply {
            text,
            next: state.clone(),
            menu: matches!(state, ChatState::AwaitingType),
        }
    }
}

/// Handle `/start`.
///
/// From `Idle` this opens the type menu. Mid-flow it reprompts the
/// current state instead of silently resetting.
pub fn on_start(state: &ChatState) -> Step {
    match state {
        ChatState::Idle => Step::Reply {
            text: WELCOME.to_string(),
            next: ChatState::AwaitingType,
            menu: true,
        },
        other => reprompt(other),
    }
}

/// Handle `/cancel` from any state: discard partial data, confirm.
pub fn on_cancel(state: &ChatState) -> Step {
    let text = match state {
        ChatState::Idle => NOTHING_TO_CANCEL.to_string(),
        _ => CANCELLED.to_string(),
    };
    Step::Reply {
        text,
        next: ChatState::Idle,
        menu: false,
    }
}

/// Handle a type selected via an inline button.
pub fn on_select(state: &ChatState, entry_type: EntryType) -> Step {
    match state {
        ChatState::AwaitingType => advance_to_content(entry_type),
        // Stale button press; the menu message outlives the state.
        other => reprompt(other),
    }
}

/// Handle a plain text message.
pub fn on_text(state: &ChatState, text: &str) -> Step {
    // Unknown commands reprompt rather than being swallowed as input.
    if text.starts_with('/') {
        return reprompt(state);
    }

    match state {
        ChatState::Idle => reprompt(state),
        ChatState::AwaitingType => match text.parse::<EntryType>() {
            Ok(entry_type) => advance_to_content(entry_type),
            Err(_) => Step::stay(INVALID_SELECTION.to_string(), state),
        },
        ChatState::AwaitingContent { entry_type } => {
            let content = text.trim();
            if content.is_empty() {
                Step::stay(empty_content_text(*entry_type), state)
            } else {
                Step::Submit(NewEntry::new(*entry_type, content))
            }
        }
    }
}

/// Reprompt with the current state's expected input. Used for unknown
/// commands, non-text payloads, and stale button presses.
pub fn reprompt(state: &ChatState) -> Step {
    let text = match state {
        ChatState::Idle => IDLE_HINT.to_string(),
        ChatState::AwaitingType => INVALID_SELECTION.to_string(),
        ChatState::AwaitingContent { entry_type } => content_reprompt_text(*entry_type),
    };
    Step::stay(text, state)
}

/// Perform the submission call and render the outcome for the user.
///
/// Exactly one call per completed entry; the caller resets the dialogue
/// to `Idle` regardless of the result.
pub async fn submit(well: &dyn WellApi, entry: NewEntry) -> String {
    let entry_type = entry.entry_type;
    match well.submit(&entry).await {
        Ok(receipt) => success_text(entry_type, &receipt),
        Err(err) => {
            tracing::warn!(error = %err, entry_type = entry_type.as_str(), "submission failed");
            failure_text(entry_type, &err.to_string())
        }
    }
}

// ============================================================================
// Reply texts (Telegram MarkdownV2)
// ============================================================================

const WELCOME: &str = "🪣 *Bucket Bot*\n\nWhat are we filing? Pick an entry type:";

const IDLE_HINT: &str = "Nothing in progress\\. Send /start to file a new entry\\.";

const INVALID_SELECTION: &str =
    "Please pick *Task*, *Note* or *Bookmark* using the buttons below\\.";

const CANCELLED: &str = "🚮 Cancelled\\. Nothing was filed\\.";

const NOTHING_TO_CANCEL: &str = "Nothing to cancel\\. Send /start to begin\\.";

/// Static help text; showing it never changes state.
pub fn help_text() -> String {
    "🪣 *Bucket Bot Help*\n\n\
     1\\. Send /start and pick an entry type\n\
     2\\. Send the entry text\n\
     3\\. The entry is filed into the well and the reply comes back here\n\n\
     *Commands:*\n\
     /start \\- file a new entry\n\
     /help \\- show this message\n\
     /cancel \\- abandon the current entry"
        .to_string()
}

/// Prompt shown right after a type is chosen.
pub fn selected_text(entry_type: EntryType) -> String {
    format!(
        "✅ *{}* selected\\.\n\nSend the {} text:",
        entry_type.label(),
        entry_type.as_str()
    )
}

fn advance_to_content(entry_type: EntryType) -> Step {
    Step::Reply {
        text: selected_text(entry_type),
        next: ChatState::AwaitingContent { entry_type },
        menu: false,
    }
}

fn empty_content_text(entry_type: EntryType) -> String {
    format!(
        "The {} text cannot be empty\\. Send it as a plain message:",
        entry_type.as_str()
    )
}

fn content_reprompt_text(entry_type: EntryType) -> String {
    format!(
        "Still waiting for the {} text\\. Send it as a plain message, or /cancel to abort\\.",
        entry_type.as_str()
    )
}

fn success_text(entry_type: EntryType, receipt: &Receipt) -> String {
    format!(
        "✅ *{} filed*\n\n*Status:* {}\n*Response:* {}\n\nSend /start to file another\\.",
        entry_type.label(),
        receipt.status,
        escape_markdown(&receipt.body)
    )
}

fn failure_text(entry_type: EntryType, error: &str) -> String {
    format!(
        "❌ *Failed to file the {}*\n\n{}\n\nNothing was saved\\. Send /start to retry\\.",
        entry_type.as_str(),
        escape_markdown(error)
    )
}

/// Escape special characters for Telegram MarkdownV2 format.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

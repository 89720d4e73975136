//! Long-running Telegram bot wiring.
//!
//! Maps Telegram updates onto the conversation flow: the access guard is
//! checked first, commands and plain messages feed the reducer in
//! [`crate::flow`], and inline-button selections arrive as callback
//! queries. Per-chat state lives in teloxide's in-memory dialogue storage.

use crate::access::{AccessGuard, DENIED, DENIED_ALERT};
use crate::config::Config;
use crate::entry::EntryType;
use crate::flow::{self, ChatState, Step};
use crate::well::{WellApi, WellClient};
use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use teloxide::utils::command::BotCommands;

type ChatDialogue = Dialogue<ChatState, InMemStorage<ChatState>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Commands exposed to the authorized user.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "file a new entry")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "abandon the current entry")]
    Cancel,
}

/// Callback data prefix for type-selection buttons.
const SELECT_PREFIX: &str = "select";

fn selection_data(entry_type: EntryType) -> String {
    format!("{SELECT_PREFIX}:{}", entry_type.as_str())
}

/// Parse callback data from a selection button press.
fn parse_selection(data: &str) -> Option<EntryType> {
    let (prefix, value) = data.split_once(':')?;
    if prefix != SELECT_PREFIX {
        return None;
    }
    value.parse().ok()
}

/// Inline keyboard offering the three entry types, one per row.
fn type_keyboard() -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = EntryType::ALL
        .iter()
        .map(|t| vec![InlineKeyboardButton::callback(t.label(), selection_data(*t))])
        .collect();

    InlineKeyboardMarkup::new(rows)
}

/// Carry out one [`Step`] produced by the flow reducer.
async fn apply_step(
    bot: &Bot,
    dialogue: &ChatDialogue,
    well: &dyn WellApi,
    chat_id: ChatId,
    step: Step,
) -> HandlerResult {
    match step {
        Step::Reply { text, next, menu } => {
            dialogue.update(next).await?;
            let mut request = bot
                .send_message(chat_id, text)
                .parse_mode(ParseMode::MarkdownV2);
            if menu {
                request = request.reply_markup(type_keyboard());
            }
            request.await?;
        }
        Step::Submit(entry) => {
            // Reset first so no partial entry survives a failed call.
            dialogue.update(ChatState::Idle).await?;
            let text = flow::submit(well, entry).await;
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
    }

    Ok(())
}

async fn on_start_command(
    bot: Bot,
    dialogue: ChatDialogue,
    well: Arc<dyn WellApi>,
    msg: Message,
) -> HandlerResult {
    let state = dialogue.get_or_default().await?;
    apply_step(&bot, &dialogue, well.as_ref(), msg.chat.id, flow::on_start(&state)).await
}

async fn on_cancel_command(
    bot: Bot,
    dialogue: ChatDialogue,
    well: Arc<dyn WellApi>,
    msg: Message,
) -> HandlerResult {
    let state = dialogue.get_or_default().await?;
    apply_step(&bot, &dialogue, well.as_ref(), msg.chat.id, flow::on_cancel(&state)).await
}

/// Handle the /help command. Help never changes state.
async fn on_help_command(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, flow::help_text())
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

/// Handle a non-command message: a typed selection, entry content, or
/// something to reprompt about.
async fn on_message(
    bot: Bot,
    dialogue: ChatDialogue,
    well: Arc<dyn WellApi>,
    msg: Message,
) -> HandlerResult {
    let state = dialogue.get_or_default().await?;
    let step = match msg.text() {
        Some(text) => flow::on_text(&state, text),
        None => flow::reprompt(&state),
    };
    apply_step(&bot, &dialogue, well.as_ref(), msg.chat.id, step).await
}

/// Handle a selection button press.
async fn on_callback(
    bot: Bot,
    dialogue: ChatDialogue,
    well: Arc<dyn WellApi>,
    q: CallbackQuery,
) -> HandlerResult {
    // Answer first to clear the button's loading state.
    bot.answer_callback_query(&q.id).await?;

    let Some(message) = q.message else {
        return Ok(());
    };

    let state = dialogue.get_or_default().await?;
    let step = match q.data.as_deref().and_then(parse_selection) {
        Some(entry_type) => flow::on_select(&state, entry_type),
        None => flow::reprompt(&state),
    };
    apply_step(&bot, &dialogue, well.as_ref(), message.chat().id, step).await
}

async fn deny_message(bot: Bot, msg: Message) -> HandlerResult {
    let sender = msg.from.as_ref().map(|user| user.id);
    tracing::warn!(?sender, "rejected message from unauthorized sender");
    bot.send_message(msg.chat.id, DENIED)
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

async fn deny_callback(bot: Bot, q: CallbackQuery) -> HandlerResult {
    tracing::warn!(sender = %q.from.id, "rejected button press from unauthorized sender");
    bot.answer_callback_query(&q.id).text(DENIED_ALERT).await?;
    Ok(())
}

/// Build the update handler tree.
///
/// The access guard branches come first: unauthorized senders are
/// answered with the denial text and never reach the dialogue.
pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(dptree::case![Command::Start].endpoint(on_start_command))
        .branch(dptree::case![Command::Help].endpoint(on_help_command))
        .branch(dptree::case![Command::Cancel].endpoint(on_cancel_command));

    let message_handler = Update::filter_message()
        .branch(
            dptree::filter(|msg: Message, guard: Arc<AccessGuard>| {
                !guard.permits(msg.from.as_ref().map(|user| user.id))
            })
            .endpoint(deny_message),
        )
        .branch(command_handler)
        .branch(dptree::endpoint(on_message));

    let callback_handler = Update::filter_callback_query()
        .branch(
            dptree::filter(|q: CallbackQuery, guard: Arc<AccessGuard>| {
                !guard.permits(Some(q.from.id))
            })
            .endpoint(deny_callback),
        )
        .branch(dptree::endpoint(on_callback));

    dialogue::enter::<Update, InMemStorage<ChatState>, ChatState, _>()
        .branch(message_handler)
        .branch(callback_handler)
}

/// Main entry point for the bot.
pub async fn run() -> Result<()> {
    let config = Config::load(None)?;

    let well: Arc<dyn WellApi> = Arc::new(WellClient::new(&config.well)?);
    let guard = Arc::new(AccessGuard::new(config.authorized_user));
    let bot = Bot::new(&config.bot_token);

    tracing::info!(host = %config.hostname, "Starting Bucket Bot...");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![
            InMemStorage::<ChatState>::new(),
            well,
            guard
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_offers_exactly_three_options() {
        let keyboard = type_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        for row in &keyboard.inline_keyboard {
            assert_eq!(row.len(), 1);
        }
    }

    #[test]
    fn test_selection_data_roundtrip() {
        for entry_type in EntryType::ALL {
            let data = selection_data(entry_type);
            assert_eq!(parse_selection(&data), Some(entry_type));
        }
    }

    #[test]
    fn test_parse_selection_rejects_foreign_data() {
        assert!(parse_selection("select").is_none());
        assert!(parse_selection("select:pizza").is_none());
        assert!(parse_selection("other:task").is_none());
    }
}

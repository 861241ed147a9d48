use teloxide::prelude::*;
use teloxide::types::{ChatAction, ParseMode};

use crate::bot_state::BotState;
use crate::features::chat::{GREETING, QUICK_REPLIES, TYPING_PLACEHOLDER};
use crate::handlers::utils::{escape_markdown_v2, quick_replies_keyboard, suggestions_keyboard};
use crate::handlers::HandlerResult;
use crate::models::Sender;

pub async fn start_chat(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    bot.send_message(chat_id, GREETING)
        .reply_markup(quick_replies_keyboard())
        .await?;
    Ok(())
}

/// One chat turn: placeholder while waiting, then the reply with its suggested actions.
pub async fn send_chat_message(bot: &Bot, chat_id: ChatId, state: &BotState, text: &str) -> HandlerResult {
    let Some(turn) = state
        .update_user_state(chat_id, |user_state| user_state.chat.begin_turn(text))
        .await
    else {
        return Ok(());
    };

    state.chat.record(chat_id, Sender::User, &turn.message).await;

    let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;
    let placeholder = match bot.send_message(chat_id, TYPING_PLACEHOLDER).await {
        Ok(message) => Some(message.id),
        Err(e) => {
            log::debug!("Typing placeholder not shown: {}", e);
            None
        }
    };

    let result = state.chat.request(&turn).await;
    let reply = state
        .update_user_state(chat_id, |user_state| user_state.chat.complete_turn(&turn, result))
        .await;

    state.chat.record(chat_id, Sender::Bot, &reply.text).await;

    if let Some(placeholder) = placeholder {
        if let Err(e) = bot.delete_message(chat_id, placeholder).await {
            log::debug!("Typing placeholder not removed: {}", e);
        }
    }

    let request = bot
        .send_message(chat_id, escape_markdown_v2(&reply.text))
        .parse_mode(ParseMode::MarkdownV2);

    if reply.suggested_actions.is_empty() {
        request.await?;
    } else {
        request
            .reply_markup(suggestions_keyboard(reply.turn, &reply.suggested_actions))
            .await?;
    }

    log::info!("💬 Chat turn {} answered for {} (failed: {})", reply.turn, chat_id, reply.failed);

    Ok(())
}

/// Quick replies and suggested actions resubmit their label as a user message.
pub async fn handle_chat_callback(bot: &Bot, chat_id: ChatId, state: &BotState, data: &str) -> HandlerResult {
    let label = if let Some(index) = data.strip_prefix("quick_") {
        index
            .parse::<usize>()
            .ok()
            .and_then(|index| QUICK_REPLIES.get(index))
            .map(|label| label.to_string())
    } else if let Some(reference) = data.strip_prefix("suggest_") {
        let user_state = state.get_user_state(chat_id).await;
        let label = reference
            .split_once('_')
            .and_then(|(turn, index)| Some((turn.parse::<u64>().ok()?, index.parse::<usize>().ok()?)))
            .and_then(|(turn, index)| user_state.chat.suggested_action(turn, index))
            .map(str::to_string);
        label
    } else {
        None
    };

    match label {
        Some(label) => send_chat_message(bot, chat_id, state, &label).await,
        None => {
            bot.send_message(chat_id, "That suggestion is no longer available. Just type your question.")
                .await?;
            Ok(())
        }
    }
}

use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot_state::BotState;
use crate::features::contact::{ContactDraft, ContactStep, SUCCESS_FEEDBACK_DURATION};
use crate::features::guard::FormKind;
use crate::handlers::utils::escape_markdown_v2;
use crate::handlers::HandlerResult;

const SEND_PROMPT: &str = "✉️ Questions? Send us a message any time with /contact.";
const SENT: &str = "✅ Message Sent!";

pub async fn start_contact(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    let draft = ContactDraft::new();
    let prompt = draft.step.prompt();

    state
        .update_user_state(chat_id, |user_state| {
            user_state.reset_forms();
            user_state.contact = Some(draft);
        })
        .await;

    bot.send_message(
        chat_id,
        format!("✉️ *Send us a message*\n\n{}", escape_markdown_v2(prompt)),
    )
    .parse_mode(ParseMode::MarkdownV2)
    .await?;

    Ok(())
}

pub async fn handle_contact_text(bot: &Bot, chat_id: ChatId, state: &BotState, text: &str) -> HandlerResult {
    let result = state
        .update_user_state(chat_id, |user_state| {
            user_state.contact.as_mut().map(|draft| draft.accept_text(text))
        })
        .await;

    match result {
        Some(Ok(ContactStep::Ready)) => submit_contact(bot, chat_id, state).await?,
        Some(Ok(step)) => {
            bot.send_message(chat_id, step.prompt()).await?;
        }
        Some(Err(e)) => {
            bot.send_message(chat_id, format!("{} (or /cancel)", e)).await?;
        }
        None => {}
    }
    Ok(())
}

async fn submit_contact(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    let Some(token) = state.guard.try_acquire(chat_id, FormKind::Contact).await else {
        bot.send_message(chat_id, "⏳ Your message is already on its way.").await?;
        return Ok(());
    };

    let draft = state
        .update_user_state(chat_id, |user_state| user_state.contact.take())
        .await;

    let fields = match draft.map(ContactDraft::into_fields) {
        Some(Ok(fields)) => fields,
        Some(Err(e)) => {
            state.guard.release(token).await;
            bot.send_message(chat_id, e.to_string()).await?;
            return Ok(());
        }
        None => {
            state.guard.release(token).await;
            return Ok(());
        }
    };

    let outcome = state.contacts.submit(chat_id, fields).await;
    log::info!("✉️ Contact message {} handled ({:?})", outcome.message.id, outcome.persistence);
    state.guard.release(token).await;

    let feedback = bot.send_message(chat_id, SENT).await?;

    let bot = bot.clone();
    tokio::spawn(async move {
        tokio::time::sleep(SUCCESS_FEEDBACK_DURATION).await;
        if let Err(e) = bot.edit_message_text(chat_id, feedback.id, SEND_PROMPT).await {
            log::debug!("Could not restore contact prompt: {}", e);
        }
    });

    Ok(())
}

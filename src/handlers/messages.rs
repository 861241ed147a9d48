use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot_state::BotState;
use crate::handlers::utils::{
    clinic_text, main_menu_keyboard, CANCEL_LOCATION, MENU_BOOK, MENU_CLINIC, MENU_CONTACT,
    MENU_LOCATION,
};
use crate::handlers::{booking, chat, contact, location, HandlerResult};

pub async fn message_handler(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    let chat_id = msg.chat.id;

    let Some(text) = msg.text() else {
        bot.send_message(chat_id, "I can only read text here. Use the menu below or type a question.")
            .reply_markup(main_menu_keyboard())
            .await?;
        return Ok(());
    };

    // Unknown commands fall through the command filter.
    if text.starts_with('/') {
        bot.send_message(chat_id, "Unknown command. Try /help.").await?;
        return Ok(());
    }

    match text {
        MENU_BOOK => booking::start_booking(&bot, chat_id, &state).await?,
        MENU_CONTACT => contact::start_contact(&bot, chat_id, &state).await?,
        MENU_LOCATION => location::request_location(&bot, &msg, &state).await?,
        MENU_CLINIC => {
            bot.send_message(chat_id, clinic_text())
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        _ => {
            let user_state = state.get_user_state(chat_id).await;

            if user_state.awaiting_location && text == CANCEL_LOCATION {
                location::decline_location(&bot, chat_id, &state).await?;
            } else if user_state.booking.is_some() {
                booking::handle_booking_text(&bot, chat_id, &state, text).await?;
            } else if user_state.contact.is_some() {
                contact::handle_contact_text(&bot, chat_id, &state, text).await?;
            } else {
                chat::send_chat_message(&bot, chat_id, &state, text).await?;
            }
        }
    }

    Ok(())
}

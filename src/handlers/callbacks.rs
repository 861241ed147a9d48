use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::handlers::{booking, chat, HandlerResult};

const BOOKING_PREFIXES: [&str; 5] = ["booking_", "svc_", "doc_", "calendar_", "time_"];

pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: BotState) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };

    let chat_id = message.chat().id;
    let message_id = message.id();

    log::debug!("🔘 Callback {} from {}", data, chat_id);

    match data {
        "calendar_ignore" => {}
        data if data.starts_with("bookdoc_") => {
            let doctor_id = data.trim_start_matches("bookdoc_");
            booking::start_booking_with_doctor(&bot, chat_id, &state, doctor_id).await?;
        }
        data if BOOKING_PREFIXES.iter().any(|prefix| data.starts_with(prefix)) => {
            booking::handle_booking_callback(&bot, chat_id, message_id, &state, data).await?;
        }
        data if data.starts_with("quick_") || data.starts_with("suggest_") => {
            chat::handle_chat_callback(&bot, chat_id, &state, data).await?;
        }
        _ => log::warn!("Unhandled callback data: {}", data),
    }

    Ok(())
}

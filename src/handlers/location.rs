use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::features::geolocation::GeolocationError;
use crate::handlers::utils::{directions_keyboard, location_request_keyboard, main_menu_keyboard};
use crate::handlers::HandlerResult;
use crate::models::Coordinates;

pub async fn request_location(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id;

    // Location request buttons only work in private chats.
    if !msg.chat.is_private() {
        return show_alert(bot, chat_id, GeolocationError::Unsupported).await;
    }

    state
        .update_user_state(chat_id, |user_state| user_state.awaiting_location = true)
        .await;

    bot.send_message(chat_id, "📍 Share your location and I'll tell you how far the clinic is.")
        .reply_markup(location_request_keyboard())
        .await?;

    Ok(())
}

/// The user closed the location prompt without sharing.
pub async fn decline_location(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    state
        .update_user_state(chat_id, |user_state| user_state.awaiting_location = false)
        .await;
    show_alert(bot, chat_id, GeolocationError::PermissionDenied).await
}

pub async fn location_handler(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    let chat_id = msg.chat.id;
    let position = msg
        .location()
        .map(|location| Coordinates::new(location.latitude, location.longitude))
        .ok_or(GeolocationError::PermissionDenied);

    state
        .update_user_state(chat_id, |user_state| user_state.awaiting_location = false)
        .await;

    match state.distance.report(position) {
        Ok(report) => {
            log::info!("📍 Distance for {}: {:.1} km", chat_id, report.distance_km);

            bot.send_message(chat_id, report.summary())
                .reply_markup(main_menu_keyboard())
                .await?;
            send_directions(&bot, chat_id).await?;
        }
        Err(e) => show_alert(&bot, chat_id, e).await?,
    }

    Ok(())
}

pub async fn send_directions(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    let request = bot.send_message(chat_id, "🧭 Directions to PhysioHealth Clinic");
    match directions_keyboard() {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };
    Ok(())
}

async fn show_alert(bot: &Bot, chat_id: ChatId, error: GeolocationError) -> HandlerResult {
    log::warn!("⚠️ Location unavailable for {}: {:?}", chat_id, error);

    bot.send_message(chat_id, format!("⚠️ {}", error.alert()))
        .reply_markup(main_menu_keyboard())
        .await?;

    Ok(())
}

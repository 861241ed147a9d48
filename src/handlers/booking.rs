use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode};

use crate::bot_state::BotState;
use crate::features::booking::{earliest_booking_date, BookingDraft, BookingStep};
use crate::features::guard::FormKind;
use crate::features::{FormError, Persistence};
use crate::handlers::utils::{
    booking_confirmation, booking_summary, doctors_keyboard, escape_markdown_v2,
    main_menu_keyboard, make_calendar_keyboard, make_time_keyboard, review_keyboard,
    services_keyboard,
};
use crate::handlers::HandlerResult;

const EXPIRED: &str = "This booking form has expired. Start again with /book.";

/// Panel text and buttons for the step the draft is on.
pub fn step_view(draft: &BookingDraft, today: NaiveDate) -> (String, Option<InlineKeyboardMarkup>) {
    let (prompt, keyboard) = match draft.step {
        BookingStep::Service => ("Choose a service:", Some(services_keyboard())),
        BookingStep::Doctor => ("Choose your doctor:", Some(doctors_keyboard())),
        BookingStep::Date => {
            let earliest = earliest_booking_date(today);
            (
                "Choose a date:",
                Some(make_calendar_keyboard(earliest.year(), earliest.month(), today)),
            )
        }
        BookingStep::Time => match draft.date {
            Some(date) => ("Choose a time:", Some(make_time_keyboard(date))),
            None => ("Choose a date:", Some(make_calendar_keyboard(today.year(), today.month(), today))),
        },
        BookingStep::Name => ("👤 Please type the patient's full name:", None),
        BookingStep::Phone => ("📞 Your phone number:", None),
        BookingStep::Email => ("📧 Your email address:", None),
        BookingStep::Review => (
            "Check the details and confirm. Tick the regular patient box if you have visited us before.",
            Some(review_keyboard(draft.regular_patient)),
        ),
    };

    (
        format!("{}\n\n{}", booking_summary(draft), escape_markdown_v2(prompt)),
        keyboard,
    )
}

async fn update_draft<R>(
    state: &BotState,
    chat_id: ChatId,
    f: impl FnOnce(&mut BookingDraft) -> Result<R, FormError>,
) -> Option<Result<BookingDraft, FormError>> {
    state
        .update_user_state(chat_id, |user_state| {
            user_state
                .booking
                .as_mut()
                .map(|draft| f(draft).map(|_| draft.clone()))
        })
        .await
}

async fn edit_panel(bot: &Bot, chat_id: ChatId, message_id: MessageId, draft: &BookingDraft) -> HandlerResult {
    let (text, keyboard) = step_view(draft, Utc::now().date_naive());
    let request = bot
        .edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::MarkdownV2);

    match keyboard {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };
    Ok(())
}

async fn send_panel(bot: &Bot, chat_id: ChatId, draft: &BookingDraft) -> HandlerResult {
    let (text, keyboard) = step_view(draft, Utc::now().date_naive());
    let request = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::MarkdownV2);

    match keyboard {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };
    Ok(())
}

async fn report_draft_result(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    result: Option<Result<BookingDraft, FormError>>,
) -> HandlerResult {
    match result {
        Some(Ok(draft)) => edit_panel(bot, chat_id, message_id, &draft).await?,
        Some(Err(e)) => {
            bot.send_message(chat_id, e.to_string()).await?;
        }
        None => {
            bot.send_message(chat_id, EXPIRED).await?;
        }
    }
    Ok(())
}

pub async fn start_booking(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    open_booking(bot, chat_id, state, BookingDraft::new()).await
}

/// Opens the booking panel from a doctor card, with that doctor preselected.
pub async fn start_booking_with_doctor(bot: &Bot, chat_id: ChatId, state: &BotState, doctor_id: &str) -> HandlerResult {
    match BookingDraft::with_doctor(doctor_id) {
        Ok(draft) => open_booking(bot, chat_id, state, draft).await,
        Err(e) => {
            log::warn!("Doctor card for unknown doctor: {}", doctor_id);
            bot.send_message(chat_id, e.to_string()).await?;
            Ok(())
        }
    }
}

async fn open_booking(bot: &Bot, chat_id: ChatId, state: &BotState, draft: BookingDraft) -> HandlerResult {
    let panel = draft.clone();

    state
        .update_user_state(chat_id, |user_state| {
            user_state.reset_forms();
            user_state.booking = Some(draft);
        })
        .await;

    log::info!("📅 Booking form opened by {}", chat_id);
    send_panel(bot, chat_id, &panel).await
}

/// Typed input for the name, phone and email steps.
pub async fn handle_booking_text(bot: &Bot, chat_id: ChatId, state: &BotState, text: &str) -> HandlerResult {
    match update_draft(state, chat_id, |draft| draft.accept_text(text)).await {
        Some(Ok(draft)) => send_panel(bot, chat_id, &draft).await?,
        Some(Err(e)) => {
            bot.send_message(chat_id, format!("{} (or /cancel)", e)).await?;
        }
        None => {
            bot.send_message(chat_id, EXPIRED).await?;
        }
    }
    Ok(())
}

pub async fn handle_booking_callback(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    state: &BotState,
    data: &str,
) -> HandlerResult {
    let today = Utc::now().date_naive();

    match data {
        "booking_cancel" => {
            state.update_user_state(chat_id, |user_state| user_state.booking = None).await;
            bot.edit_message_text(chat_id, message_id, "Booking cancelled.").await?;
        }

        "booking_regular" => {
            let result = update_draft(state, chat_id, |draft| {
                draft.toggle_regular_patient();
                Ok(())
            })
            .await;
            report_draft_result(bot, chat_id, message_id, result).await?;
        }

        "booking_submit" => submit_booking(bot, chat_id, message_id, state).await?,

        data if data.starts_with("svc_") => {
            let service_id = data.trim_start_matches("svc_");
            let result = update_draft(state, chat_id, |draft| draft.select_service(service_id)).await;
            report_draft_result(bot, chat_id, message_id, result).await?;
        }

        data if data.starts_with("doc_") => {
            let doctor_id = data.trim_start_matches("doc_");
            let result = update_draft(state, chat_id, |draft| draft.select_doctor(doctor_id)).await;
            report_draft_result(bot, chat_id, message_id, result).await?;
        }

        data if data.starts_with("calendar_month_") => {
            let parts: Vec<&str> = data.trim_start_matches("calendar_month_").split('_').collect();
            if let [year, month] = parts.as_slice() {
                let year = year.parse::<i32>().unwrap_or(today.year());
                let month = month.parse::<u32>().unwrap_or(today.month());
                bot.edit_message_reply_markup(chat_id, message_id)
                    .reply_markup(make_calendar_keyboard(year, month, today))
                    .await?;
            }
        }

        data if data.starts_with("calendar_day_") => {
            let parts: Vec<&str> = data.trim_start_matches("calendar_day_").split('_').collect();
            let date = match parts.as_slice() {
                [year, month, day] => match (year.parse(), month.parse(), day.parse()) {
                    (Ok(year), Ok(month), Ok(day)) => NaiveDate::from_ymd_opt(year, month, day),
                    _ => None,
                },
                _ => None,
            };

            let Some(date) = date else {
                log::warn!("Malformed calendar callback: {}", data);
                return Ok(());
            };
            let result = update_draft(state, chat_id, |draft| draft.select_date(date, today)).await;
            report_draft_result(bot, chat_id, message_id, result).await?;
        }

        data if data.starts_with("time_") => {
            let Ok(time) = NaiveTime::parse_from_str(data.trim_start_matches("time_"), "%H%M") else {
                log::warn!("Malformed time callback: {}", data);
                return Ok(());
            };
            let result = update_draft(state, chat_id, |draft| draft.select_time(time)).await;
            report_draft_result(bot, chat_id, message_id, result).await?;
        }

        _ => {}
    }

    Ok(())
}

async fn submit_booking(bot: &Bot, chat_id: ChatId, message_id: MessageId, state: &BotState) -> HandlerResult {
    let Some(token) = state.guard.try_acquire(chat_id, FormKind::Booking).await else {
        bot.send_message(chat_id, "⏳ Your booking is already being submitted.").await?;
        return Ok(());
    };

    let result = submit_booking_once(bot, chat_id, message_id, state).await;
    state.guard.release(token).await;
    result
}

async fn submit_booking_once(bot: &Bot, chat_id: ChatId, message_id: MessageId, state: &BotState) -> HandlerResult {
    let Some(draft) = state.get_user_state(chat_id).await.booking else {
        bot.send_message(chat_id, EXPIRED).await?;
        return Ok(());
    };

    let form = match draft.to_form() {
        Ok(form) => form,
        Err(e) => {
            bot.send_message(chat_id, e.to_string()).await?;
            return Ok(());
        }
    };

    if let Err(e) = bot.edit_message_reply_markup(chat_id, message_id).await {
        log::debug!("Could not clear booking buttons: {}", e);
    }

    let outcome = state.bookings.submit(chat_id, &form).await;
    if outcome.persistence != Persistence::Remote {
        log::info!("📦 Booking {} confirmed with {:?} persistence", outcome.record.booking_id, outcome.persistence);
    }

    state.update_user_state(chat_id, |user_state| user_state.booking = None).await;

    bot.send_message(chat_id, booking_confirmation(&outcome.record))
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(main_menu_keyboard())
        .await?;

    Ok(())
}

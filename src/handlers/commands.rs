use teloxide::types::ParseMode;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::bot_state::BotState;
use crate::handlers::utils::{
    clinic_text, doctor_cards_keyboard, doctors_text, main_menu_keyboard, services_text,
};
use crate::handlers::{booking, chat, contact, location, HandlerResult};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start,
    #[command(description = "show this help")]
    Help,
    #[command(description = "book an appointment")]
    Book,
    #[command(description = "send us a message")]
    Contact,
    #[command(description = "chat with our assistant")]
    Chat,
    #[command(description = "how far is the clinic from you")]
    Location,
    #[command(description = "directions to the clinic")]
    Directions,
    #[command(description = "services and prices")]
    Services,
    #[command(description = "our physiotherapists")]
    Doctors,
    #[command(description = "address and opening hours")]
    Clinic,
    #[command(description = "abandon the current form")]
    Cancel,
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> HandlerResult {
    let chat_id = msg.chat.id;

    match cmd {
        Command::Start => handle_start(&bot, chat_id).await?,
        Command::Help => handle_help(&bot, chat_id).await?,
        Command::Book => booking::start_booking(&bot, chat_id, &state).await?,
        Command::Contact => contact::start_contact(&bot, chat_id, &state).await?,
        Command::Chat => chat::start_chat(&bot, chat_id).await?,
        Command::Location => location::request_location(&bot, &msg, &state).await?,
        Command::Directions => location::send_directions(&bot, chat_id).await?,
        Command::Services => {
            bot.send_message(chat_id, services_text())
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Command::Doctors => {
            bot.send_message(chat_id, doctors_text())
                .parse_mode(ParseMode::MarkdownV2)
                .reply_markup(doctor_cards_keyboard())
                .await?;
        }
        Command::Clinic => {
            bot.send_message(chat_id, clinic_text())
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Command::Cancel => handle_cancel(&bot, chat_id, &state).await?,
    }
    Ok(())
}

async fn handle_start(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    let start_text = "👋 *Welcome to PhysioHealth\\!*\n\n\
        Expert physiotherapy and rehabilitation in Bangalore\\.\n\n\
        📋 *What I can do:*\n\
        /book – book an appointment\n\
        /contact – send us a message\n\
        /location – see how far the clinic is\n\
        /services – services and prices\n\n\
        🎉 Regular patients get 30% off every session\\.\n\n\
        Or just type a question and our assistant will answer\\.";

    bot.send_message(chat_id, start_text)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(main_menu_keyboard())
        .await?;

    Ok(())
}

async fn handle_help(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    bot.send_message(chat_id, Command::descriptions().to_string())
        .await?;

    Ok(())
}

async fn handle_cancel(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    state.update_user_state(chat_id, |user_state| user_state.reset_forms()).await;

    bot.send_message(chat_id, "Cancelled. What would you like to do next?")
        .reply_markup(main_menu_keyboard())
        .await?;

    Ok(())
}

pub mod booking;
pub mod callbacks;
pub mod chat;
pub mod commands;
pub mod contact;
pub mod location;
pub mod messages;
pub mod utils;

pub use callbacks::callback_handler;
pub use commands::{command_handler, Command};
pub use location::location_handler;
pub use messages::message_handler;

use std::error::Error;
use tokio::time;

use crate::bot_state::BotState;

pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

pub async fn cleanup_cache_task(state: BotState) {
    let mut interval = time::interval(time::Duration::from_secs(600));

    loop {
        interval.tick().await;
        state.cleanup_cache().await;
    }
}

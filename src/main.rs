use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};

use physiohealth_bot::api::HttpClinicApi;
use physiohealth_bot::bot_state::BotState;
use physiohealth_bot::config::AppConfig;
use physiohealth_bot::handlers::{
    self, callback_handler, command_handler, location_handler, message_handler, Command,
};
use physiohealth_bot::storage::{Database, LocalStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting PhysioHealth bot...");

    let config = AppConfig::from_env()?;

    let store: Arc<dyn LocalStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            let db = Database::new(database_url).await?;
            db.init().await?;
            log::info!("✅ Database initialized");
            Arc::new(db)
        }
        None => {
            log::warn!("⚠️ DATABASE_URL not set, local records will be kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let api = Arc::new(HttpClinicApi::new(config.api_base_url.clone(), config.api_retries));
    log::info!("🌐 Clinic API at {} ({} retries)", api.base_url(), config.api_retries);

    let state = BotState::new(api, store);

    let state_clone = state.clone();
    tokio::spawn(async move {
        handlers::cleanup_cache_task(state_clone).await;
    });

    let bot = Bot::from_env();

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Could not register bot commands: {}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.location().is_some())
                .endpoint(location_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

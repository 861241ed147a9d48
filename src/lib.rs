pub mod api;
pub mod bot_state;
pub mod config;
pub mod features;
pub mod handlers;
pub mod models;
pub mod storage;

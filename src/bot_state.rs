use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use teloxide::types::ChatId;
use tokio::sync::RwLock;

use crate::api::ClinicApi;
use crate::features::booking::BookingSubmitter;
use crate::features::chat::ChatClient;
use crate::features::contact::ContactSubmitter;
use crate::features::geolocation::DistanceReporter;
use crate::features::guard::SubmissionGuard;
use crate::models::UserState;
use crate::storage::LocalStore;

/// Idle chats older than this lose their form state on the next cleanup.
pub const STATE_TTL_SECS: u64 = 1800;

type UserCache = Arc<RwLock<HashMap<ChatId, (UserState, SystemTime)>>>;

#[derive(Clone)]
pub struct BotState {
    cache: UserCache,
    pub guard: SubmissionGuard,
    pub bookings: BookingSubmitter,
    pub contacts: ContactSubmitter,
    pub chat: ChatClient,
    pub distance: DistanceReporter,
}

impl BotState {
    pub fn new(api: Arc<dyn ClinicApi>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            guard: SubmissionGuard::new(),
            bookings: BookingSubmitter::new(api.clone(), store.clone()),
            contacts: ContactSubmitter::new(api.clone(), store.clone()),
            chat: ChatClient::new(api, store),
            distance: DistanceReporter::default(),
        }
    }

    pub async fn get_user_state(&self, chat_id: ChatId) -> UserState {
        let cache = self.cache.read().await;
        cache
            .get(&chat_id)
            .map(|(state, _)| state.clone())
            .unwrap_or_default()
    }

    pub async fn save_user_state(&self, chat_id: ChatId, state: UserState) {
        let mut cache = self.cache.write().await;
        cache.insert(chat_id, (state, SystemTime::now()));
    }

    /// Read-modify-write of one chat's state under the cache lock.
    pub async fn update_user_state<R>(&self, chat_id: ChatId, f: impl FnOnce(&mut UserState) -> R) -> R {
        let start_time = Instant::now();

        let mut cache = self.cache.write().await;
        let entry = cache
            .entry(chat_id)
            .or_insert_with(|| (UserState::default(), SystemTime::now()));
        let result = f(&mut entry.0);
        entry.1 = SystemTime::now();

        log::debug!("🎯 State updated for user {} in {:?}", chat_id, start_time.elapsed());

        result
    }

    pub async fn cleanup_cache(&self) {
        let mut cache = self.cache.write().await;
        let now = SystemTime::now();
        let previous_count = cache.len();

        cache.retain(|_, (_, timestamp)| {
            now.duration_since(*timestamp).unwrap_or_default().as_secs() < STATE_TTL_SECS
        });

        let current_count = cache.len();
        log::debug!("🧹 Cache cleaned: {} -> {} entries", previous_count, current_count);
    }

    pub async fn cached_users(&self) -> usize {
        self.cache.read().await.len()
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::ChatId;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Booking,
    Contact,
}

/// Proof that the holder owns the in-flight slot for one chat and form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionToken {
    pub chat_id: ChatId,
    pub form: FormKind,
    pub id: Uuid,
}

/// Allows at most one in-flight submission per chat and form.
#[derive(Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<Mutex<HashMap<(ChatId, FormKind), Uuid>>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` while another submission of the same form is running.
    pub async fn try_acquire(&self, chat_id: ChatId, form: FormKind) -> Option<SubmissionToken> {
        let mut in_flight = self.in_flight.lock().await;
        if in_flight.contains_key(&(chat_id, form)) {
            log::debug!("⏳ {:?} submission already in flight for {}", form, chat_id);
            return None;
        }

        let id = Uuid::new_v4();
        in_flight.insert((chat_id, form), id);
        Some(SubmissionToken { chat_id, form, id })
    }

    /// Frees the slot. A stale token (slot taken over since) leaves it untouched.
    pub async fn release(&self, token: SubmissionToken) -> bool {
        let mut in_flight = self.in_flight.lock().await;
        match in_flight.get(&(token.chat_id, token.form)) {
            Some(current) if *current == token.id => {
                in_flight.remove(&(token.chat_id, token.form));
                true
            }
            _ => false,
        }
    }

    pub async fn is_in_flight(&self, chat_id: ChatId, form: FormKind) -> bool {
        self.in_flight.lock().await.contains_key(&(chat_id, form))
    }
}

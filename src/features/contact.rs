use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use teloxide::types::ChatId;

use crate::api::ClinicApi;
use crate::features::{looks_like_email, FormError, Persistence};
use crate::models::ContactMessage;
use crate::storage::{append_record, LocalStore, StorageKey};

/// How long the "Message Sent!" feedback stays before the prompt is restored.
pub const SUCCESS_FEEDBACK_DURATION: Duration = Duration::from_secs(3);

pub fn generate_message_id(now: DateTime<Utc>) -> String {
    format!("MSG{}", now.timestamp_millis())
}

pub fn build_message(fields: BTreeMap<String, String>, now: DateTime<Utc>) -> ContactMessage {
    ContactMessage {
        id: generate_message_id(now),
        fields,
        created_at: now,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactStep {
    #[default]
    Name,
    Email,
    Subject,
    Message,
    Ready,
}

impl ContactStep {
    pub fn prompt(&self) -> &'static str {
        match self {
            ContactStep::Name => "What's your name?",
            ContactStep::Email => "Your email address?",
            ContactStep::Subject => "What is it about?",
            ContactStep::Message => "Type your message.",
            ContactStep::Ready => "Sending…",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDraft {
    pub step: ContactStep,
    fields: BTreeMap<String, String>,
}

impl ContactDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn accept_text(&mut self, text: &str) -> Result<ContactStep, FormError> {
        let value = text.trim();
        let (field, next) = match self.step {
            ContactStep::Name => ("name", ContactStep::Email),
            ContactStep::Email => ("email", ContactStep::Subject),
            ContactStep::Subject => ("subject", ContactStep::Message),
            ContactStep::Message => ("message", ContactStep::Ready),
            ContactStep::Ready => return Err(FormError::NotExpectingText),
        };

        if value.is_empty() {
            return Err(FormError::Empty(field));
        }
        if field == "email" && !looks_like_email(value) {
            return Err(FormError::InvalidEmail);
        }

        self.fields.insert(field.to_string(), value.to_string());
        self.step = next;
        Ok(next)
    }

    pub fn into_fields(self) -> Result<BTreeMap<String, String>, FormError> {
        if self.step != ContactStep::Ready {
            return Err(FormError::Missing("message"));
        }
        Ok(self.fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactOutcome {
    pub message: ContactMessage,
    pub persistence: Persistence,
}

#[derive(Clone)]
pub struct ContactSubmitter {
    api: Arc<dyn ClinicApi>,
    store: Arc<dyn LocalStore>,
}

impl ContactSubmitter {
    pub fn new(api: Arc<dyn ClinicApi>, store: Arc<dyn LocalStore>) -> Self {
        Self { api, store }
    }

    /// Same contract as booking: the user always gets success feedback.
    pub async fn submit(&self, owner: ChatId, fields: BTreeMap<String, String>) -> ContactOutcome {
        let message = build_message(fields, Utc::now());

        let persistence = match self.api.send_contact(&message).await {
            Ok(()) => {
                log::info!("✅ Contact message {} delivered", message.id);
                Persistence::Remote
            }
            Err(e) => {
                log::warn!("⚠️ Contact message {} not delivered: {}", message.id, e);
                match append_record(self.store.as_ref(), owner, StorageKey::Messages, &message).await {
                    Ok(()) => Persistence::LocalFallback,
                    Err(store_err) => {
                        log::error!("❌ Contact message {} could not be saved locally: {}", message.id, store_err);
                        Persistence::Unsaved
                    }
                }
            }
        };

        ContactOutcome { message, persistence }
    }
}

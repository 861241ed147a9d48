use std::collections::VecDeque;
use std::sync::Arc;

use teloxide::types::ChatId;

use crate::api::{ApiError, ChatRequest, ChatResponse, ClinicApi};
use crate::models::{ChatMessage, Sender};
use crate::storage::{append_record, LocalStore, StorageKey};

pub const APOLOGY: &str = "Sorry, I couldn't process your request. Please try again.";
pub const TYPING_PLACEHOLDER: &str = "⏱️ Typing...";
pub const GREETING: &str = "👋 Hi! I'm the PhysioHealth assistant. Ask me about services, pricing or appointments.";
pub const QUICK_REPLIES: [&str; 4] = ["Book appointment", "Services", "Pricing", "Contact"];

/// Most recent entries kept in the in-memory transcript. History in the store is not capped.
pub const TRANSCRIPT_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    User(String),
    Bot(String),
    Typing { turn: u64 },
    Actions { turn: u64, labels: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub id: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub turn: u64,
    pub text: String,
    pub suggested_actions: Vec<String>,
    pub failed: bool,
}

/// Conversation state for one chat. Turns may overlap; each resolves on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSession {
    transcript: VecDeque<TranscriptEntry>,
    pending: Vec<u64>,
    next_turn: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ChatPhase {
        if self.pending.is_empty() {
            ChatPhase::Idle
        } else {
            ChatPhase::AwaitingResponse
        }
    }

    pub fn transcript(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.transcript.iter()
    }

    /// Starts a turn for `text`. Blank input starts nothing.
    pub fn begin_turn(&mut self, text: &str) -> Option<ChatTurn> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }

        self.next_turn += 1;
        let turn = ChatTurn {
            id: self.next_turn,
            message: message.to_string(),
        };

        self.push(TranscriptEntry::User(turn.message.clone()));
        self.push(TranscriptEntry::Typing { turn: turn.id });
        self.pending.push(turn.id);

        Some(turn)
    }

    /// Replaces the turn's typing placeholder with the reply, or with the apology on failure.
    pub fn complete_turn(&mut self, turn: &ChatTurn, result: Result<ChatResponse, ApiError>) -> ChatReply {
        self.pending.retain(|id| *id != turn.id);
        self.transcript
            .retain(|entry| !matches!(entry, TranscriptEntry::Typing { turn: id } if *id == turn.id));

        let reply = match result {
            Ok(response) => ChatReply {
                turn: turn.id,
                text: response.response,
                suggested_actions: response.suggested_actions,
                failed: false,
            },
            Err(e) => {
                log::warn!("⚠️ Chat turn {} failed: {}", turn.id, e);
                ChatReply {
                    turn: turn.id,
                    text: APOLOGY.to_string(),
                    suggested_actions: Vec::new(),
                    failed: true,
                }
            }
        };

        self.push(TranscriptEntry::Bot(reply.text.clone()));
        if !reply.suggested_actions.is_empty() {
            self.push(TranscriptEntry::Actions {
                turn: turn.id,
                labels: reply.suggested_actions.clone(),
            });
        }

        reply
    }

    /// Label of a suggested-action button, if its turn is still in the transcript.
    pub fn suggested_action(&self, turn: u64, index: usize) -> Option<&str> {
        self.transcript.iter().find_map(|entry| match entry {
            TranscriptEntry::Actions { turn: id, labels } if *id == turn => {
                labels.get(index).map(String::as_str)
            }
            _ => None,
        })
    }

    fn push(&mut self, entry: TranscriptEntry) {
        self.transcript.push_back(entry);
        while self.transcript.len() > TRANSCRIPT_LIMIT {
            self.transcript.pop_front();
        }
    }
}

#[derive(Clone)]
pub struct ChatClient {
    api: Arc<dyn ClinicApi>,
    store: Arc<dyn LocalStore>,
}

impl ChatClient {
    pub fn new(api: Arc<dyn ClinicApi>, store: Arc<dyn LocalStore>) -> Self {
        Self { api, store }
    }

    /// Appends a line to `chatHistory`. A failed write is logged, not surfaced.
    pub async fn record(&self, owner: ChatId, sender: Sender, text: &str) {
        let entry = ChatMessage::new(text, sender);
        if let Err(e) = append_record(self.store.as_ref(), owner, StorageKey::ChatHistory, &entry).await {
            log::error!("❌ Chat history not saved for {}: {}", owner, e);
        }
    }

    /// Single attempt, no retry.
    pub async fn request(&self, turn: &ChatTurn) -> Result<ChatResponse, ApiError> {
        let request = ChatRequest {
            message: turn.message.clone(),
        };
        self.api.chat(&request).await
    }

    /// Runs a whole turn against `session`: history, remote call, reply.
    pub async fn send(&self, owner: ChatId, session: &mut ChatSession, text: &str) -> Option<ChatReply> {
        let turn = session.begin_turn(text)?;
        self.record(owner, Sender::User, &turn.message).await;

        let result = self.request(&turn).await;
        let reply = session.complete_turn(&turn, result);
        self.record(owner, Sender::Bot, &reply.text).await;

        Some(reply)
    }
}

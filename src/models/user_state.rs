use crate::features::booking::BookingDraft;
use crate::features::chat::ChatSession;
use crate::features::contact::ContactDraft;

/// Per-chat UI state. Lives in the bot's cache only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub booking: Option<BookingDraft>,
    pub contact: Option<ContactDraft>,
    pub chat: ChatSession,
    pub awaiting_location: bool,
}

impl UserState {
    /// Drops any half-filled form and pending location request. The chat transcript is kept.
    pub fn reset_forms(&mut self) {
        self.booking = None;
        self.contact = None;
        self.awaiting_location = false;
    }
}

//! Session and conversation state shared by front-end callers.
//!
//! An explicit value the front-end owns and passes where needed, rather than
//! an ambient context every view can reach. All mutation happens on the
//! single UI thread, so the state is plain data with `&mut` operations and
//! last write wins.

use std::collections::HashMap;

use crate::api::types::{Conversation, ConversationId, Message};

/// Per-process ("tab"-lifetime) authentication and conversation state.
#[derive(Debug, Default)]
pub struct SessionState {
    authenticated: bool,
    conversations: Vec<Conversation>,
    messages: HashMap<ConversationId, Vec<Message>>,
    active: Option<ConversationId>,
}

impl SessionState {
    /// Fresh, unauthenticated state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the session authenticated. Called after a successful login.
    pub fn login(&mut self) {
        self.authenticated = true;
    }

    /// Marks the session unauthenticated and drops conversation state.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.conversations.clear();
        self.messages.clear();
        self.active = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Conversations in the order the server reported them.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Replaces the conversation list. Messages already fetched for ids that
    /// remain in the list are kept.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    /// Appends a conversation descriptor (e.g. from `start-conversation`)
    /// unless it is already known.
    pub fn record_conversation(&mut self, conversation: Conversation) {
        if !self.conversations.iter().any(|c| c.id == conversation.id) {
            self.conversations.push(conversation);
        }
    }

    /// Selects the active conversation. Selecting an id with no fetched
    /// messages is allowed; `current_messages` is empty until they arrive.
    pub fn select_conversation(&mut self, id: ConversationId) {
        self.active = Some(id);
    }

    pub fn active_conversation(&self) -> Option<ConversationId> {
        self.active
    }

    /// Stores the fetched messages of a conversation.
    pub fn set_messages(&mut self, id: ConversationId, messages: Vec<Message>) {
        self.messages.insert(id, messages);
    }

    /// Messages of the active conversation, in order.
    pub fn current_messages(&self) -> &[Message] {
        self.active
            .and_then(|id| self.messages.get(&id))
            .map_or(&[], Vec::as_slice)
    }
}

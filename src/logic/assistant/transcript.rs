//! Chat Transcript
//!
//! Message history for one assistant conversation. A transcript starts with
//! the persona's canned greeting and grows as the user and assistant take
//! turns.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::client::Persona;

// ============================================================================
// TYPES
// ============================================================================

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

// ============================================================================
// TRANSCRIPT
// ============================================================================

/// Ordered history of one conversation, oldest first
#[derive(Debug, Clone, Serialize)]
pub struct ChatTranscript {
    persona: &'static str,
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// New conversation seeded with the persona's greeting
    pub fn for_persona(persona: Persona) -> Self {
        Self {
            persona: persona.as_str(),
            messages: vec![ChatMessage::assistant(persona.greeting())],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Record one full exchange
    pub fn record_turn(&mut self, question: &str, reply: &str) {
        self.push(ChatMessage::user(question));
        self.push(ChatMessage::assistant(reply));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

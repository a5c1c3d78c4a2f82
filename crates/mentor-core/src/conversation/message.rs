//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// Represents the role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Tutoring contract sent ahead of every request.
    System,
    /// Message typed by the user.
    User,
    /// Reply from the assistant, or a synthesized error reply.
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::System => "system",
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// A single turn in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    pub fn is_system(&self) -> bool {
        self.role == TurnRole::System
    }
}

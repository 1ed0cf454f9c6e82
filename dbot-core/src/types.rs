//! Core types: user, chat, message, handler response, and Handler trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sender identity as reported by the transport (id, username, names).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// "first last" when a first name is present; `None` otherwise.
    pub fn full_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().filter(|s| !s.is_empty())?;
        match self.last_name.as_deref().filter(|s| !s.is_empty()) {
            Some(last) => Some(format!("{} {}", first, last)),
            None => Some(first.to_string()),
        }
    }

    /// True for the placeholder user of a message the transport reported without a sender.
    pub fn is_anonymous(&self) -> bool {
        self.id == 0
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

/// Chat (group or private) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// A single incoming message. `id` is transport-specific and is used to thread replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Handler result for the chain. `Reply(text)` carries the last reply body so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Message is not for this handler, try next.
    Ignore,
    /// Stop the chain and attach the reply text.
    Reply(String),
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &Message) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &Message) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &Message,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

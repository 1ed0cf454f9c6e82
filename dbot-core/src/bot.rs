//! Bot abstraction for sending messages and images.
//!
//! [`Bot`] is transport-agnostic; dbot-telegram implements it over teloxide and tests substitute
//! a recording mock.

use crate::error::{DbotError, Result};
use crate::types::{Chat, Message};
use async_trait::async_trait;
use std::path::Path;

/// Abstraction for outgoing messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a text message threaded as a reply to `message` (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Sends the image stored at `path` threaded as a reply to `message`.
    async fn reply_photo(&self, message: &Message, path: &Path, caption: Option<&str>) -> Result<()>;
}

/// Parses a transport message id string into an i32 (Telegram message ids).
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| DbotError::Bot(format!("Invalid message_id: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_id_valid() {
        assert_eq!(parse_message_id("123").unwrap(), 123);
        assert_eq!(parse_message_id("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_message_id_invalid() {
        assert!(parse_message_id("").is_err());
        assert!(parse_message_id("abc").is_err());
        assert!(parse_message_id("12.3").is_err());
    }
}

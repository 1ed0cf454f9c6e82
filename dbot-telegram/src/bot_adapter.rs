//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Replies are threaded to the originating message.

use async_trait::async_trait;
use dbot_core::{parse_message_id, Bot as CoreBot, Chat, DbotError, Message, Result};
use std::path::Path;
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, MessageId, ReplyParameters};
use tracing::warn;

/// Thin wrapper around teloxide::Bot that implements dbot-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// Reply parameters for `message`, or None when its id is not a Telegram message id.
fn reply_parameters(message: &Message) -> Option<ReplyParameters> {
    match parse_message_id(&message.id) {
        Ok(id) => Some(ReplyParameters::new(MessageId(id))),
        Err(e) => {
            warn!(error = %e, "Cannot thread reply, sending plain message");
            None
        }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        let mut request = self
            .bot
            .send_message(ChatId(message.chat.id), text.to_string());
        if let Some(params) = reply_parameters(message) {
            request = request.reply_parameters(params);
        }
        request.await.map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn reply_photo(&self, message: &Message, path: &Path, caption: Option<&str>) -> Result<()> {
        let mut request = self
            .bot
            .send_photo(ChatId(message.chat.id), InputFile::file(path.to_path_buf()));
        if let Some(caption) = caption {
            request = request.caption(caption.to_string());
        }
        if let Some(params) = reply_parameters(message) {
            request = request.reply_parameters(params);
        }
        request.await.map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}

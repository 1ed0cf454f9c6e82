//! Adapters from Telegram (teloxide) types to dbot_core types.

use dbot_core::{Chat, Message, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()).filter(|s| !s.is_empty()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_default(),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: chat_type(&self.0.chat),
            },
            content: self.0.text().unwrap_or("").to_string(),
            created_at: self.0.date,
        }
    }
}

fn chat_type(chat: &teloxide::types::Chat) -> String {
    if chat.is_private() {
        "private"
    } else if chat.is_group() || chat.is_supergroup() {
        "group"
    } else if chat.is_channel() {
        "channel"
    } else {
        "unknown"
    }
    .to_string()
}

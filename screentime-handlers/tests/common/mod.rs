//! Test doubles for handler tests: a recording [`Bot`], a store that always fails and
//! message fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use dbot_core::{Bot, Chat, Message, Result, User};
use storage::{StorageError, UsageStore, UsageTable};

/// One outgoing call recorded by [`MockBot`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { chat_id: i64, reply_to: Option<String>, text: String },
    Photo { reply_to: String, path: PathBuf, caption: Option<String> },
}

/// Bot that records every call instead of talking to Telegram.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts of all text messages, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                Sent::Photo { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat.id,
            reply_to: None,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: message.chat.id,
            reply_to: Some(message.id.clone()),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn reply_photo(&self, message: &Message, path: &Path, caption: Option<&str>) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Photo {
            reply_to: message.id.clone(),
            path: path.to_path_buf(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }
}

/// Store whose every operation fails with the given error.
pub struct FailingStore(pub fn() -> StorageError);

#[async_trait]
impl UsageStore for FailingStore {
    async fn load_table(&self) -> std::result::Result<UsageTable, StorageError> {
        Err((self.0)())
    }

    async fn write_cell(&self, _: NaiveDate, _: &str, _: Duration) -> std::result::Result<(), StorageError> {
        Err((self.0)())
    }

    async fn append_user_column(&self, _: &str) -> std::result::Result<(), StorageError> {
        Err((self.0)())
    }

    async fn append_date_row(&self, _: NaiveDate) -> std::result::Result<(), StorageError> {
        Err((self.0)())
    }
}

/// Message with id "10" in chat 77 from `username` (user id 5).
pub fn message_from(username: Option<&str>, text: &str) -> Message {
    Message {
        id: "10".to_string(),
        user: User {
            id: 5,
            username: username.map(str::to_string),
            first_name: Some("Anna".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 77,
            chat_type: "group".to_string(),
        },
        content: text.to_string(),
        created_at: Utc::now(),
    }
}

pub fn message(text: &str) -> Message {
    message_from(Some("Anna"), text)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

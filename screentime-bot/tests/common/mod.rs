//! Recording bot shared by the application tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbot_core::{Bot, Chat, Message, Result};

/// Records (chat id, text) for every text sent; photos record their path.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<(i64, String)>>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((message.chat.id, text.to_string()));
        Ok(())
    }

    async fn reply_photo(&self, message: &Message, path: &Path, _caption: Option<&str>) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((message.chat.id, path.display().to_string()));
        Ok(())
    }
}

//! Minimal transport config: token and optional Bot API URL.
//! Loaded from BOT_TOKEN and TELEGRAM_API_URL (or TELOXIDE_API_URL).

use anyhow::Result;
use std::env;
use tracing::error;

/// Telegram connectivity settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// BOT_TOKEN is required; TELEGRAM_API_URL / TELOXIDE_API_URL optional.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        Ok(Self {
            bot_token,
            telegram_api_url,
        })
    }

    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
        }
    }

    /// Builds the teloxide Bot; an unparseable API URL is logged and the default API is used.
    pub fn build_bot(&self) -> teloxide::Bot {
        let bot = teloxide::Bot::new(self.bot_token.clone());
        match self.telegram_api_url.as_deref() {
            Some(url_str) => match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            },
            None => bot,
        }
    }
}

//! Application config, loaded from environment variables.

use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;
use dbot_telegram::TelegramConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LOG_FILE: &str = "logs/screentime-bot.log";
pub const DEFAULT_DATABASE_URL: &str = "./data/screentime.db";
pub const DEFAULT_WORKSHEET: &str = "database";
pub const DEFAULT_TIMEZONE: &str = "Europe/Madrid";
pub const DEFAULT_CHART_PATH: &str = "rolling_avg.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Sheets,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "sheets" => Ok(Self::Sheets),
            "memory" => Ok(Self::Memory),
            other => bail!("Unknown STORAGE_BACKEND: {} (expected sqlite, sheets or memory)", other),
        }
    }
}

/// Repeating reminder post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerConfig {
    pub interval: Duration,
    pub chat_id: i64,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN, or the CLI override
    pub bot_token: Option<String>,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub log_file: String,
    /// STORAGE_BACKEND as given; checked by validate()
    pub storage_backend: String,
    /// SQLite file path
    pub database_url: String,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_access_token: Option<String>,
    pub sheets_worksheet: String,
    pub sheets_api_url: String,
    /// IANA zone that decides what "yesterday" is
    pub timezone: String,
    pub chart_path: String,
    /// TrueType font for chart text
    pub chart_font: Option<String>,
    pub ticker: Option<TickerConfig>,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl BotConfig {
    /// Loads from environment variables. `token` overrides BOT_TOKEN if provided.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let ticker = match (var("TICKER_INTERVAL_SECS"), var("TICKER_CHAT_ID")) {
            (Some(secs), Some(chat)) => Some(TickerConfig {
                interval: Duration::from_secs(
                    secs.parse()
                        .map_err(|_| anyhow!("TICKER_INTERVAL_SECS is not a number: {}", secs))?,
                ),
                chat_id: chat
                    .parse()
                    .map_err(|_| anyhow!("TICKER_CHAT_ID is not a chat id: {}", chat))?,
            }),
            _ => None,
        };

        Ok(Self {
            bot_token: token.or_else(|| var("BOT_TOKEN")),
            telegram_api_url: var("TELEGRAM_API_URL").or_else(|| var("TELOXIDE_API_URL")),
            log_file: var("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            storage_backend: var("STORAGE_BACKEND").unwrap_or_else(|| "sqlite".to_string()),
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            sheets_spreadsheet_id: var("SHEETS_SPREADSHEET_ID"),
            sheets_access_token: var("SHEETS_ACCESS_TOKEN"),
            sheets_worksheet: var("SHEETS_WORKSHEET").unwrap_or_else(|| DEFAULT_WORKSHEET.to_string()),
            sheets_api_url: var("SHEETS_API_URL")
                .unwrap_or_else(|| storage::DEFAULT_SHEETS_API_URL.to_string()),
            timezone: var("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            chart_path: var("CHART_PATH").unwrap_or_else(|| DEFAULT_CHART_PATH.to_string()),
            chart_font: var("CHART_FONT"),
            ticker,
        })
    }

    /// Fails fast on settings that would only break later at runtime.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.backend()? == StorageBackend::Sheets {
            if self.sheets_spreadsheet_id.is_none() || self.sheets_access_token.is_none() {
                bail!("STORAGE_BACKEND=sheets needs SHEETS_SPREADSHEET_ID and SHEETS_ACCESS_TOKEN");
            }
            if reqwest::Url::parse(&self.sheets_api_url).is_err() {
                bail!("SHEETS_API_URL is not a valid URL: {}", self.sheets_api_url);
            }
        }
        self.tz()?;
        if matches!(self.ticker, Some(ref t) if t.interval.is_zero()) {
            bail!("TICKER_INTERVAL_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn backend(&self) -> Result<StorageBackend> {
        self.storage_backend.parse()
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Unknown TIMEZONE {}: {}", self.timezone, e))
    }

    /// Telegram settings; errors when no token was configured.
    pub fn telegram(&self) -> Result<TelegramConfig> {
        let bot_token = self
            .bot_token
            .clone()
            .ok_or_else(|| anyhow!("BOT_TOKEN not set (use --token or the BOT_TOKEN variable)"))?;
        Ok(TelegramConfig {
            bot_token,
            telegram_api_url: self.telegram_api_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "BOT_TOKEN",
        "TELEGRAM_API_URL",
        "TELOXIDE_API_URL",
        "LOG_FILE",
        "STORAGE_BACKEND",
        "DATABASE_URL",
        "SHEETS_SPREADSHEET_ID",
        "SHEETS_ACCESS_TOKEN",
        "SHEETS_WORKSHEET",
        "SHEETS_API_URL",
        "TIMEZONE",
        "CHART_PATH",
        "CHART_FONT",
        "TICKER_INTERVAL_SECS",
        "TICKER_CHAT_ID",
    ];

    fn clear_env() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();
        env::set_var("BOT_TOKEN", "test_token");

        let config = BotConfig::load(None).unwrap();
        config.validate().unwrap();

        assert_eq!(config.telegram().unwrap().bot_token, "test_token");
        assert!(config.telegram_api_url.is_none());
        assert_eq!(config.log_file, DEFAULT_LOG_FILE);
        assert_eq!(config.backend().unwrap(), StorageBackend::Sqlite);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.sheets_worksheet, "database");
        assert_eq!(config.sheets_api_url, "https://sheets.googleapis.com");
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Madrid);
        assert_eq!(config.chart_path, "rolling_avg.png");
        assert!(config.ticker.is_none());
    }

    #[test]
    #[serial]
    fn test_token_override_and_missing_token() {
        clear_env();
        let config = BotConfig::load(Some("cli_token".to_string())).unwrap();
        assert_eq!(config.telegram().unwrap().bot_token, "cli_token");

        let config = BotConfig::load(None).unwrap();
        assert!(config.telegram().is_err());
    }

    #[test]
    #[serial]
    fn test_load_sheets_and_ticker() {
        clear_env();
        env::set_var("STORAGE_BACKEND", "Sheets");
        env::set_var("SHEETS_SPREADSHEET_ID", "sheet-1");
        env::set_var("SHEETS_ACCESS_TOKEN", "ya29.token");
        env::set_var("TIMEZONE", "America/New_York");
        env::set_var("TICKER_INTERVAL_SECS", "3600");
        env::set_var("TICKER_CHAT_ID", "-100123");

        let config = BotConfig::load(None).unwrap();
        config.validate().unwrap();
        assert_eq!(config.backend().unwrap(), StorageBackend::Sheets);
        assert_eq!(
            config.ticker,
            Some(TickerConfig {
                interval: Duration::from_secs(3600),
                chat_id: -100123
            })
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_ticker_needs_both_variables() {
        clear_env();
        env::set_var("TICKER_INTERVAL_SECS", "60");
        assert!(BotConfig::load(None).unwrap().ticker.is_none());

        env::set_var("TICKER_CHAT_ID", "abc");
        assert!(BotConfig::load(None).is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_validate_rejects_bad_settings() {
        clear_env();
        let base = BotConfig::load(None).unwrap();

        let bad_backend = BotConfig { storage_backend: "postgres".into(), ..base.clone() };
        assert!(bad_backend.validate().is_err());

        let sheets_without_id = BotConfig { storage_backend: "sheets".into(), ..base.clone() };
        assert!(sheets_without_id.validate().is_err());

        let bad_tz = BotConfig { timezone: "Mars/Olympus".into(), ..base.clone() };
        assert!(bad_tz.validate().is_err());

        let bad_url = BotConfig { telegram_api_url: Some("not a url".into()), ..base.clone() };
        assert!(bad_url.validate().is_err());

        let zero_ticker = BotConfig {
            ticker: Some(TickerConfig { interval: Duration::ZERO, chat_id: 1 }),
            ..base
        };
        assert!(zero_ticker.validate().is_err());
    }
}

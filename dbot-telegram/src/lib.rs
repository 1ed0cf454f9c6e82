//! # dbot-telegram
//!
//! Telegram transport layer: teloxide → core adapters, [`dbot_core::Bot`] implementation, minimal
//! config, and long polling that can be stopped from the outside ([`PollingHandle`]).
//! No storage or command logic lives here.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{spawn_polling, PollingHandle};

//! # screentime-bot
//!
//! Application crate: env configuration, component assembly, the process controller that
//! starts and stops long polling, the optional reminder ticker and the operator console.

pub mod cli;
pub mod components;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod ticker;

pub use components::{build_components, create_store, BotComponents};
pub use config::{BotConfig, StorageBackend, TickerConfig};
pub use controller::{
    BotController, ControllerState, Poller, PollerFactory, StartOutcome, StopOutcome,
    TelegramPollerFactory,
};
pub use dashboard::{Dashboard, DashboardCommand};
pub use ticker::Ticker;

//! # screentime-handlers
//!
//! Command handling for the screen-time bot. [`ScreenTimeHandler`] implements
//! [`dbot_core::Handler`]: it parses the command, resolves the sender's identity, reads and
//! writes the usage table through [`storage::UsageStore`] and replies through [`dbot_core::Bot`].
//! The report builders are public so the dashboard and the ticker can reuse them.

pub mod chart;
pub mod clock;
pub mod command;
pub mod error;
pub mod handler;
pub mod identity;
pub mod logging;
pub mod messages;
pub mod registry;
pub mod reminder;
pub mod report;

pub use chart::{ChartError, ChartRenderer};
pub use clock::{yesterday, Clock, FixedClock, SystemClock};
pub use command::Command;
pub use error::CommandError;
pub use handler::ScreenTimeHandler;
pub use identity::{IdentityResolver, IdentityStrategy};
pub use logging::LoggingHandler;
pub use registry::{RegisterOutcome, UserRegistry};
pub use reminder::ReminderReport;
pub use report::{summary_messages, trend_report};

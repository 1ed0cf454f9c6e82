//! Repeating reminder post to a fixed chat.

use dbot_core::{Bot, Chat};
use screentime_handlers::{Clock, ReminderReport};
use std::sync::Arc;
use std::time::Duration;
use storage::UsageStore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Posts the reminder for yesterday every `every`, first post one interval after spawn.
#[derive(Clone)]
pub struct Ticker {
    bot: Arc<dyn Bot>,
    chat: Chat,
    store: Arc<dyn UsageStore>,
    clock: Arc<dyn Clock>,
    every: Duration,
}

impl Ticker {
    pub fn new(
        bot: Arc<dyn Bot>,
        chat_id: i64,
        store: Arc<dyn UsageStore>,
        clock: Arc<dyn Clock>,
        every: Duration,
    ) -> Self {
        Self {
            bot,
            chat: Chat {
                id: chat_id,
                chat_type: "group".to_string(),
            },
            store,
            clock,
            every,
        }
    }

    /// Runs until `token` is cancelled. No tick is sent after cancellation.
    pub fn spawn(&self, token: CancellationToken) -> JoinHandle<()> {
        let ticker = self.clone();
        tokio::spawn(async move { ticker.run(token).await })
    }

    async fn run(self, token: CancellationToken) {
        info!(chat_id = self.chat.id, every_secs = self.every.as_secs(), "Ticker started");
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + self.every, self.every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => self.tick().await,
            }
        }
        info!(chat_id = self.chat.id, "Ticker stopped");
    }

    async fn tick(&self) {
        let report = match ReminderReport::yesterday(self.store.as_ref(), self.clock.as_ref()).await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Ticker could not load the usage table");
                return;
            }
        };
        match self.bot.send_message(&self.chat, &report.message()).await {
            Ok(()) => debug!(chat_id = self.chat.id, pending = report.pending.len(), "Reminder posted"),
            Err(e) => error!(error = %e, chat_id = self.chat.id, "Ticker could not post reminder"),
        }
    }
}

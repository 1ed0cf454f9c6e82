//! Start / stop / restart of long polling, owned by a single operator.

use async_trait::async_trait;
use dbot_telegram::{spawn_polling, PollingHandle};
use handler_chain::HandlerChain;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::ticker::Ticker;

/// A running poller that can be stopped.
#[async_trait]
pub trait Poller: Send {
    /// Stops polling and waits for in-flight updates to finish.
    async fn stop(self: Box<Self>);

    /// True when polling ended without being stopped.
    fn is_finished(&self) -> bool;
}

/// Creates a fresh poller for every start.
pub trait PollerFactory: Send + Sync {
    fn spawn(&self) -> Box<dyn Poller>;
}

#[async_trait]
impl Poller for PollingHandle {
    async fn stop(self: Box<Self>) {
        PollingHandle::stop(*self).await
    }

    fn is_finished(&self) -> bool {
        PollingHandle::is_finished(self)
    }
}

/// Telegram long polling through the handler chain.
pub struct TelegramPollerFactory {
    bot: teloxide::Bot,
    chain: HandlerChain,
}

impl TelegramPollerFactory {
    pub fn new(bot: teloxide::Bot, chain: HandlerChain) -> Self {
        Self { bot, chain }
    }
}

impl PollerFactory for TelegramPollerFactory {
    fn spawn(&self) -> Box<dyn Poller> {
        Box::new(spawn_polling(self.bot.clone(), self.chain.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

struct Running {
    poller: Box<dyn Poller>,
    ticker: Option<(CancellationToken, JoinHandle<()>)>,
}

/// Owns at most one poller (and the ticker running alongside it).
pub struct BotController<F: PollerFactory> {
    factory: F,
    ticker: Option<Ticker>,
    state: ControllerState,
    running: Option<Running>,
}

impl<F: PollerFactory> BotController<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            ticker: None,
            state: ControllerState::Stopped,
            running: None,
        }
    }

    /// Runs `ticker` while the bot is running.
    pub fn with_ticker(mut self, ticker: Ticker) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ControllerState::Running
    }

    pub fn status_line(&self) -> &'static str {
        if self.is_running() {
            "The bot is running"
        } else {
            "Nothing running"
        }
    }

    #[instrument(skip(self))]
    pub async fn start(&mut self) -> StartOutcome {
        self.reap_finished().await;
        if self.running.is_some() {
            info!("Start requested, already running");
            return StartOutcome::AlreadyRunning;
        }

        self.state = ControllerState::Starting;
        let poller = self.factory.spawn();
        let ticker = self.ticker.as_ref().map(|ticker| {
            let token = CancellationToken::new();
            let task = ticker.spawn(token.clone());
            (token, task)
        });
        self.running = Some(Running { poller, ticker });
        self.state = ControllerState::Running;
        info!("Bot started");
        StartOutcome::Started
    }

    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> StopOutcome {
        let Some(running) = self.running.take() else {
            return StopOutcome::NotRunning;
        };

        self.state = ControllerState::Stopping;
        if let Some((token, task)) = running.ticker {
            token.cancel();
            if let Err(e) = task.await {
                warn!(error = %e, "Ticker task ended abnormally");
            }
        }
        running.poller.stop().await;
        self.state = ControllerState::Stopped;
        info!("Bot stopped");
        StopOutcome::Stopped
    }

    /// Stop (if running), then start.
    pub async fn restart(&mut self) -> StartOutcome {
        self.stop().await;
        self.start().await
    }

    /// Clears a poller that ended on its own so the next start spawns a new one.
    async fn reap_finished(&mut self) {
        if self
            .running
            .as_ref()
            .is_some_and(|running| running.poller.is_finished())
        {
            warn!("Polling ended unexpectedly, cleaning up");
            self.stop().await;
        }
    }
}

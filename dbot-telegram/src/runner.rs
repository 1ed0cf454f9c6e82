//! Long polling: converts teloxide messages to core messages and hands them to the HandlerChain.
//! Unlike a plain REPL, the dispatcher is spawned and can be shut down through [`PollingHandle`].

use dbot_core::ToCoreMessage;
use handler_chain::HandlerChain;
use std::sync::Arc;
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::adapters::TelegramMessageWrapper;

/// A running dispatcher. Dropping it leaves polling running; call [`PollingHandle::stop`].
pub struct PollingHandle {
    shutdown: ShutdownToken,
    task: JoinHandle<()>,
}

impl PollingHandle {
    /// Asks the dispatcher to finish in-flight updates, then waits for the polling task to end.
    pub async fn stop(self) {
        match self.shutdown.shutdown() {
            Ok(done) => done.await,
            Err(e) => {
                // Dispatcher not started yet (or already idle): nothing to drain.
                warn!(error = ?e, "Dispatcher idle on shutdown, aborting polling task");
                self.task.abort();
            }
        }
        match self.task.await {
            Ok(()) => info!("Polling stopped"),
            Err(e) if e.is_cancelled() => info!("Polling task cancelled"),
            Err(e) => error!(error = %e, "Polling task panicked"),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Starts long polling in a background task. Each message is processed by `handler_chain`;
/// handler failures are logged and never stop polling.
pub fn spawn_polling(bot: teloxide::Bot, handler_chain: HandlerChain) -> PollingHandle {
    let handler = Update::filter_message().endpoint(process_message);
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(handler_chain)])
        .build();
    let shutdown = dispatcher.shutdown_token();

    let task = tokio::spawn(async move {
        info!("Polling started");
        dispatcher.dispatch().await;
    });

    PollingHandle { shutdown, task }
}

async fn process_message(
    msg: teloxide::types::Message,
    chain: Arc<HandlerChain>,
) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    if msg.text().is_none() {
        debug!(
            user_id = core_msg.user.id,
            chat_id = core_msg.chat.id,
            "Received non-text message, skipped"
        );
        return Ok(());
    }
    if msg.from.is_none() {
        debug!(chat_id = core_msg.chat.id, "Received message without sender, skipped");
        return Ok(());
    }

    if let Err(e) = chain.handle(&core_msg).await {
        error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
    }
    Ok(())
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use dbot_core::{Bot, Handler, HandlerError, HandlerResponse, Message};
use storage::{StorageError, UsageStore};
use tracing::{debug, error, info, instrument, warn};

use crate::chart::{ChartError, ChartRenderer};
use crate::clock::{yesterday, Clock};
use crate::command::{parse_hours_minutes, parse_trend_window, Command};
use crate::error::CommandError;
use crate::identity::IdentityResolver;
use crate::messages;
use crate::registry::{RegisterOutcome, UserRegistry};
use crate::reminder::ReminderReport;
use crate::report::{summary_messages, trend_report};

/// Text of the last reply sent for the command.
type CommandResult = Result<String, CommandError>;

/// Answers the screen-time chat commands. Every reply is threaded to the command message.
///
/// Storage failures are answered with an apology and end the command; transport failures
/// are returned to the chain. A handled command yields `Reply` with the last text sent.
pub struct ScreenTimeHandler {
    store: Arc<dyn UsageStore>,
    bot: Arc<dyn Bot>,
    clock: Arc<dyn Clock>,
    chart: ChartRenderer,
    identity: IdentityResolver,
    registry: UserRegistry,
}

impl ScreenTimeHandler {
    pub fn new(
        store: Arc<dyn UsageStore>,
        bot: Arc<dyn Bot>,
        clock: Arc<dyn Clock>,
        chart: ChartRenderer,
    ) -> Self {
        Self {
            registry: UserRegistry::new(store.clone()),
            store,
            bot,
            clock,
            chart,
            identity: IdentityResolver::default(),
        }
    }

    pub fn with_identity(mut self, identity: IdentityResolver) -> Self {
        self.identity = identity;
        self
    }

    async fn dispatch(&self, command: &Command, name: &str, message: &Message) -> CommandResult {
        match command {
            Command::Start => self.reply(message, &messages::greeting(name)).await,
            Command::Register => self.register(name, message).await,
            Command::Yesterday(args) => self.log_yesterday(args, name, message).await,
            Command::Summary => self.summary(name, message).await,
            Command::Reminder => self.reminder(message).await,
            Command::Trendline(args) => self.trendline(args, message).await,
            Command::RollingAvg => self.rolling_avg(message).await,
            Command::Unknown(_) => self.reply(message, messages::NOT_UNDERSTOOD).await,
        }
    }

    async fn register(&self, name: &str, message: &Message) -> CommandResult {
        let text = match self.registry.register(name).await? {
            RegisterOutcome::Welcomed(name) => messages::welcome(&name),
            RegisterOutcome::AlreadyRegistered(name) => messages::already_registered(&name),
        };
        self.reply(message, &text).await
    }

    async fn log_yesterday(&self, args: &[String], name: &str, message: &Message) -> CommandResult {
        let Some((hours, minutes)) = parse_hours_minutes(args) else {
            return self.reply(message, messages::YESTERDAY_USAGE).await;
        };
        if !self.registry.is_registered(name).await? {
            return self.reply(message, messages::NOT_REGISTERED).await;
        }

        let day = yesterday(self.clock.as_ref());
        let value = Duration::hours(hours.into()) + Duration::minutes(minutes.into());
        self.store.append_date_row(day).await?;
        self.store.write_cell(day, name, value).await?;
        info!(username = %name, %day, hours, minutes, "Usage logged");

        self.reply(message, &messages::logged(hours, minutes)).await?;
        self.reminder(message).await
    }

    async fn summary(&self, name: &str, message: &Message) -> CommandResult {
        let table = self.store.load_table().await?;
        if !table.has_user(name) {
            return self.reply(message, messages::NOT_REGISTERED).await;
        }
        let mut last = String::new();
        for line in summary_messages(&table, name) {
            last = self.reply(message, &line).await?;
        }
        Ok(last)
    }

    async fn reminder(&self, message: &Message) -> CommandResult {
        let report = ReminderReport::yesterday(self.store.as_ref(), self.clock.as_ref()).await?;
        self.reply(message, &report.message()).await
    }

    async fn trendline(&self, args: &[String], message: &Message) -> CommandResult {
        let Some(window) = parse_trend_window(args) else {
            return self.reply(message, messages::TRENDLINE_USAGE).await;
        };
        let table = self.store.load_table().await?;
        self.reply(message, &trend_report(&table, window)).await
    }

    async fn rolling_avg(&self, message: &Message) -> CommandResult {
        let table = self.store.load_table().await?;
        let chart = self.chart.clone();
        let path = tokio::task::spawn_blocking(move || {
            chart
                .render_rolling_average(&table)
                .map(|path| path.to_path_buf())
        })
        .await
        .map_err(|e| ChartError::Task(e.to_string()))??;

        self.bot
            .reply_photo(message, &path, Some(messages::CHART_CAPTION))
            .await?;
        Ok(messages::CHART_CAPTION.to_string())
    }

    async fn reply(&self, message: &Message, text: &str) -> CommandResult {
        self.bot.reply_to(message, text).await?;
        Ok(text.to_string())
    }

    async fn report_storage_error(
        &self,
        message: &Message,
        e: &StorageError,
    ) -> dbot_core::Result<String> {
        let text = if e.is_retryable() {
            warn!(error = %e, "Storage unavailable");
            messages::STORAGE_UNAVAILABLE
        } else {
            error!(error = %e, "Storage inconsistency");
            messages::CHECK_SHEET
        };
        self.bot.reply_to(message, text).await?;
        Ok(text.to_string())
    }
}

#[async_trait]
impl Handler for ScreenTimeHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> dbot_core::Result<HandlerResponse> {
        let Some(command) = Command::parse(&message.content) else {
            return Ok(HandlerResponse::Ignore);
        };
        if message.user.is_anonymous() {
            debug!(chat_id = message.chat.id, "Command without a sender, ignored");
            return Ok(HandlerResponse::Ignore);
        }
        let name = self
            .identity
            .resolve(&message.user)
            .ok_or(HandlerError::UnknownSender)?;
        info!(command = command.name(), username = %name, "Handling command");

        let text = match self.dispatch(&command, &name, message).await {
            Ok(text) => text,
            Err(CommandError::Storage(e)) => self.report_storage_error(message, &e).await?,
            Err(CommandError::Chart(e)) => {
                warn!(error = %e, "Chart rendering failed");
                self.bot.reply_to(message, messages::CHART_FAILED).await?;
                messages::CHART_FAILED.to_string()
            }
            Err(CommandError::Transport(e)) => return Err(e),
        };
        Ok(HandlerResponse::Reply(text))
    }
}

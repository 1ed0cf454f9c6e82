//! Operator console: line commands controlling the bot and inspecting the data.

use anyhow::Result;
use screentime_handlers::command::parse_trend_window;
use screentime_handlers::trend_report;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::components::BotComponents;
use crate::controller::{BotController, PollerFactory, StartOutcome, StopOutcome};

pub const HELP: &str = "\
Commands:
  start        start polling
  stop         stop polling
  restart      stop, then start
  status       show whether the bot is running
  table        print the usage table
  rolling      render the rolling-average chart
  trend [days] print usage trends, optionally over the last days
  help         show this help
  quit         stop the bot and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    Start,
    Stop,
    Restart,
    Status,
    Table,
    Rolling,
    Trend(Vec<String>),
    Help,
    Quit,
    Unknown(String),
}

impl DashboardCommand {
    /// `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let word = words.next()?.to_lowercase();
        Some(match word.as_str() {
            "start" => Self::Start,
            "stop" => Self::Stop,
            "restart" => Self::Restart,
            "status" => Self::Status,
            "table" => Self::Table,
            "rolling" => Self::Rolling,
            "trend" => Self::Trend(words.map(str::to_string).collect()),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(word),
        })
    }
}

/// Console over a [`BotController`]. The bot starts stopped.
pub struct Dashboard<F: PollerFactory> {
    controller: BotController<F>,
    components: BotComponents,
}

impl<F: PollerFactory> Dashboard<F> {
    pub fn new(controller: BotController<F>, components: BotComponents) -> Self {
        Self {
            controller,
            components,
        }
    }

    pub fn controller(&self) -> &BotController<F> {
        &self.controller
    }

    /// Reads commands until `quit` or end of input; the bot is stopped on the way out.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", HELP)?;
        writeln!(out, "{}", self.controller.status_line())?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };
            let Some(command) = DashboardCommand::parse(&line) else {
                continue;
            };
            if !self.execute(command, out).await? {
                break;
            }
        }

        if self.controller.is_running() {
            self.controller.stop().await;
        }
        writeln!(out, "{}", self.controller.status_line())?;
        Ok(())
    }

    /// Runs one command. Returns false when the console should exit.
    pub async fn execute<W: Write>(&mut self, command: DashboardCommand, out: &mut W) -> Result<bool> {
        info!(?command, "Dashboard command");
        match command {
            DashboardCommand::Start => {
                let text = match self.controller.start().await {
                    StartOutcome::Started => "Bot started",
                    StartOutcome::AlreadyRunning => "Already running",
                };
                writeln!(out, "{}", text)?;
            }
            DashboardCommand::Stop => {
                let text = match self.controller.stop().await {
                    StopOutcome::Stopped => "Bot stopped",
                    StopOutcome::NotRunning => "It is not running",
                };
                writeln!(out, "{}", text)?;
            }
            DashboardCommand::Restart => {
                self.controller.restart().await;
                writeln!(out, "Bot restarted")?;
            }
            DashboardCommand::Status => {}
            DashboardCommand::Table => match self.components.store.load_table().await {
                Ok(table) => writeln!(out, "{}", table)?,
                Err(e) => {
                    warn!(error = %e, "Dashboard could not load table");
                    writeln!(out, "Could not load the usage table: {}", e)?;
                }
            },
            DashboardCommand::Rolling => self.render_rolling(out).await?,
            DashboardCommand::Trend(args) => match parse_trend_window(&args) {
                Some(window) => match self.components.store.load_table().await {
                    Ok(table) => writeln!(out, "{}", trend_report(&table, window))?,
                    Err(e) => writeln!(out, "Could not load the usage table: {}", e)?,
                },
                None => writeln!(out, "Usage: trend [days], days being a positive number")?,
            },
            DashboardCommand::Help => writeln!(out, "{}", HELP)?,
            DashboardCommand::Quit => return Ok(false),
            DashboardCommand::Unknown(word) => {
                writeln!(out, "Unknown command: {} (type help)", word)?;
            }
        }
        writeln!(out, "{}", self.controller.status_line())?;
        Ok(true)
    }

    async fn render_rolling<W: Write>(&self, out: &mut W) -> Result<()> {
        let table = match self.components.store.load_table().await {
            Ok(table) => table,
            Err(e) => {
                writeln!(out, "Could not load the usage table: {}", e)?;
                return Ok(());
            }
        };
        let chart = self.components.chart.clone();
        let rendered = tokio::task::spawn_blocking(move || {
            chart
                .render_rolling_average(&table)
                .map(|path| path.to_path_buf())
        })
        .await?;
        match rendered {
            Ok(path) => writeln!(out, "Chart written to {}", path.display())?,
            Err(e) => writeln!(out, "Could not render the chart: {}", e)?,
        }
        Ok(())
    }
}

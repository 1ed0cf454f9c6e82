//! screentime CLI: run the bot, open the operator console, or print the table.

use anyhow::{Context, Result};
use clap::Parser;
use screentime_bot::cli::{Cli, Commands};
use screentime_bot::{
    build_components, BotComponents, BotConfig, BotController, Dashboard, TelegramPollerFactory,
    Ticker,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { token } => run(token).await,
        Commands::Dashboard { token } => dashboard(token).await,
        Commands::Table => table().await,
    }
}

fn load_config(token: Option<String>) -> Result<BotConfig> {
    let config = BotConfig::load(token)?;
    config.validate()?;
    dbot_core::init_tracing(&config.log_file)?;
    Ok(config)
}

fn controller(
    config: &BotConfig,
    components: &BotComponents,
) -> Result<BotController<TelegramPollerFactory>> {
    let bot = config.telegram()?.build_bot();
    let adapter = Arc::new(dbot_telegram::TelegramBotAdapter::new(bot.clone()));
    let chain = components.handler_chain(adapter.clone());
    let mut controller = BotController::new(TelegramPollerFactory::new(bot, chain));
    if let Some(ref ticker) = config.ticker {
        info!(chat_id = ticker.chat_id, every_secs = ticker.interval.as_secs(), "Ticker enabled");
        controller = controller.with_ticker(Ticker::new(
            adapter,
            ticker.chat_id,
            components.store.clone(),
            components.clock.clone(),
            ticker.interval,
        ));
    }
    Ok(controller)
}

async fn run(token: Option<String>) -> Result<()> {
    let config = load_config(token)?;
    let components = build_components(&config).await?;
    let mut controller = controller(&config, &components)?;

    controller.start().await;
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Ctrl-C received, shutting down");
    controller.stop().await;
    Ok(())
}

async fn dashboard(token: Option<String>) -> Result<()> {
    let config = load_config(token)?;
    let components = build_components(&config).await?;
    let controller = controller(&config, &components)?;

    let mut dashboard = Dashboard::new(controller, components);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    dashboard.run(stdin, &mut std::io::stdout()).await
}

async fn table() -> Result<()> {
    let config = load_config(None)?;
    let components = build_components(&config).await?;
    let table = components.store.load_table().await?;
    print!("{}", table);
    Ok(())
}

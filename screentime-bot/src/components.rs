//! Component factory: builds the store, clock, chart renderer and handler chain from config.

use anyhow::Result;
use dbot_core::Bot;
use handler_chain::HandlerChain;
use screentime_handlers::{ChartRenderer, Clock, LoggingHandler, ScreenTimeHandler, SystemClock};
use std::sync::Arc;
use storage::{MemoryUsageStore, SheetConfig, SheetUsageStore, SqliteUsageStore, UsageStore};
use tracing::{error, info, instrument};

use crate::config::{BotConfig, StorageBackend};

/// Everything the handlers, ticker and dashboard share.
#[derive(Clone)]
pub struct BotComponents {
    pub store: Arc<dyn UsageStore>,
    pub clock: Arc<dyn Clock>,
    pub chart: ChartRenderer,
}

/// Opens the configured usage store.
#[instrument(skip(config))]
pub async fn create_store(config: &BotConfig) -> Result<Arc<dyn UsageStore>> {
    let store: Arc<dyn UsageStore> = match config.backend()? {
        StorageBackend::Sqlite => {
            info!(database_url = %config.database_url, "Using SQLite usage store");
            Arc::new(
                SqliteUsageStore::new(&config.database_url)
                    .await
                    .map_err(|e| {
                        error!(
                            error = %e,
                            database_url = %config.database_url,
                            "Failed to initialize usage storage"
                        );
                        anyhow::anyhow!("Failed to initialize usage storage: {}", e)
                    })?,
            )
        }
        StorageBackend::Sheets => {
            let (Some(spreadsheet_id), Some(access_token)) = (
                config.sheets_spreadsheet_id.clone(),
                config.sheets_access_token.clone(),
            ) else {
                anyhow::bail!("STORAGE_BACKEND=sheets needs SHEETS_SPREADSHEET_ID and SHEETS_ACCESS_TOKEN");
            };
            info!(
                spreadsheet_id = %spreadsheet_id,
                worksheet = %config.sheets_worksheet,
                "Using Google Sheets usage store"
            );
            Arc::new(SheetUsageStore::new(SheetConfig {
                api_url: config.sheets_api_url.clone(),
                spreadsheet_id,
                worksheet: config.sheets_worksheet.clone(),
                access_token,
            }))
        }
        StorageBackend::Memory => {
            info!("Using in-memory usage store");
            Arc::new(MemoryUsageStore::new())
        }
    };
    Ok(store)
}

/// Builds the shared components; the store is opened once.
pub async fn build_components(config: &BotConfig) -> Result<BotComponents> {
    let store = create_store(config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.tz()?));
    let mut chart = ChartRenderer::new(&config.chart_path);
    if let Some(ref font) = config.chart_font {
        chart = chart.with_font(font);
    }
    Ok(BotComponents { store, clock, chart })
}

impl BotComponents {
    /// Logging first, then the command handler.
    pub fn handler_chain(&self, bot: Arc<dyn Bot>) -> HandlerChain {
        HandlerChain::new()
            .add_handler(Arc::new(LoggingHandler))
            .add_handler(Arc::new(ScreenTimeHandler::new(
                self.store.clone(),
                bot,
                self.clock.clone(),
                self.chart.clone(),
            )))
    }
}

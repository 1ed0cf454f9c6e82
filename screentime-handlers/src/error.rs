use dbot_core::DbotError;
use storage::StorageError;
use thiserror::Error;

use crate::chart::ChartError;

/// Failure of one command invocation. Storage and chart failures are answered to the user;
/// transport failures go back to the chain.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Transport(#[from] DbotError),
}

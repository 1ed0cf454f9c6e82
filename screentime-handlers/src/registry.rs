use std::sync::Arc;

use storage::{StorageError, UsageStore};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Welcomed(String),
    AlreadyRegistered(String),
}

/// Registration of users as table columns.
pub struct UserRegistry {
    store: Arc<dyn UsageStore>,
}

impl UserRegistry {
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self { store }
    }

    /// Adds a column for `identity` unless one exists. Never creates duplicates.
    pub async fn register(&self, identity: &str) -> Result<RegisterOutcome, StorageError> {
        let name = identity.to_lowercase();
        if self.store.users().await?.contains(&name) {
            return Ok(RegisterOutcome::AlreadyRegistered(name));
        }
        match self.store.append_user_column(&name).await {
            Ok(()) => {
                info!(username = %name, "User registered");
                Ok(RegisterOutcome::Welcomed(name))
            }
            Err(StorageError::AlreadyExists(_)) => Ok(RegisterOutcome::AlreadyRegistered(name)),
            Err(e) => Err(e),
        }
    }

    pub async fn is_registered(&self, identity: &str) -> Result<bool, StorageError> {
        Ok(self.store.users().await?.contains(&identity.to_lowercase()))
    }
}

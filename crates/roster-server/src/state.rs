//! Server state management.

use std::sync::Arc;

use roster_core::config::RosterConfig;
use roster_core::error::RosterResult;
use roster_core::{EmployeeService, SqliteRecordStore, SqliteVersionStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EmployeeService>,
    pub config: Arc<RosterConfig>,
}

impl AppState {
    /// Open the stores at the configured path and build the service.
    pub async fn from_config(config: RosterConfig) -> RosterResult<Self> {
        let records = Arc::new(SqliteRecordStore::new(&config.database.path)?);
        let versions = Arc::new(SqliteVersionStore::new(&config.database.path)?);
        let service = EmployeeService::new(records, versions).await?;
        Ok(Self {
            service: Arc::new(service),
            config: Arc::new(config),
        })
    }

    /// State over in-memory stores (for tests).
    pub async fn in_memory() -> RosterResult<Self> {
        let records = Arc::new(SqliteRecordStore::in_memory()?);
        let versions = Arc::new(SqliteVersionStore::in_memory()?);
        let service = EmployeeService::new(records, versions).await?;
        Ok(Self {
            service: Arc::new(service),
            config: Arc::new(RosterConfig::default()),
        })
    }
}

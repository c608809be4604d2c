use std::sync::Arc;

use innkeep_availability::AvailabilityOracle;
use innkeep_events::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: innkeep_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound guest email channel.
    pub notifier: Arc<dyn Notifier>,
    /// External availability service; `None` skips the check.
    pub oracle: Option<Arc<dyn AvailabilityOracle>>,
}

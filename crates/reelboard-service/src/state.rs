//! Application state.

use std::sync::Arc;

use reelboard_core::PackageCatalog;
use reelboard_engine::CreditEngine;
use reelboard_store::RocksStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// The credit award engine.
    pub engine: Arc<CreditEngine>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        if config.payment_webhook_secret.is_none() {
            tracing::warn!("Payment webhook secret not configured - signatures will not be verified");
        }

        let engine = Arc::new(CreditEngine::new(
            store.clone(),
            config.policy.clone(),
            PackageCatalog::default(),
        ));

        Self {
            store,
            engine,
            config,
        }
    }
}

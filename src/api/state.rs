use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::models::{AssociationStore, CardCatalog};

/// Shared application state.
///
/// Reference data is loaded once at startup and never mutated, so handlers
/// read it without locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CardCatalog>,
    pub store: Arc<AssociationStore>,
    /// Default cap of the ranked recommendation list
    pub recommendation_limit: usize,
    /// Rows kept per cost tier
    pub tier_size: usize,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: CardCatalog, store: AssociationStore, config: &Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: Arc::new(store),
            recommendation_limit: config.recommendation_limit,
            tier_size: config.tier_size,
            loaded_at: Utc::now(),
        }
    }
}

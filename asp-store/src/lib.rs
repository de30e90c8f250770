pub mod app_config;
pub mod dataset_repo;

use asp_catalog::{Catalog, PricingEngine, PricingError};
use asp_core::{CoreError, RecordError};
use std::path::PathBuf;
use std::sync::Arc;

pub use app_config::Config;
pub use dataset_repo::JsonDatasetRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse dataset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid dataset record: {0}")]
    Record(#[from] RecordError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Loads the configured dataset and builds a ready engine.
pub fn build_engine(config: &Config) -> Result<PricingEngine, StoreError> {
    let repo = JsonDatasetRepository::new(&config.dataset.path);
    let catalog = Catalog::from_source(&repo, config.label_normalizer()?)?;
    if catalog.is_empty() {
        tracing::warn!("Dataset {} is empty; only grade F estimates will resolve", repo.path().display());
    }
    Ok(PricingEngine::new(Arc::new(catalog), config.pricing.clone()))
}

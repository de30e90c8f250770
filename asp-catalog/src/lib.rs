pub mod catalog;
pub mod pricing;

pub use catalog::{Catalog, CatalogEntry, LookupKey};
pub use pricing::{
    Estimate, MatchTier, MatchedBaseline, PremiumStage, PriceResult, PricingConfig, PricingEngine,
    PricingError, NOT_FOUND_MESSAGE,
};

use asp_core::{CpuBucket, HistoricalRecord, Query};
use asp_shared::{Grade, Memory, Money, Storage};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogEntry, LookupKey};

pub const NOT_FOUND_MESSAGE: &str = "No baseline data found";

/// When the i7 upgrade premium joins the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumStage {
    /// Added to the adjusted sum, then scaled by the grade multiplier.
    #[default]
    BeforeGrade,
    /// Added flat after the grade multiplier.
    AfterGrade,
}

/// Adjustment tables for the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Flat amount added per memory option
    pub memory_adjustments: BTreeMap<Memory, Decimal>,

    /// Flat amount added per drive option
    pub storage_adjustments: BTreeMap<Storage, Decimal>,

    /// Condition multiplier; grades missing here scale by 1
    pub grade_multipliers: BTreeMap<Grade, Decimal>,

    /// Premium for an i7 query priced off a non-i7 baseline
    pub upgrade_premium: Decimal,

    pub upgrade_premium_stage: PremiumStage,

    /// Grade F price for 8th gen and newer
    pub salvage_price_modern: Decimal,

    /// Grade F price for everything else
    pub salvage_price_legacy: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            memory_adjustments: BTreeMap::from([
                (Memory::Gb4, dec!(-2)),
                (Memory::Gb8, dec!(0)),
                (Memory::Gb16, dec!(7)),
                (Memory::Gb32, dec!(17)),
                (Memory::Gb64, dec!(37)),
            ]),
            storage_adjustments: BTreeMap::from([
                (Storage::Gb128, dec!(3)),
                (Storage::Gb256, dec!(0)),
                (Storage::Gb512, dec!(15)),
                (Storage::Tb1, dec!(25)),
                (Storage::Tb2, dec!(50)),
            ]),
            grade_multipliers: BTreeMap::from([
                (Grade::A, dec!(1.15)),
                (Grade::B, dec!(1.00)),
                (Grade::C, dec!(0.85)),
            ]),
            upgrade_premium: dec!(25),
            upgrade_premium_stage: PremiumStage::BeforeGrade,
            salvage_price_modern: dec!(40.00),
            salvage_price_legacy: dec!(15.00),
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<(), PricingError> {
        if let Some((grade, m)) = self.grade_multipliers.iter().find(|(_, m)| m.is_sign_negative()) {
            return Err(PricingError::InvalidConfig(format!(
                "grade {} multiplier {} is negative",
                grade, m
            )));
        }
        if self.salvage_price_modern.is_sign_negative() || self.salvage_price_legacy.is_sign_negative() {
            return Err(PricingError::InvalidConfig(
                "salvage prices must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn memory_adjustment(&self, memory: Option<Memory>) -> Decimal {
        memory
            .and_then(|m| self.memory_adjustments.get(&m).copied())
            .unwrap_or(Decimal::ZERO)
    }

    fn storage_adjustment(&self, storage: Option<Storage>) -> Decimal {
        storage
            .and_then(|s| self.storage_adjustments.get(&s).copied())
            .unwrap_or(Decimal::ZERO)
    }

    fn grade_multiplier(&self, grade: Option<Grade>) -> Decimal {
        grade
            .and_then(|g| self.grade_multipliers.get(&g).copied())
            .unwrap_or(Decimal::ONE)
    }

    fn salvage_price(&self, bucket: CpuBucket) -> Decimal {
        if bucket.is_eighth_gen_or_newer() {
            self.salvage_price_modern
        } else {
            self.salvage_price_legacy
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),
}

/// Outcome of an estimate. `NotFound` is an ordinary answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "amount", rename_all = "snake_case")]
pub enum PriceResult {
    Price(Money),
    NotFound,
}

impl PriceResult {
    pub fn price(&self) -> Option<Money> {
        match self {
            PriceResult::Price(money) => Some(*money),
            PriceResult::NotFound => None,
        }
    }
}

impl fmt::Display for PriceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceResult::Price(money) => write!(f, "{}", money),
            PriceResult::NotFound => f.write_str(NOT_FOUND_MESSAGE),
        }
    }
}

/// Which lookup stage produced the baseline row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Make, model, cpu bucket and type all matched
    Exact,
    /// Make and model matched; cpu and type ignored
    ModelFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedBaseline {
    pub tier: MatchTier,
    pub record: HistoricalRecord,
    pub cpu_bucket: CpuBucket,
}

/// Full breakdown of how a price was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub query_bucket: CpuBucket,
    pub baseline: Option<MatchedBaseline>,
    /// Grade F: the fixed salvage price was used
    pub salvage: bool,
    pub base_price: Money,
    pub memory_adjustment: Decimal,
    pub storage_adjustment: Decimal,
    pub upgrade_premium: Decimal,
    pub grade_multiplier: Decimal,
    pub price: Money,
}

/// Estimates resale prices against a frozen [`Catalog`].
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: Arc<Catalog>,
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(catalog: Arc<Catalog>, config: PricingConfig) -> Self {
        Self { catalog, config }
    }

    pub fn list_types(&self) -> Vec<String> {
        self.catalog.list_types()
    }

    pub fn list_makes(&self) -> Vec<String> {
        self.catalog.list_makes()
    }

    pub fn list_models(&self, make: &str, device_type: &str) -> Vec<String> {
        self.catalog.list_models(make, device_type)
    }

    pub fn list_cpu_buckets(&self, make: &str, model: &str) -> Vec<CpuBucket> {
        self.catalog.list_cpu_buckets(make, model)
    }

    pub fn estimate(&self, query: &Query) -> PriceResult {
        match self.estimate_detailed(query) {
            Some(estimate) => PriceResult::Price(estimate.price),
            None => PriceResult::NotFound,
        }
    }

    /// Resolves a baseline and applies every adjustment.
    ///
    /// `None` means no baseline row exists and the query is not grade F.
    pub fn estimate_detailed(&self, query: &Query) -> Option<Estimate> {
        let key = self
            .catalog
            .lookup_key(&query.device_type, &query.make, &query.model, &query.cpu);
        let baseline = self.resolve_baseline(&key);

        if query.is_salvage() {
            let estimate = self.salvage_estimate(key.cpu_bucket, baseline);
            tracing::debug!(
                make = %key.make_key,
                model = %query.model,
                bucket = %key.cpu_bucket,
                price = %estimate.price,
                "Grade F salvage price"
            );
            return Some(estimate);
        }

        let Some(baseline) = baseline else {
            tracing::info!(
                make = %key.make_key,
                model = %query.model,
                bucket = %key.cpu_bucket,
                "No baseline record for query"
            );
            return None;
        };

        let estimate = self.adjusted_estimate(query, key.cpu_bucket, baseline);
        tracing::debug!(
            make = %key.make_key,
            model = %query.model,
            tier = ?estimate.baseline.as_ref().map(|b| b.tier),
            price = %estimate.price,
            "Estimated price"
        );
        Some(estimate)
    }

    fn resolve_baseline(&self, key: &LookupKey<'_>) -> Option<MatchedBaseline> {
        let matched = |tier: MatchTier, entry: &CatalogEntry| MatchedBaseline {
            tier,
            record: entry.record().clone(),
            cpu_bucket: entry.cpu_bucket(),
        };

        if let Some(entry) = self.catalog.find_exact(key) {
            return Some(matched(MatchTier::Exact, entry));
        }
        self.catalog
            .find_model(key)
            .map(|entry| matched(MatchTier::ModelFallback, entry))
    }

    fn salvage_estimate(&self, bucket: CpuBucket, baseline: Option<MatchedBaseline>) -> Estimate {
        let price = Money::new(self.config.salvage_price(bucket));
        Estimate {
            query_bucket: bucket,
            baseline,
            salvage: true,
            base_price: price,
            memory_adjustment: Decimal::ZERO,
            storage_adjustment: Decimal::ZERO,
            upgrade_premium: Decimal::ZERO,
            grade_multiplier: Decimal::ONE,
            price,
        }
    }

    fn adjusted_estimate(&self, query: &Query, bucket: CpuBucket, baseline: MatchedBaseline) -> Estimate {
        let asp = baseline.record.asp;
        let memory_adjustment = self.config.memory_adjustment(query.ram);
        let storage_adjustment = self.config.storage_adjustment(query.hdd);
        let grade_multiplier = self.config.grade_multiplier(query.grade);

        // Never stacks on a baseline that is already an i7.
        let upgrade_premium = if bucket.is_i7() && !baseline.cpu_bucket.is_i7() {
            self.config.upgrade_premium
        } else {
            Decimal::ZERO
        };

        let adjusted = asp + memory_adjustment + storage_adjustment;
        let price = match self.config.upgrade_premium_stage {
            PremiumStage::BeforeGrade => (adjusted + upgrade_premium) * grade_multiplier,
            PremiumStage::AfterGrade => adjusted * grade_multiplier + upgrade_premium,
        };

        Estimate {
            query_bucket: bucket,
            baseline: Some(baseline),
            salvage: false,
            base_price: Money::new(asp),
            memory_adjustment,
            storage_adjustment,
            upgrade_premium,
            grade_multiplier,
            price: Money::new(price),
        }
    }
}

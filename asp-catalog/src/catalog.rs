use asp_core::{normalize_cpu, CpuBucket, DatasetSource, HistoricalRecord, LabelNormalizer};
use std::collections::HashSet;

/// A historical record together with its precomputed lookup keys.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    record: HistoricalRecord,
    type_key: String,
    make_key: String,
    cpu_bucket: CpuBucket,
}

impl CatalogEntry {
    pub fn record(&self) -> &HistoricalRecord {
        &self.record
    }

    pub fn cpu_bucket(&self) -> CpuBucket {
        self.cpu_bucket
    }
}

/// Normalized form of the lookup fields of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey<'a> {
    pub type_key: String,
    pub make_key: String,
    pub model: &'a str,
    pub cpu_bucket: CpuBucket,
}

/// Read-only view over the historical sales data.
///
/// Built once; every lookup is a linear scan in dataset order, so the first
/// matching row always wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    normalizer: LabelNormalizer,
}

impl Catalog {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self::with_normalizer(records, LabelNormalizer::default())
    }

    pub fn with_normalizer(records: Vec<HistoricalRecord>, normalizer: LabelNormalizer) -> Self {
        let entries = records
            .into_iter()
            .map(|record| CatalogEntry {
                type_key: normalizer.normalize(&record.device_type),
                make_key: normalizer.normalize(&record.make),
                cpu_bucket: normalize_cpu(&record.cpu),
                record,
            })
            .collect();

        Self { entries, normalizer }
    }

    /// Pulls every record out of `source` and freezes it.
    pub fn from_source<S: DatasetSource>(
        source: &S,
        normalizer: LabelNormalizer,
    ) -> Result<Self, S::Error> {
        let records = source.load_records()?;
        tracing::info!("Loaded {} historical records from {}", records.len(), source.describe());
        Ok(Self::with_normalizer(records, normalizer))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup_key<'a>(&self, device_type: &str, make: &str, model: &'a str, cpu: &str) -> LookupKey<'a> {
        LookupKey {
            type_key: self.normalizer.normalize(device_type),
            make_key: self.normalizer.normalize(make),
            model,
            cpu_bucket: normalize_cpu(cpu),
        }
    }

    /// Device types, first-seen label per normalized key.
    pub fn list_types(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| !e.type_key.is_empty() && seen.insert(e.type_key.as_str()))
            .map(|e| e.record.device_type.trim().to_string())
            .collect()
    }

    /// Canonical manufacturer keys in dataset order.
    pub fn list_makes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| !e.make_key.is_empty() && seen.insert(e.make_key.as_str()))
            .map(|e| e.make_key.clone())
            .collect()
    }

    /// Models sold under `make` within `device_type`. A blank type means any.
    pub fn list_models(&self, make: &str, device_type: &str) -> Vec<String> {
        let make_key = self.normalizer.normalize(make);
        let type_key = self.normalizer.normalize(device_type);
        let mut seen = HashSet::new();

        self.entries
            .iter()
            .filter(|e| e.make_key == make_key)
            .filter(|e| type_key.is_empty() || e.type_key == type_key)
            .filter(|e| seen.insert(e.record.model.as_str()))
            .map(|e| e.record.model.clone())
            .collect()
    }

    /// Processor buckets seen for `make` + `model`, without `Other`.
    pub fn list_cpu_buckets(&self, make: &str, model: &str) -> Vec<CpuBucket> {
        let make_key = self.normalizer.normalize(make);
        let mut seen = HashSet::new();

        self.entries
            .iter()
            .filter(|e| e.make_key == make_key && e.record.model == model)
            .map(|e| e.cpu_bucket)
            .filter(|bucket| !bucket.is_other() && seen.insert(*bucket))
            .collect()
    }

    /// First record matching make, model, cpu bucket and type.
    pub fn find_exact(&self, key: &LookupKey<'_>) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| {
            e.make_key == key.make_key
                && e.record.model == key.model
                && e.cpu_bucket == key.cpu_bucket
                && e.type_key == key.type_key
        })
    }

    /// First record matching make and model only.
    pub fn find_model(&self, key: &LookupKey<'_>) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.make_key == key.make_key && e.record.model == key.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_core::StaticDataset;
    use rust_decimal_macros::dec;

    fn sample() -> Catalog {
        Catalog::new(vec![
            HistoricalRecord::new("Laptop", "Lenovo", "T480", "i5-8350U", dec!(210)),
            HistoricalRecord::new("Laptop", "PANASONIC CORPORATION", "CF-54", "Intel i5 8th Gen", dec!(180)),
            HistoricalRecord::new("Laptop", "Panasonic", "CF-33", "i5-7300U", dec!(420)),
            HistoricalRecord::new("Desktop", "Lenovo", "M920q", "i7-8700T", dec!(160)),
            HistoricalRecord::new("Laptop", "Lenovo", "T480", "i7-8650U", dec!(250)),
            HistoricalRecord::new("Laptop", "lenovo", "T480", "Celeron", dec!(90)),
            HistoricalRecord::new("laptop ", "Lenovo", "X1 Carbon", "i7 1165G7", dec!(520)),
        ])
    }

    #[test]
    fn test_from_source_with_aliases() {
        let source = StaticDataset::new(vec![
            HistoricalRecord::new("Laptop", "Hewlett-Packard", "840 G5", "i5-8350U", dec!(150)),
            HistoricalRecord::new("Laptop", "HP Inc.", "840 G6", "i5-8365U", dec!(190)),
        ]);
        let normalizer = LabelNormalizer::with_aliases([("Hewlett Packard", "HP Inc")]).unwrap();
        let catalog = Catalog::from_source(&source, normalizer).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.list_makes(), vec!["HPINC"]);
        assert_eq!(catalog.list_models("hp inc", "laptop"), vec!["840 G5", "840 G6"]);
    }

    #[test]
    fn test_list_types_first_seen_label() {
        assert_eq!(sample().list_types(), vec!["Laptop", "Desktop"]);
    }

    #[test]
    fn test_list_makes_merges_aliases() {
        assert_eq!(sample().list_makes(), vec!["LENOVO", "PANASONIC"]);
    }

    #[test]
    fn test_list_models_by_make_and_type() {
        let catalog = sample();
        assert_eq!(catalog.list_models("Lenovo", "Laptop"), vec!["T480", "X1 Carbon"]);
        assert_eq!(catalog.list_models("LENOVO", "desktop"), vec!["M920q"]);
        assert_eq!(catalog.list_models("Lenovo", ""), vec!["T480", "M920q", "X1 Carbon"]);
        assert_eq!(catalog.list_models("panasonic corporation", "Laptop"), vec!["CF-54", "CF-33"]);
        assert!(catalog.list_models("Dell", "Laptop").is_empty());
    }

    #[test]
    fn test_list_cpu_buckets_skips_other() {
        let buckets: Vec<String> = sample()
            .list_cpu_buckets("Lenovo", "T480")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(buckets, vec!["Intel i5 8th Gen", "Intel i7 8th Gen"]);
    }

    #[test]
    fn test_model_is_byte_exact() {
        let catalog = sample();
        let key = catalog.lookup_key("Laptop", "Lenovo", "t480", "i5-8350U");
        assert!(catalog.find_model(&key).is_none());
    }

    #[test]
    fn test_exact_then_model_lookup() {
        let catalog = sample();

        let key = catalog.lookup_key("Laptop", "lenovo", "T480", "i7-8650U");
        assert_eq!(catalog.find_exact(&key).unwrap().record().asp, dec!(250));

        let key = catalog.lookup_key("Laptop", "Lenovo", "T480", "i9-9880H");
        assert!(catalog.find_exact(&key).is_none());
        assert_eq!(catalog.find_model(&key).unwrap().record().asp, dec!(210));
    }
}

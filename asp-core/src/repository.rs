use crate::record::HistoricalRecord;

/// Where the historical sales rows come from.
///
/// Implementations run once at startup; the records they return are frozen
/// into a catalog and never read from the source again.
pub trait DatasetSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_records(&self) -> Result<Vec<HistoricalRecord>, Self::Error>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// A dataset already held in memory (tests, embedded tables).
#[derive(Debug, Clone, Default)]
pub struct StaticDataset {
    records: Vec<HistoricalRecord>,
}

impl StaticDataset {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }
}

impl DatasetSource for StaticDataset {
    type Error = std::convert::Infallible;

    fn load_records(&self) -> Result<Vec<HistoricalRecord>, Self::Error> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static dataset ({} records)", self.records.len())
    }
}

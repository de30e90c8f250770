pub mod normalize;
pub mod query;
pub mod record;
pub mod repository;

pub use normalize::{normalize_cpu, normalize_label, CoreTier, CpuBucket, Generation, LabelNormalizer};
pub use query::{Query, Selections};
pub use record::{HistoricalRecord, RawRecord, RecordError};
pub use repository::{DatasetSource, StaticDataset};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Record(#[from] RecordError),
}

pub type CoreResult<T> = Result<T, CoreError>;

use asp_core::{DatasetSource, HistoricalRecord, RawRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::StoreError;

/// Loads the historical sales export from a JSON array on disk.
pub struct JsonDatasetRepository {
    path: PathBuf,
}

impl JsonDatasetRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses and validates every row; the first bad row aborts the load.
    pub fn parse<R: Read>(reader: R, origin: &Path) -> Result<Vec<HistoricalRecord>, StoreError> {
        let rows: Vec<RawRecord> =
            serde_json::from_reader(reader).map_err(|source| StoreError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| raw.validate(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

impl DatasetSource for JsonDatasetRepository {
    type Error = StoreError;

    fn load_records(&self) -> Result<Vec<HistoricalRecord>, StoreError> {
        let file = File::open(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records = Self::parse(BufReader::new(file), &self.path)?;
        tracing::debug!("Parsed {} rows from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_core::RecordError;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const EXPORT: &str = r#"[
        {"Category Clean": "Laptop", "Make Clean": "LENOVO", "Model": "T480",
         "Processor Clean": "Intel i5 8th Gen", "Memory Clean": "8GB", "Grade": "B", "Sales Price": 212.5},
        {"type": "Desktop", "make": "Dell", "model": "7050", "cpu": "i5-7500", "asp": "120.00"}
    ]"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let repo = JsonDatasetRepository::new(file.path());
        let records = repo.load_records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].model, "T480");
        assert_eq!(records[0].asp, dec!(212.5));
        assert_eq!(records[1].device_type, "Desktop");
        assert_eq!(records[1].asp, dec!(120));
        assert_eq!(repo.describe(), file.path().display().to_string());
    }

    #[test]
    fn test_missing_file() {
        let repo = JsonDatasetRepository::new("/nonexistent/asp/history.json");
        assert!(matches!(repo.load_records(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = JsonDatasetRepository::parse("[{".as_bytes(), Path::new("inline"));
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_bad_row_reports_index() {
        let json = r#"[
            {"type": "Laptop", "make": "HP", "model": "840 G5", "asp": 150},
            {"type": "Laptop", "make": "HP", "model": "", "asp": 150}
        ]"#;
        let err = JsonDatasetRepository::parse(json.as_bytes(), Path::new("inline")).unwrap_err();
        match err {
            StoreError::Record(e) => {
                assert_eq!(e, RecordError::MissingField { row: 1, field: "model" })
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

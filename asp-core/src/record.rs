use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One row of the historical sales export, validated.
///
/// Only `device_type`, `make`, `model` and `cpu` take part in baseline
/// lookup; `ram`, `hdd` and `grade` are carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoricalRecord {
    #[serde(rename = "type")]
    pub device_type: String,
    pub make: String,
    pub model: String,
    pub cpu: String,
    pub ram: Option<String>,
    pub hdd: Option<String>,
    pub grade: Option<String>,
    pub asp: Decimal,
}

impl HistoricalRecord {
    pub fn new(
        device_type: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        cpu: impl Into<String>,
        asp: Decimal,
    ) -> Self {
        Self {
            device_type: device_type.into(),
            make: make.into(),
            model: model.into(),
            cpu: cpu.into(),
            ram: None,
            hdd: None,
            grade: None,
            asp,
        }
    }
}

/// A row as it appears on disk, before validation.
///
/// Accepts both the canonical field names and the column headers of the
/// historical spreadsheet export (`Make Clean`, `Sales Price`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "type", alias = "Category Clean", alias = "Category")]
    pub device_type: Option<String>,
    #[serde(alias = "Make Clean", alias = "Make")]
    pub make: Option<String>,
    #[serde(alias = "Model")]
    pub model: Option<String>,
    #[serde(alias = "Processor Clean", alias = "Processor")]
    pub cpu: Option<String>,
    #[serde(alias = "Memory Clean", alias = "Memory")]
    pub ram: Option<String>,
    #[serde(alias = "HDD Clean", alias = "HDD")]
    pub hdd: Option<String>,
    #[serde(alias = "Grade")]
    pub grade: Option<String>,
    #[serde(alias = "Sales Price")]
    pub asp: Option<serde_json::Value>,
}

impl RawRecord {
    /// Checks the row and converts it. `row` is the zero-based position in
    /// the source file and is echoed back in every error.
    pub fn validate(self, row: usize) -> Result<HistoricalRecord, RecordError> {
        let device_type = required(self.device_type, row, "type")?;
        let make = required(self.make, row, "make")?;
        let model = required(self.model, row, "model")?;
        let asp = parse_price(self.asp, row)?;

        Ok(HistoricalRecord {
            device_type,
            make,
            model,
            cpu: self.cpu.unwrap_or_default(),
            ram: non_blank(self.ram),
            hdd: non_blank(self.hdd),
            grade: non_blank(self.grade),
            asp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: price '{value}' is not a number")]
    InvalidPrice { row: usize, value: String },

    #[error("row {row}: price {value} is negative")]
    NegativePrice { row: usize, value: Decimal },
}

fn required(value: Option<String>, row: usize, field: &'static str) -> Result<String, RecordError> {
    non_blank(value).ok_or(RecordError::MissingField { row, field })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_price(value: Option<serde_json::Value>, row: usize) -> Result<Decimal, RecordError> {
    let text = match value {
        None | Some(serde_json::Value::Null) => {
            return Err(RecordError::MissingField { row, field: "asp" })
        }
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.trim().trim_start_matches('$').replace(',', ""),
        Some(other) => {
            return Err(RecordError::InvalidPrice {
                row,
                value: other.to_string(),
            })
        }
    };

    let asp = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| RecordError::InvalidPrice { row, value: text.clone() })?;

    if asp.is_sign_negative() && !asp.is_zero() {
        return Err(RecordError::NegativePrice { row, value: asp });
    }

    Ok(asp)
}

//! Canonical keys for the noisy categorical columns of the sales history.
//!
//! Manufacturer and category labels collapse to upper-case alphanumeric keys
//! with a small alias table on top. Processor descriptions collapse to a
//! [`CpuBucket`]: the Intel Core tier plus a coarse generation band, which is
//! what actually moves resale prices.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::{CoreError, CoreResult};

pub const OTHER_BUCKET: &str = "Other";

static CORE_I_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)i([3579])[\s-]?([0-9]{4,5})").unwrap());

static BUCKET_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Intel i([3579]) (13th|12th|11th|10th|9th|8th|Older) Gen$").unwrap()
});

static DEFAULT_NORMALIZER: LazyLock<LabelNormalizer> = LazyLock::new(LabelNormalizer::default);

/// Upper-case, alphanumeric-only key with no alias applied.
fn strip_label(text: &str) -> String {
    text.chars()
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Normalizes manufacturer and category labels into lookup keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelNormalizer {
    aliases: BTreeMap<String, String>,
}

impl LabelNormalizer {
    /// Builds a normalizer from raw alias pairs.
    ///
    /// Both sides are stripped first and chains (`A -> B`, `B -> C`) are
    /// flattened so that normalizing twice is the same as normalizing once.
    pub fn with_aliases<I, K, V>(aliases: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw: BTreeMap<String, String> = aliases
            .into_iter()
            .map(|(k, v)| (strip_label(k.as_ref()), strip_label(v.as_ref())))
            .filter(|(k, v)| !k.is_empty() && k != v)
            .collect();

        let mut resolved = BTreeMap::new();
        for key in raw.keys() {
            let mut target = &raw[key];
            let mut hops = 0;
            while let Some(next) = raw.get(target) {
                hops += 1;
                if hops > raw.len() {
                    return Err(CoreError::Validation(format!(
                        "alias cycle through '{}'",
                        key
                    )));
                }
                target = next;
            }
            resolved.insert(key.clone(), target.clone());
        }

        Ok(Self { aliases: resolved })
    }

    /// Upper-cases, strips everything but letters and digits, then applies
    /// the alias table. Total: empty input gives an empty key.
    pub fn normalize(&self, text: &str) -> String {
        let key = strip_label(text);
        match self.aliases.get(&key) {
            Some(alias) => alias.clone(),
            None => key,
        }
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("PANASONICCORPORATION".to_string(), "PANASONIC".to_string());
        Self { aliases }
    }
}

/// [`LabelNormalizer::normalize`] with the built-in alias table.
pub fn normalize_label(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// Intel Core tier (the digit after the `i`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CoreTier {
    I3,
    I5,
    I7,
    I9,
}

impl CoreTier {
    fn from_digit(digit: &str) -> Option<Self> {
        match digit {
            "3" => Some(CoreTier::I3),
            "5" => Some(CoreTier::I5),
            "7" => Some(CoreTier::I7),
            "9" => Some(CoreTier::I9),
            _ => None,
        }
    }

    fn digit(&self) -> u8 {
        match self {
            CoreTier::I3 => 3,
            CoreTier::I5 => 5,
            CoreTier::I7 => 7,
            CoreTier::I9 => 9,
        }
    }
}

/// Generation band. Everything before 8th gen prices the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Generation {
    Older,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
    Thirteenth,
}

impl Generation {
    fn label(&self) -> &'static str {
        match self {
            Generation::Older => "Older",
            Generation::Eighth => "8th",
            Generation::Ninth => "9th",
            Generation::Tenth => "10th",
            Generation::Eleventh => "11th",
            Generation::Twelfth => "12th",
            Generation::Thirteenth => "13th",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Older" => Some(Generation::Older),
            "8th" => Some(Generation::Eighth),
            "9th" => Some(Generation::Ninth),
            "10th" => Some(Generation::Tenth),
            "11th" => Some(Generation::Eleventh),
            "12th" => Some(Generation::Twelfth),
            "13th" => Some(Generation::Thirteenth),
            _ => None,
        }
    }

    /// Classifies a 4-5 digit model number such as `8250` or `1165`.
    ///
    /// Two-digit prefixes 10..=13 win over the subtractive rule, otherwise
    /// `1165` would read as generation 1.
    fn from_series(series: &str) -> Self {
        match series.get(..2) {
            Some("13") => return Generation::Thirteenth,
            Some("12") => return Generation::Twelfth,
            Some("11") => return Generation::Eleventh,
            Some("10") => return Generation::Tenth,
            _ => {}
        }

        match series.get(..series.len().saturating_sub(3)) {
            Some("9") => Generation::Ninth,
            Some("8") => Generation::Eighth,
            _ => Generation::Older,
        }
    }
}

/// Canonical processor label used for grouping and lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuBucket {
    IntelCore { tier: CoreTier, generation: Generation },
    Other,
}

impl CpuBucket {
    pub fn is_other(&self) -> bool {
        matches!(self, CpuBucket::Other)
    }

    pub fn is_i7(&self) -> bool {
        matches!(self, CpuBucket::IntelCore { tier: CoreTier::I7, .. })
    }

    /// 8th generation or newer. `Other` is never modern.
    pub fn is_eighth_gen_or_newer(&self) -> bool {
        match self {
            CpuBucket::IntelCore { generation, .. } => *generation != Generation::Older,
            CpuBucket::Other => false,
        }
    }
}

impl fmt::Display for CpuBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuBucket::IntelCore { tier, generation } => {
                write!(f, "Intel i{} {} Gen", tier.digit(), generation.label())
            }
            CpuBucket::Other => f.write_str(OTHER_BUCKET),
        }
    }
}

impl FromStr for CpuBucket {
    type Err = CoreError;

    /// Parses a canonical label (the `Display` form) back into a bucket.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == OTHER_BUCKET {
            return Ok(CpuBucket::Other);
        }

        let caps = BUCKET_LABEL_RE
            .captures(s)
            .ok_or_else(|| CoreError::Validation(format!("not a cpu bucket label: '{}'", s)))?;
        let tier = CoreTier::from_digit(&caps[1])
            .ok_or_else(|| CoreError::Validation(format!("unknown core tier in '{}'", s)))?;
        let generation = Generation::from_label(&caps[2])
            .ok_or_else(|| CoreError::Validation(format!("unknown generation in '{}'", s)))?;

        Ok(CpuBucket::IntelCore { tier, generation })
    }
}

impl Serialize for CpuBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CpuBucket {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(normalize_cpu(&raw))
    }
}

/// Buckets a free-text processor description.
///
/// Accepts `i5-8250U`, `i5 8250U`, `I58250U`, `Intel Core i7 1165G7` and
/// already-canonical labels. Never fails; unrecognised input is `Other`.
pub fn normalize_cpu(cpu: &str) -> CpuBucket {
    if let Ok(bucket) = cpu.parse::<CpuBucket>() {
        return bucket;
    }

    let Some(caps) = CORE_I_RE.captures(cpu) else {
        return CpuBucket::Other;
    };
    let Some(tier) = CoreTier::from_digit(&caps[1]) else {
        return CpuBucket::Other;
    };

    CpuBucket::IntelCore {
        tier,
        generation: Generation::from_series(&caps[2]),
    }
}

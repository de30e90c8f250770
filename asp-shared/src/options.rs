use serde::{Deserialize, Serialize};
use std::fmt;

/// Installed memory, as offered by the estimator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Memory {
    #[serde(rename = "4GB", alias = "4gb")]
    Gb4,
    #[serde(rename = "8GB", alias = "8gb")]
    Gb8,
    #[serde(rename = "16GB", alias = "16gb")]
    Gb16,
    #[serde(rename = "32GB", alias = "32gb")]
    Gb32,
    #[serde(rename = "64GB", alias = "64gb")]
    Gb64,
}

impl Memory {
    pub const ALL: [Memory; 5] = [
        Memory::Gb4,
        Memory::Gb8,
        Memory::Gb16,
        Memory::Gb32,
        Memory::Gb64,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Memory::Gb4 => "4GB",
            Memory::Gb8 => "8GB",
            Memory::Gb16 => "16GB",
            Memory::Gb32 => "32GB",
            Memory::Gb64 => "64GB",
        }
    }

    /// Matches a selection label; anything outside the option list is `None`.
    pub fn parse(selection: &str) -> Option<Self> {
        let wanted = selection_key(selection);
        Self::ALL.into_iter().find(|m| m.label() == wanted)
    }
}

/// Drive capacity, as offered by the estimator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Storage {
    #[serde(rename = "128GB", alias = "128gb")]
    Gb128,
    #[serde(rename = "256GB", alias = "256gb")]
    Gb256,
    #[serde(rename = "512GB", alias = "512gb")]
    Gb512,
    #[serde(rename = "1TB", alias = "1tb")]
    Tb1,
    #[serde(rename = "2TB", alias = "2tb")]
    Tb2,
}

impl Storage {
    pub const ALL: [Storage; 5] = [
        Storage::Gb128,
        Storage::Gb256,
        Storage::Gb512,
        Storage::Tb1,
        Storage::Tb2,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Storage::Gb128 => "128GB",
            Storage::Gb256 => "256GB",
            Storage::Gb512 => "512GB",
            Storage::Tb1 => "1TB",
            Storage::Tb2 => "2TB",
        }
    }

    pub fn parse(selection: &str) -> Option<Self> {
        let wanted = selection_key(selection);
        Self::ALL.into_iter().find(|s| s.label() == wanted)
    }
}

/// Cosmetic/functional condition grade. `F` is the salvage tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(alias = "a")]
    A,
    #[serde(alias = "b")]
    B,
    #[serde(alias = "c")]
    C,
    #[serde(alias = "f")]
    F,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::A, Grade::B, Grade::C, Grade::F];

    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        }
    }

    pub fn parse(selection: &str) -> Option<Self> {
        let wanted = selection_key(selection);
        Self::ALL.into_iter().find(|g| g.label() == wanted)
    }

    pub fn is_salvage(&self) -> bool {
        matches!(self, Grade::F)
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(Memory, Storage, Grade);

// Form values arrive verbatim, but " 8gb" from a hand-typed CLI flag should still match.
fn selection_key(selection: &str) -> String {
    selection.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        assert_eq!(Memory::parse("16GB"), Some(Memory::Gb16));
        assert_eq!(Memory::parse(" 8gb"), Some(Memory::Gb8));
        assert_eq!(Storage::parse("1TB"), Some(Storage::Tb1));
        assert_eq!(Grade::parse("f"), Some(Grade::F));
    }

    #[test]
    fn test_parse_unknown_labels() {
        assert_eq!(Memory::parse("12GB"), None);
        assert_eq!(Storage::parse(""), None);
        assert_eq!(Grade::parse("D"), None);
    }

    #[test]
    fn test_labels_match_serde_names() {
        for memory in Memory::ALL {
            let json = serde_json::to_string(&memory).unwrap();
            assert_eq!(json, format!("\"{}\"", memory.label()));
        }
        for storage in Storage::ALL {
            let json = serde_json::to_string(&storage).unwrap();
            assert_eq!(json, format!("\"{}\"", storage.label()));
        }
    }
}

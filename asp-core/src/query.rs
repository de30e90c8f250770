use asp_shared::{Grade, Memory, Storage};
use serde::{Deserialize, Serialize};

/// Raw form selections, exactly as a caller collected them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    #[serde(rename = "type", default)]
    pub device_type: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub cpu: String,
    #[serde(default)]
    pub ram: String,
    #[serde(default)]
    pub hdd: String,
    #[serde(default)]
    pub grade: String,
}

/// An estimation request.
///
/// `make`, `device_type` and `cpu` stay raw here and are normalized by the
/// engine; `model` is compared byte for byte. Option fields that did not
/// match a known selection are `None` and price as a zero adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "type")]
    pub device_type: String,
    pub make: String,
    pub model: String,
    pub cpu: String,
    pub ram: Option<Memory>,
    pub hdd: Option<Storage>,
    pub grade: Option<Grade>,
}

impl Query {
    pub fn new(
        device_type: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        cpu: impl Into<String>,
    ) -> Self {
        Self {
            device_type: device_type.into(),
            make: make.into(),
            model: model.into(),
            cpu: cpu.into(),
            ram: None,
            hdd: None,
            grade: None,
        }
    }

    pub fn with_ram(mut self, ram: Memory) -> Self {
        self.ram = Some(ram);
        self
    }

    pub fn with_hdd(mut self, hdd: Storage) -> Self {
        self.hdd = Some(hdd);
        self
    }

    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn from_selections(selections: &Selections) -> Self {
        Self {
            device_type: selections.device_type.clone(),
            make: selections.make.clone(),
            model: selections.model.clone(),
            cpu: selections.cpu.clone(),
            ram: Memory::parse(&selections.ram),
            hdd: Storage::parse(&selections.hdd),
            grade: Grade::parse(&selections.grade),
        }
    }

    pub fn is_salvage(&self) -> bool {
        self.grade.is_some_and(|g| g.is_salvage())
    }
}

impl From<Selections> for Query {
    fn from(selections: Selections) -> Self {
        Self::from_selections(&selections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_selections_parses_options() {
        let selections: Selections = serde_json::from_str(
            r#"{"type":"Laptop","make":"Dell","model":"5490","cpu":"i5-8365U","ram":"16GB","hdd":"512GB","grade":"A"}"#,
        )
        .unwrap();
        let query = Query::from(selections);

        assert_eq!(query.model, "5490");
        assert_eq!(query.ram, Some(Memory::Gb16));
        assert_eq!(query.hdd, Some(Storage::Gb512));
        assert_eq!(query.grade, Some(Grade::A));
        assert!(!query.is_salvage());
    }

    #[test]
    fn test_unknown_selections_become_none() {
        let query = Query::from_selections(&Selections {
            ram: "12GB".into(),
            hdd: "3TB".into(),
            grade: "Z".into(),
            ..Default::default()
        });
        assert_eq!(query.ram, None);
        assert_eq!(query.hdd, None);
        assert_eq!(query.grade, None);
    }
}

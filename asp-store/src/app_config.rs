use asp_catalog::PricingConfig;
use asp_core::LabelNormalizer;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::StoreError;

pub const ENV_PREFIX: &str = "ASP";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub normalization: NormalizationConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Relative paths are resolved against the parent of the config directory
    pub path: PathBuf,
}

impl DatasetConfig {
    fn resolve_against(&mut self, config_dir: &Path) {
        if self.path.is_relative() {
            if let Some(root) = config_dir.parent() {
                self.path = root.join(&self.path);
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NormalizationConfig {
    /// Raw label -> canonical label, e.g. "PANASONIC CORPORATION" = "PANASONIC"
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            aliases: default_aliases(),
        }
    }
}

fn default_aliases() -> BTreeMap<String, String> {
    LabelNormalizer::default().aliases().clone()
}

impl Config {
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(Path::new("config"), ENV_PREFIX)
    }

    /// Layers `default`, `{RUN_MODE}` and `local` files from `dir`, then
    /// environment variables like `ASP__PRICING__UPGRADE_PREMIUM=30`.
    pub fn load_from(dir: &Path, env_prefix: &str) -> Result<Self, StoreError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&file("default")))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&file(&run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&file("local")).required(false))
            .add_source(config::Environment::with_prefix(env_prefix).separator("__"))
            .build()?;

        let mut config: Self = s.try_deserialize()?;
        config.pricing.validate()?;
        config.dataset.resolve_against(dir);
        tracing::debug!(run_mode = %run_mode, dataset = %config.dataset.path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn label_normalizer(&self) -> Result<LabelNormalizer, StoreError> {
        Ok(LabelNormalizer::with_aliases(&self.normalization.aliases)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_catalog::PremiumStage;
    use asp_shared::{Grade, Memory, Storage};
    use rust_decimal_macros::dec;
    use std::fs;

    const DEFAULT_TOML: &str = r#"
[dataset]
path = "data/avg_price_data.json"

[normalization.aliases]
"PANASONIC CORPORATION" = "PANASONIC"
"Hewlett Packard" = "HP"

[pricing]
upgrade_premium = 25
upgrade_premium_stage = "before_grade"
salvage_price_modern = 40.0
salvage_price_legacy = 15.0
"#;

    fn config_dir(default_toml: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), default_toml).unwrap();
        dir
    }

    #[test]
    fn test_load_defaults() {
        let dir = config_dir(DEFAULT_TOML);
        let config = Config::load_from(dir.path(), "ASP_TEST_DEFAULTS").unwrap();

        assert_eq!(
            config.dataset.path,
            dir.path().parent().unwrap().join("data/avg_price_data.json")
        );
        assert_eq!(config.pricing.upgrade_premium, dec!(25));
        assert_eq!(config.pricing.salvage_price_modern, dec!(40));
        assert_eq!(config.pricing.upgrade_premium_stage, PremiumStage::BeforeGrade);
        // Tables left out of the file fall back to the built-in ones
        assert_eq!(config.pricing.memory_adjustments, PricingConfig::default().memory_adjustments);

        let normalizer = config.label_normalizer().unwrap();
        assert_eq!(normalizer.normalize("hewlett-packard"), "HP");
        assert_eq!(normalizer.normalize("Panasonic Corporation"), "PANASONIC");
    }

    #[test]
    fn test_shipped_config_matches_builtin_defaults() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config");
        let config = Config::load_from(&dir, "ASP_TEST_SHIPPED").unwrap();

        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.normalization.aliases, default_aliases());
        assert_eq!(config.dataset.path, Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/avg_price_data.json"));
        assert_eq!(config.pricing.storage_adjustments[&Storage::Tb1], dec!(25));
        assert_eq!(config.pricing.grade_multipliers[&Grade::A], dec!(1.15));
    }

    #[test]
    fn test_relative_dataset_path_follows_config_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("deploy").join("config");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("default.toml"), DEFAULT_TOML).unwrap();

        let config = Config::load_from(&dir, "ASP_TEST_RELATIVE").unwrap();
        assert_eq!(config.dataset.path, root.path().join("deploy/data/avg_price_data.json"));
    }

    #[test]
    fn test_environment_overrides_table_entry() {
        let dir = config_dir(&format!(
            "{}\n[pricing.memory_adjustments]\n4gb = \"-2\"\n16gb = \"7\"\n32gb = \"17\"\n",
            DEFAULT_TOML
        ));
        env::set_var("ASP_TEST_TABLE__PRICING__MEMORY_ADJUSTMENTS__16GB", "9");

        let config = Config::load_from(dir.path(), "ASP_TEST_TABLE").unwrap();
        env::remove_var("ASP_TEST_TABLE__PRICING__MEMORY_ADJUSTMENTS__16GB");

        let memory = &config.pricing.memory_adjustments;
        assert_eq!(memory[&Memory::Gb16], dec!(9));
        assert_eq!(memory[&Memory::Gb4], dec!(-2));
        assert_eq!(memory[&Memory::Gb32], dec!(17));
    }

    #[test]
    fn test_local_file_overrides_default() {
        let dir = config_dir(DEFAULT_TOML);
        fs::write(
            dir.path().join("local.toml"),
            "[pricing]\nupgrade_premium_stage = \"after_grade\"\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path(), "ASP_TEST_LOCAL").unwrap();
        assert_eq!(config.pricing.upgrade_premium_stage, PremiumStage::AfterGrade);
        assert_eq!(config.pricing.upgrade_premium, dec!(25));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = config_dir(DEFAULT_TOML);
        env::set_var("ASP_TEST_ENV__PRICING__UPGRADE_PREMIUM", "30");
        env::set_var("ASP_TEST_ENV__DATASET__PATH", "/srv/asp/history.json");

        let config = Config::load_from(dir.path(), "ASP_TEST_ENV").unwrap();
        assert_eq!(config.pricing.upgrade_premium, dec!(30));
        assert_eq!(config.dataset.path, PathBuf::from("/srv/asp/history.json"));

        env::remove_var("ASP_TEST_ENV__PRICING__UPGRADE_PREMIUM");
        env::remove_var("ASP_TEST_ENV__DATASET__PATH");
    }

    #[test]
    fn test_missing_default_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(dir.path(), "ASP_TEST_MISSING");
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_negative_salvage_price_rejected() {
        let dir = config_dir(&DEFAULT_TOML.replace("salvage_price_legacy = 15.0", "salvage_price_legacy = -1.0"));
        let result = Config::load_from(dir.path(), "ASP_TEST_NEGATIVE");
        assert!(matches!(result, Err(StoreError::Pricing(_))));
    }
}

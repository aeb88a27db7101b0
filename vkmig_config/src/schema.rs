use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use vkmig_core::{ClassifierConfig, Enricher, ExtractorConfig, Gazetteer};

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub migration: MigrationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    #[serde(default = "MigrationConfig::default_target_db_path")]
    pub target_db_path: PathBuf,
    #[serde(default = "MigrationConfig::default_dumps_dir")]
    pub dumps_dir: PathBuf,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            target_db_path: Self::default_target_db_path(),
            dumps_dir: Self::default_dumps_dir(),
        }
    }
}

impl MigrationConfig {
    fn default_target_db_path() -> PathBuf {
        PathBuf::from("./db/db.db")
    }

    fn default_dumps_dir() -> PathBuf {
        PathBuf::from("./dumps/vk/")
    }

    /// `migration_report.vk.<db stem>.txt` next to the target database.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        let stem = self
            .target_db_path
            .file_stem()
            .map_or_else(|| "db".into(), |s| s.to_string_lossy());
        let dir = self.target_db_path.parent().unwrap_or_else(|| Path::new(""));
        dir.join(format!("migration_report.vk.{stem}.txt"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Per-record example lines logged for each source file.
    #[serde(default = "LoggingConfig::default_limit_examples")]
    pub limit_examples: usize,
    /// Rows in the "top cities" statistics.
    #[serde(default = "LoggingConfig::default_limit_top_cities")]
    pub limit_top_cities: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            limit_examples: Self::default_limit_examples(),
            limit_top_cities: Self::default_limit_top_cities(),
        }
    }
}

impl LoggingConfig {
    const fn default_limit_examples() -> usize {
        5
    }

    const fn default_limit_top_cities() -> usize {
        10
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    /// JSON gazetteer to use instead of the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gazetteer_path: Option<PathBuf>,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    /// Keyword and pattern overrides for the event classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierConfig>,
}

impl EnrichmentConfig {
    /// Build the enricher this section describes.
    pub fn build_enricher(&self) -> anyhow::Result<Enricher> {
        let gazetteer = match &self.gazetteer_path {
            Some(path) => {
                info!("Loading gazetteer from {}", path.display());
                std::sync::Arc::new(Gazetteer::from_path(path)?)
            }
            None => Gazetteer::builtin()?,
        };
        let classifier = self.classifier.clone().unwrap_or_default();

        let enricher = Enricher::from_parts(gazetteer, self.extractor, &classifier)?;
        debug!("Enricher ready: {:?}", enricher.extractor().stats());
        Ok(enricher)
    }
}

pub const CONFIG_TEMPLATE: &str = r#"{
  "migration": {
    "target_db_path": "./db/db.db",
    "dumps_dir": "./dumps/vk/"
  },
  "logging": {
    "limit_examples": 5,
    "limit_top_cities": 10
  },
  "enrichment": {
    "extractor": {
      "min_text_chars": 3,
      "min_address_chars": 5,
      "min_fallback_word_chars": 3
    }
  }
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("vkmig"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", path.display()))?;
        Ok(config)
    }

    /// The config file if present, defaults otherwise. A file that exists but
    /// does not parse is still an error.
    pub fn load_or_default() -> anyhow::Result<Self> {
        Self::load_or_default_from(&Self::config_path()?)
    }

    pub fn load_or_default_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            debug!(
                "No config at {}, using defaults. Run 'vkmig init' to create one.",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");
        Self::create_config_at(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Put the VK SQLite dumps into migration.dumps_dir");
        println!("   2. Run 'vkmig migrate' to build the target database");
        println!();
        println!("🔧 Configuration options:");
        println!("   - migration.target_db_path: target SQLite file (report is written next to it)");
        println!("   - enrichment.gazetteer_path: custom city list in JSON");
        println!("   - logging.limit_examples: example records logged per file");
        println!();
        Ok(config_path)
    }

    /// Write the template to `path`, refusing to overwrite.
    pub fn create_config_at(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_template_matches_defaults() {
        let config: Config = serde_json::from_str(CONFIG_TEMPLATE).expect("template should parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"logging": {"limit_examples": 2}}"#).expect("should parse");
        assert_eq!(config.logging.limit_examples, 2);
        assert_eq!(config.logging.limit_top_cities, 10);
        assert_eq!(config.migration.dumps_dir, PathBuf::from("./dumps/vk/"));
        assert!(config.enrichment.gazetteer_path.is_none());
        assert_eq!(config.enrichment.extractor, ExtractorConfig::default());
    }

    #[test]
    fn test_report_path() {
        let migration = MigrationConfig::default();
        assert_eq!(
            migration.report_path(),
            PathBuf::from("./db/migration_report.vk.db.txt")
        );

        let migration = MigrationConfig {
            target_db_path: PathBuf::from("/data/events.sqlite"),
            ..MigrationConfig::default()
        };
        assert_eq!(
            migration.report_path(),
            PathBuf::from("/data/migration_report.vk.events.txt")
        );
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_create_config_refuses_overwrite() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("nested").join("config.json");

        Config::create_config_at(&path).expect("first init should succeed");
        let loaded = Config::load_from(&path).expect("created config should load");
        assert_eq!(loaded, Config::default());

        assert!(Config::create_config_at(&path).is_err());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("config.json");

        let config = Config::load_or_default_from(&path).expect("missing file should not fail");
        assert_eq!(config, Config::default());
        assert!(!path.exists());

        std::fs::write(&path, r#"{"logging": {"limit_top_cities": 3}}"#)
            .expect("file should be written");
        let config = Config::load_or_default_from(&path).expect("existing file should load");
        assert_eq!(config.logging.limit_top_cities, 3);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_invalid_config_names_the_file() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("file should be written");

        let err = Config::load_from(&path).expect_err("invalid JSON should fail");
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_build_enricher_from_gazetteer_path() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("cities.json");
        std::fs::write(&path, r#"{"cities": [{"name": "Тверь", "aliases": ["Твери"]}]}"#)
            .expect("file should be written");

        let enrichment = EnrichmentConfig {
            gazetteer_path: Some(path),
            ..EnrichmentConfig::default()
        };
        let enricher = enrichment.build_enricher().expect("enricher should build");
        assert_eq!(enricher.enrich("Живу в Твери").cities, vec!["Тверь".to_string()]);

        let missing = EnrichmentConfig {
            gazetteer_path: Some(dir.path().join("missing.json")),
            ..EnrichmentConfig::default()
        };
        assert!(missing.build_enricher().is_err());
    }
}

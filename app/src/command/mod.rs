//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use vkmig_config::Config;
use vkmig_core::Enricher;

mod analyze;
mod check;
mod info;
mod init;
mod migrate;
mod stats;
mod version;

pub use analyze::{AnalyzeInput, AnalyzeStrategy};
pub use check::{CheckInput, CheckStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use migrate::MigrateStrategy;
pub use stats::StatsStrategy;
pub use version::VersionStrategy;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Target SQLite database
    #[arg(long)]
    pub target_db: Option<PathBuf>,

    /// Directory with VK dump files
    #[arg(long)]
    pub dumps_dir: Option<PathBuf>,

    /// JSON gazetteer replacing the built-in city list
    #[arg(long)]
    pub gazetteer: Option<PathBuf>,
}

impl ConfigOverrides {
    /// `~/vkmig/config.json` (or defaults) with these overrides applied.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load_or_default()?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.target_db {
            config.migration.target_db_path.clone_from(path);
        }
        if let Some(path) = &self.dumps_dir {
            config.migration.dumps_dir.clone_from(path);
        }
        if let Some(path) = &self.gazetteer {
            config.enrichment.gazetteer_path = Some(path.clone());
        }
    }
}

/// Build the enricher described by the config.
fn build_enricher(config: &Config) -> anyhow::Result<Arc<Enricher>> {
    let enricher = config.enrichment.build_enricher()?;
    let stats = enricher.extractor().stats();
    info!(
        "Enricher ready: {} cities, {} aliases, {} address patterns",
        stats.total_cities, stats.total_aliases, stats.address_patterns
    );
    Ok(Arc::new(enricher))
}

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let overrides = ConfigOverrides {
            target_db: Some(PathBuf::from("/tmp/out.db")),
            dumps_dir: None,
            gazetteer: Some(PathBuf::from("/tmp/cities.json")),
        };
        let mut config = Config::default();
        overrides.apply(&mut config);

        assert_eq!(config.migration.target_db_path, PathBuf::from("/tmp/out.db"));
        assert_eq!(config.migration.dumps_dir, PathBuf::from("./dumps/vk/"));
        assert_eq!(
            config.enrichment.gazetteer_path,
            Some(PathBuf::from("/tmp/cities.json"))
        );
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = Config::default();
        ConfigOverrides::default().apply(&mut config);
        assert_eq!(config, Config::default());
    }
}

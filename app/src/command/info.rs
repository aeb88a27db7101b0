use vkmig_config::Config;

use super::ConfigOverrides;

/// Strategy for displaying the effective configuration.
///
/// Shows where the config was read from, the resolved paths with overrides
/// applied, and the size of the loaded gazetteer and pattern tables.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ConfigOverrides;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let config = input.load_config()?;

        println!("=== vkmig Configuration ===\n");

        println!("Config file:");
        if config_path.exists() {
            println!("  Path: {}", config_path.display());
        } else {
            println!("  Path: {} (not found, using defaults)", config_path.display());
        }
        println!();

        println!("Migration:");
        let target = &config.migration.target_db_path;
        let status = if target.is_file() { "exists" } else { "not created yet" };
        println!("  Target database: {} ({status})", target.display());
        let dumps = &config.migration.dumps_dir;
        let status = if dumps.is_dir() { "exists" } else { "missing" };
        println!("  Dumps directory: {} ({status})", dumps.display());
        println!("  Report: {}", config.migration.report_path().display());
        println!();

        println!("Logging:");
        println!("  Example records per file: {}", config.logging.limit_examples);
        println!("  Top cities: {}", config.logging.limit_top_cities);
        println!();

        println!("Enrichment:");
        match &config.enrichment.gazetteer_path {
            Some(path) => println!("  Gazetteer: {}", path.display()),
            None => println!("  Gazetteer: built-in"),
        }
        let extractor = &config.enrichment.extractor;
        println!("  Min text chars: {}", extractor.min_text_chars);
        println!("  Min address chars: {}", extractor.min_address_chars);
        println!(
            "  Min fallback word chars: {}",
            extractor.min_fallback_word_chars
        );
        println!(
            "  Classifier: {}",
            if config.enrichment.classifier.is_some() {
                "custom"
            } else {
                "built-in"
            }
        );

        match super::build_enricher(&config) {
            Ok(enricher) => {
                let stats = enricher.extractor().stats();
                println!("  Cities: {}", stats.total_cities);
                println!("  Aliases: {}", stats.total_aliases);
                println!("  Address patterns: {}", stats.address_patterns);
                println!("  Event rules: {}", enricher.classifier().rules().len());
            }
            Err(e) => {
                println!("  Status: failed to build");
                println!("  Error: {e:#}");
            }
        }

        Ok(())
    }
}

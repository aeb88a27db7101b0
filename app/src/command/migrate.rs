use tracing::info;

use vkmig_migrate::{Migration, MigrationOptions};

use super::ConfigOverrides;

/// Strategy for running the full migration.
///
/// Loads the config, builds the enricher once and migrates every dump in
/// `migration.dumps_dir` into `migration.target_db_path`.
#[derive(Debug, Clone, Copy)]
pub struct MigrateStrategy;

impl super::CommandStrategy for MigrateStrategy {
    type Input = ConfigOverrides;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = input.load_config()?;
        let enricher = super::build_enricher(&config)?;

        let options = MigrationOptions {
            target_db_path: config.migration.target_db_path.clone(),
            dumps_dir: config.migration.dumps_dir.clone(),
            report_path: config.migration.report_path(),
            limit_examples: config.logging.limit_examples,
            limit_top_cities: config.logging.limit_top_cities,
        };
        info!("Target database: {}", options.target_db_path.display());

        let summary = Migration::new(options, enricher).run().await?;

        println!();
        println!("Files processed: {}", summary.files_processed);
        println!("Organizations added: {}", summary.orgs_migrated);
        println!("Posts added: {}", summary.posts_migrated);
        if let Some(statistics) = &summary.statistics {
            println!("Organizations in database: {}", statistics.total_orgs);
            println!("Posts in database: {}", statistics.total_posts);
        }
        if let Some(path) = &summary.report_path {
            println!("Report: {}", path.display());
        }
        Ok(())
    }
}

use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use vkmig_core::Enricher;

use crate::database::{
    check_source_structure, connect_source, create_target_database, discover_sources,
};
use crate::log::MigrationLog;
use crate::migrator::DataMigrator;
use crate::report::{ReportSummary, write_report};
use crate::statistics::{DatabaseStatistics, collect_statistics};

/// Paths and limits for one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    pub target_db_path: PathBuf,
    pub dumps_dir: PathBuf,
    pub report_path: PathBuf,
    pub limit_examples: usize,
    pub limit_top_cities: usize,
}

/// Result of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub files_processed: usize,
    pub orgs_migrated: usize,
    pub posts_migrated: usize,
    pub statistics: Option<DatabaseStatistics>,
    pub report_path: Option<PathBuf>,
}

/// Drives a migration of every dump in a directory into the target database.
pub struct Migration {
    options: MigrationOptions,
    migrator: DataMigrator,
    log: MigrationLog,
}

impl Migration {
    #[must_use]
    pub fn new(options: MigrationOptions, enricher: Arc<Enricher>) -> Self {
        let migrator = DataMigrator::new(enricher, options.limit_examples);
        Self {
            options,
            migrator,
            log: MigrationLog::new(),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &MigrationOptions {
        &self.options
    }

    #[must_use]
    pub const fn log(&self) -> &MigrationLog {
        &self.log
    }

    /// Migrate one dump. Failures are logged and count as nothing migrated.
    pub async fn migrate_file(&mut self, target: &SqlitePool, path: &Path) -> (usize, usize) {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let size_mb = std::fs::metadata(path)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or_default();
        self.log.log(format!("Processing {name} ({size_mb:.2} MB)"));

        match self.migrate_file_inner(target, path, &name).await {
            Ok(counts) => counts,
            Err(e) => {
                error!("Failed to migrate {name}: {e:#}");
                self.log.log(format!("Error processing {name}: {e:#}"));
                (0, 0)
            }
        }
    }

    async fn migrate_file_inner(
        &mut self,
        target: &SqlitePool,
        path: &Path,
        name: &str,
    ) -> anyhow::Result<(usize, usize)> {
        let source = connect_source(path).await?;

        if !check_source_structure(&source, name, &mut self.log).await? {
            source.close().await;
            return Ok((0, 0));
        }

        let mut tx = target.begin().await?;
        let groups = self
            .migrator
            .migrate_groups(&source, &mut *tx, name, &mut self.log)
            .await?;
        let posts = self
            .migrator
            .migrate_posts(&source, &mut *tx, name, &mut self.log)
            .await?;
        tx.commit().await?;
        source.close().await;

        Ok((groups.migrated, posts.migrated))
    }

    /// Create the target schema, migrate every dump, collect statistics and
    /// write the report.
    pub async fn run(&mut self) -> anyhow::Result<MigrationSummary> {
        self.log.log("Starting VK data migration");
        let target = create_target_database(&self.options.target_db_path, &mut self.log).await?;

        let files = discover_sources(&self.options.dumps_dir, &mut self.log)?;
        if files.is_empty() {
            self.log.log("No VK database files found, nothing to migrate");
            target.close().await;
            return Ok(MigrationSummary::default());
        }

        let mut summary = MigrationSummary::default();
        for path in &files {
            let (orgs, posts) = self.migrate_file(&target, path).await;
            summary.files_processed += 1;
            summary.orgs_migrated += orgs;
            summary.posts_migrated += posts;
        }

        let statistics = collect_statistics(&target, self.options.limit_top_cities).await?;
        statistics.log_to(&mut self.log, self.options.limit_top_cities);
        target.close().await;

        self.log.log("Migration finished");
        self.log.log(format!("Files processed: {}", summary.files_processed));
        self.log.log(format!("Organizations added: {}", summary.orgs_migrated));
        self.log.log(format!("Posts added: {}", summary.posts_migrated));

        let report = ReportSummary {
            files_processed: summary.files_processed,
            orgs_migrated: summary.orgs_migrated,
            posts_migrated: summary.posts_migrated,
            final_orgs: statistics.total_orgs,
            final_posts: statistics.total_posts,
        };
        write_report(&self.options.report_path, &report, &self.log)?;
        info!("Report written to {}", self.options.report_path.display());

        summary.statistics = Some(statistics);
        summary.report_path = Some(self.options.report_path.clone());
        Ok(summary)
    }
}

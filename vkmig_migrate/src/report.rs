use std::path::Path;

use crate::log::{MigrationLog, timestamp_now};

/// Totals written into the report header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub files_processed: usize,
    pub orgs_migrated: usize,
    pub posts_migrated: usize,
    pub final_orgs: i64,
    pub final_posts: i64,
}

#[must_use]
pub fn render_report(summary: &ReportSummary, log: &MigrationLog, generated_at: &str) -> String {
    let mut report = format!(
        "=== VK DATA MIGRATION REPORT ===\n\
         Migration date: {generated_at}\n\
         \n\
         === RESULTS ===\n\
         Files processed: {}\n\
         Organizations added: {}\n\
         Posts added: {}\n\
         Organizations in database: {}\n\
         Posts in database: {}\n\
         \n\
         === DETAILED LOG ===\n",
        summary.files_processed,
        summary.orgs_migrated,
        summary.posts_migrated,
        summary.final_orgs,
        summary.final_posts,
    );
    for entry in log.entries() {
        report.push_str(entry);
        report.push('\n');
    }
    report
}

/// Write the report, creating its directory if needed.
pub fn write_report(path: &Path, summary: &ReportSummary, log: &MigrationLog) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_report(summary, log, &timestamp_now()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_report_sections() {
        let mut log = MigrationLog::new();
        log.log("Processing dump.db");

        let summary = ReportSummary {
            files_processed: 1,
            orgs_migrated: 2,
            posts_migrated: 3,
            final_orgs: 4,
            final_posts: 5,
        };
        let report = render_report(&summary, &log, "2024-06-01 12:00:00");

        assert!(report.starts_with("=== VK DATA MIGRATION REPORT ===\n"));
        assert!(report.contains("Migration date: 2024-06-01 12:00:00\n"));
        assert!(report.contains("Posts added: 3\n"));
        assert!(report.contains("Posts in database: 5\n"));
        let log_section = report
            .split("=== DETAILED LOG ===\n")
            .nth(1)
            .unwrap_or_default();
        assert!(log_section.trim_end().ends_with("Processing dump.db"));
    }

    #[test]
    fn test_render_report_exact_layout() {
        let mut log = MigrationLog::new();
        log.log("first");
        log.log("second");

        let summary = ReportSummary {
            files_processed: 2,
            orgs_migrated: 1,
            posts_migrated: 0,
            final_orgs: 7,
            final_posts: 9,
        };
        let report = render_report(&summary, &log, "2024-06-01 12:00:00");
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(
            &lines[..11],
            [
                "=== VK DATA MIGRATION REPORT ===",
                "Migration date: 2024-06-01 12:00:00",
                "",
                "=== RESULTS ===",
                "Files processed: 2",
                "Organizations added: 1",
                "Posts added: 0",
                "Organizations in database: 7",
                "Posts in database: 9",
                "",
                "=== DETAILED LOG ===",
            ]
        );
        assert_eq!(lines.len(), 13);
        assert!(lines[11].ends_with("first"));
        assert!(lines[12].ends_with("second"));
        assert!(report.ends_with('\n'));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_write_report_creates_directory() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("reports").join("migration_report.vk.db.txt");

        write_report(&path, &ReportSummary::default(), &MigrationLog::new())
            .expect("report should be written");
        let content = std::fs::read_to_string(&path).expect("report should be readable");
        assert!(content.contains("Files processed: 0"));
    }
}

#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

//! Migration of VK SQLite dumps into the consolidated target database.

pub mod database;
mod log;
mod migrator;
mod pipeline;
mod report;
pub mod statistics;

pub use log::MigrationLog;
pub use migrator::{DataMigrator, GroupStats, PostStats};
pub use pipeline::{Migration, MigrationOptions, MigrationSummary};
pub use report::{ReportSummary, render_report, write_report};
pub use statistics::{DatabaseStatistics, OrgExample, PostExample, collect_statistics};

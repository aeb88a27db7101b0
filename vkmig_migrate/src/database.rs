//! Target schema, source discovery and source structure checks.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::log::MigrationLog;

/// Tables a VK dump must contain.
pub const REQUIRED_TABLES: [&str; 2] = ["vk_groups", "vk_posts"];

const CREATE_ORGS: &str = r"
    CREATE TABLE IF NOT EXISTS orgs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT UNIQUE NOT NULL,
        descr_raw TEXT,
        last_checked_date TEXT,
        last_post_date TEXT,
        last_event_date TEXT,
        descr TEXT,
        cities TEXT
    )
";

const CREATE_POSTS: &str = r"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        org_id INTEGER,
        post_content TEXT,
        content TEXT,
        post_date TEXT,
        post_likes INTEGER,
        post_comments INTEGER,
        post_reposts INTEGER,
        post_images TEXT,
        images TEXT,
        url TEXT,
        post_id TEXT,
        cities TEXT,
        address TEXT,
        maybe_event BOOLEAN,
        is_published BOOLEAN DEFAULT 1,
        FOREIGN KEY(org_id) REFERENCES orgs(id)
    )
";

/// Columns added after the first schema version.
const ADDED_COLUMNS: &[&str] = &[
    "ALTER TABLE orgs ADD COLUMN cities TEXT",
    "ALTER TABLE posts ADD COLUMN cities TEXT",
    "ALTER TABLE posts ADD COLUMN address TEXT",
];

fn is_duplicate_column_error(err: &sqlx::Error) -> bool {
    err.to_string().contains("duplicate column")
}

/// Open (creating if missing) the target database.
pub async fn connect_target(path: &Path) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open a target database that a migration has already created.
pub async fn connect_existing(path: &Path) -> anyhow::Result<SqlitePool> {
    if !path.is_file() {
        anyhow::bail!(
            "Database not found at: {}. Run 'vkmig migrate' first.",
            path.display()
        );
    }
    connect_target(path).await
}

/// Open a VK dump read-only.
pub async fn connect_source(path: &Path) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the target database with `orgs` and `posts`, upgrading older files.
pub async fn create_target_database(
    path: &Path,
    log: &mut MigrationLog,
) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let pool = connect_target(path).await?;

    sqlx::query(CREATE_ORGS).execute(&pool).await?;
    sqlx::query(CREATE_POSTS).execute(&pool).await?;

    for statement in ADDED_COLUMNS {
        match sqlx::query(statement).execute(&pool).await {
            Ok(_) => info!("Schema upgraded: {statement}"),
            Err(e) if is_duplicate_column_error(&e) => {}
            Err(e) => return Err(e.into()),
        }
    }

    log.log(format!(
        "Target database created/checked: {}",
        path.display()
    ));
    Ok(pool)
}

/// `*.db` files in `dumps_dir`, sorted by path.
pub fn discover_sources(dumps_dir: &Path, log: &mut MigrationLog) -> anyhow::Result<Vec<PathBuf>> {
    let dir = dumps_dir
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Dumps path is not valid UTF-8: {}", dumps_dir.display()))?;
    let pattern = format!("{}/*.db", glob::Pattern::escape(dir.trim_end_matches('/')));

    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    log.log(format!(
        "Found {} VK database files in {}",
        files.len(),
        dumps_dir.display()
    ));
    for file in &files {
        log.detail(format!("  - {}", file.display()));
    }
    Ok(files)
}

pub async fn list_tables(pool: &SqlitePool) -> anyhow::Result<Vec<String>> {
    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(tables.into_iter().map(|(name,)| name).collect())
}

#[must_use]
pub fn has_required_tables(tables: &[String]) -> bool {
    REQUIRED_TABLES
        .iter()
        .all(|required| tables.iter().any(|t| t == required))
}

/// Check that a dump has the VK tables, logging what it holds.
pub async fn check_source_structure(
    pool: &SqlitePool,
    source_name: &str,
    log: &mut MigrationLog,
) -> anyhow::Result<bool> {
    let tables = list_tables(pool).await?;
    log.detail(format!("Tables in file: {}", tables.join(", ")));

    if has_required_tables(&tables) {
        Ok(true)
    } else {
        log.log(format!(
            "Skipping {source_name}: required tables are missing"
        ));
        Ok(false)
    }
}

use rayon::prelude::*;
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use std::collections::HashSet;
use std::sync::Arc;

use vkmig_core::{Enricher, Enrichment};

use crate::log::MigrationLog;
use crate::statistics::preview;

/// Outcome of migrating `vk_groups` from one dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    pub found: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub with_cities: usize,
}

/// Outcome of migrating `vk_posts` from one dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    pub found: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub orphaned: usize,
    pub with_cities: usize,
    pub with_addresses: usize,
    pub events: usize,
}

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    url: Option<String>,
    descr: Option<String>,
    last_checked_date: Option<String>,
    last_post_date: Option<String>,
    last_event_date: Option<String>,
}

impl GroupRow {
    /// URL and description joined, for city extraction.
    fn search_text(&self) -> String {
        [self.url.as_deref(), self.descr.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    group_id: Option<String>,
    post_content: Option<String>,
    post_date: Option<String>,
    post_likes: Option<i64>,
    post_comments: Option<i64>,
    post_reposts: Option<i64>,
    post_images: Option<String>,
    vk_group_url: Option<String>,
    post_id: Option<String>,
    group_url: Option<String>,
}

impl PostRow {
    /// The joined group URL, falling back to the URL stored on the post.
    fn org_url(&self) -> Option<&str> {
        self.group_url.as_deref().or(self.vk_group_url.as_deref())
    }
}

struct PendingPost {
    org_id: i64,
    org_url: String,
    post_id: String,
    row: PostRow,
}

// Source columns are cast so that dumps with loose SQLite typing decode.
const SELECT_GROUPS: &str = r"
    SELECT CAST(url AS TEXT) AS url,
           CAST(descr AS TEXT) AS descr,
           CAST(last_checked_date AS TEXT) AS last_checked_date,
           CAST(last_post_date AS TEXT) AS last_post_date,
           CAST(last_event_date AS TEXT) AS last_event_date
    FROM vk_groups
";

const SELECT_POSTS: &str = r"
    SELECT CAST(vp.group_id AS TEXT) AS group_id,
           CAST(vp.post_content AS TEXT) AS post_content,
           CAST(vp.post_date AS TEXT) AS post_date,
           CAST(vp.post_likes AS INTEGER) AS post_likes,
           CAST(vp.post_comments AS INTEGER) AS post_comments,
           CAST(vp.post_reposts AS INTEGER) AS post_reposts,
           CAST(vp.post_images AS TEXT) AS post_images,
           CAST(vp.vk_group_url AS TEXT) AS vk_group_url,
           CAST(vp.post_id AS TEXT) AS post_id,
           CAST(vg.url AS TEXT) AS group_url
    FROM vk_posts vp
    LEFT JOIN vk_groups vg ON vp.group_id = vg.id
";

/// JSON array for a `cities`/`address` column; `"[]"` when empty.
fn json_list(items: &[String]) -> anyhow::Result<String> {
    Ok(serde_json::to_string(items)?)
}

/// Moves groups and posts from one dump into the target database, enriching
/// each record on the way.
pub struct DataMigrator {
    enricher: Arc<Enricher>,
    limit_examples: usize,
}

impl DataMigrator {
    #[must_use]
    pub const fn new(enricher: Arc<Enricher>, limit_examples: usize) -> Self {
        Self {
            enricher,
            limit_examples,
        }
    }

    async fn org_id(target: &mut SqliteConnection, url: &str) -> anyhow::Result<Option<i64>> {
        let id: Option<(i64,)> = sqlx::query_as("SELECT id FROM orgs WHERE url = ?")
            .bind(url)
            .fetch_optional(&mut *target)
            .await?;
        Ok(id.map(|(id,)| id))
    }

    async fn post_exists(
        target: &mut SqliteConnection,
        post_id: &str,
        org_url: &str,
    ) -> anyhow::Result<bool> {
        let existing: Option<(i64,)> = sqlx::query_as(
            r"SELECT p.id FROM posts p
              JOIN orgs o ON p.org_id = o.id
              WHERE p.post_id = ? AND o.url = ?",
        )
        .bind(post_id)
        .bind(org_url)
        .fetch_optional(&mut *target)
        .await?;
        Ok(existing.is_some())
    }

    /// Insert every group whose URL is not yet in `orgs`.
    pub async fn migrate_groups(
        &self,
        source: &SqlitePool,
        target: &mut SqliteConnection,
        source_name: &str,
        log: &mut MigrationLog,
    ) -> anyhow::Result<GroupStats> {
        let groups: Vec<GroupRow> = sqlx::query_as(SELECT_GROUPS).fetch_all(source).await?;
        log.log(format!("Found {} groups in {source_name}", groups.len()));

        let mut stats = GroupStats {
            found: groups.len(),
            ..GroupStats::default()
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut pending: Vec<(String, GroupRow)> = Vec::new();
        for group in groups {
            let Some(url) = group.url.clone().filter(|u| !u.is_empty()) else {
                continue;
            };
            if !seen.insert(url.clone()) || Self::org_id(target, &url).await?.is_some() {
                stats.skipped += 1;
                if stats.skipped <= self.limit_examples {
                    log.detail(format!("  - Skipped (already exists): {url}"));
                }
                continue;
            }
            pending.push((url, group));
        }

        let cities: Vec<Vec<String>> = pending
            .par_iter()
            .map(|(_, group)| {
                self.enricher
                    .extract_locations_and_addresses(&group.search_text())
                    .0
            })
            .collect();

        for ((url, group), cities) in pending.iter().zip(&cities) {
            sqlx::query(
                r"INSERT INTO orgs (url, descr_raw, last_checked_date, last_post_date, last_event_date, cities)
                  VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(url)
            .bind(&group.descr)
            .bind(&group.last_checked_date)
            .bind(&group.last_post_date)
            .bind(&group.last_event_date)
            .bind(json_list(cities)?)
            .execute(&mut *target)
            .await?;

            stats.migrated += 1;
            if !cities.is_empty() {
                stats.with_cities += 1;
            }
            if stats.migrated <= self.limit_examples {
                if cities.is_empty() {
                    log.detail(format!("  + Added organization: {url}"));
                } else {
                    log.detail(format!(
                        "  + Added organization: {url} (cities: {})",
                        cities.join(", ")
                    ));
                }
            }
        }

        log.log(format!(
            "Organizations from {source_name}: added {}, skipped {}",
            stats.migrated, stats.skipped
        ));
        Ok(stats)
    }

    /// Insert every post not yet present for its organization.
    pub async fn migrate_posts(
        &self,
        source: &SqlitePool,
        target: &mut SqliteConnection,
        source_name: &str,
        log: &mut MigrationLog,
    ) -> anyhow::Result<PostStats> {
        let posts: Vec<PostRow> = sqlx::query_as(SELECT_POSTS).fetch_all(source).await?;
        log.log(format!("Found {} posts in {source_name}", posts.len()));

        let mut stats = PostStats {
            found: posts.len(),
            ..PostStats::default()
        };

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut pending: Vec<PendingPost> = Vec::new();
        for row in posts {
            let (Some(post_id), Some(org_url)) = (row.post_id.clone(), row.org_url().map(str::to_string))
            else {
                continue;
            };

            let duplicate = !seen.insert((post_id.clone(), org_url.clone()));
            if duplicate || Self::post_exists(target, &post_id, &org_url).await? {
                stats.skipped += 1;
                if stats.skipped <= self.limit_examples {
                    log.detail(format!("  - Skipped post {post_id} (already exists)"));
                    log.detail(format!(
                        "    Organization: {org_url}, date: {}",
                        row.post_date.as_deref().unwrap_or("-")
                    ));
                    log.detail(format!(
                        "    Content: {}",
                        preview(row.post_content.as_deref(), 50, "<no content>")
                    ));
                }
                continue;
            }

            let Some(org_id) = Self::org_id(target, &org_url).await? else {
                stats.orphaned += 1;
                if stats.orphaned <= self.limit_examples {
                    log.detail(format!(
                        "  ! Post {post_id} skipped: no organization for {org_url}"
                    ));
                    log.detail(format!(
                        "    Group ID: {}, date: {}",
                        row.group_id.as_deref().unwrap_or("-"),
                        row.post_date.as_deref().unwrap_or("-")
                    ));
                    log.detail(format!(
                        "    Likes: {}, comments: {}, reposts: {}",
                        row.post_likes.unwrap_or_default(),
                        row.post_comments.unwrap_or_default(),
                        row.post_reposts.unwrap_or_default()
                    ));
                    log.detail(format!(
                        "    Content: {}",
                        preview(row.post_content.as_deref(), 100, "<no content>")
                    ));
                }
                continue;
            };

            pending.push(PendingPost {
                org_id,
                org_url,
                post_id,
                row,
            });
        }

        let enrichments: Vec<Enrichment> = pending
            .par_iter()
            .map(|post| {
                self.enricher
                    .enrich(post.row.post_content.as_deref().unwrap_or_default())
            })
            .collect();

        for (post, enrichment) in pending.iter().zip(&enrichments) {
            let row = &post.row;
            sqlx::query(
                r"INSERT INTO posts (org_id, post_content, content, post_date,
                                     post_likes, post_comments, post_reposts,
                                     post_images, images, post_id, cities, address, maybe_event)
                  VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(post.org_id)
            .bind(&row.post_content)
            .bind(&row.post_content)
            .bind(&row.post_date)
            .bind(row.post_likes)
            .bind(row.post_comments)
            .bind(row.post_reposts)
            .bind(&row.post_images)
            .bind(&row.post_images)
            .bind(&post.post_id)
            .bind(json_list(&enrichment.cities)?)
            .bind(json_list(&enrichment.addresses)?)
            .bind(enrichment.is_event)
            .execute(&mut *target)
            .await?;

            stats.migrated += 1;
            if !enrichment.cities.is_empty() {
                stats.with_cities += 1;
            }
            if !enrichment.addresses.is_empty() {
                stats.with_addresses += 1;
            }
            if enrichment.is_event {
                stats.events += 1;
            }

            if stats.migrated <= self.limit_examples {
                let mut line = format!("  + Added post {} for {}", post.post_id, post.org_url);
                if !enrichment.cities.is_empty() {
                    line.push_str(&format!(" (cities: {})", enrichment.cities.join(", ")));
                }
                if !enrichment.addresses.is_empty() {
                    line.push_str(&format!(
                        " (addresses: {})",
                        enrichment.addresses.join("; ")
                    ));
                }
                if enrichment.is_event {
                    line.push_str(" [event]");
                }
                log.detail(line);
            }
        }

        log.log(format!(
            "Posts from {source_name}: added {}, skipped {}, without organization {}",
            stats.migrated, stats.skipped, stats.orphaned
        ));
        log.log(format!("  - with cities: {}", stats.with_cities));
        log.log(format!("  - with addresses: {}", stats.with_addresses));
        log.log(format!("  - event invitations: {}", stats.events));
        Ok(stats)
    }
}

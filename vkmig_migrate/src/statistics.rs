//! Summary of what the target database holds after a run.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

use crate::log::MigrationLog;

/// Examples shown in the statistics block.
const LATEST_EXAMPLES: i64 = 3;
const PREVIEW_CHARS: usize = 50;

/// First `max_chars` characters followed by `...`, or `empty` when absent.
#[must_use]
pub fn preview(text: Option<&str>, max_chars: usize, empty: &str) -> String {
    match text {
        Some(text) if text.chars().count() > max_chars => {
            format!("{}...", text.chars().take(max_chars).collect::<String>())
        }
        Some(text) if !text.is_empty() => text.to_string(),
        _ => empty.to_string(),
    }
}

/// Parse a JSON list column; malformed or empty values give an empty list.
#[must_use]
pub fn parse_list(value: Option<&str>) -> Vec<String> {
    value
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default()
}

/// City frequencies over JSON list columns, count descending then name.
#[must_use]
pub fn top_cities<'a, I>(columns: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for column in columns {
        for city in parse_list(column) {
            *counts.entry(city).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgExample {
    pub id: i64,
    pub url: String,
    pub description: String,
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostExample {
    pub id: i64,
    pub post_id: Option<String>,
    pub org_url: Option<String>,
    pub content: String,
    pub cities: Vec<String>,
    pub addresses: Vec<String>,
    pub maybe_event: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStatistics {
    pub total_orgs: i64,
    pub total_posts: i64,
    pub orgs_with_cities: i64,
    pub posts_with_cities: i64,
    pub posts_with_addresses: i64,
    pub event_posts: i64,
    pub latest_orgs: Vec<OrgExample>,
    pub latest_posts: Vec<PostExample>,
    pub top_org_cities: Vec<(String, usize)>,
    pub top_post_cities: Vec<(String, usize)>,
}

async fn count(pool: &SqlitePool, sql: &str) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as(sql).fetch_one(pool).await?;
    Ok(count)
}

type OrgRow = (i64, String, Option<String>, Option<String>);
type PostRow = (
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<bool>,
);

/// Organizations ordered by id, newest first when `newest_first`.
pub async fn org_examples(
    pool: &SqlitePool,
    limit: i64,
    newest_first: bool,
) -> anyhow::Result<Vec<OrgExample>> {
    let order = if newest_first { "DESC" } else { "ASC" };
    let rows: Vec<OrgRow> = sqlx::query_as(&format!(
        "SELECT id, url, descr_raw, cities FROM orgs ORDER BY id {order} LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, url, descr, cities)| OrgExample {
            id,
            url,
            description: preview(descr.as_deref(), PREVIEW_CHARS, "<no description>"),
            cities: parse_list(cities.as_deref()),
        })
        .collect())
}

/// Posts with their organization URL, ordered by id.
pub async fn post_examples(
    pool: &SqlitePool,
    limit: i64,
    newest_first: bool,
) -> anyhow::Result<Vec<PostExample>> {
    let order = if newest_first { "DESC" } else { "ASC" };
    let rows: Vec<PostRow> = sqlx::query_as(&format!(
        r"SELECT p.id, p.post_id, p.post_content, p.cities, p.address, o.url, p.maybe_event
          FROM posts p
          LEFT JOIN orgs o ON p.org_id = o.id
          ORDER BY p.id {order} LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, post_id, content, cities, addresses, org_url, maybe_event)| PostExample {
                id,
                post_id,
                org_url,
                content: preview(content.as_deref(), PREVIEW_CHARS, "<no content>"),
                cities: parse_list(cities.as_deref()),
                addresses: parse_list(addresses.as_deref()),
                maybe_event: maybe_event.unwrap_or_default(),
            },
        )
        .collect())
}

/// Counts, the latest records and the most frequent cities.
pub async fn collect_statistics(
    pool: &SqlitePool,
    limit_top_cities: usize,
) -> anyhow::Result<DatabaseStatistics> {
    let org_cities: Vec<(Option<String>,)> =
        sqlx::query_as("SELECT cities FROM orgs WHERE cities IS NOT NULL AND cities != '[]'")
            .fetch_all(pool)
            .await?;
    let post_cities: Vec<(Option<String>,)> =
        sqlx::query_as("SELECT cities FROM posts WHERE cities IS NOT NULL AND cities != '[]'")
            .fetch_all(pool)
            .await?;

    Ok(DatabaseStatistics {
        total_orgs: count(pool, "SELECT COUNT(*) FROM orgs").await?,
        total_posts: count(pool, "SELECT COUNT(*) FROM posts").await?,
        orgs_with_cities: i64::try_from(org_cities.len())?,
        posts_with_cities: i64::try_from(post_cities.len())?,
        posts_with_addresses: count(
            pool,
            "SELECT COUNT(*) FROM posts WHERE address IS NOT NULL AND address != '[]'",
        )
        .await?,
        event_posts: count(pool, "SELECT COUNT(*) FROM posts WHERE maybe_event = 1").await?,
        latest_orgs: org_examples(pool, LATEST_EXAMPLES, true).await?,
        latest_posts: post_examples(pool, LATEST_EXAMPLES, true).await?,
        top_org_cities: top_cities(
            org_cities.iter().map(|(c,)| c.as_deref()),
            limit_top_cities,
        ),
        top_post_cities: top_cities(
            post_cities.iter().map(|(c,)| c.as_deref()),
            limit_top_cities,
        ),
    })
}

impl DatabaseStatistics {
    /// Write the statistics block into the migration log.
    pub fn log_to(&self, log: &mut MigrationLog, limit_top_cities: usize) {
        log.log("=== FINAL STATISTICS ===");
        log.log(format!("Organizations in database: {}", self.total_orgs));
        log.log(format!("  - with cities: {}", self.orgs_with_cities));
        log.log(format!("Posts in database: {}", self.total_posts));
        log.log(format!("  - with cities: {}", self.posts_with_cities));
        log.log(format!("  - with addresses: {}", self.posts_with_addresses));
        log.log(format!("  - event invitations: {}", self.event_posts));

        if !self.latest_orgs.is_empty() {
            log.log("Latest organizations:");
            for org in &self.latest_orgs {
                log.detail(format!("  {}", format_org(org)));
                log.detail(format!("    Description: {}", org.description));
            }
        }

        if !self.latest_posts.is_empty() {
            log.log("Latest posts:");
            for post in &self.latest_posts {
                for line in format_post(post) {
                    log.detail(format!("  {line}"));
                }
            }
        }

        for (title, ranked) in [
            ("organizations", &self.top_org_cities),
            ("posts", &self.top_post_cities),
        ] {
            if ranked.is_empty() {
                continue;
            }
            log.log(format!("Top-{limit_top_cities} cities in {title}:"));
            for (city, count) in ranked {
                log.detail(format!("  {city}: {count} mentions"));
            }
        }
    }
}

/// `ID: 1, URL: https://vk.com/club [Cities: Москва]`
#[must_use]
pub fn format_org(org: &OrgExample) -> String {
    let mut line = format!("ID: {}, URL: {}", org.id, org.url);
    if !org.cities.is_empty() {
        line.push_str(" [Cities: ");
        line.push_str(&org.cities.join(", "));
        line.push(']');
    }
    line
}

/// Header, content preview and optional city/address lines for one post.
#[must_use]
pub fn format_post(post: &PostExample) -> Vec<String> {
    let mut lines = vec![
        format!(
            "ID: {}, Post ID: {}, Organization: {}",
            post.id,
            post.post_id.as_deref().unwrap_or("-"),
            post.org_url.as_deref().unwrap_or("-")
        ),
        format!("  Content: {}", post.content),
    ];
    if !post.cities.is_empty() {
        lines.push(format!("  [Cities: {}]", post.cities.join(", ")));
    }
    if !post.addresses.is_empty() {
        lines.push(format!("  [Addresses: {}]", post.addresses.join("; ")));
    }
    if post.maybe_event {
        lines.push("  [Event invitation]".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview(None, 5, "<none>"), "<none>");
        assert_eq!(preview(Some(""), 5, "<none>"), "<none>");
        assert_eq!(preview(Some("Казань"), 10, "<none>"), "Казань");
        assert_eq!(preview(Some("Казань"), 3, "<none>"), "Каз...");
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(Some(r#"["Тула"]"#)), vec!["Тула".to_string()]);
        assert!(parse_list(Some("[]")).is_empty());
        assert!(parse_list(Some("not json")).is_empty());
        assert!(parse_list(None).is_empty());
    }

    #[test]
    fn test_top_cities_ranking() {
        let columns = [
            Some(r#"["Тула", "Москва"]"#),
            Some(r#"["Москва"]"#),
            Some(r#"["Казань"]"#),
            Some("broken"),
            None,
        ];
        let ranked = top_cities(columns, 2);
        assert_eq!(
            ranked,
            vec![("Москва".to_string(), 2), ("Казань".to_string(), 1)]
        );
    }

    #[test]
    fn test_format_post() {
        let post = PostExample {
            id: 7,
            post_id: Some("42".to_string()),
            org_url: None,
            content: "Концерт".to_string(),
            cities: vec!["Казань".to_string()],
            addresses: Vec::new(),
            maybe_event: true,
        };
        assert_eq!(
            format_post(&post),
            vec![
                "ID: 7, Post ID: 42, Organization: -".to_string(),
                "  Content: Концерт".to_string(),
                "  [Cities: Казань]".to_string(),
                "  [Event invitation]".to_string(),
            ]
        );
    }
}

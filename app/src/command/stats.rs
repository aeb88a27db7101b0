use vkmig_migrate::database::connect_existing;
use vkmig_migrate::statistics::{format_org, format_post};
use vkmig_migrate::{DatabaseStatistics, collect_statistics};

use super::ConfigOverrides;

/// Strategy for printing statistics of the target database.
#[derive(Debug, Clone, Copy)]
pub struct StatsStrategy;

impl super::CommandStrategy for StatsStrategy {
    type Input = ConfigOverrides;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = input.load_config()?;
        let path = &config.migration.target_db_path;

        let pool = connect_existing(path).await?;
        let statistics = collect_statistics(&pool, config.logging.limit_top_cities).await?;
        pool.close().await;

        println!("=== Database statistics: {} ===\n", path.display());
        print_statistics(&statistics, config.logging.limit_top_cities);
        Ok(())
    }
}

fn print_statistics(statistics: &DatabaseStatistics, limit_top_cities: usize) {
    println!("Organizations: {}", statistics.total_orgs);
    println!("  With cities: {}", statistics.orgs_with_cities);
    println!("Posts: {}", statistics.total_posts);
    println!("  With cities: {}", statistics.posts_with_cities);
    println!("  With addresses: {}", statistics.posts_with_addresses);
    println!("  Event invitations: {}", statistics.event_posts);
    println!();

    if !statistics.latest_orgs.is_empty() {
        println!("Latest organizations:");
        for org in &statistics.latest_orgs {
            println!("  {}", format_org(org));
            println!("    Description: {}", org.description);
        }
        println!();
    }

    if !statistics.latest_posts.is_empty() {
        println!("Latest posts:");
        for post in &statistics.latest_posts {
            for line in format_post(post) {
                println!("  {line}");
            }
        }
        println!();
    }

    for (title, ranked) in [
        ("organizations", &statistics.top_org_cities),
        ("posts", &statistics.top_post_cities),
    ] {
        if ranked.is_empty() {
            continue;
        }
        println!("Top-{limit_top_cities} cities in {title}:");
        for (position, (city, count)) in ranked.iter().enumerate() {
            println!("  {}. {city}: {count}", position + 1);
        }
        println!();
    }
}

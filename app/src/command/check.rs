use vkmig_migrate::database::connect_existing;
use vkmig_migrate::statistics::{format_org, format_post, org_examples, post_examples};

use super::ConfigOverrides;

#[derive(Debug, Clone)]
pub struct CheckInput {
    pub overrides: ConfigOverrides,
    /// Records printed per table
    pub limit: i64,
}

/// Strategy for eyeballing migration results: the first organizations and
/// posts with their extracted cities and addresses.
#[derive(Debug, Clone, Copy)]
pub struct CheckStrategy;

impl super::CommandStrategy for CheckStrategy {
    type Input = CheckInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = input.overrides.load_config()?;
        let pool = connect_existing(&config.migration.target_db_path).await?;

        let orgs = org_examples(&pool, input.limit, false).await?;
        let posts = post_examples(&pool, input.limit, false).await?;
        pool.close().await;

        println!("=== Organizations ===");
        if orgs.is_empty() {
            println!("  (none)");
        }
        for org in &orgs {
            println!("  {}", format_org(org));
            println!("    Description: {}", org.description);
        }
        println!();

        println!("=== Posts ===");
        if posts.is_empty() {
            println!("  (none)");
        }
        for post in &posts {
            for line in format_post(post) {
                println!("  {line}");
            }
        }
        Ok(())
    }
}

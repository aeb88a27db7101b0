#![deny(
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
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use command::{
    AnalyzeInput, AnalyzeStrategy, CheckInput, CheckStrategy, CommandStrategy, ConfigOverrides,
    InfoStrategy, InitStrategy, MigrateStrategy, StatsStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "vkmig")]
#[command(about = "Migrate VK dumps into one database with city, address and event enrichment", long_about = None)]
struct Cli {
    /// Log per-record details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every dump into the target database
    Migrate {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Show statistics of the target database
    Stats {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Print sample organizations and posts from the target database
    Check {
        #[command(flatten)]
        overrides: ConfigOverrides,

        /// Number of records per table
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: i64,
    },
    /// Extract cities and addresses from a text and classify it
    Analyze {
        /// Text to analyze
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Initialize configuration
    Init,
    /// Show the effective configuration
    Info {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Migrate { overrides } => MigrateStrategy.execute(overrides).await,
        Commands::Stats { overrides } => StatsStrategy.execute(overrides).await,
        Commands::Check { overrides, limit } => {
            CheckStrategy
                .execute(CheckInput { overrides, limit })
                .await
        }
        Commands::Analyze {
            text,
            json,
            overrides,
        } => {
            AnalyzeStrategy
                .execute(AnalyzeInput {
                    text,
                    json,
                    overrides,
                })
                .await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info { overrides } => InfoStrategy.execute(overrides).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}

mod current;
mod history;
mod realtime;
mod runner;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use superinv_scraper::SourceClient;
use superinv_store::SnapshotStore;
use tracing_subscriber::EnvFilter;

use crate::runner::{run_batch, select_investors};

#[derive(Debug, Parser)]
#[command(name = "superinv")]
#[command(about = "Reconstruct superinvestor holdings per quarter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild quarterly snapshots from the history and activity pages
    History {
        /// Investor slug, or `all` for every configured investor
        investor: String,

        /// Fetch and reconstruct but do not write any snapshot
        #[arg(long)]
        dry_run: bool,
    },
    /// Record the latest reported holdings as a snapshot
    Current {
        /// Investor slug, or `all` for every configured investor
        investor: String,

        /// Fetch and extract but do not write any snapshot
        #[arg(long)]
        dry_run: bool,
    },
    /// Refresh the cross-investor real-time activity feed
    Realtime {
        /// Fetch and normalize but do not write the feed file
        #[arg(long)]
        dry_run: bool,
    },
    /// List configured investors
    Investors,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = superinv_core::load_app_config().context("invalid configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = superinv_core::load_investors(&config.investors_path).with_context(|| {
        format!(
            "failed to load investor registry from {}",
            config.investors_path.display()
        )
    })?;

    let cooldown = Duration::from_millis(config.investor_cooldown_ms);
    let store = SnapshotStore::new(&config.output_dir);

    match cli.command {
        Commands::History { investor, dry_run } => {
            let investors = select_investors(&registry, &investor)?;
            let client = build_client(&config)?;
            let params = config.reconstruction_params();
            let summary = run_batch(&investors, cooldown, |inv| {
                history::collect_history(&client, &store, &params, inv, dry_run)
            })
            .await;
            summary.finish("history")
        }
        Commands::Current { investor, dry_run } => {
            let investors = select_investors(&registry, &investor)?;
            let client = build_client(&config)?;
            let today = chrono::Local::now().date_naive();
            let summary = run_batch(&investors, cooldown, |inv| {
                current::collect_current(&client, &store, inv, today, dry_run)
            })
            .await;
            summary.finish("current holdings")
        }
        Commands::Realtime { dry_run } => {
            let client = build_client(&config)?;
            let written = realtime::collect_realtime(
                &client,
                &config.output_dir,
                chrono::Local::now().date_naive(),
                chrono::Utc::now(),
                dry_run,
            )
            .await?;
            println!("real-time feed: {written} activities");
            Ok(())
        }
        Commands::Investors => {
            for investor in &registry.investors {
                println!(
                    "{:<12} {:<10} {}",
                    investor.slug, investor.source_code, investor.name
                );
            }
            Ok(())
        }
    }
}

fn build_client(config: &superinv_core::AppConfig) -> anyhow::Result<SourceClient> {
    SourceClient::new(
        &config.source_base_url,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )
    .context("failed to build source client")
}

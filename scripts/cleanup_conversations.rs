//! Deletes conversations without a `userId`, and their messages.
//!
//! Run with: cargo run --bin cleanup_conversations -- [--dry-run] [--yes]

use anyhow::Context;
use clap::Parser;
use sr_robot_maintenance::config::database::{self, DatabaseConfig};
use sr_robot_maintenance::services::cleanup::{
    Cleanup, CleanupOptions, DEFAULT_BATCH_SIZE, DEFAULT_SAMPLE_LIMIT,
};
use sr_robot_maintenance::services::store::MongoStore;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Delete conversations that have no userId, together with their messages")]
struct Args {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Number of sample conversations to print
    #[arg(long, value_name = "N", default_value_t = DEFAULT_SAMPLE_LIMIT)]
    samples: usize,

    /// Conversation ids per message delete request
    #[arg(
        long,
        value_name = "N",
        env = "CLEANUP_BATCH_SIZE",
        default_value_t = DEFAULT_BATCH_SIZE as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    batch_size: u64,

    /// Print the outcome as JSON on stdout; progress goes to stderr
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = DatabaseConfig::from_env()?;
    let db = database::connect(&config)
        .await
        .with_context(|| format!("connecting to database {}", config.name))?;

    let store = MongoStore::new(&db);
    let options = CleanupOptions {
        sample_limit: args.samples,
        batch_size: usize::try_from(args.batch_size).unwrap_or(usize::MAX),
        dry_run: args.dry_run,
        assume_yes: args.yes,
    };
    let cleanup = Cleanup::new(&store, options);
    let mut input = io::stdin().lock();

    if args.json {
        let outcome = cleanup.run(&mut io::stderr(), &mut input).await?;
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &outcome)?;
        writeln!(stdout)?;
    } else {
        cleanup.run(&mut io::stdout().lock(), &mut input).await?;
    }

    Ok(())
}

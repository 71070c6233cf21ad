use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

use args::{Cli, Command};

#[tokio::main]
async fn main() {
    // Load .env file if present, before clap reads CENSUSKIT_CONFIG
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; -v raises the default level, RUST_LOG still wins
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let result = run(&cli).await;

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;
    let config = config.as_ref();

    match &cli.command {
        Command::Query(args) => commands::query::run(args, config).await,
        Command::Condition(args) => commands::condition::run(args, config).await,
        Command::Marginal(args) => commands::marginal::run(args).await,
        Command::Match(args) => commands::matching::run(args, config).await,
        Command::Crosswalk(args) => commands::crosswalk::run(args, config).await,
        Command::Inspect(args) => commands::inspect::run(args, config).await,
    }
}

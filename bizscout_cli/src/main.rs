mod commands;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use bizscout_lib::{DataCollector, MemoryCache, ProviderClient, Settings};
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "bizscout")]
#[command(about = "Find, score, and route visits to local businesses")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// SQLite database path (defaults to DATABASE_PATH or bizscout.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect and merge provider data for one or more companies
    Collect(commands::collect::CollectArgs),
    /// Search Apollo for companies in an industry
    Find(commands::find::FindArgs),
    /// Rank companies similar to a stored company
    Similar(commands::similar::SimilarArgs),
    /// Filter stored companies
    Search(commands::search::SearchArgs),
    /// Classify industry text or look up NAICS/SIC codes
    Classify(commands::classify::ClassifyArgs),
    /// Assess tax saving potential of stored companies
    Tax(commands::tax::TaxArgs),
    /// Group stored companies into geographic clusters
    Clusters(commands::clusters::ClustersArgs),
    /// Plan the weekly outreach schedule
    Schedule(commands::schedule::ScheduleArgs),
    /// Plan one day's route
    Route(commands::route::RouteArgs),
    /// Score weekdays for outreach
    OutreachDays(commands::outreach_days::OutreachDaysArgs),
    /// Import companies from a JSON file
    Import(commands::import::ImportArgs),
    /// Export stored companies to CSV
    Export(commands::export::ExportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let directive = if cli.verbose > 0 {
        "bizscout_lib=debug"
    } else {
        "bizscout_lib=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse().unwrap()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format: OutputFormat = cli.output.parse()?;
    let settings = Settings::from_env();
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.database_path));

    let cache = MemoryCache::new(Duration::from_secs(300));
    let client = ProviderClient::from_settings(&settings, cache);
    let collector = DataCollector::new(client, settings)?;

    let ctx = commands::Context {
        collector,
        db_path,
    };

    match &cli.command {
        Commands::Collect(args) => commands::collect::run(args, &ctx, &format).await?,
        Commands::Find(args) => commands::find::run(args, &ctx, &format).await?,
        Commands::Similar(args) => commands::similar::run(args, &ctx, &format).await?,
        Commands::Search(args) => commands::search::run(args, &ctx, &format)?,
        Commands::Classify(args) => commands::classify::run(args, &format)?,
        Commands::Tax(args) => commands::tax::run(args, &ctx, &format)?,
        Commands::Clusters(args) => commands::clusters::run(args, &ctx, &format)?,
        Commands::Schedule(args) => commands::schedule::run(args, &ctx, &format)?,
        Commands::Route(args) => commands::route::run(args, &ctx, &format)?,
        Commands::OutreachDays(args) => commands::outreach_days::run(args, &ctx, &format)?,
        Commands::Import(args) => commands::import::run(args, &ctx)?,
        Commands::Export(args) => commands::export::run(args, &ctx)?,
    }

    Ok(())
}

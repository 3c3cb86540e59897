//! The `find` subcommand: Apollo search by industry.

use anyhow::Result;
use bizscout_lib::{validation, IndustryClassifier};
use clap::Args;

use super::Context;
use crate::output::{print_companies, OutputFormat};

#[derive(Args)]
pub struct FindArgs {
    /// Target industry (defaults to DEFAULT_INDUSTRY)
    #[arg(long)]
    pub industry: Option<String>,

    /// City or region to search (defaults to DEFAULT_LOCATION)
    #[arg(long)]
    pub location: Option<String>,

    /// Maximum companies to return
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Store the results in the database
    #[arg(long)]
    pub save: bool,
}

pub async fn run(args: &FindArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let classifier = IndustryClassifier::embedded()?;
    let industry = args
        .industry
        .clone()
        .unwrap_or_else(|| ctx.collector.settings().default_industry.clone());
    // Free text is allowed for Apollo, but known categories are searched by
    // their display name.
    let industry = match validation::validate_industry(classifier, &industry) {
        Ok(id) => classifier
            .category(&id)
            .map(|c| c.name.clone())
            .unwrap_or(id),
        Err(_) => validation::validate_search(&industry)?,
    };
    let location = args
        .location
        .as_deref()
        .map(validation::validate_location)
        .transpose()?;
    let limit = validation::validate_limit(args.limit)?;

    eprintln!("Searching Apollo for {} companies...", industry);
    let companies = ctx
        .collector
        .find_companies_by_industry(&industry, location.as_deref(), limit)
        .await?;
    eprintln!("Found {} companies", companies.len());

    if args.save && !companies.is_empty() {
        let mut db = ctx.open_db()?;
        let saved = db.save_all(&companies)?;
        eprintln!("Saved {} companies to {}", saved, ctx.db_path.display());
    }

    print_companies(&companies, format)
}

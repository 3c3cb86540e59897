//! The `similar` subcommand: rank companies against a stored reference.

use anyhow::{anyhow, Result};
use bizscout_lib::{rank_by_similarity, validation, Company, Db, SearchCriteria};
use clap::Args;

use super::Context;
use crate::output::{print_scored, OutputFormat};

#[derive(Args)]
pub struct SimilarArgs {
    /// Stored company id or name
    pub company: String,

    /// Rank other stored companies instead of searching Apollo
    #[arg(long)]
    pub local: bool,

    /// Location for the Apollo search (defaults to the company's city)
    #[arg(long)]
    pub location: Option<String>,

    /// Maximum matches to return
    #[arg(long, default_value = "10")]
    pub limit: usize,
}

pub async fn run(args: &SimilarArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let target = validation::validate_search(&args.company)?;
    let limit = validation::validate_limit(args.limit)?;
    let location = args
        .location
        .as_deref()
        .map(validation::validate_location)
        .transpose()?;

    let db = ctx.open_db()?;
    let reference = find_reference(&db, &target)?;
    eprintln!("Finding companies similar to {}...", reference.name);

    let scored = if args.local {
        let candidates = db.all(None)?;
        rank_by_similarity(&reference, &candidates, limit)
    } else {
        ctx.collector
            .find_similar_companies(&reference, location.as_deref(), limit)
            .await?
    };

    print_scored(&scored, format)
}

/// Exact id first, then the first name containing the input.
fn find_reference(db: &Db, target: &str) -> Result<Company> {
    if let Some(company) = db.get(target)? {
        return Ok(company);
    }
    db.search(&SearchCriteria::default().with_name(target), Some(1))?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no stored company matches '{}'", target))
}

//! The `search` subcommand: discovery filters over stored companies.

use anyhow::{bail, Result};
use bizscout_lib::{validation, IndustryClassifier, SearchCriteria};
use clap::Args;

use super::Context;
use crate::output::{print_companies, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// Name substring
    #[arg(long)]
    pub name: Option<String>,

    /// Industry id or name: construction, manufacturing, trucking
    #[arg(long)]
    pub industry: Option<String>,

    /// Segment within --industry (e.g. "Freight Carriers")
    #[arg(long)]
    pub segment: Option<String>,

    /// City, state, or ZIP substring
    #[arg(long)]
    pub location: Option<String>,

    /// Minimum employee count
    #[arg(long)]
    pub min_employees: Option<u64>,

    /// Minimum estimated revenue in dollars
    #[arg(long)]
    pub min_revenue: Option<f64>,

    /// Only owner-operated companies
    #[arg(long)]
    pub owner_operated: bool,

    /// Only companies in growth mode
    #[arg(long)]
    pub growth: bool,

    /// Tax saving potential: low, medium, high
    #[arg(long)]
    pub tax: Option<String>,

    /// Maximum results
    #[arg(long, default_value = "50")]
    pub limit: usize,
}

/// Validates the flags into discovery criteria.
pub fn build_criteria(args: &SearchArgs) -> Result<SearchCriteria> {
    let classifier = IndustryClassifier::embedded()?;
    let mut criteria = SearchCriteria::default();

    if let Some(ref name) = args.name {
        criteria = criteria.with_name(&validation::validate_search(name)?);
    }
    let industry = match args.industry {
        Some(ref industry) => Some(validation::validate_industry(classifier, industry)?),
        None => None,
    };
    if let Some(ref industry) = industry {
        criteria = criteria.with_industry(industry);
    }
    if let Some(ref segment) = args.segment {
        let Some(ref industry) = industry else {
            bail!("--segment requires --industry");
        };
        criteria = criteria.with_segment(&validation::validate_segment(
            classifier, industry, segment,
        )?);
    }
    if let Some(ref location) = args.location {
        criteria = criteria.with_location(&validation::validate_location(location)?);
    }
    if let Some(min) = args.min_employees {
        criteria = criteria.with_min_employees(min);
    }
    if let Some(min) = args.min_revenue {
        criteria = criteria.with_min_revenue(validation::validate_min_revenue(min)?);
    }
    if args.owner_operated {
        criteria = criteria.with_owner_operated(true);
    }
    if args.growth {
        criteria = criteria.with_growth_mode(true);
    }
    if let Some(ref tax) = args.tax {
        criteria = criteria.with_tax_potential(validation::validate_tax_potential(tax)?);
    }
    Ok(criteria)
}

pub fn run(args: &SearchArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let criteria = build_criteria(args)?;
    let limit = validation::validate_limit(args.limit)?;

    let db = ctx.open_db()?;
    let companies = db.search(&criteria, Some(limit))?;
    eprintln!("{} matching companies", companies.len());

    print_companies(&companies, format)
}

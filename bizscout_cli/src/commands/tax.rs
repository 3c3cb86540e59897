//! The `tax` subcommand: score stored companies for tax saving potential.

use anyhow::Result;
use bizscout_lib::tax_potential::with_tax_potential;
use bizscout_lib::{assess_tax_potential, rank_by_tax_potential, validation, Company};
use clap::Args;

use super::Context;
use crate::output::{print_tax, OutputFormat};

#[derive(Args)]
pub struct TaxArgs {
    /// Maximum companies to show
    #[arg(long, default_value = "50")]
    pub limit: usize,

    /// Write the refreshed potential back to the database
    #[arg(long)]
    pub save: bool,
}

pub fn run(args: &TaxArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let limit = validation::validate_limit(args.limit)?;
    let mut db = ctx.open_db()?;
    let companies = db.all(None)?;
    eprintln!("Assessing {} companies", companies.len());

    if args.save {
        let refreshed: Vec<Company> = companies.iter().cloned().map(with_tax_potential).collect();
        let saved = db.save_all(&refreshed)?;
        eprintln!("Updated {} companies", saved);
    }

    let assessed: Vec<_> = rank_by_tax_potential(&companies)
        .into_iter()
        .take(limit)
        .map(|(company, _)| {
            let assessment = assess_tax_potential(&company);
            (company, assessment)
        })
        .collect();

    print_tax(&assessed, format)
}

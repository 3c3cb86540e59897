//! The `export` subcommand: write stored companies to a CSV report.

use std::path::PathBuf;

use anyhow::Result;
use bizscout_lib::{export_csv, validation, SearchCriteria};
use clap::Args;

use super::Context;

#[derive(Args)]
pub struct ExportArgs {
    /// Destination CSV file (defaults to bizscout_export_YYYYMMDD.csv)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Only export companies with this tax saving potential: low, medium, high
    #[arg(long)]
    pub tax: Option<String>,

    /// Only export companies assigned to this outreach day
    #[arg(long)]
    pub day: Option<String>,
}

pub fn run(args: &ExportArgs, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;
    let companies = match (&args.day, &args.tax) {
        (Some(day), tax) => {
            let day = validation::validate_day(day)?;
            let mut companies = db.by_region(day.as_str())?;
            if let Some(tax) = tax {
                let potential = validation::validate_tax_potential(tax)?;
                companies.retain(|c| c.tax_indicators.tax_saving_potential == potential);
            }
            companies
        }
        (None, Some(tax)) => {
            let potential = validation::validate_tax_potential(tax)?;
            db.search(&SearchCriteria::default().with_tax_potential(potential), None)?
        }
        (None, None) => db.all(None)?,
    };

    let file = args.file.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "bizscout_export_{}.csv",
            chrono::Local::now().format("%Y%m%d")
        ))
    });
    let rows = export_csv(&companies, &file)?;
    eprintln!("Exported {} companies to {}", rows, file.display());
    Ok(())
}

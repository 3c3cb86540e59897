//! The `collect` subcommand: gather provider data for named companies.

use anyhow::{bail, Result};
use bizscout_lib::{validation, Company};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use super::Context;
use crate::output::{print_companies, OutputFormat};

#[derive(Args)]
pub struct CollectArgs {
    /// Company names to look up
    #[arg(required = true)]
    pub names: Vec<String>,

    /// City or region to narrow the Apollo search (e.g. "Racine, WI")
    #[arg(long)]
    pub location: Option<String>,

    /// Do not store the collected records
    #[arg(long)]
    pub no_save: bool,
}

pub async fn run(args: &CollectArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let names = args
        .names
        .iter()
        .map(|n| validation::validate_search(n))
        .collect::<Result<Vec<_>, _>>()?;
    let location = args
        .location
        .as_deref()
        .map(validation::validate_location)
        .transpose()?;

    let pb = ProgressBar::new(names.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} ({eta}) {msg}",
        )
        .unwrap(),
    );

    let mut companies: Vec<Company> = Vec::with_capacity(names.len());
    let mut failed = 0usize;
    for name in &names {
        pb.set_message(name.clone());
        match ctx
            .collector
            .collect_company(name, location.as_deref())
            .await
        {
            Ok(report) => {
                for failure in &report.failures {
                    pb.println(format!(
                        "  {}: {} unavailable ({})",
                        name, failure.provider, failure.message
                    ));
                }
                if report.sources.is_empty() {
                    pb.println(format!("  {}: no provider returned data", name));
                }
                companies.push(report.company);
            }
            Err(e) => {
                failed += 1;
                pb.println(format!("  {}: {}", name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} collected, {} failed", companies.len(), failed));

    if companies.is_empty() {
        bail!("no companies collected");
    }

    if !args.no_save {
        let mut db = ctx.open_db()?;
        let saved = db.save_all(&companies)?;
        eprintln!("Saved {} companies to {}", saved, ctx.db_path.display());
    }

    print_companies(&companies, format)
}

//! The `import` subcommand: load company records from a JSON file.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bizscout_lib::tax_potential::with_tax_potential;
use bizscout_lib::{Company, IndustryClassifier};
use clap::Args;

use super::Context;

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file holding an array of company records
    pub file: PathBuf,
}

pub fn run(args: &ImportArgs, ctx: &Context) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let companies: Vec<Company> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let classifier = IndustryClassifier::embedded()?;
    let companies: Vec<Company> = companies
        .into_iter()
        .map(|c| with_tax_potential(classifier.annotate(c)))
        .collect();

    let mut db = ctx.open_db()?;
    let saved = db.save_all(&companies)?;
    eprintln!(
        "Imported {} companies into {} ({} total)",
        saved,
        ctx.db_path.display(),
        db.count()?
    );
    Ok(())
}

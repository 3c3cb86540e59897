//! The `classify` subcommand: taxonomy and code table lookups.

use anyhow::{bail, Result};
use bizscout_lib::industry::CodeMatch;
use bizscout_lib::{validation, IndustryClassifier};
use clap::Args;

use crate::output::{print_classifications, print_codes, print_json, OutputFormat};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Industry descriptions to classify (e.g. "steel fabrication")
    pub text: Vec<String>,

    /// NAICS code to look up
    #[arg(long)]
    pub naics: Option<String>,

    /// SIC code to look up
    #[arg(long)]
    pub sic: Option<String>,

    /// Search NAICS and SIC names for this text
    #[arg(long)]
    pub codes: Option<String>,
}

pub fn run(args: &ClassifyArgs, format: &OutputFormat) -> Result<()> {
    let classifier = IndustryClassifier::embedded()?;

    if let Some(ref name) = args.codes {
        let name = validation::validate_search(name)?;
        let codes: Vec<CodeMatch> = classifier.get_industry_by_name(&name);
        eprintln!("{} codes match '{}'", codes.len(), name);
        return print_codes(&codes, format);
    }

    if args.naics.is_some() || args.sic.is_some() {
        let names = classifier.match_by_industry_code(args.naics.as_deref(), args.sic.as_deref());
        if names.is_empty() {
            eprintln!("No industries found for the given codes");
        }
        match format {
            OutputFormat::Json => print_json(&names),
            _ => {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        return Ok(());
    }

    if args.text.is_empty() {
        bail!("nothing to classify: pass text, --naics, --sic, or --codes");
    }
    let classified = args
        .text
        .iter()
        .map(|t| validation::validate_search(t).map(|t| classifier.normalize_industry(&t)))
        .collect::<Result<Vec<_>, _>>()?;
    print_classifications(&classified, format)
}

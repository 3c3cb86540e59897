use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bizscout_lib::{suggest_best_outreach_days, OutreachDay};
use clap::Args;

use super::Context;
use crate::output::{print_day_scores, OutputFormat};

#[derive(Args)]
pub struct OutreachDaysArgs {
    /// JSON file of past effectiveness per day, e.g. {"Monday": 0.4}
    #[arg(long)]
    pub history: Option<PathBuf>,
}

pub fn run(args: &OutreachDaysArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let history: Option<BTreeMap<OutreachDay, f64>> = match args.history {
        Some(ref path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Some(serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?)
        }
        None => None,
    };

    let db = ctx.open_db()?;
    let companies = db.all(None)?;
    let scores = suggest_best_outreach_days(&companies, history.as_ref());
    print_day_scores(&scores, format)
}

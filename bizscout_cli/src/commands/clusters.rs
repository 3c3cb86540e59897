use anyhow::Result;
use bizscout_lib::{cluster_companies_by_region, validation, SearchCriteria};
use clap::Args;

use super::Context;
use crate::output::{print_clusters, OutputFormat};

#[derive(Args)]
pub struct ClustersArgs {
    /// Only cluster companies in this city, state, or ZIP
    #[arg(long)]
    pub location: Option<String>,
}

pub fn run(args: &ClustersArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let db = ctx.open_db()?;
    let companies = match args.location {
        Some(ref location) => {
            let location = validation::validate_location(location)?;
            db.search(&SearchCriteria::default().with_location(&location), None)?
        }
        None => db.all(None)?,
    };

    let clusters = cluster_companies_by_region(&companies);
    let located: usize = clusters.values().map(Vec::len).sum();
    eprintln!(
        "{} of {} companies have coordinates, {} groups",
        located,
        companies.len(),
        clusters.len()
    );
    print_clusters(&clusters, format)
}

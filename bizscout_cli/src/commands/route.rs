//! The `route` subcommand: plan a single outreach day.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use bizscout_lib::{
    assign_companies_to_days, create_route_map, optimize_route_for_day, validation,
    HaversineDistance, RouteStrategy, Schedule,
};
use clap::Args;

use super::Context;
use crate::output::{print_routes, OutputFormat};

#[derive(Args)]
pub struct RouteArgs {
    /// Outreach day: monday through friday
    #[arg(long)]
    pub day: String,

    /// Route strategy: greedy or two-opt
    #[arg(long, default_value = "greedy")]
    pub strategy: String,

    /// Write the route as GeoJSON to this file
    #[arg(long)]
    pub map: Option<PathBuf>,
}

pub fn run(args: &RouteArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let day = validation::validate_day(&args.day)?;
    let strategy: RouteStrategy = args.strategy.parse().map_err(|e: String| anyhow!(e))?;
    let schedule = Schedule::from_settings(ctx.collector.settings());

    let db = ctx.open_db()?;
    let companies = db.all(None)?;
    let mut by_day = assign_companies_to_days(&companies, &schedule);
    let day_companies = by_day.remove(&day).unwrap_or_default();
    if day_companies.is_empty() {
        eprintln!("No companies assigned to {}", day);
        return Ok(());
    }

    let start = schedule.start_location(day);
    let route = optimize_route_for_day(day, &day_companies, start, &HaversineDistance, strategy);
    eprintln!(
        "{}: {} stops, {:.1} miles, about {:.1} hours driving",
        day,
        route.companies().len(),
        route.total_distance(),
        route.estimated_travel_time()
    );

    if let Some(ref path) = args.map {
        std::fs::write(path, create_route_map(&route, start).to_json_pretty()?)?;
        eprintln!("Wrote {}", path.display());
    }

    print_routes(&[&route], format)
}

//! The `schedule` subcommand: weekly day assignment and routing.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use bizscout_lib::logistics::generate_weekly_schedule_with;
use bizscout_lib::{
    assign_companies_to_days, create_route_map, Company, HaversineDistance, Route, RouteStrategy,
    Schedule,
};
use clap::Args;

use super::Context;
use crate::output::{print_json, print_routes, OutputFormat};

#[derive(Args)]
pub struct ScheduleArgs {
    /// Route strategy: greedy or two-opt
    #[arg(long, default_value = "greedy")]
    pub strategy: String,

    /// Store each company's assigned day as its region
    #[arg(long)]
    pub save: bool,

    /// Write one GeoJSON route map per day into this directory
    #[arg(long)]
    pub map_dir: Option<PathBuf>,
}

pub fn run(args: &ScheduleArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let strategy: RouteStrategy = args.strategy.parse().map_err(|e: String| anyhow!(e))?;
    let schedule = Schedule::from_settings(ctx.collector.settings());

    let mut db = ctx.open_db()?;
    let companies = db.all(None)?;
    let weekly = generate_weekly_schedule_with(&companies, &schedule, &HaversineDistance, strategy);
    eprintln!(
        "{} stops over {} days, {:.1} miles",
        weekly.company_count(),
        weekly.routes().len(),
        weekly.total_distance()
    );

    if args.save {
        let (updated, skipped) = companies_with_stored_day(&companies, &schedule);
        let saved = db.save_all(&updated)?;
        if skipped > 0 {
            eprintln!(
                "Stored outreach days for {} companies ({} without coordinates skipped)",
                saved, skipped
            );
        } else {
            eprintln!("Stored outreach days for {} companies", saved);
        }
    }

    if let Some(ref dir) = args.map_dir {
        std::fs::create_dir_all(dir)?;
        for (day, route) in weekly.routes() {
            if route.companies().is_empty() {
                continue;
            }
            let map = create_route_map(route, schedule.start_location(*day));
            let path = dir.join(format!("route_{}.geojson", day.as_str().to_lowercase()));
            std::fs::write(&path, map.to_json_pretty()?)?;
            eprintln!("Wrote {}", path.display());
        }
    }

    match format {
        OutputFormat::Json => {
            print_json(&weekly);
            Ok(())
        }
        _ => {
            let routes: Vec<&Route> = weekly.routes().values().collect();
            print_routes(&routes, format)
        }
    }
}

/// Assigned companies whose day landed in `location.region`, and how many
/// assigned companies had no location to carry it.
fn companies_with_stored_day(companies: &[Company], schedule: &Schedule) -> (Vec<Company>, usize) {
    let (updated, skipped): (Vec<Company>, Vec<Company>) =
        assign_companies_to_days(companies, schedule)
            .into_values()
            .flatten()
            .partition(|c| c.location.as_ref().is_some_and(|l| l.region.is_some()));
    (updated, skipped.len())
}

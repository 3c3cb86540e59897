//! Route planning: regional clustering, day assignment, and day routes.
//!
//! Each stage is a pure function over company values:
//! cluster → assign days → route each day → render a map.

pub mod cluster;
pub mod geo;
pub mod map;
pub mod route;
pub mod schedule;

pub use cluster::{cluster_companies_by_region, ClusterLabel};
pub use geo::{FixedDistance, GeoDistance, HaversineDistance, Waypoint};
pub use map::{create_route_map, RouteMap};
pub use route::{optimize_route, optimize_route_for_day, optimize_route_with, RouteStrategy};
pub use schedule::{
    assign_companies_to_days, generate_weekly_schedule, generate_weekly_schedule_with,
    suggest_best_outreach_days, Schedule, WeeklySchedule,
};

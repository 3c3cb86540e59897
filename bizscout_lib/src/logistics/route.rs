//! Single-day route sequencing.

use std::str::FromStr;

use serde::Serialize;

use super::geo::{distance_matrix, GeoDistance, Waypoint};
use crate::models::{Company, CompanyReference, OutreachDay, Route};

/// Average driving speed used for travel time estimates.
pub const AVERAGE_SPEED_MPH: f64 = 30.0;

const DEFAULT_DAY: &str = "Monday";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStrategy {
    /// Nearest unvisited stop, ties to the lowest index.
    #[default]
    Greedy,
    /// Greedy tour refined by 2-opt segment reversals.
    TwoOpt,
}

impl FromStr for RouteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "two-opt" | "2-opt" | "twoopt" => Ok(Self::TwoOpt),
            other => Err(format!("unknown route strategy: {}", other)),
        }
    }
}

/// Greedy nearest-neighbour route from `start` through every company with an
/// address, returning to `start`.
///
/// The day label comes from the first company's assigned region, or Monday.
pub fn optimize_route(companies: &[Company], start: &Waypoint, geo: &dyn GeoDistance) -> Route {
    optimize_route_with(companies, start, geo, RouteStrategy::Greedy)
}

pub fn optimize_route_with(
    companies: &[Company],
    start: &Waypoint,
    geo: &dyn GeoDistance,
    strategy: RouteStrategy,
) -> Route {
    let visitable: Vec<&Company> = companies.iter().filter(|c| c.address.is_some()).collect();
    let Some(first) = visitable.first() else {
        return Route::default();
    };
    let day = first
        .location
        .as_ref()
        .and_then(|l| l.region.as_deref())
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_DAY)
        .to_string();
    plan_route(&day, &visitable, start, geo, strategy)
}

/// Routes one outreach day's companies under that day's label, whether or
/// not the companies carry coordinates.
pub fn optimize_route_for_day(
    day: OutreachDay,
    companies: &[Company],
    start: &Waypoint,
    geo: &dyn GeoDistance,
    strategy: RouteStrategy,
) -> Route {
    let visitable: Vec<&Company> = companies.iter().filter(|c| c.address.is_some()).collect();
    plan_route(day.as_str(), &visitable, start, geo, strategy)
}

/// Routes `companies` under a fixed day label.
pub(crate) fn plan_route(
    day: &str,
    companies: &[&Company],
    start: &Waypoint,
    geo: &dyn GeoDistance,
    strategy: RouteStrategy,
) -> Route {
    let mut route = Route::new(day);
    for company in companies {
        if let Some(reference) = CompanyReference::from_company(company) {
            route.add_company(reference);
        }
    }
    if route.companies().is_empty() {
        return route;
    }

    let mut stops = Vec::with_capacity(route.companies().len() + 1);
    stops.push(start.clone());
    stops.extend(route.companies().iter().map(Waypoint::from));
    let matrix = distance_matrix(&stops, geo);

    let mut order = nearest_neighbour_tour(&matrix);
    if strategy == RouteStrategy::TwoOpt {
        two_opt(&mut order, &matrix);
    }

    let total_distance = tour_length(&order, &matrix);
    let travel_time = total_distance / AVERAGE_SPEED_MPH;
    tracing::info!(
        "Route for {}: {} stops, {:.1} miles, {:.1} hours",
        day,
        route.companies().len(),
        total_distance,
        travel_time
    );
    route.set_plan(order, total_distance, travel_time);
    route
}

/// Tour over matrix indices starting and ending at 0.
fn nearest_neighbour_tour(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n + 1);
    let mut current = 0;
    visited[0] = true;
    order.push(0);

    for _ in 1..n {
        let mut next: Option<usize> = None;
        for candidate in 1..n {
            if visited[candidate] {
                continue;
            }
            match next {
                Some(best) if matrix[current][candidate] >= matrix[current][best] => {}
                _ => next = Some(candidate),
            }
        }
        let Some(next) = next else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order.push(0);
    order
}

/// Reverses interior segments while that shortens the tour. Both ends stay at 0.
fn two_opt(order: &mut [usize], matrix: &[Vec<f64>]) {
    let last = order.len() - 1;
    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..last {
            for k in (i + 1)..last {
                let before = matrix[order[i - 1]][order[i]] + matrix[order[k]][order[k + 1]];
                let after = matrix[order[i - 1]][order[k]] + matrix[order[i]][order[k + 1]];
                if after + 1e-9 < before {
                    order[i..=k].reverse();
                    improved = true;
                }
            }
        }
    }
}

fn tour_length(order: &[usize], matrix: &[Vec<f64>]) -> f64 {
    order.windows(2).map(|w| matrix[w[0]][w[1]]).sum()
}

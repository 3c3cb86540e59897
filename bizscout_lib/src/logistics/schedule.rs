//! Weekly outreach planning: day assignment and per-day routes.

use std::collections::BTreeMap;

use serde::Serialize;

use super::geo::{GeoDistance, Waypoint};
use super::route::{plan_route, RouteStrategy};
use crate::config::Settings;
use crate::models::{Address, Company, OutreachDay, Route};

/// Target regions and the start location for one outreach day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day: OutreachDay,
    pub regions: Vec<String>,
    pub start: Waypoint,
}

/// Region lists and start locations for Monday through Friday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    days: Vec<DayPlan>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Schedule {
    pub fn from_settings(settings: &Settings) -> Self {
        let days = OutreachDay::ALL
            .iter()
            .map(|&day| DayPlan {
                day,
                regions: settings.locations_for(day).to_vec(),
                start: default_start(day),
            })
            .collect();
        Self { days }
    }

    pub fn plan(&self, day: OutreachDay) -> &DayPlan {
        &self.days[day_index(day)]
    }

    pub fn regions(&self, day: OutreachDay) -> &[String] {
        &self.plan(day).regions
    }

    pub fn start_location(&self, day: OutreachDay) -> &Waypoint {
        &self.plan(day).start
    }

    pub fn with_start(mut self, day: OutreachDay, start: Waypoint) -> Self {
        self.days[day_index(day)].start = start;
        self
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.days
    }
}

fn day_index(day: OutreachDay) -> usize {
    match day {
        OutreachDay::Monday => 0,
        OutreachDay::Tuesday => 1,
        OutreachDay::Wednesday => 2,
        OutreachDay::Thursday => 3,
        OutreachDay::Friday => 4,
    }
}

fn default_start(day: OutreachDay) -> Waypoint {
    let (city, latitude, longitude) = match day {
        OutreachDay::Monday => ("Waukesha", 43.0117, -88.2315),
        OutreachDay::Tuesday => ("Kenosha", 42.5847, -87.8212),
        OutreachDay::Wednesday => ("Madison", 43.0731, -89.4012),
        OutreachDay::Thursday | OutreachDay::Friday => ("Milwaukee", 43.0389, -87.9065),
    };
    Waypoint::new(
        &format!("{}, WI", city),
        Address::new("", city, "WI", ""),
        latitude,
        longitude,
    )
}

/// One route per weekday. Every day is present, empty days have empty routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySchedule {
    routes: BTreeMap<OutreachDay, Route>,
}

impl WeeklySchedule {
    pub fn route(&self, day: OutreachDay) -> Option<&Route> {
        self.routes.get(&day)
    }

    pub fn routes(&self) -> &BTreeMap<OutreachDay, Route> {
        &self.routes
    }

    pub fn total_distance(&self) -> f64 {
        self.routes.values().map(Route::total_distance).sum()
    }

    pub fn company_count(&self) -> usize {
        self.routes.values().map(|r| r.companies().len()).sum()
    }
}

/// How well a city matches a region; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Exact,
    Contains { length_diff: usize },
}

fn match_rank(city: &str, region: &str) -> Option<MatchRank> {
    if region.is_empty() {
        return None;
    }
    if city == region {
        Some(MatchRank::Exact)
    } else if city.contains(region) || region.contains(city) {
        Some(MatchRank::Contains {
            length_diff: city.len().abs_diff(region.len()),
        })
    } else {
        None
    }
}

/// Picks the outreach day for a city.
///
/// An exact region match beats a containment match, a closer containment
/// match beats a looser one, and remaining ties go to the earlier day.
/// Cities matching no region fall to Thursday.
pub fn day_for_city(city: &str, schedule: &Schedule) -> OutreachDay {
    let city = city.trim().to_lowercase();
    let mut best: Option<(MatchRank, OutreachDay)> = None;
    for plan in schedule.days() {
        for region in &plan.regions {
            let Some(rank) = match_rank(&city, &region.trim().to_lowercase()) else {
                continue;
            };
            if best.map_or(true, |(current, _)| rank < current) {
                best = Some((rank, plan.day));
            }
        }
    }
    best.map(|(_, day)| day).unwrap_or(OutreachDay::Thursday)
}

/// Buckets companies by outreach day and records the day in `location.region`.
///
/// Companies without a city are skipped. All five days are present in the result.
pub fn assign_companies_to_days(
    companies: &[Company],
    schedule: &Schedule,
) -> BTreeMap<OutreachDay, Vec<Company>> {
    let mut assigned: BTreeMap<OutreachDay, Vec<Company>> =
        OutreachDay::ALL.iter().map(|&d| (d, Vec::new())).collect();

    for company in companies {
        let Some(city) = company.city() else {
            tracing::debug!("Skipping {} without a city", company.name);
            continue;
        };
        let day = day_for_city(city, schedule);
        tracing::debug!("Assigned {} ({}) to {}", company.name, city, day);

        let mut company = company.clone();
        if let Some(location) = company.location.as_mut() {
            location.region = Some(day.to_string());
        }
        assigned.entry(day).or_default().push(company);
    }

    assigned
}

/// Assigns days and routes each day from its start location.
pub fn generate_weekly_schedule(
    companies: &[Company],
    schedule: &Schedule,
    geo: &dyn GeoDistance,
) -> WeeklySchedule {
    generate_weekly_schedule_with(companies, schedule, geo, RouteStrategy::Greedy)
}

pub fn generate_weekly_schedule_with(
    companies: &[Company],
    schedule: &Schedule,
    geo: &dyn GeoDistance,
    strategy: RouteStrategy,
) -> WeeklySchedule {
    let assigned = assign_companies_to_days(companies, schedule);
    let routes: BTreeMap<OutreachDay, Route> = assigned
        .iter()
        .map(|(&day, day_companies)| {
            let refs: Vec<&Company> = day_companies.iter().collect();
            let route = plan_route(
                day.as_str(),
                &refs,
                schedule.start_location(day),
                geo,
                strategy,
            );
            (day, route)
        })
        .collect();

    let weekly = WeeklySchedule { routes };
    tracing::info!(
        "Weekly schedule: {} stops, {:.1} miles",
        weekly.company_count(),
        weekly.total_distance()
    );
    weekly
}

/// Outreach effectiveness per day. A non-empty history is returned as is.
pub fn suggest_best_outreach_days(
    companies: &[Company],
    history: Option<&BTreeMap<OutreachDay, f64>>,
) -> BTreeMap<OutreachDay, f64> {
    if let Some(history) = history.filter(|h| !h.is_empty()) {
        return history.clone();
    }
    tracing::debug!(
        "No outreach history for {} companies, using default day scores",
        companies.len()
    );
    BTreeMap::from([
        (OutreachDay::Monday, 0.7),
        (OutreachDay::Tuesday, 0.9),
        (OutreachDay::Wednesday, 0.8),
        (OutreachDay::Thursday, 0.7),
        (OutreachDay::Friday, 0.5),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logistics::geo::{FixedDistance, HaversineDistance};
    use crate::logistics::route::optimize_route_for_day;

    fn in_city(id: &str, city: &str) -> Company {
        Company::new(id, id).with_address(Address::new("1 Main St", city, "WI", ""))
    }

    #[test]
    fn default_schedule_regions_and_starts() {
        let schedule = Schedule::default();
        assert_eq!(schedule.regions(OutreachDay::Tuesday), ["Kenosha", "Racine"]);
        assert_eq!(schedule.start_location(OutreachDay::Wednesday).name, "Madison, WI");
        assert_eq!(
            schedule.start_location(OutreachDay::Friday).coordinates,
            Some((43.0389, -87.9065))
        );
    }

    #[test]
    fn exact_match_beats_containment() {
        let schedule = Schedule::default();
        assert_eq!(day_for_city("Waukesha", &schedule), OutreachDay::Monday);
        assert_eq!(day_for_city("west waukesha", &schedule), OutreachDay::Wednesday);
        assert_eq!(day_for_city("RACINE", &schedule), OutreachDay::Tuesday);
    }

    #[test]
    fn closest_containment_wins() {
        let schedule = Schedule::default();
        // Only "West Milwaukee" contains "milwaukee".
        assert_eq!(day_for_city("Milwaukee", &schedule), OutreachDay::Monday);
        // "North Madison" contains "madison".
        assert_eq!(day_for_city("North Madison", &schedule), OutreachDay::Wednesday);
    }

    #[test]
    fn unmatched_city_goes_to_thursday() {
        assert_eq!(day_for_city("Green Bay", &Schedule::default()), OutreachDay::Thursday);
    }

    #[test]
    fn ties_go_to_earlier_day() {
        let settings = Settings::from_lookup(|key| match key {
            "MONDAY_LOCATIONS" => Some("Oak Creek".to_string()),
            "FRIDAY_LOCATIONS" => Some("Oak Creek".to_string()),
            _ => None,
        });
        let schedule = Schedule::from_settings(&settings);
        assert_eq!(day_for_city("Oak Creek", &schedule), OutreachDay::Monday);
    }

    #[test]
    fn assignment_sets_region_and_skips_cityless() {
        let companies = vec![
            in_city("a", "Kenosha").with_location(42.58, -87.82),
            Company::new("b", "No address"),
            in_city("c", "Jackson"),
        ];
        let assigned = assign_companies_to_days(&companies, &Schedule::default());
        assert_eq!(assigned.len(), 5);
        let tuesday = &assigned[&OutreachDay::Tuesday];
        assert_eq!(tuesday.len(), 1);
        assert_eq!(
            tuesday[0].location.as_ref().unwrap().region.as_deref(),
            Some("Tuesday")
        );
        assert_eq!(assigned[&OutreachDay::Monday][0].id, "c");
        let total: usize = assigned.values().map(Vec::len).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn weekly_schedule_has_every_day() {
        let companies = vec![
            in_city("a", "Kenosha").with_location(42.58, -87.82),
            in_city("b", "Racine").with_location(42.73, -87.78),
            in_city("c", "Madison").with_location(43.07, -89.40),
            in_city("d", "Green Bay").with_location(44.51, -88.01),
        ];
        let weekly = generate_weekly_schedule(&companies, &Schedule::default(), &HaversineDistance);
        assert_eq!(weekly.routes().len(), 5);
        assert_eq!(weekly.route(OutreachDay::Tuesday).unwrap().companies().len(), 2);
        assert_eq!(weekly.route(OutreachDay::Tuesday).unwrap().day(), "Tuesday");
        assert_eq!(weekly.route(OutreachDay::Thursday).unwrap().companies().len(), 1);
        let friday = weekly.route(OutreachDay::Friday).unwrap();
        assert!(friday.companies().is_empty());
        assert_eq!(friday.day(), "Friday");
        assert_eq!(weekly.company_count(), 4);
    }

    #[test]
    fn weekly_schedule_without_coordinates_uses_fallback() {
        let companies = vec![in_city("a", "Racine"), in_city("b", "Kenosha")];
        let weekly = generate_weekly_schedule(&companies, &Schedule::default(), &FixedDistance(10.0));
        let tuesday = weekly.route(OutreachDay::Tuesday).unwrap();
        assert_eq!(tuesday.total_distance(), 30.0);
        assert_eq!(tuesday.optimized_order(), &[0, 1, 2, 0]);
    }

    #[test]
    fn assigned_day_labels_route_without_coordinates() {
        let companies = vec![in_city("k", "Kenosha")];
        let schedule = Schedule::default();
        let mut assigned = assign_companies_to_days(&companies, &schedule);
        let tuesday = assigned.remove(&OutreachDay::Tuesday).unwrap();
        assert_eq!(tuesday.len(), 1);
        assert!(tuesday[0].location.is_none());

        let route = optimize_route_for_day(
            OutreachDay::Tuesday,
            &tuesday,
            schedule.start_location(OutreachDay::Tuesday),
            &FixedDistance(3.0),
            RouteStrategy::Greedy,
        );
        assert_eq!(route.day(), "Tuesday");
        assert_eq!(route.companies().len(), 1);
    }

    #[test]
    fn outreach_days_default_and_history() {
        let defaults = suggest_best_outreach_days(&[], None);
        assert_eq!(defaults[&OutreachDay::Tuesday], 0.9);
        assert_eq!(defaults[&OutreachDay::Friday], 0.5);
        assert_eq!(defaults.len(), 5);

        let history = BTreeMap::from([(OutreachDay::Friday, 0.95)]);
        let suggested = suggest_best_outreach_days(&[], Some(&history));
        assert_eq!(suggested, history);

        let empty = BTreeMap::new();
        assert_eq!(suggest_best_outreach_days(&[], Some(&empty)), defaults);
    }
}

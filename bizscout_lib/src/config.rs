//! Runtime settings read from environment variables.
//!
//! The binary loads a `.env` file first; every variable is optional and
//! falls back to the defaults below.

use std::collections::BTreeMap;

use crate::models::OutreachDay;

pub const DEFAULT_LINKEDIN_API_BASE_URL: &str = "https://api.linkedin.com/v2";
pub const DEFAULT_YAHOO_FINANCE_API_BASE_URL: &str = "https://query1.finance.yahoo.com/v10/finance";
pub const DEFAULT_APOLLO_API_BASE_URL: &str = "https://api.apollo.io/v1";
pub const DEFAULT_DATABASE_PATH: &str = "bizscout.db";

const DEFAULT_MONDAY_LOCATIONS: &str = "Waukesha,West Milwaukee,Jackson,West Bend";
const DEFAULT_TUESDAY_LOCATIONS: &str = "Kenosha,Racine";
const DEFAULT_WEDNESDAY_LOCATIONS: &str = "West Waukesha,Madison";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub apollo_api_key: Option<String>,
    pub linkedin_api_base_url: String,
    pub yahoo_finance_api_base_url: String,
    pub apollo_api_base_url: String,
    pub database_path: String,
    pub default_location: String,
    pub default_industry: String,
    pub min_employee_count: u64,
    pub min_revenue: f64,
    pub daily_company_target: usize,
    /// Target cities per outreach day. Thursday and Friday default to empty
    /// and act as follow-up days.
    pub day_locations: BTreeMap<OutreachDay, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let mut day_locations = BTreeMap::new();
        for day in OutreachDay::ALL {
            let key = format!("{}_LOCATIONS", day.as_str().to_ascii_uppercase());
            let default = match day {
                OutreachDay::Monday => DEFAULT_MONDAY_LOCATIONS,
                OutreachDay::Tuesday => DEFAULT_TUESDAY_LOCATIONS,
                OutreachDay::Wednesday => DEFAULT_WEDNESDAY_LOCATIONS,
                OutreachDay::Thursday | OutreachDay::Friday => "",
            };
            day_locations.insert(day, split_locations(&get_or(&key, default)));
        }

        Self {
            apollo_api_key: get("APOLLO_API_KEY"),
            linkedin_api_base_url: get_or("LINKEDIN_API_BASE_URL", DEFAULT_LINKEDIN_API_BASE_URL),
            yahoo_finance_api_base_url: get_or(
                "YAHOO_FINANCE_API_BASE_URL",
                DEFAULT_YAHOO_FINANCE_API_BASE_URL,
            ),
            apollo_api_base_url: get_or("APOLLO_API_BASE_URL", DEFAULT_APOLLO_API_BASE_URL),
            database_path: get_or("DATABASE_PATH", DEFAULT_DATABASE_PATH),
            default_location: get_or("DEFAULT_LOCATION", "Milwaukee"),
            default_industry: get_or("DEFAULT_INDUSTRY", "manufacturing"),
            min_employee_count: parse_or("MIN_EMPLOYEE_COUNT", get("MIN_EMPLOYEE_COUNT"), 10),
            min_revenue: parse_or("MIN_REVENUE", get("MIN_REVENUE"), 2_000_000.0),
            daily_company_target: parse_or("DAILY_COMPANY_TARGET", get("DAILY_COMPANY_TARGET"), 20),
            day_locations,
        }
    }

    pub fn locations_for(&self, day: OutreachDay) -> &[String] {
        self.day_locations
            .get(&day)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn endpoints(&self) -> bizscout_api::Endpoints {
        bizscout_api::Endpoints {
            linkedin: self.linkedin_api_base_url.clone(),
            yahoo: self.yahoo_finance_api_base_url.clone(),
            apollo: self.apollo_api_base_url.clone(),
        }
    }
}

fn split_locations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={}, using default", key, value);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_with(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.apollo_api_key, None);
        assert_eq!(s.database_path, "bizscout.db");
        assert_eq!(s.default_location, "Milwaukee");
        assert_eq!(s.min_employee_count, 10);
        assert_eq!(s.min_revenue, 2_000_000.0);
        assert_eq!(s.daily_company_target, 20);
        assert_eq!(
            s.locations_for(OutreachDay::Monday),
            ["Waukesha", "West Milwaukee", "Jackson", "West Bend"]
        );
        assert_eq!(s.locations_for(OutreachDay::Tuesday), ["Kenosha", "Racine"]);
        assert!(s.locations_for(OutreachDay::Thursday).is_empty());
        assert!(s.locations_for(OutreachDay::Friday).is_empty());
    }

    #[test]
    fn overrides_and_blank_values() {
        let s = settings_with(&[
            ("APOLLO_API_KEY", "secret"),
            ("DATABASE_PATH", "  "),
            ("MIN_EMPLOYEE_COUNT", "25"),
            ("FRIDAY_LOCATIONS", " Oshkosh , ,Appleton"),
        ]);
        assert_eq!(s.apollo_api_key.as_deref(), Some("secret"));
        assert_eq!(s.database_path, "bizscout.db");
        assert_eq!(s.min_employee_count, 25);
        assert_eq!(s.locations_for(OutreachDay::Friday), ["Oshkosh", "Appleton"]);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let s = settings_with(&[("MIN_REVENUE", "lots"), ("DAILY_COMPANY_TARGET", "-1")]);
        assert_eq!(s.min_revenue, 2_000_000.0);
        assert_eq!(s.daily_company_target, 20);
    }

    #[test]
    fn endpoints_follow_base_urls() {
        let s = settings_with(&[("APOLLO_API_BASE_URL", "http://localhost:9000")]);
        let endpoints = s.endpoints();
        assert_eq!(endpoints.apollo, "http://localhost:9000");
        assert_eq!(endpoints.linkedin, DEFAULT_LINKEDIN_API_BASE_URL);
    }
}

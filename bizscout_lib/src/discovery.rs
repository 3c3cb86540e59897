//! Discovery filters over already-collected companies.

use crate::industry::IndustryClassifier;
use crate::models::{Company, SearchCriteria};
use crate::normalize::contains_any;
use crate::tax_potential::score_tax_potential;

const MAX_OWNER_OPERATED_EMPLOYEES: u64 = 500;
const GROWTH_RATE_THRESHOLD: f64 = 5.0;

const OWNER_TITLES: &[&str] = &["owner", "founder", "president", "ceo", "principal"];
const OWNER_STRUCTURE_HINTS: &[&str] = &["llc", "family", "proprietor"];
const FAMILY_NAME_HINTS: &[&str] = &["family", "& sons", "& son", "brothers", "& co"];

const HIRING_KEYWORDS: &[&str] = &[
    "hiring",
    "expanding",
    "growth",
    "new positions",
    "job openings",
    "career",
    "join our team",
];
const EXPANSION_KEYWORDS: &[&str] = &[
    "expansion",
    "new facility",
    "new location",
    "growing",
    "increased capacity",
    "new equipment",
    "investment",
];
const FUNDING_KEYWORDS: &[&str] = &["funding", "investment", "capital", "loan", "financing"];

/// Small, closely held businesses run by the people who own them.
///
/// More than 500 employees rules a company out. Otherwise an owner-type
/// executive title, a closely held legal structure, or a family-style
/// name is enough.
pub fn is_owner_operated(company: &Company) -> bool {
    if company
        .financials
        .employee_count
        .is_some_and(|count| count > MAX_OWNER_OPERATED_EMPLOYEES)
    {
        return false;
    }

    if company
        .executives
        .iter()
        .any(|e| contains_any(&e.role, OWNER_TITLES))
    {
        return true;
    }

    if company
        .legal_structure
        .is_some_and(|ls| contains_any(ls.label(), OWNER_STRUCTURE_HINTS))
    {
        return true;
    }

    contains_any(&company.name, FAMILY_NAME_HINTS)
}

pub fn is_in_growth_mode(company: &Company) -> bool {
    if company
        .financials
        .growth_rate
        .is_some_and(|rate| rate >= GROWTH_RATE_THRESHOLD)
    {
        return true;
    }

    let has = |text: Option<&String>, keywords: &[&str]| {
        text.is_some_and(|t| contains_any(t, keywords))
    };

    has(company.description.as_ref(), HIRING_KEYWORDS)
        || has(company.tax_indicators.recent_developments.as_ref(), EXPANSION_KEYWORDS)
        || has(company.tax_indicators.financing_activity.as_ref(), FUNDING_KEYWORDS)
}

pub fn filter_by_industry(
    classifier: &IndustryClassifier,
    companies: &[Company],
    target: &str,
) -> Vec<Company> {
    companies
        .iter()
        .filter(|c| classifier.is_in_industry(c, target))
        .cloned()
        .collect()
}

/// Keeps companies in `segment` that also belong to the segment's category.
/// An unknown segment name keeps nothing.
pub fn filter_by_segment(
    classifier: &IndustryClassifier,
    companies: &[Company],
    segment: &str,
) -> Vec<Company> {
    companies
        .iter()
        .filter(|c| in_segment_of_industry(classifier, c, segment))
        .cloned()
        .collect()
}

fn in_segment_of_industry(
    classifier: &IndustryClassifier,
    company: &Company,
    segment: &str,
) -> bool {
    let Some(config) = classifier.segment(segment) else {
        return false;
    };
    classifier.is_in_industry(company, &config.category)
        && classifier.is_in_segment(company, segment)
}

/// Keeps the companies that satisfy every criterion that is set.
///
/// A company missing the field a criterion tests (no address for a
/// location filter, no headcount for a minimum) is dropped.
pub fn apply_criteria(
    classifier: &IndustryClassifier,
    companies: &[Company],
    criteria: &SearchCriteria,
) -> Vec<Company> {
    let kept: Vec<Company> = companies
        .iter()
        .filter(|c| matches_criteria(classifier, c, criteria))
        .cloned()
        .collect();
    tracing::info!(
        "Discovery kept {} of {} companies",
        kept.len(),
        companies.len()
    );
    kept
}

pub fn matches_criteria(
    classifier: &IndustryClassifier,
    company: &Company,
    criteria: &SearchCriteria,
) -> bool {
    if let Some(name) = criteria.name() {
        if !company.name.to_lowercase().contains(&name.trim().to_lowercase()) {
            return false;
        }
    }

    if let Some(industry) = criteria.industry() {
        if !classifier.is_in_industry(company, industry) {
            return false;
        }
    }

    if let Some(segment) = criteria.segment() {
        if !in_segment_of_industry(classifier, company, segment) {
            return false;
        }
    }

    if let Some(location) = criteria.location() {
        if !matches_location(company, location) {
            return false;
        }
    }

    if let Some(min) = criteria.min_employees() {
        if !company.financials.employee_count.is_some_and(|c| c >= min) {
            return false;
        }
    }

    if let Some(min) = criteria.min_revenue() {
        if !company.financials.estimated_revenue.is_some_and(|r| r >= min) {
            return false;
        }
    }

    if criteria.owner_operated() && !is_owner_operated(company) {
        return false;
    }

    if criteria.growth_mode() && !is_in_growth_mode(company) {
        return false;
    }

    if let Some(potential) = criteria.tax_potential() {
        if score_tax_potential(company) != potential {
            return false;
        }
    }

    true
}

/// Case-insensitive substring match on city, state, or zip.
fn matches_location(company: &Company, location: &str) -> bool {
    let needle = location.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let Some(address) = company.address.as_ref() else {
        return false;
    };
    [&address.city, &address.state, &address.zip]
        .iter()
        .any(|field| !field.is_empty() && field.to_lowercase().contains(&needle))
}

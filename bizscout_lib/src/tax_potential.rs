//! Tax-saving potential heuristic.
//!
//! Five signals are each scored between 0.2 and 1.0 from numeric thresholds
//! or two tiers of keywords, then combined with fixed weights.

use serde::Serialize;

use crate::models::{Company, TaxSavingPotential};
use crate::normalize::contains_any;

const GROWTH_WEIGHT: f64 = 0.30;
const HIRING_WEIGHT: f64 = 0.20;
const EQUIPMENT_WEIGHT: f64 = 0.20;
const SUCCESSION_WEIGHT: f64 = 0.15;
const GOVERNMENT_WEIGHT: f64 = 0.15;

const HIGH_THRESHOLD: f64 = 0.7;
const MEDIUM_THRESHOLD: f64 = 0.4;

const HIRING_STRONG: &[&str] = &[
    "significant hiring",
    "major expansion",
    "doubled workforce",
    "rapid growth in employees",
    "aggressive hiring",
];
const HIRING_MODERATE: &[&str] = &[
    "hiring",
    "expansion",
    "growing team",
    "adding staff",
    "increasing workforce",
];

const EQUIPMENT_STRONG: &[&str] = &[
    "major investment",
    "new facility",
    "significant upgrade",
    "automation investment",
    "new manufacturing line",
    "facility expansion",
];
const EQUIPMENT_MODERATE: &[&str] = &[
    "equipment purchase",
    "upgrade",
    "renovation",
    "expansion",
    "new equipment",
    "technology investment",
];

const SUCCESSION_STRONG: &[&str] = &[
    "leadership transition",
    "succession plan",
    "ownership transfer",
    "generational change",
    "retirement planning",
    "family business transition",
];
const SUCCESSION_MODERATE: &[&str] = &[
    "new leadership",
    "management change",
    "executive transition",
    "restructuring",
    "ownership changes",
];

const GOVERNMENT_STRONG: &[&str] = &[
    "major government contract",
    "federal contract award",
    "multi-year government project",
    "significant public sector work",
    "primary government contractor",
];
const GOVERNMENT_MODERATE: &[&str] = &[
    "government work",
    "public sector",
    "state contract",
    "municipal project",
    "government bid",
];

/// Indicator scores, their weighted sum, and the resulting tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxAssessment {
    pub growth: f64,
    pub hiring: f64,
    pub equipment: f64,
    pub succession: f64,
    pub government_contracts: f64,
    pub weighted: f64,
    pub potential: TaxSavingPotential,
}

pub fn assess_tax_potential(company: &Company) -> TaxAssessment {
    let growth = growth_score(company);
    let hiring = hiring_score(company);
    let equipment = equipment_score(company);
    let succession = tiered(
        company.tax_indicators.succession_planning.as_deref(),
        SUCCESSION_STRONG,
        SUCCESSION_MODERATE,
        0.2,
        0.3,
    );
    let government_contracts = tiered(
        company.tax_indicators.government_contracts.as_deref(),
        GOVERNMENT_STRONG,
        GOVERNMENT_MODERATE,
        0.2,
        0.3,
    );

    let weighted = growth * GROWTH_WEIGHT
        + hiring * HIRING_WEIGHT
        + equipment * EQUIPMENT_WEIGHT
        + succession * SUCCESSION_WEIGHT
        + government_contracts * GOVERNMENT_WEIGHT;

    TaxAssessment {
        growth,
        hiring,
        equipment,
        succession,
        government_contracts,
        weighted,
        potential: tier(weighted),
    }
}

pub fn score_tax_potential(company: &Company) -> TaxSavingPotential {
    assess_tax_potential(company).potential
}

/// Returns the company with `tax_saving_potential` recomputed.
pub fn with_tax_potential(mut company: Company) -> Company {
    company.tax_indicators.tax_saving_potential = score_tax_potential(&company);
    company
}

/// Sorts HIGH before MEDIUM before LOW, keeping input order within a tier.
pub fn rank_by_tax_potential(companies: &[Company]) -> Vec<(Company, TaxSavingPotential)> {
    let mut ranked: Vec<(Company, TaxSavingPotential)> = companies
        .iter()
        .map(|c| (c.clone(), score_tax_potential(c)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn tier(weighted: f64) -> TaxSavingPotential {
    // Tolerate float drift in sums such as 0.3 + 0.2 + 0.2.
    let weighted = weighted + 1e-9;
    if weighted >= HIGH_THRESHOLD {
        TaxSavingPotential::High
    } else if weighted >= MEDIUM_THRESHOLD {
        TaxSavingPotential::Medium
    } else {
        TaxSavingPotential::Low
    }
}

fn growth_score(company: &Company) -> f64 {
    match company.financials.growth_rate {
        None => 0.3,
        Some(rate) if rate >= 15.0 => 1.0,
        Some(rate) if rate >= 10.0 => 0.8,
        Some(rate) if rate >= 5.0 => 0.5,
        Some(_) => 0.2,
    }
}

fn hiring_score(company: &Company) -> f64 {
    if let Some(trends) = company.financials.payroll_trends.as_deref() {
        if contains_any(trends, HIRING_STRONG) {
            return 1.0;
        }
        if contains_any(trends, HIRING_MODERATE) {
            return 0.7;
        }
    }
    match company.financials.employee_count {
        Some(count) if count > 50 => 0.5,
        _ => 0.2,
    }
}

fn equipment_score(company: &Company) -> f64 {
    tiered(
        company.financials.capex_trends.as_deref(),
        EQUIPMENT_STRONG,
        EQUIPMENT_MODERATE,
        0.3,
        0.2,
    )
}

/// `absent` when the text is missing or blank, `unmatched` when it has no keyword hit.
fn tiered(text: Option<&str>, strong: &[&str], moderate: &[&str], absent: f64, unmatched: f64) -> f64 {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        None => absent,
        Some(t) if contains_any(t, strong) => 1.0,
        Some(t) if contains_any(t, moderate) => 0.7,
        Some(_) => unmatched,
    }
}

//! Weighted multi-factor similarity between two company records.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::models::{Address, Company, Financials, Industry};

const WEIGHT_TOLERANCE: f64 = 1e-9;
const EMPLOYEE_FLOOR: f64 = 10.0;
const REVENUE_FLOOR: f64 = 10_000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Similarity weights must sum to 1.0, got {0}")]
    WeightSum(f64),
    #[error("Similarity weight {name} must be a finite non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Factor weights. Validated to be non-negative and to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityWeights {
    industry: f64,
    size: f64,
    location: f64,
    legal_structure: f64,
    growth: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            industry: 0.35,
            size: 0.25,
            location: 0.20,
            legal_structure: 0.10,
            growth: 0.10,
        }
    }
}

impl SimilarityWeights {
    pub fn new(
        industry: f64,
        size: f64,
        location: f64,
        legal_structure: f64,
        growth: f64,
    ) -> Result<Self, ScoringError> {
        let named = [
            ("industry", industry),
            ("size", size),
            ("location", location),
            ("legal_structure", legal_structure),
            ("growth", growth),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidWeight { name, value });
            }
        }
        let sum: f64 = named.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScoringError::WeightSum(sum));
        }
        Ok(Self {
            industry,
            size,
            location,
            legal_structure,
            growth,
        })
    }
}

/// Per-factor scores and their weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub industry: f64,
    pub size: f64,
    pub location: f64,
    pub legal_structure: f64,
    pub growth: f64,
    pub total: f64,
}

/// A candidate and its similarity to the reference.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCompany {
    pub company: Company,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer {
    weights: SimilarityWeights,
}

impl SimilarityScorer {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    pub fn score(&self, a: &Company, b: &Company) -> f64 {
        self.score_breakdown(a, b).total
    }

    pub fn score_breakdown(&self, a: &Company, b: &Company) -> SimilarityBreakdown {
        let industry = industry_similarity(a.industry.as_ref(), b.industry.as_ref());
        let size = size_similarity(&a.financials, &b.financials);
        let location = location_similarity(a.address.as_ref(), b.address.as_ref());
        let legal_structure = legal_structure_similarity(a, b);
        let growth = growth_similarity(&a.financials, &b.financials);

        let w = &self.weights;
        let total = industry * w.industry
            + size * w.size
            + location * w.location
            + legal_structure * w.legal_structure
            + growth * w.growth;

        SimilarityBreakdown {
            industry,
            size,
            location,
            legal_structure,
            growth,
            total: total.clamp(0.0, 1.0),
        }
    }

    /// Ranks candidates against `reference`, best first.
    ///
    /// Candidates sharing the reference id are skipped. Equal scores keep
    /// their input order. At most `top_n` results are returned.
    pub fn rank(&self, reference: &Company, candidates: &[Company], top_n: usize) -> Vec<ScoredCompany> {
        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.id != reference.id)
            .map(|(idx, c)| (idx, self.score(reference, c)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);
        scored
            .into_iter()
            .map(|(idx, score)| ScoredCompany {
                company: candidates[idx].clone(),
                score,
            })
            .collect()
    }
}

/// Similarity with the default weights.
pub fn score_similarity(a: &Company, b: &Company) -> f64 {
    SimilarityScorer::default().score(a, b)
}

/// Ranking with the default weights.
pub fn rank_by_similarity(reference: &Company, candidates: &[Company], top_n: usize) -> Vec<ScoredCompany> {
    SimilarityScorer::default().rank(reference, candidates, top_n)
}

fn non_empty(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}

pub(crate) fn industry_similarity(a: Option<&Industry>, b: Option<&Industry>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.1;
    };

    let primary_a = a.primary.trim();
    if !primary_a.is_empty() && primary_a.eq_ignore_ascii_case(b.primary.trim()) {
        return 1.0;
    }

    let naics = (non_empty(a.naics_code.as_deref()), non_empty(b.naics_code.as_deref()));
    let sic = (non_empty(a.sic_code.as_deref()), non_empty(b.sic_code.as_deref()));

    if let (Some(x), Some(y)) = naics {
        if x == y {
            return 0.9;
        }
    }
    if let (Some(x), Some(y)) = sic {
        if x == y {
            return 0.9;
        }
    }

    if let (Some(x), Some(y)) = naics {
        if x.get(..2).is_some() && x.get(..2) == y.get(..2) {
            return 0.8;
        }
        if x.chars().next() == y.chars().next() {
            return 0.6;
        }
    }

    let subs_a: HashSet<&str> = a.subcategories.iter().map(String::as_str).collect();
    let subs_b: HashSet<&str> = b.subcategories.iter().map(String::as_str).collect();
    if !subs_a.is_empty() && !subs_b.is_empty() {
        let overlap = subs_a.intersection(&subs_b).count();
        if overlap > 0 {
            return 0.5 + 0.3 * overlap as f64 / subs_a.len().max(subs_b.len()) as f64;
        }
    }

    0.2
}

fn log_ratio(a: f64, b: f64, floor: f64) -> f64 {
    let la = a.max(floor).log10();
    let lb = b.max(floor).log10();
    la.min(lb) / la.max(lb)
}

pub(crate) fn size_similarity(a: &Financials, b: &Financials) -> f64 {
    let employees = match (a.employee_count, b.employee_count) {
        (Some(x), Some(y)) => log_ratio(x as f64, y as f64, EMPLOYEE_FLOOR),
        _ => 0.5,
    };
    let revenue = match (a.estimated_revenue, b.estimated_revenue) {
        (Some(x), Some(y)) => log_ratio(x, y, REVENUE_FLOOR),
        _ => 0.5,
    };
    0.6 * employees + 0.4 * revenue
}

fn same(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

pub(crate) fn location_similarity(a: Option<&Address>, b: Option<&Address>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.1;
    };
    let same_state = same(&a.state, &b.state);
    let same_city = same(&a.city, &b.city);

    if same_state && same_city && same(&a.street, &b.street) {
        return 1.0;
    }
    if same_state && same_city {
        return 0.9;
    }
    if same_state {
        let (za, zb) = (a.zip.trim(), b.zip.trim());
        if za.len() >= 3 && zb.len() >= 3 && za.get(..3) == zb.get(..3) {
            return 0.8;
        }
        return 0.6;
    }
    0.2
}

fn legal_structure_similarity(a: &Company, b: &Company) -> f64 {
    let (Some(x), Some(y)) = (a.legal_structure, b.legal_structure) else {
        return 0.5;
    };
    if x == y {
        1.0
    } else if x.is_corporation() && y.is_corporation() {
        0.8
    } else if x.is_closely_held() && y.is_closely_held() {
        0.7
    } else {
        0.3
    }
}

pub(crate) fn growth_similarity(a: &Financials, b: &Financials) -> f64 {
    let (Some(x), Some(y)) = (a.growth_rate, b.growth_rate) else {
        return 0.5;
    };
    let diff = (x - y).abs();
    if diff <= 2.0 {
        1.0
    } else if diff <= 5.0 {
        0.8
    } else if diff <= 10.0 {
        0.6
    } else if diff <= 20.0 {
        0.4
    } else {
        0.2
    }
}

use crate::error::BizScoutError;
use crate::industry::IndustryClassifier;
use crate::models::{LegalStructure, OutreachDay, TaxSavingPotential};

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MAX_LOCATION_LENGTH: usize = 120;
pub const MAX_LIMIT: usize = 500;

pub const VALID_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, BizScoutError> {
    if input.len() > max_len {
        return Err(BizScoutError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(BizScoutError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a company name or search string: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, BizScoutError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a free-text location such as "Racine, WI" or "53403".
pub fn validate_location(input: &str) -> Result<String, BizScoutError> {
    sanitize_text(input, MAX_LOCATION_LENGTH)
}

/// Validate a US state code: uppercase, check against the 50 states + DC.
pub fn validate_state(input: &str) -> Result<String, BizScoutError> {
    let upper = input.trim().to_uppercase();
    if VALID_STATES.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(BizScoutError::InvalidInput(format!(
            "unknown state code '{}'. Valid codes: AL, AK, AZ, ... WY, DC",
            input
        )))
    }
}

/// Validate a result limit (must be 1..=500).
pub fn validate_limit(limit: usize) -> Result<usize, BizScoutError> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(BizScoutError::InvalidInput(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(limit)
}

/// Validate a weekday name or abbreviation (Monday through Friday).
pub fn validate_day(input: &str) -> Result<OutreachDay, BizScoutError> {
    input.parse::<OutreachDay>().map_err(|_| {
        BizScoutError::InvalidInput(format!(
            "unknown day '{}'. Valid days: monday, tuesday, wednesday, thursday, friday",
            input.trim()
        ))
    })
}

/// Validate a target industry against the taxonomy and return its id,
/// e.g. "Trucking & Logistics" becomes "trucking".
pub fn validate_industry(
    classifier: &IndustryClassifier,
    input: &str,
) -> Result<String, BizScoutError> {
    let trimmed = input.trim();
    if let Some(category) = classifier.category(trimmed) {
        return Ok(category.id.clone());
    }
    let ids: Vec<&str> = classifier
        .categories()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    Err(BizScoutError::InvalidInput(format!(
        "unknown industry '{}'. Valid industries: {}",
        trimmed,
        ids.join(", ")
    )))
}

/// Validate a segment name for the given industry, returning the segment's
/// canonical spelling.
pub fn validate_segment(
    classifier: &IndustryClassifier,
    industry: &str,
    input: &str,
) -> Result<String, BizScoutError> {
    let trimmed = input.trim();
    let segments = classifier.segments(industry);
    if let Some(segment) = segments
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(trimmed))
    {
        return Ok(segment.name.clone());
    }
    let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
    Err(BizScoutError::InvalidInput(format!(
        "unknown segment '{}' for {}. Valid segments: {}",
        trimmed,
        industry,
        names.join(", ")
    )))
}

/// Validate a tax saving potential: low, medium, or high (case-insensitive).
pub fn validate_tax_potential(input: &str) -> Result<TaxSavingPotential, BizScoutError> {
    input.parse::<TaxSavingPotential>().map_err(|_| {
        BizScoutError::InvalidInput(format!(
            "unknown tax saving potential '{}'. Valid values: low, medium, high",
            input.trim()
        ))
    })
}

/// Validate a legal structure by wire code ("S_CORP") or label ("S-Corp").
pub fn validate_legal_structure(input: &str) -> Result<LegalStructure, BizScoutError> {
    input.parse::<LegalStructure>().map_err(|_| {
        let codes: Vec<&str> = LegalStructure::ALL.iter().map(|l| l.code()).collect();
        BizScoutError::InvalidInput(format!(
            "unknown legal structure '{}'. Valid values: {}",
            input.trim(),
            codes.join(", ")
        ))
    })
}

/// Validate a minimum revenue filter (finite and non-negative).
pub fn validate_min_revenue(value: f64) -> Result<f64, BizScoutError> {
    if !value.is_finite() || value < 0.0 {
        return Err(BizScoutError::InvalidInput(format!(
            "minimum revenue must be a non-negative number, got {}",
            value
        )));
    }
    Ok(value)
}

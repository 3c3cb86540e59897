//! Field normalization for raw provider values.
//!
//! Every function here is pure. Values that cannot be parsed are logged at
//! `warn` level and come back as `None`; nothing in this module returns an error.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::models::Address;

const STREET_KEYS: &[&str] = &["street", "address1", "street_address", "line1"];
const CITY_KEYS: &[&str] = &["city", "locality"];
const STATE_KEYS: &[&str] = &["state", "region", "state_code"];
const ZIP_KEYS: &[&str] = &["zip", "postal_code", "postalCode", "zip_code"];
const COUNTRY_KEYS: &[&str] = &["country", "country_code"];

fn legal_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:LLC|Inc\.?|Corp\.?|Limited|Ltd\.?|L\.?P\.?|L\.?L\.?C\.?|P\.?C\.?|Co\.?)(?:\s|$|,)")
            .expect("legal suffix pattern is valid")
    })
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Strips legal suffixes (LLC, Inc, Corp, Ltd, LP, PC, Co) and tidies
/// whitespace and trailing punctuation.
///
/// ```
/// use bizscout_lib::normalize::clean_company_name;
/// assert_eq!(clean_company_name("Acme Manufacturing, LLC."), "Acme Manufacturing");
/// ```
pub fn clean_company_name(name: &str) -> String {
    if name.trim().is_empty() {
        return String::new();
    }
    let stripped = legal_suffix_regex().replace_all(name, " ");
    let collapsed = whitespace_regex().replace_all(&stripped, " ");
    collapsed
        .trim_matches(|c: char| c == ' ' || c == ',' || c == '.' || c == '-')
        .to_string()
}

/// Normalizes an employee count from a JSON number or string.
pub fn normalize_employee_count(value: &Value) -> Option<u64> {
    match value {
        Value::Null => None,
        Value::Number(n) => match n.as_u64() {
            Some(count) => Some(count),
            None => {
                tracing::warn!("Could not normalize employee count: {}", n);
                None
            }
        },
        Value::String(s) => parse_employee_count(s),
        other => {
            tracing::warn!("Could not normalize employee count: {}", other);
            None
        }
    }
}

/// Parses "10-50" (floor of the average), "1,000+" (leading number), or a
/// plain number with optional thousands separators.
pub fn parse_employee_count(raw: &str) -> Option<u64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((lower, upper)) = text.split_once('-') {
        if let (Some(lower), Some(upper)) = (parse_count(lower), parse_count(upper)) {
            return Some((lower + upper) / 2);
        }
    }

    if let Some(leading) = text.strip_suffix('+') {
        if let Some(count) = parse_count(leading) {
            return Some(count);
        }
    }

    if let Some(count) = parse_count(text) {
        return Some(count);
    }

    tracing::warn!("Could not normalize employee count: {}", raw);
    None
}

fn parse_count(text: &str) -> Option<u64> {
    text.trim().replace(',', "").parse::<u64>().ok()
}

/// Normalizes a revenue figure in dollars from a JSON number or string.
pub fn normalize_revenue(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => match n.as_f64().filter(|v| v.is_finite() && *v >= 0.0) {
            Some(revenue) => Some(revenue),
            None => {
                tracing::warn!("Could not normalize revenue: {}", n);
                None
            }
        },
        Value::String(s) => parse_revenue(s),
        other => {
            tracing::warn!("Could not normalize revenue: {}", other);
            None
        }
    }
}

/// Parses "$750K", "1,200,000", or a range such as "$1M-$5M" (averaged).
pub fn parse_revenue(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some((lower, upper)) = cleaned.split_once('-') {
        if let (Some(lower), Some(upper)) = (
            parse_revenue_with_suffix(lower),
            parse_revenue_with_suffix(upper),
        ) {
            return Some((lower + upper) / 2.0);
        }
    }

    if let Some(revenue) = parse_revenue_with_suffix(cleaned) {
        return Some(revenue);
    }

    tracing::warn!("Could not normalize revenue: {}", raw);
    None
}

/// Parses a single amount with an optional K, M, or B suffix.
pub fn parse_revenue_with_suffix(raw: &str) -> Option<f64> {
    let text = raw.trim().to_ascii_uppercase();
    let (number, multiplier) = match text.chars().last()? {
        'K' => (&text[..text.len() - 1], 1e3),
        'M' => (&text[..text.len() - 1], 1e6),
        'B' => (&text[..text.len() - 1], 1e9),
        _ => (text.as_str(), 1.0),
    };
    number
        .trim()
        .parse::<f64>()
        .ok()
        .map(|v| v * multiplier)
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Trims and collapses whitespace in a free-text industry label.
pub fn normalize_industry_label(label: &str) -> String {
    whitespace_regex().replace_all(label.trim(), " ").to_string()
}

/// Builds an [`Address`] from a loosely shaped JSON object.
///
/// Each field takes the first non-empty value among its synonymous keys.
/// ZIP+4 codes are cut to five digits. Missing fields stay empty; `None` is
/// returned only for a non-object or when street, city, state and zip are all
/// empty.
pub fn normalize_address(raw: &Value) -> Option<Address> {
    let object = raw.as_object()?;
    let pick = |keys: &[&str]| -> String {
        keys.iter()
            .filter_map(|k| object.get(*k).and_then(Value::as_str))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .unwrap_or_default()
            .to_string()
    };

    let street = pick(STREET_KEYS);
    let city = pick(CITY_KEYS);
    let state = pick(STATE_KEYS);
    let zip = normalize_zip(&pick(ZIP_KEYS));
    if [&street, &city, &state, &zip].iter().all(|f| f.is_empty()) {
        return None;
    }

    let country = pick(COUNTRY_KEYS);
    Some(Address {
        street,
        city,
        state,
        zip,
        country: if country.is_empty() {
            "USA".to_string()
        } else {
            country
        },
    })
}

/// True when the lower-cased `text` contains any of the (lower-case) needles.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    needles.iter().any(|n| lowered.contains(n))
}

/// Truncates ZIP+4 at the hyphen.
pub fn normalize_zip(zip: &str) -> String {
    let zip = zip.trim();
    match zip.split_once('-') {
        Some((five, _)) => five.trim().to_string(),
        None => zip.to_string(),
    }
}

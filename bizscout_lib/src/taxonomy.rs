//! Industry taxonomy and code tables.
//!
//! Both tables are compiled into the binary from `seed_data/` and validated
//! when parsed. A table that fails validation is a configuration error.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// Error types for taxonomy loading.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("Failed to parse industry taxonomy YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Failed to parse industry code TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Duplicate category in taxonomy: {0}")]
    DuplicateCategory(String),
    #[error("Category {0} has no keywords")]
    EmptyKeywords(String),
    #[error("Keyword {keyword:?} in {category} overlaps {other_keyword:?} in {other_category}")]
    SharedKeyword {
        keyword: String,
        category: String,
        other_keyword: String,
        other_category: String,
    },
    #[error("Duplicate segment in taxonomy: {0}")]
    DuplicateSegment(String),
    #[error("Segment {segment} references unknown category {category}")]
    UnknownSegmentCategory { segment: String, category: String },
    #[error("Empty industry code for {0}")]
    EmptyCode(String),
    #[error("Duplicate industry code: {0}")]
    DuplicateCode(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct TaxonomyFile {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// A top-level industry with its keyword set and ordered subcategory rules.
#[derive(Deserialize, Debug, Clone)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub fallback: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub naics_prefixes: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryRule>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubcategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// A named slice of a category with description keywords.
#[derive(Deserialize, Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub category: String,
    pub keywords: Vec<String>,
}

impl Category {
    /// True when any keyword is a substring of the lower-cased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// First matching subcategory rule, or the fallback label.
    pub fn subcategory_for(&self, lowered: &str) -> &str {
        self.subcategories
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|rule| rule.name.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// True when `target` names this category by id or display name.
    pub fn is_named(&self, target: &str) -> bool {
        let target = target.trim();
        self.id.eq_ignore_ascii_case(target) || self.name.eq_ignore_ascii_case(target)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct IndustryCodeFile {
    #[serde(default)]
    pub naics: Vec<IndustryCode>,
    #[serde(default)]
    pub sic: Vec<IndustryCode>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IndustryCode {
    pub code: String,
    pub name: String,
    /// Closest NAICS equivalent for SIC entries.
    pub naics: Option<String>,
    #[serde(default)]
    pub subcodes: Vec<SubCode>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubCode {
    pub code: String,
    pub name: String,
}

/// Category keyword sets must not overlap, even as substrings, or the
/// later category could never claim text containing the shared word.
fn check_disjoint_keywords(categories: &[Category]) -> Result<(), TaxonomyError> {
    for (i, category) in categories.iter().enumerate() {
        for other in &categories[i + 1..] {
            for keyword in &category.keywords {
                if let Some(other_keyword) = other
                    .keywords
                    .iter()
                    .find(|k| k.contains(keyword.as_str()) || keyword.contains(k.as_str()))
                {
                    return Err(TaxonomyError::SharedKeyword {
                        keyword: keyword.clone(),
                        category: category.id.clone(),
                        other_keyword: other_keyword.clone(),
                        other_category: other.id.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Parse and validate the taxonomy YAML.
///
/// Keywords are lower-cased so matching can run against lower-cased text.
pub fn parse_taxonomy(yaml_content: &str) -> Result<TaxonomyFile, TaxonomyError> {
    let mut file: TaxonomyFile = serde_yml::from_str(yaml_content)?;

    let mut seen_categories = HashSet::new();
    for category in file.categories.iter_mut() {
        if !seen_categories.insert(category.id.to_lowercase()) {
            return Err(TaxonomyError::DuplicateCategory(category.id.clone()));
        }
        if category.keywords.is_empty() {
            return Err(TaxonomyError::EmptyKeywords(category.id.clone()));
        }
        lowercase_all(&mut category.keywords);
        for rule in category.subcategories.iter_mut() {
            if rule.keywords.is_empty() {
                return Err(TaxonomyError::EmptyKeywords(rule.name.clone()));
            }
            lowercase_all(&mut rule.keywords);
        }
    }

    check_disjoint_keywords(&file.categories)?;

    let mut seen_segments = HashSet::new();
    for segment in file.segments.iter_mut() {
        if !seen_segments.insert(segment.name.to_lowercase()) {
            return Err(TaxonomyError::DuplicateSegment(segment.name.clone()));
        }
        if !seen_categories.contains(&segment.category.to_lowercase()) {
            return Err(TaxonomyError::UnknownSegmentCategory {
                segment: segment.name.clone(),
                category: segment.category.clone(),
            });
        }
        lowercase_all(&mut segment.keywords);
    }

    Ok(file)
}

fn lowercase_all(keywords: &mut [String]) {
    for keyword in keywords.iter_mut() {
        *keyword = keyword.trim().to_lowercase();
    }
}

/// Parse and validate the NAICS/SIC code table.
pub fn parse_industry_codes(toml_content: &str) -> Result<IndustryCodeFile, TaxonomyError> {
    let file: IndustryCodeFile = toml::from_str(toml_content)?;

    for table in [&file.naics, &file.sic] {
        let mut seen = HashSet::new();
        for entry in table {
            if entry.code.trim().is_empty() {
                return Err(TaxonomyError::EmptyCode(entry.name.clone()));
            }
            if !seen.insert(entry.code.as_str()) {
                return Err(TaxonomyError::DuplicateCode(entry.code.clone()));
            }
            for sub in &entry.subcodes {
                if sub.code.trim().is_empty() {
                    return Err(TaxonomyError::EmptyCode(sub.name.clone()));
                }
                if !seen.insert(sub.code.as_str()) {
                    return Err(TaxonomyError::DuplicateCode(sub.code.clone()));
                }
            }
        }
    }

    Ok(file)
}

/// Load the taxonomy embedded from `seed_data/industry_taxonomy.yml`.
pub fn load_taxonomy() -> Result<TaxonomyFile, TaxonomyError> {
    parse_taxonomy(include_str!("../../seed_data/industry_taxonomy.yml"))
}

/// Load the code table embedded from `seed_data/industry_codes.toml`.
pub fn load_industry_codes() -> Result<IndustryCodeFile, TaxonomyError> {
    parse_industry_codes(include_str!("../../seed_data/industry_codes.toml"))
}

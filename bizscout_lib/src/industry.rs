//! Keyword and code based industry classification.

use std::sync::OnceLock;

use serde::Serialize;

use crate::models::Company;
use crate::taxonomy::{
    load_industry_codes, load_taxonomy, Category, IndustryCodeFile, Segment, TaxonomyError,
    TaxonomyFile,
};

/// Result of classifying free text against the taxonomy.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct IndustryClassification {
    /// The input text, unchanged.
    pub primary: String,
    pub category: String,
    pub subcategory: String,
}

/// A code table hit from a name search.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CodeMatch {
    pub code: String,
    pub code_type: CodeType,
    pub name: String,
    /// Set when the hit is a sub-code.
    pub parent_name: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodeType {
    Naics,
    Sic,
}

impl std::fmt::Display for CodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeType::Naics => write!(f, "NAICS"),
            CodeType::Sic => write!(f, "SIC"),
        }
    }
}

/// Classifies companies against an immutable taxonomy and code table.
#[derive(Debug, Clone)]
pub struct IndustryClassifier {
    taxonomy: TaxonomyFile,
    codes: IndustryCodeFile,
}

static EMBEDDED: OnceLock<IndustryClassifier> = OnceLock::new();

impl IndustryClassifier {
    pub fn new(taxonomy: TaxonomyFile, codes: IndustryCodeFile) -> Self {
        Self { taxonomy, codes }
    }

    /// The classifier built from the embedded seed data, loaded once per process.
    pub fn embedded() -> Result<&'static IndustryClassifier, TaxonomyError> {
        if let Some(classifier) = EMBEDDED.get() {
            return Ok(classifier);
        }
        let classifier = IndustryClassifier::new(load_taxonomy()?, load_industry_codes()?);
        Ok(EMBEDDED.get_or_init(|| classifier))
    }

    pub fn categories(&self) -> &[Category] {
        &self.taxonomy.categories
    }

    /// Looks up a category by id ("trucking") or display name ("Trucking & Logistics").
    pub fn category(&self, target: &str) -> Option<&Category> {
        self.taxonomy.categories.iter().find(|c| c.is_named(target))
    }

    /// Maps free text to a category and subcategory.
    ///
    /// The first category with a keyword in the text wins, then the first
    /// matching subcategory rule. Text with no keyword hit is "Other"/"Other";
    /// empty text yields empty fields.
    pub fn normalize_industry(&self, text: &str) -> IndustryClassification {
        if text.trim().is_empty() {
            return IndustryClassification::default();
        }
        let lowered = text.to_lowercase();
        match self.taxonomy.categories.iter().find(|c| c.matches(&lowered)) {
            Some(category) => IndustryClassification {
                primary: text.to_string(),
                category: category.name.clone(),
                subcategory: category.subcategory_for(&lowered).to_string(),
            },
            None => IndustryClassification {
                primary: text.to_string(),
                category: "Other".to_string(),
                subcategory: "Other".to_string(),
            },
        }
    }

    /// Names of NAICS entries (or sub-codes) and SIC entries whose code equals the input.
    pub fn match_by_industry_code(&self, naics: Option<&str>, sic: Option<&str>) -> Vec<String> {
        let mut matches = Vec::new();

        if let Some(naics) = naics.map(str::trim).filter(|c| !c.is_empty()) {
            for entry in &self.codes.naics {
                if entry.code == naics {
                    matches.push(entry.name.clone());
                    break;
                }
                if let Some(sub) = entry.subcodes.iter().find(|s| s.code == naics) {
                    matches.push(sub.name.clone());
                    break;
                }
            }
        }

        if let Some(sic) = sic.map(str::trim).filter(|c| !c.is_empty()) {
            if let Some(entry) = self.codes.sic.iter().find(|e| e.code == sic) {
                matches.push(entry.name.clone());
            }
        }

        matches
    }

    /// Case-insensitive substring search over code and sub-code names.
    pub fn get_industry_by_name(&self, name: &str) -> Vec<CodeMatch> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut matches = Vec::new();
        let tables = [
            (CodeType::Naics, &self.codes.naics),
            (CodeType::Sic, &self.codes.sic),
        ];
        for (code_type, table) in tables {
            for entry in table {
                if entry.name.to_lowercase().contains(&needle) {
                    matches.push(CodeMatch {
                        code: entry.code.clone(),
                        code_type,
                        name: entry.name.clone(),
                        parent_name: None,
                    });
                }
                for sub in &entry.subcodes {
                    if sub.name.to_lowercase().contains(&needle) {
                        matches.push(CodeMatch {
                            code: sub.code.clone(),
                            code_type,
                            name: sub.name.clone(),
                            parent_name: Some(entry.name.clone()),
                        });
                    }
                }
            }
        }
        matches
    }

    /// Industry membership: normalized category, NAICS prefix, or a
    /// category keyword in the description. Any one signal is enough.
    ///
    /// Companies without an industry record are never members. Unknown
    /// targets only match through the normalized category name.
    pub fn is_in_industry(&self, company: &Company, target: &str) -> bool {
        let Some(industry) = company.industry.as_ref() else {
            return false;
        };
        let category = self.category(target);

        if !industry.primary.trim().is_empty() {
            let classified = self.normalize_industry(&industry.primary);
            let hit = match category {
                Some(c) => c.name == classified.category,
                None => classified.category.eq_ignore_ascii_case(target.trim()),
            };
            if hit {
                return true;
            }
        }

        let Some(category) = category else {
            return false;
        };

        if let Some(naics) = industry.naics_code.as_deref() {
            if category
                .naics_prefixes
                .iter()
                .any(|prefix| naics.trim().starts_with(prefix.as_str()))
            {
                return true;
            }
        }

        if let Some(description) = company.description.as_deref() {
            if category.matches(&description.to_lowercase()) {
                return true;
            }
        }

        false
    }

    /// Segments configured for a category, in taxonomy order.
    pub fn segments(&self, target: &str) -> Vec<&Segment> {
        let Some(category) = self.category(target) else {
            return Vec::new();
        };
        self.taxonomy
            .segments
            .iter()
            .filter(|s| s.category.eq_ignore_ascii_case(&category.id))
            .collect()
    }

    /// Looks up a configured segment by name, ignoring case.
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.taxonomy
            .segments
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Segment membership. Needs both an industry record and a description;
    /// matches on the normalized subcategory or a segment description keyword.
    pub fn is_in_segment(&self, company: &Company, segment: &str) -> bool {
        let (Some(industry), Some(description)) =
            (company.industry.as_ref(), company.description.as_deref())
        else {
            return false;
        };

        if !industry.primary.trim().is_empty()
            && self.normalize_industry(&industry.primary).subcategory == segment
        {
            return true;
        }

        let lowered = description.to_lowercase();
        self.segment(segment)
            .map(|s| s.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .unwrap_or(false)
    }

    /// Returns the company with its classified subcategory first in
    /// `industry.subcategories`. Applying it twice changes nothing.
    pub fn annotate(&self, mut company: Company) -> Company {
        let Some(industry) = company.industry.as_mut() else {
            return company;
        };
        if industry.primary.trim().is_empty() {
            return company;
        }
        let classified = self.normalize_industry(&industry.primary);
        if classified.category == "Other" {
            return company;
        }
        industry.subcategories.retain(|s| s != &classified.subcategory);
        industry.subcategories.insert(0, classified.subcategory);
        company
    }
}

/// Classifies `text` with the embedded taxonomy.
pub fn normalize_industry(text: &str) -> Result<IndustryClassification, TaxonomyError> {
    Ok(IndustryClassifier::embedded()?.normalize_industry(text))
}

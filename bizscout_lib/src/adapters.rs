//! Conversion of provider payloads into partial company records.
//!
//! Each provider fills a different subset of fields. Partials are merged
//! into a [`Company`] in provider order, later non-empty values winning.

use std::fmt;

use bizscout_api::types::{ApolloContact, CompanyDetails, Organization, SummaryProfile};
use serde::Serialize;

use crate::models::{Address, Company, ContactInfo, Executive, Industry, LegalStructure};
use crate::normalize::{
    clean_company_name, normalize_address, normalize_employee_count, normalize_industry_label,
    normalize_revenue,
};

const NAME_MATCH_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provider {
    LinkedIn,
    Yahoo,
    Apollo,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::LinkedIn => write!(f, "LinkedIn"),
            Provider::Yahoo => write!(f, "Yahoo Finance"),
            Provider::Apollo => write!(f, "Apollo"),
        }
    }
}

/// A payload from one of the providers.
#[derive(Debug, Clone)]
pub enum ProviderRecord {
    LinkedIn(CompanyDetails),
    Yahoo(SummaryProfile),
    Apollo(Organization),
}

/// Fields one provider knows about a company. Empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPartial {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub address: Option<Address>,
    pub industry: Option<String>,
    pub naics_code: Option<String>,
    pub sic_code: Option<String>,
    pub subcategories: Vec<String>,
    pub employee_count: Option<u64>,
    pub estimated_revenue: Option<f64>,
    pub legal_structure: Option<LegalStructure>,
    pub executives: Vec<Executive>,
}

impl ProviderRecord {
    pub fn provider(&self) -> Provider {
        match self {
            ProviderRecord::LinkedIn(_) => Provider::LinkedIn,
            ProviderRecord::Yahoo(_) => Provider::Yahoo,
            ProviderRecord::Apollo(_) => Provider::Apollo,
        }
    }

    pub fn into_partial(self) -> CompanyPartial {
        match self {
            ProviderRecord::LinkedIn(details) => from_linkedin(details),
            ProviderRecord::Yahoo(profile) => from_yahoo(profile),
            ProviderRecord::Apollo(org) => from_apollo(org),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn address_of<T: Serialize>(raw: &T) -> Option<Address> {
    serde_json::to_value(raw)
        .ok()
        .and_then(|value| normalize_address(&value))
}

fn from_linkedin(details: CompanyDetails) -> CompanyPartial {
    let mut industries = details
        .industries
        .into_iter()
        .map(|i| normalize_industry_label(&i))
        .filter(|i| !i.is_empty());
    CompanyPartial {
        name: non_empty(details.name),
        description: non_empty(details.description),
        website: non_empty(details.website),
        address: details.locations.first().and_then(address_of),
        industry: industries.next(),
        subcategories: industries.collect(),
        employee_count: details.staff_count.as_ref().and_then(normalize_employee_count),
        ..Default::default()
    }
}

fn from_yahoo(profile: SummaryProfile) -> CompanyPartial {
    let address = address_of(&profile);
    let executives = profile
        .company_officers
        .iter()
        .filter_map(|officer| {
            let name = non_empty(officer.name.clone())?;
            let title = officer.title.clone().unwrap_or_default();
            Some(Executive::new(&name, title.trim()))
        })
        .collect();
    CompanyPartial {
        description: non_empty(profile.long_business_summary),
        website: non_empty(profile.website),
        address,
        industry: non_empty(profile.industry).map(|i| normalize_industry_label(&i)),
        naics_code: non_empty(profile.industry_key),
        sic_code: non_empty(profile.sector_key),
        employee_count: profile
            .full_time_employees
            .as_ref()
            .and_then(normalize_employee_count),
        executives,
        ..Default::default()
    }
}

fn from_apollo(org: Organization) -> CompanyPartial {
    let address = address_of(&org);
    let legal_structure =
        legal_structure_from_org_type(org.organization_type.as_deref(), org.description.as_deref());
    let executives = org
        .contacts
        .iter()
        .filter(|c| c.is_decision_maker)
        .filter_map(executive_from_contact)
        .collect();
    CompanyPartial {
        name: non_empty(Some(org.name)),
        description: non_empty(org.description),
        website: non_empty(org.website).or_else(|| non_empty(org.website_url)),
        address,
        industry: non_empty(org.industry).map(|i| normalize_industry_label(&i)),
        employee_count: org
            .estimated_num_employees
            .as_ref()
            .and_then(normalize_employee_count),
        estimated_revenue: org
            .estimated_annual_revenue
            .as_ref()
            .and_then(normalize_revenue),
        legal_structure,
        executives,
        ..Default::default()
    }
}

fn executive_from_contact(contact: &ApolloContact) -> Option<Executive> {
    let name = contact.full_name();
    if name.is_empty() {
        return None;
    }
    Some(Executive {
        name,
        role: contact.title.clone().unwrap_or_default(),
        contact_info: ContactInfo {
            phone: non_empty(contact.phone_number.clone()),
            email: non_empty(contact.email.clone()),
            linkedin_url: non_empty(contact.linkedin_url.clone()),
        },
    })
}

/// Maps an Apollo `organization_type` to a legal structure.
///
/// A "family" mention in the description marks a family business when the
/// type names no corporate form. Returns `None` when there is nothing to go on.
pub fn legal_structure_from_org_type(
    org_type: Option<&str>,
    description: Option<&str>,
) -> Option<LegalStructure> {
    let kind = org_type.unwrap_or("").trim().to_uppercase();
    let family_description = description
        .map(|d| d.to_lowercase().contains("family"))
        .unwrap_or(false);
    if kind.is_empty() && !family_description {
        return None;
    }

    let tokens: Vec<&str> = kind
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '.' | ','))
        .filter(|t| !t.is_empty())
        .collect();

    let structure = if kind.contains("LLC") {
        LegalStructure::Llc
    } else if kind.contains("CORP") {
        if tokens.iter().any(|t| *t == "S" || t.starts_with("SCORP")) {
            LegalStructure::SCorp
        } else {
            LegalStructure::CCorp
        }
    } else if kind.contains("FAMILY") || family_description {
        LegalStructure::FamilyOwned
    } else if kind.contains("PARTNERSHIP") {
        LegalStructure::Partnership
    } else if kind.contains("PROPRIETOR") {
        LegalStructure::SoleProprietorship
    } else {
        LegalStructure::Other
    };
    Some(structure)
}

/// Fuzzy company-name equality on cleaned, lower-cased names.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = clean_company_name(a).to_lowercase();
    let b = clean_company_name(b).to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    strsim::jaro_winkler(&a, &b) >= NAME_MATCH_THRESHOLD
}

impl Company {
    /// Returns the company with every non-empty field of `partial` applied.
    ///
    /// Executives and subcategories are appended, skipping names already present.
    pub fn apply_partial(mut self, partial: CompanyPartial) -> Company {
        if let Some(name) = partial.name {
            self.name = name;
        }
        if partial.description.is_some() {
            self.description = partial.description;
        }
        if partial.website.is_some() {
            self.website = partial.website;
        }
        if partial.address.is_some() {
            self.address = partial.address;
        }
        if let Some(count) = partial.employee_count {
            self.financials.employee_count = Some(count);
        }
        if let Some(revenue) = partial.estimated_revenue {
            self.financials.estimated_revenue = Some(revenue);
        }
        if partial.legal_structure.is_some() {
            self.legal_structure = partial.legal_structure;
        }

        let touches_industry = partial.industry.is_some()
            || partial.naics_code.is_some()
            || partial.sic_code.is_some()
            || !partial.subcategories.is_empty();
        if touches_industry {
            let industry = self.industry.get_or_insert_with(Industry::default);
            if let Some(primary) = partial.industry {
                industry.primary = primary;
            }
            if partial.naics_code.is_some() {
                industry.naics_code = partial.naics_code;
            }
            if partial.sic_code.is_some() {
                industry.sic_code = partial.sic_code;
            }
            for sub in partial.subcategories {
                if !industry.subcategories.iter().any(|s| s.eq_ignore_ascii_case(&sub)) {
                    industry.subcategories.push(sub);
                }
            }
        }

        for executive in partial.executives {
            match self
                .executives
                .iter_mut()
                .find(|e| e.name.eq_ignore_ascii_case(&executive.name))
            {
                Some(existing) => {
                    if !executive.role.is_empty() {
                        existing.role = executive.role;
                    }
                    let info = executive.contact_info;
                    if info.phone.is_some() {
                        existing.contact_info.phone = info.phone;
                    }
                    if info.email.is_some() {
                        existing.contact_info.email = info.email;
                    }
                    if info.linkedin_url.is_some() {
                        existing.contact_info.linkedin_url = info.linkedin_url;
                    }
                }
                None => self.executives.push(executive),
            }
        }

        self
    }
}

/// Builds a company from provider partials in the order given.
pub fn merge_partials(name: &str, partials: impl IntoIterator<Item = CompanyPartial>) -> Company {
    partials
        .into_iter()
        .fold(Company::new(&Company::generate_id(name), name), Company::apply_partial)
}

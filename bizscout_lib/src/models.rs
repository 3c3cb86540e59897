//! Canonical company data model shared by every pipeline stage.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing model enums from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown legal structure: {0}")]
    UnknownLegalStructure(String),
    #[error("Unknown outreach day: {0}")]
    UnknownDay(String),
    #[error("Unknown tax saving potential: {0}")]
    UnknownTaxPotential(String),
}

fn default_country() -> String {
    "USA".to_string()
}

/// Postal address. Country defaults to "USA".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default = "default_country")]
    pub country: String,
}

impl Address {
    pub fn new(street: &str, city: &str, state: &str, zip: &str) -> Self {
        Self {
            street: street.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
            country: default_country(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// Industry labels and classification codes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Industry {
    #[serde(default)]
    pub primary: String,
    pub naics_code: Option<String>,
    pub sic_code: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl Industry {
    pub fn new(primary: &str) -> Self {
        Self {
            primary: primary.to_string(),
            ..Default::default()
        }
    }

    pub fn with_naics(mut self, code: &str) -> Self {
        self.naics_code = Some(code.to_string());
        self
    }

    pub fn with_sic(mut self, code: &str) -> Self {
        self.sic_code = Some(code.to_string());
        self
    }

    pub fn with_subcategories(mut self, subcategories: &[&str]) -> Self {
        self.subcategories = subcategories.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Executive {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

impl Executive {
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            contact_info: ContactInfo::default(),
        }
    }
}

/// Size and growth figures. `growth_rate` is a percentage and may be negative.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Financials {
    pub employee_count: Option<u64>,
    pub estimated_revenue: Option<f64>,
    pub growth_rate: Option<f64>,
    pub capex_trends: Option<String>,
    pub payroll_trends: Option<String>,
}

/// Derived attractiveness for a tax-incentive pitch. Ordered `Low < Medium < High`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxSavingPotential {
    #[default]
    Low,
    Medium,
    High,
}

impl TaxSavingPotential {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for TaxSavingPotential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxSavingPotential {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(ModelError::UnknownTaxPotential(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxIndicators {
    pub recent_developments: Option<String>,
    pub grants_subsidies: Option<String>,
    pub government_contracts: Option<String>,
    pub succession_planning: Option<String>,
    pub financing_activity: Option<String>,
    #[serde(default)]
    pub tax_saving_potential: TaxSavingPotential,
}

/// Coordinates in degrees plus the outreach day bucket once assigned.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub region: Option<String>,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            region: None,
        }
    }

    /// True when both coordinates are finite and inside the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalStructure {
    Llc,
    SCorp,
    CCorp,
    FamilyOwned,
    Partnership,
    SoleProprietorship,
    Other,
}

impl LegalStructure {
    pub const ALL: [LegalStructure; 7] = [
        LegalStructure::Llc,
        LegalStructure::SCorp,
        LegalStructure::CCorp,
        LegalStructure::FamilyOwned,
        LegalStructure::Partnership,
        LegalStructure::SoleProprietorship,
        LegalStructure::Other,
    ];

    /// Wire form, e.g. `S_CORP`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Llc => "LLC",
            Self::SCorp => "S_CORP",
            Self::CCorp => "C_CORP",
            Self::FamilyOwned => "FAMILY_OWNED",
            Self::Partnership => "PARTNERSHIP",
            Self::SoleProprietorship => "SOLE_PROPRIETORSHIP",
            Self::Other => "OTHER",
        }
    }

    /// Human label used in reports and owner-operated text matching.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Llc => "LLC",
            Self::SCorp => "S-Corp",
            Self::CCorp => "C-Corp",
            Self::FamilyOwned => "Family-Owned Business",
            Self::Partnership => "Partnership",
            Self::SoleProprietorship => "Sole Proprietorship",
            Self::Other => "Other",
        }
    }

    pub fn is_corporation(&self) -> bool {
        matches!(self, Self::CCorp | Self::SCorp)
    }

    /// LLCs, family businesses, partnerships, and sole proprietorships.
    pub fn is_closely_held(&self) -> bool {
        matches!(
            self,
            Self::Llc | Self::FamilyOwned | Self::Partnership | Self::SoleProprietorship
        )
    }
}

impl fmt::Display for LegalStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LegalStructure {
    type Err = ModelError;

    /// Accepts the wire form or the label, ignoring case, spaces, and hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        match key.as_str() {
            "LLC" => Ok(Self::Llc),
            "S_CORP" | "SCORP" => Ok(Self::SCorp),
            "C_CORP" | "CCORP" => Ok(Self::CCorp),
            "FAMILY_OWNED" | "FAMILY_OWNED_BUSINESS" => Ok(Self::FamilyOwned),
            "PARTNERSHIP" => Ok(Self::Partnership),
            "SOLE_PROPRIETORSHIP" => Ok(Self::SoleProprietorship),
            "OTHER" => Ok(Self::Other),
            _ => Err(ModelError::UnknownLegalStructure(s.to_string())),
        }
    }
}

/// A company record as it flows through the pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<Address>,
    pub industry: Option<Industry>,
    #[serde(default)]
    pub executives: Vec<Executive>,
    #[serde(default)]
    pub financials: Financials,
    #[serde(default)]
    pub tax_indicators: TaxIndicators,
    pub location: Option<GeoLocation>,
    pub legal_structure: Option<LegalStructure>,
    pub website: Option<String>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Company {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            address: None,
            industry: None,
            executives: Vec::new(),
            financials: Financials::default(),
            tax_indicators: TaxIndicators::default(),
            location: None,
            legal_structure: None,
            website: None,
            last_updated: Utc::now(),
        }
    }

    /// Builds an id from the lower-cased name and the current unix timestamp,
    /// e.g. `acme-steel-1718000000`.
    pub fn generate_id(name: &str) -> String {
        let slug = name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("{}-{}", slug, Utc::now().timestamp())
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = Some(industry);
        self
    }

    pub fn with_financials(mut self, financials: Financials) -> Self {
        self.financials = financials;
        self
    }

    pub fn with_tax_indicators(mut self, indicators: TaxIndicators) -> Self {
        self.tax_indicators = indicators;
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoLocation::new(latitude, longitude));
        self
    }

    pub fn with_legal_structure(mut self, legal_structure: LegalStructure) -> Self {
        self.legal_structure = Some(legal_structure);
        self
    }

    pub fn with_executive(mut self, executive: Executive) -> Self {
        self.executives.push(executive);
        self
    }

    /// City from the address, if present and non-blank.
    pub fn city(&self) -> Option<&str> {
        self.address
            .as_ref()
            .map(|a| a.city.trim())
            .filter(|c| !c.is_empty())
    }

    /// Coordinates, if present and valid.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location
            .as_ref()
            .filter(|l| l.is_valid())
            .map(|l| (l.latitude, l.longitude))
    }
}

/// Lightweight stop carried inside a [`Route`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompanyReference {
    pub id: String,
    pub name: String,
    pub address: Address,
    pub coordinates: Option<(f64, f64)>,
    pub priority: u8,
}

impl CompanyReference {
    /// Returns `None` when the company has no address to visit.
    pub fn from_company(company: &Company) -> Option<Self> {
        let address = company.address.clone()?;
        Some(Self {
            id: company.id.clone(),
            name: company.name.clone(),
            address,
            coordinates: company.coordinates(),
            priority: 1,
        })
    }
}

/// An ordered day route.
///
/// `optimized_order` holds indices into the distance matrix where 0 is the
/// start location and `i` is `companies[i - 1]`. Membership changes clear
/// the computed plan.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Route {
    day: String,
    companies: Vec<CompanyReference>,
    total_distance: f64,
    estimated_travel_time: f64,
    optimized_order: Vec<usize>,
}

impl Route {
    pub fn new(day: &str) -> Self {
        Self {
            day: day.to_string(),
            ..Default::default()
        }
    }

    pub fn add_company(&mut self, company: CompanyReference) {
        self.companies.push(company);
        self.optimized_order.clear();
        self.total_distance = 0.0;
        self.estimated_travel_time = 0.0;
    }

    pub(crate) fn set_plan(&mut self, order: Vec<usize>, total_distance: f64, travel_time: f64) {
        self.optimized_order = order;
        self.total_distance = total_distance;
        self.estimated_travel_time = travel_time;
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn companies(&self) -> &[CompanyReference] {
        &self.companies
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn estimated_travel_time(&self) -> f64 {
        self.estimated_travel_time
    }

    pub fn optimized_order(&self) -> &[usize] {
        &self.optimized_order
    }

    pub fn is_optimized(&self) -> bool {
        !self.optimized_order.is_empty()
    }

    /// Companies in visiting order, skipping the start and return legs.
    pub fn ordered_companies(&self) -> Vec<&CompanyReference> {
        self.optimized_order
            .iter()
            .filter(|&&idx| idx > 0)
            .filter_map(|&idx| self.companies.get(idx - 1))
            .collect()
    }
}

/// Working day used for outreach scheduling.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutreachDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl OutreachDay {
    pub const ALL: [OutreachDay; 5] = [
        OutreachDay::Monday,
        OutreachDay::Tuesday,
        OutreachDay::Wednesday,
        OutreachDay::Thursday,
        OutreachDay::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
        }
    }
}

impl fmt::Display for OutreachDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutreachDay {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "tuesday" | "tue" | "tues" => Ok(Self::Tuesday),
            "wednesday" | "wed" => Ok(Self::Wednesday),
            "thursday" | "thu" | "thurs" => Ok(Self::Thursday),
            "friday" | "fri" => Ok(Self::Friday),
            _ => Err(ModelError::UnknownDay(s.to_string())),
        }
    }
}

/// Discovery query. Built with the `with_*` methods and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    name: Option<String>,
    industry: Option<String>,
    segment: Option<String>,
    location: Option<String>,
    min_employees: Option<u64>,
    min_revenue: Option<f64>,
    owner_operated: bool,
    growth_mode: bool,
    tax_potential: Option<TaxSavingPotential>,
}

impl SearchCriteria {
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_industry(mut self, industry: &str) -> Self {
        self.industry = Some(industry.to_string());
        self
    }

    pub fn with_segment(mut self, segment: &str) -> Self {
        self.segment = Some(segment.to_string());
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_min_employees(mut self, min: u64) -> Self {
        self.min_employees = Some(min);
        self
    }

    pub fn with_min_revenue(mut self, min: f64) -> Self {
        self.min_revenue = Some(min);
        self
    }

    pub fn with_owner_operated(mut self, flag: bool) -> Self {
        self.owner_operated = flag;
        self
    }

    pub fn with_growth_mode(mut self, flag: bool) -> Self {
        self.growth_mode = flag;
        self
    }

    pub fn with_tax_potential(mut self, potential: TaxSavingPotential) -> Self {
        self.tax_potential = Some(potential);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn min_employees(&self) -> Option<u64> {
        self.min_employees
    }

    pub fn min_revenue(&self) -> Option<f64> {
        self.min_revenue
    }

    pub fn owner_operated(&self) -> bool {
        self.owner_operated
    }

    pub fn growth_mode(&self) -> bool {
        self.growth_mode
    }

    pub fn tax_potential(&self) -> Option<TaxSavingPotential> {
        self.tax_potential
    }
}

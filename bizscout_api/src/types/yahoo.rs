//! Yahoo Finance `quoteSummary` payloads (summaryProfile module only).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummary,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct QuoteSummary {
    #[serde(default)]
    pub result: Vec<QuoteSummaryResult>,
    pub error: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    pub summary_profile: Option<SummaryProfile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryProfile {
    pub long_business_summary: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    /// Yahoo's industry key; stored as the NAICS code when present.
    pub industry_key: Option<String>,
    /// Yahoo's sector key; stored as the SIC code when present.
    pub sector_key: Option<String>,
    pub full_time_employees: Option<Value>,
    pub address1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub company_officers: Vec<CompanyOfficer>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CompanyOfficer {
    pub name: Option<String>,
    pub title: Option<String>,
}

impl QuoteSummaryResponse {
    /// The first result's profile, if Yahoo returned one.
    pub fn into_profile(self) -> Option<SummaryProfile> {
        self.quote_summary
            .result
            .into_iter()
            .next()
            .and_then(|r| r.summary_profile)
    }
}

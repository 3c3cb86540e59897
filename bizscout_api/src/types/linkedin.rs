//! LinkedIn company payloads, as returned inside the `data` envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    /// The first entry is the primary industry, the rest are subcategories.
    #[serde(default)]
    pub industries: Vec<String>,
    pub staff_count: Option<Value>,
    #[serde(default)]
    pub locations: Vec<CompanyLocation>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLocation {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

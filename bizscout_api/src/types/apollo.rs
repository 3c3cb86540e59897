//! Apollo.io organization payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Pagination;

/// Response of `GET /organizations/search`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OrganizationSearchResponse {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    pub pagination: Option<Pagination>,
}

/// Response of `GET /organizations/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OrganizationResponse {
    pub organization: Organization,
}

/// A single organization record.
///
/// Apollo reports head counts and revenue either as numbers or as
/// human-readable ranges ("50-200", "$1M-$5M"), so both are kept as raw
/// JSON values and normalized downstream.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Organization {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    /// Apollo names this field `website_url` on some endpoints.
    pub website_url: Option<String>,
    pub industry: Option<String>,
    pub estimated_num_employees: Option<Value>,
    pub estimated_annual_revenue: Option<Value>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub organization_type: Option<String>,
    #[serde(default)]
    pub contacts: Vec<ApolloContact>,
}

/// A person attached to an organization.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ApolloContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub is_decision_maker: bool,
}

impl ApolloContact {
    /// First and last name joined with a space, skipping missing parts.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

//! HTTP client for the LinkedIn, Yahoo Finance, and Apollo provider APIs.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{CompanyLookupQuery, OrganizationQuery, Query, StockProfileQuery},
    types::{
        CompanyDetails, OrganizationResponse, OrganizationSearchResponse, QuoteSummaryResponse,
        Response,
    },
    user_agent::get_user_agent,
    Error,
};

/// Base URLs for the three providers.
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub linkedin: String,
    pub yahoo: String,
    pub apollo: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            linkedin: "https://api.linkedin.com/v2".to_string(),
            yahoo: "https://query1.finance.yahoo.com/v10/finance".to_string(),
            apollo: "https://api.apollo.io/v1".to_string(),
        }
    }
}

impl Endpoints {
    /// Points every provider at the same base URL. Used for testing with wiremock.
    pub fn single(base_url: &str) -> Self {
        Self {
            linkedin: base_url.to_string(),
            yahoo: base_url.to_string(),
            apollo: base_url.to_string(),
        }
    }
}

/// HTTP client for the provider APIs.
///
/// Each request builds a fresh `reqwest::Client` with a randomized user
/// agent and a 30-second timeout. Apollo requests carry the API key as a
/// bearer token.
pub struct Client {
    endpoints: Endpoints,
    apollo_api_key: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Client {
    /// Creates a new client pointing at the production provider URLs.
    pub fn new(apollo_api_key: Option<String>) -> Self {
        Self {
            endpoints: Endpoints::default(),
            apollo_api_key,
        }
    }

    /// Creates a new client with explicit provider URLs.
    pub fn with_endpoints(endpoints: Endpoints, apollo_api_key: Option<String>) -> Self {
        Self {
            endpoints,
            apollo_api_key,
        }
    }

    /// Creates a new client with a single custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            endpoints: Endpoints::single(base_url),
            apollo_api_key: Some("test-key".to_string()),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn get_url(&self, base: &str, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", base, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    async fn get<T, Q>(
        &self,
        base: &str,
        path: &str,
        query: Option<&Q>,
        bearer: Option<&str>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let url = self.get_url(base, path, query)?;
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let mut request = client
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("accept-language", "en-US,en;q=0.9");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::RequestFailed
        })?;

        Ok(parsed)
    }

    fn apollo_key(&self) -> Result<&str, Error> {
        self.apollo_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey("Apollo"))
    }

    /// Fetches LinkedIn company details by company name or vanity username.
    pub async fn get_company_details(&self, username: &str) -> Result<CompanyDetails, Error> {
        let query = CompanyLookupQuery::new(username);
        let resp = self
            .get::<Response<CompanyDetails>, CompanyLookupQuery>(
                &self.endpoints.linkedin,
                "/get_company_details",
                Some(&query),
                None,
            )
            .await?;
        Ok(resp.data)
    }

    /// Fetches the Yahoo Finance stock profile for a ticker symbol.
    pub async fn get_stock_profile(
        &self,
        query: &StockProfileQuery,
    ) -> Result<QuoteSummaryResponse, Error> {
        self.get::<QuoteSummaryResponse, StockProfileQuery>(
            &self.endpoints.yahoo,
            "/get_stock_profile",
            Some(query),
            None,
        )
        .await
    }

    /// Searches Apollo organizations matching the given query.
    pub async fn search_organizations(
        &self,
        query: &OrganizationQuery,
    ) -> Result<OrganizationSearchResponse, Error> {
        let key = self.apollo_key()?;
        self.get::<OrganizationSearchResponse, OrganizationQuery>(
            &self.endpoints.apollo,
            "/organizations/search",
            Some(query),
            Some(key),
        )
        .await
    }

    /// Fetches a single Apollo organization by its identifier.
    pub async fn get_organization(&self, organization_id: &str) -> Result<OrganizationResponse, Error> {
        let key = self.apollo_key()?;
        self.get::<OrganizationResponse, OrganizationQuery>(
            &self.endpoints.apollo,
            format!("/organizations/{}", organization_id).as_str(),
            None,
            Some(key),
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

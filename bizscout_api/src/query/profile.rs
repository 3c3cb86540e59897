use url::Url;

use super::{common::QueryCommon, Query};

/// Query for the LinkedIn `/get_company_details` lookup.
#[derive(Default, Clone, Debug)]
pub struct CompanyLookupQuery {
    pub common: QueryCommon,
    pub username: String,
}

impl Query for CompanyLookupQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("username", self.username.as_str());
        url
    }
}

impl CompanyLookupQuery {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }
}

/// Query for the Yahoo Finance `/get_stock_profile` lookup.
#[derive(Clone, Debug)]
pub struct StockProfileQuery {
    pub common: QueryCommon,
    pub symbol: String,
    pub region: String,
}

impl Query for StockProfileQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("symbol", self.symbol.as_str())
            .append_pair("region", self.region.as_str());
        url
    }
}

impl StockProfileQuery {
    /// Builds a lookup for `symbol` in the default `US` region.
    pub fn new(symbol: &str) -> Self {
        Self {
            common: QueryCommon::default(),
            symbol: symbol.to_string(),
            region: "US".to_string(),
        }
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }
}

use url::Url;

use super::{common::QueryCommon, Query};

/// Query for Apollo's `/organizations/search`.
#[derive(Default, Clone, Debug)]
pub struct OrganizationQuery {
    pub common: QueryCommon,
    pub organization_name: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub min_employees: Option<u64>,
    pub max_employees: Option<u64>,
}

impl Query for OrganizationQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(name) = &self.organization_name {
            url.query_pairs_mut()
                .append_pair("q_organization_name", name.as_str());
        };
        if let Some(industry) = &self.industry {
            url.query_pairs_mut()
                .append_pair("q_industry_text", industry.as_str());
        };
        if let Some(location) = &self.location {
            url.query_pairs_mut()
                .append_pair("q_location", location.as_str());
        };
        if let Some(min) = self.min_employees {
            url.query_pairs_mut()
                .append_pair("num_employees", format!("gte:{}", min).as_str());
        }
        if let Some(max) = self.max_employees {
            url.query_pairs_mut()
                .append_pair("num_employees", format!("lte:{}", max).as_str());
        }

        self.common.add_to_url(&url)
    }
}

impl OrganizationQuery {
    pub fn with_organization_name(mut self, name: &str) -> Self {
        self.organization_name = Some(name.to_string());
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_industry(mut self, industry: &str) -> Self {
        self.industry = Some(industry.to_string());
        self
    }

    pub fn with_min_employees(mut self, min: u64) -> Self {
        self.min_employees = Some(min);
        self
    }

    pub fn with_max_employees(mut self, max: u64) -> Self {
        self.max_employees = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{OrganizationQuery, Query};

    #[test]
    fn test_organization_query() {
        let url = Url::parse("https://example.com").unwrap();

        insta::assert_snapshot!(OrganizationQuery::default()
            .with_organization_name("Acme")
            .with_industry("trucking")
            .with_location("Milwaukee")
            .with_min_employees(10)
            .with_max_employees(500)
            .with_page(2)
            .with_per_page(25)
            .add_to_url(&url)
            .as_str(), @"https://example.com/?q_organization_name=Acme&q_industry_text=trucking&q_location=Milwaukee&num_employees=gte%3A10&num_employees=lte%3A500&page=2&per_page=25");
    }
}

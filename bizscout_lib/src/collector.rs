//! Gathers company records from the three providers.

use bizscout_api::types::Organization;
use bizscout_api::{OrganizationQuery, Query};
use serde::Serialize;

use crate::adapters::{merge_partials, names_match, CompanyPartial, Provider, ProviderRecord};
use crate::client::ProviderClient;
use crate::config::Settings;
use crate::error::BizScoutError;
use crate::industry::IndustryClassifier;
use crate::models::Company;
use crate::similarity::{ScoredCompany, SimilarityScorer};
use crate::tax_potential::with_tax_potential;

/// A provider that could not contribute to a collected record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderFailure {
    pub provider: Provider,
    pub message: String,
}

/// The merged record plus which providers contributed and which failed.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub company: Company,
    pub sources: Vec<Provider>,
    pub failures: Vec<ProviderFailure>,
}

pub struct DataCollector {
    client: ProviderClient,
    classifier: &'static IndustryClassifier,
    settings: Settings,
}

impl DataCollector {
    pub fn new(client: ProviderClient, settings: Settings) -> Result<Self, BizScoutError> {
        Ok(Self {
            client,
            classifier: IndustryClassifier::embedded()?,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Queries LinkedIn, Yahoo Finance, and Apollo concurrently and merges
    /// what they return, in that order.
    ///
    /// A failing provider is recorded in the report and skipped. Payloads
    /// naming a different company are ignored.
    pub async fn collect_company(
        &self,
        name: &str,
        location: Option<&str>,
    ) -> Result<CollectionReport, BizScoutError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BizScoutError::InvalidInput("company name is empty".into()));
        }
        tracing::info!("Collecting data for {}", name);

        let symbol = ticker_symbol(name);
        let mut apollo_query = OrganizationQuery::default()
            .with_organization_name(name)
            .with_per_page(5);
        if let Some(location) = location {
            apollo_query = apollo_query.with_location(location);
        }

        let (linkedin, yahoo, apollo) = tokio::join!(
            self.client.company_details(name),
            self.client.stock_profile(&symbol),
            self.client.search_organizations(&apollo_query),
        );

        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut record_failure = |provider: Provider, err: BizScoutError| {
            tracing::warn!("{} lookup for {} failed: {}", provider, name, err);
            failures.push(ProviderFailure {
                provider,
                message: err.to_string(),
            });
        };

        match linkedin {
            Ok(details) => records.push(ProviderRecord::LinkedIn(details)),
            Err(e) => record_failure(Provider::LinkedIn, e),
        }
        match yahoo {
            Ok(Some(profile)) => records.push(ProviderRecord::Yahoo(profile)),
            Ok(None) => tracing::debug!("Yahoo Finance has no profile for {}", symbol),
            Err(e) => record_failure(Provider::Yahoo, e),
        }
        match apollo {
            Ok(resp) => {
                match resp
                    .organizations
                    .into_iter()
                    .find(|org| names_match(&org.name, name))
                {
                    Some(org) => records.push(ProviderRecord::Apollo(org)),
                    None => tracing::debug!("Apollo has no organization matching {}", name),
                }
            }
            Err(e) => record_failure(Provider::Apollo, e),
        }

        let mut sources = Vec::new();
        let mut partials: Vec<CompanyPartial> = Vec::new();
        for record in records {
            let provider = record.provider();
            let partial = record.into_partial();
            if let Some(found) = partial.name.as_deref() {
                if !names_match(found, name) {
                    tracing::warn!("{} returned {} for {}, ignoring", provider, found, name);
                    continue;
                }
            }
            sources.push(provider);
            partials.push(partial);
        }

        let company = self.finish(merge_partials(name, partials));
        tracing::info!(
            "Collected {} from {} providers ({} failed)",
            company.name,
            sources.len(),
            failures.len()
        );
        Ok(CollectionReport {
            company,
            sources,
            failures,
        })
    }

    /// Apollo search by industry, dropping companies below the configured
    /// minimum head count.
    pub async fn find_companies_by_industry(
        &self,
        industry: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Company>, BizScoutError> {
        let location = location.unwrap_or(self.settings.default_location.as_str());
        let min_employees = self.settings.min_employee_count;
        let query = OrganizationQuery::default()
            .with_industry(industry)
            .with_location(location)
            .with_min_employees(min_employees)
            .with_per_page(limit as i64);

        let resp = self.client.search_organizations(&query).await?;
        let companies: Vec<Company> = resp
            .organizations
            .into_iter()
            .map(|org| self.from_organization(org))
            .filter(|c| {
                c.financials
                    .employee_count
                    .map_or(true, |count| count >= min_employees)
            })
            .take(limit)
            .collect();
        tracing::info!(
            "Found {} {} companies near {}",
            companies.len(),
            industry,
            location
        );
        Ok(companies)
    }

    /// Apollo search for companies in the same industry as `company`, ranked
    /// by similarity. The company itself is left out.
    pub async fn find_similar_companies(
        &self,
        company: &Company,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoredCompany>, BizScoutError> {
        let industry = company
            .industry
            .as_ref()
            .map(|i| i.primary.trim())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                BizScoutError::InvalidInput(format!("{} has no industry to match on", company.name))
            })?;

        let mut query = OrganizationQuery::default()
            .with_industry(industry)
            .with_per_page((limit * 2).max(10) as i64);
        if let Some(location) = location.or_else(|| company.city()) {
            query = query.with_location(location);
        }

        let resp = self.client.search_organizations(&query).await?;
        let candidates: Vec<Company> = resp
            .organizations
            .into_iter()
            .filter(|org| !names_match(&org.name, &company.name))
            .map(|org| self.from_organization(org))
            .collect();

        Ok(SimilarityScorer::default().rank(company, &candidates, limit))
    }

    fn from_organization(&self, org: Organization) -> Company {
        let name = org.name.clone();
        self.finish(merge_partials(
            &name,
            [ProviderRecord::Apollo(org).into_partial()],
        ))
    }

    fn finish(&self, company: Company) -> Company {
        with_tax_potential(self.classifier.annotate(company))
    }
}

/// Yahoo symbol guess: the first word of the name, upper-cased.
pub fn ticker_symbol(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_first_word() {
        assert_eq!(ticker_symbol("Badger Freight Lines"), "BADGER");
        assert_eq!(ticker_symbol("  acme"), "ACME");
        assert_eq!(ticker_symbol(""), "");
    }
}

//! Caching, rate-limiting, and retrying wrapper around the provider client.

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use bizscout_api::types::{
    CompanyDetails, Organization, OrganizationSearchResponse, SummaryProfile,
};
use bizscout_api::{Client, OrganizationQuery, StockProfileQuery};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::MemoryCache;
use crate::config::Settings;
use crate::error::BizScoutError;

/// Backoff settings for retryable provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            max_delay_ms: 30000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("BIZSCOUT_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("BIZSCOUT_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("BIZSCOUT_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// Provider client that adds a response cache, spacing between requests,
/// and retries with exponential backoff.
///
/// Cache hits skip the network. On a miss the request waits until a random
/// interval within the configured range has passed since the previous request.
pub struct ProviderClient {
    inner: Client,
    cache: MemoryCache,
    retry: RetryConfig,
    min_interval: Duration,
    max_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl ProviderClient {
    pub fn new(inner: Client, cache: MemoryCache) -> Self {
        Self {
            inner,
            cache,
            retry: RetryConfig::from_env(),
            min_interval: Duration::from_millis(500),
            max_interval: Duration::from_millis(1500),
            last_request: Mutex::new(None),
        }
    }

    /// Client for the provider URLs and Apollo key in `settings`.
    pub fn from_settings(settings: &Settings, cache: MemoryCache) -> Self {
        Self::new(
            Client::with_endpoints(settings.endpoints(), settings.apollo_api_key.clone()),
            cache,
        )
    }

    /// Client pointing every provider at one base URL. Used for testing.
    pub fn with_base_url(base_url: &str, cache: MemoryCache) -> Self {
        Self::new(Client::with_base_url(base_url), cache)
            .with_retry(RetryConfig::disabled())
            .with_rate_limit(Duration::ZERO, Duration::ZERO)
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rate_limit(mut self, min_interval: Duration, max_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self.max_interval = max_interval.max(min_interval);
        self
    }

    async fn rate_limit(&self) {
        let sleep_dur = {
            let last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
            match *last {
                Some(last_time) if !self.max_interval.is_zero() => {
                    let delay = if self.max_interval > self.min_interval {
                        rand::thread_rng().gen_range(self.min_interval..self.max_interval)
                    } else {
                        self.min_interval
                    };
                    delay.checked_sub(last_time.elapsed())
                }
                _ => None,
            }
        };
        if let Some(dur) = sleep_dur {
            tokio::time::sleep(dur).await;
        }
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
    }

    async fn retrying<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, BizScoutError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BizScoutError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !err.is_retryable() {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn fetch_cached<T, F, Fut>(
        &self,
        cache_key: String,
        label: &str,
        fetch: F,
    ) -> Result<T, BizScoutError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, bizscout_api::Error>>,
    {
        if let Some(cached) = self.cache.get_json::<T>(&cache_key)? {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(cached);
        }

        let resp = self
            .retrying(label, || async {
                self.rate_limit().await;
                Ok(fetch().await?)
            })
            .await?;
        self.cache.set_json(cache_key, &resp);
        Ok(resp)
    }

    /// LinkedIn company details by company name or vanity username.
    pub async fn company_details(&self, username: &str) -> Result<CompanyDetails, BizScoutError> {
        let key = format!("linkedin:{}", username.trim().to_lowercase());
        self.fetch_cached(key, "LinkedIn", || self.inner.get_company_details(username))
            .await
    }

    /// Yahoo Finance profile for a ticker. `None` when Yahoo has no result.
    pub async fn stock_profile(&self, symbol: &str) -> Result<Option<SummaryProfile>, BizScoutError> {
        let query = StockProfileQuery::new(symbol);
        let key = format!("yahoo:{}", symbol.trim().to_uppercase());
        let resp = self
            .fetch_cached(key, "Yahoo Finance", || self.inner.get_stock_profile(&query))
            .await?;
        Ok(resp.into_profile())
    }

    pub async fn search_organizations(
        &self,
        query: &OrganizationQuery,
    ) -> Result<OrganizationSearchResponse, BizScoutError> {
        let key = format!("apollo:search:{:?}", query);
        self.fetch_cached(key, "Apollo search", || self.inner.search_organizations(query))
            .await
    }

    pub async fn organization(&self, organization_id: &str) -> Result<Organization, BizScoutError> {
        let key = format!("apollo:org:{}", organization_id);
        let resp = self
            .fetch_cached(key, "Apollo organization", || {
                self.inner.get_organization(organization_id)
            })
            .await?;
        Ok(resp.organization)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let cfg = RetryConfig {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 3000,
        };
        let first = cfg.delay_for_attempt(1).as_millis();
        assert!((800..=1200).contains(&first), "got {}", first);
        let second = cfg.delay_for_attempt(2).as_millis();
        assert!((1600..=2400).contains(&second), "got {}", second);
        let capped = cfg.delay_for_attempt(10).as_millis();
        assert!(capped <= 3600, "got {}", capped);
    }

    #[test]
    fn disabled_retry_has_no_attempts() {
        assert_eq!(RetryConfig::disabled().max_retries, 0);
        assert_eq!(RetryConfig::default().base_delay_ms, 2000);
    }

    #[test]
    fn rate_limit_range_is_ordered() {
        let client = ProviderClient::new(Client::default(), MemoryCache::new(Duration::from_secs(1)))
            .with_rate_limit(Duration::from_millis(300), Duration::from_millis(100));
        assert_eq!(client.min_interval, Duration::from_millis(300));
        assert_eq!(client.max_interval, Duration::from_millis(300));
    }

    fn fast_retry_client() -> ProviderClient {
        ProviderClient::new(Client::default(), MemoryCache::new(Duration::from_secs(1)))
            .with_retry(RetryConfig {
                max_retries: 2,
                base_delay_ms: 1,
                max_delay_ms: 1,
            })
            .with_rate_limit(Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn retrying_recovers_after_server_error() {
        let client = fast_retry_client();
        let calls = std::cell::Cell::new(0usize);
        let result = client
            .retrying("test", || {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move {
                    if attempt < 3 {
                        Err(BizScoutError::Api(bizscout_api::Error::HttpStatus {
                            status: 503,
                            body: String::new(),
                        }))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn retrying_stops_on_non_retryable_error() {
        let client = fast_retry_client();
        let calls = std::cell::Cell::new(0usize);
        let result: Result<(), _> = client
            .retrying("test", || {
                calls.set(calls.get() + 1);
                async { Err(BizScoutError::InvalidInput("bad".into())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}

//! Library layer for BizScout: company collection, classification, scoring,
//! discovery, and outreach route planning.
//!
//! Wraps the `bizscout_api` provider clients with an in-memory TTL cache,
//! rate limiting, and retries, merges their payloads into one `Company`
//! record, and runs the analysis and logistics stages over those records.

pub mod adapters;
pub mod cache;
pub mod client;
pub mod collector;
pub mod config;
pub mod db;
pub mod discovery;
pub mod error;
pub mod export;
pub mod industry;
pub mod logistics;
pub mod models;
pub mod normalize;
pub mod similarity;
pub mod tax_potential;
pub mod taxonomy;
pub mod validation;

pub use bizscout_api;
pub use bizscout_api::types;
pub use bizscout_api::{OrganizationQuery, Query};

pub use adapters::{merge_partials, CompanyPartial, Provider, ProviderRecord};
pub use cache::MemoryCache;
pub use client::{ProviderClient, RetryConfig};
pub use collector::{CollectionReport, DataCollector, ProviderFailure};
pub use config::Settings;
pub use db::{Db, DbError};
pub use discovery::{
    apply_criteria, filter_by_industry, filter_by_segment, is_in_growth_mode, is_owner_operated,
};
pub use error::BizScoutError;
pub use export::{export_csv, write_csv, ExportError};
pub use industry::{normalize_industry, CodeMatch, IndustryClassification, IndustryClassifier};
pub use logistics::{
    assign_companies_to_days, cluster_companies_by_region, create_route_map,
    generate_weekly_schedule, optimize_route, optimize_route_for_day, suggest_best_outreach_days,
    ClusterLabel, GeoDistance, HaversineDistance, RouteMap, RouteStrategy, Schedule,
    WeeklySchedule,
};
pub use models::{
    Address, Company, CompanyReference, ContactInfo, Executive, Financials, GeoLocation, Industry,
    LegalStructure, OutreachDay, Route, SearchCriteria, TaxIndicators, TaxSavingPotential,
};
pub use similarity::{
    rank_by_similarity, score_similarity, ScoredCompany, SimilarityScorer, SimilarityWeights,
};
pub use tax_potential::{
    assess_tax_potential, rank_by_tax_potential, score_tax_potential, TaxAssessment,
};
pub use taxonomy::TaxonomyError;

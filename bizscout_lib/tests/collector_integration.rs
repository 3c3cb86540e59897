use std::time::Duration;

use bizscout_lib::{
    DataCollector, IndustryClassifier, LegalStructure, MemoryCache, Provider, ProviderClient,
    Settings,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    let path = format!(
        "{}/../bizscout_api/tests/fixtures/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {}", path, e))
}

fn collector(server: &MockServer, settings: Settings) -> DataCollector {
    let client =
        ProviderClient::with_base_url(&server.uri(), MemoryCache::new(Duration::from_secs(60)));
    DataCollector::new(client, settings).expect("collector")
}

async fn mount_ok(server: &MockServer, route: &str, fixture: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture(fixture)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn collect_merges_all_three_providers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_company_details"))
        .and(query_param("username", "Badger Freight Lines"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("linkedin_company.json")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_stock_profile"))
        .and(query_param("symbol", "BADGER"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("yahoo_profile.json")),
        )
        .mount(&server)
        .await;
    mount_ok(&server, "/organizations/search", "organizations.json").await;

    let report = collector(&server, Settings::default())
        .collect_company("Badger Freight Lines", Some("Waukesha, WI"))
        .await
        .expect("collect");

    assert_eq!(
        report.sources,
        vec![Provider::LinkedIn, Provider::Yahoo, Provider::Apollo]
    );
    assert!(report.failures.is_empty());

    let company = report.company;
    assert_eq!(company.name, "Badger Freight Lines LLC");
    assert!(company.id.starts_with("badger-freight-lines-"));
    assert_eq!(company.financials.employee_count, Some(120));
    assert_eq!(company.financials.estimated_revenue, Some(30_000_000.0));
    assert_eq!(company.legal_structure, Some(LegalStructure::Llc));
    assert_eq!(company.city(), Some("Waukesha"));

    let industry = company.industry.as_ref().expect("industry");
    assert_eq!(industry.naics_code.as_deref(), Some("484121"));
    assert!(industry.subcategories.iter().any(|s| s == "Freight Carriers"));

    // Yahoo lists Dana as CEO; Apollo's decision-maker record updates the role and contact.
    assert_eq!(company.executives.len(), 2);
    let dana = company
        .executives
        .iter()
        .find(|e| e.name == "Dana Kowalski")
        .expect("Dana");
    assert_eq!(dana.role, "Owner & President");
    assert_eq!(dana.contact_info.phone.as_deref(), Some("262-555-0100"));

    let classifier = IndustryClassifier::embedded().unwrap();
    assert!(classifier.is_in_industry(&company, "trucking"));
}

#[tokio::test]
async fn failed_provider_is_reported_and_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_company_details"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    mount_ok(&server, "/get_stock_profile", "yahoo_profile.json").await;
    mount_ok(&server, "/organizations/search", "organizations.json").await;

    let report = collector(&server, Settings::default())
        .collect_company("Badger Freight Lines", None)
        .await
        .expect("collect");

    assert_eq!(report.sources, vec![Provider::Yahoo, Provider::Apollo]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].provider, Provider::LinkedIn);
    assert!(report.failures[0].message.contains("404"));
    assert_eq!(report.company.financials.employee_count, Some(120));
}

#[tokio::test]
async fn payloads_for_other_companies_are_ignored() {
    let server = MockServer::start().await;
    mount_ok(&server, "/get_company_details", "linkedin_company.json").await;
    Mock::given(method("GET"))
        .and(path("/get_stock_profile"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    mount_ok(&server, "/organizations/search", "organizations.json").await;

    let report = collector(&server, Settings::default())
        .collect_company("Acme Steel", None)
        .await
        .expect("collect");

    assert!(report.sources.is_empty());
    assert_eq!(report.company.name, "Acme Steel");
    assert!(report.company.description.is_none());
    assert!(report.company.executives.is_empty());
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let server = MockServer::start().await;
    let result = collector(&server, Settings::default())
        .collect_company("   ", None)
        .await;
    assert!(matches!(
        result,
        Err(bizscout_lib::BizScoutError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn industry_search_applies_minimum_headcount() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations/search"))
        .and(query_param("q_industry_text", "manufacturing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("organizations.json")),
        )
        .mount(&server)
        .await;

    let mut settings = Settings::default();
    settings.min_employee_count = 121;
    let companies = collector(&server, settings)
        .find_companies_by_industry("manufacturing", Some("Racine, WI"), 10)
        .await
        .expect("search");

    // Badger has 120 employees; Lakeshore's "50-200" range averages to 125.
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].name, "Lakeshore Fabrication Inc");
    assert_eq!(companies[0].legal_structure, Some(LegalStructure::SCorp));
}

#[tokio::test]
async fn similar_companies_exclude_the_reference() {
    let server = MockServer::start().await;
    mount_ok(&server, "/organizations/search", "organizations.json").await;

    let reference = bizscout_lib::Company::new("ref", "Lakeshore Fabrication")
        .with_industry(bizscout_lib::Industry::new("Manufacturing"))
        .with_address(bizscout_lib::Address::new("", "Racine", "WI", "53403"));

    let similar = collector(&server, Settings::default())
        .find_similar_companies(&reference, None, 5)
        .await
        .expect("similar");

    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].company.name, "Badger Freight Lines LLC");
    assert!((0.0..=1.0).contains(&similar[0].score));
}

#[tokio::test]
async fn similar_requires_an_industry() {
    let server = MockServer::start().await;
    let result = collector(&server, Settings::default())
        .find_similar_companies(&bizscout_lib::Company::new("x", "Nameless"), None, 5)
        .await;
    assert!(result.is_err());
}

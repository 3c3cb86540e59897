use bizscout_api::{CompanyLookupQuery, OrganizationQuery, Query, StockProfileQuery};
use url::Url;

fn base_url() -> Url {
    Url::parse("https://example.com").unwrap()
}

#[test]
fn organization_query_defaults() {
    let url = OrganizationQuery::default().add_to_url(&base_url());
    assert_eq!(url.query(), Some("page=1"));
}

#[test]
fn organization_query_encodes_spaces() {
    let url = OrganizationQuery::default()
        .with_organization_name("Badger Freight")
        .with_location("West Bend")
        .add_to_url(&base_url());
    let query = url.query().unwrap();
    assert!(query.contains("q_organization_name=Badger+Freight"));
    assert!(query.contains("q_location=West+Bend"));
}

#[test]
fn organization_query_employee_range() {
    let url = OrganizationQuery::default()
        .with_min_employees(10)
        .add_to_url(&base_url());
    let query = url.query().unwrap();
    assert!(query.contains("num_employees=gte%3A10"));
    assert!(!query.contains("lte"));
}

#[test]
fn organization_query_paging() {
    let url = OrganizationQuery::default()
        .with_page(3)
        .with_per_page(50)
        .add_to_url(&base_url());
    let query = url.query().unwrap();
    assert!(query.contains("page=3"));
    assert!(query.contains("per_page=50"));
}

#[test]
fn company_lookup_query() {
    let url = CompanyLookupQuery::new("acme").add_to_url(&base_url());
    assert_eq!(url.query(), Some("username=acme"));
}

#[test]
fn stock_profile_query_region() {
    let url = StockProfileQuery::new("ACME").add_to_url(&base_url());
    assert_eq!(url.query(), Some("symbol=ACME&region=US"));

    let url = StockProfileQuery::new("ACME")
        .with_region("CA")
        .add_to_url(&base_url());
    assert_eq!(url.query(), Some("symbol=ACME&region=CA"));
}

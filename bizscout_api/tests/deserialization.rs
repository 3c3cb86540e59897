use bizscout_api::types::{
    CompanyDetails, OrganizationResponse, OrganizationSearchResponse, QuoteSummaryResponse,
    Response,
};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_organizations_full() {
    let json = load_fixture("organizations.json");
    let resp: OrganizationSearchResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.organizations.len(), 2);
    let paging = resp.pagination.unwrap();
    assert_eq!(paging.total_entries, 2);

    let org = &resp.organizations[0];
    assert_eq!(org.id.as_deref(), Some("5f2a9c1e"));
    assert_eq!(org.estimated_num_employees, Some(serde_json::json!(120)));
    assert_eq!(
        org.estimated_annual_revenue,
        Some(serde_json::json!("$10M-$50M"))
    );
    assert_eq!(org.postal_code.as_deref(), Some("53186-1234"));
    assert_eq!(org.contacts.len(), 2);
    assert!(org.contacts[0].is_decision_maker);
    assert_eq!(org.contacts[0].full_name(), "Dana Kowalski");
    assert!(!org.contacts[1].is_decision_maker);
}

#[test]
fn deserialize_organization_sparse_fields() {
    let json = load_fixture("organizations.json");
    let resp: OrganizationSearchResponse = serde_json::from_str(&json).unwrap();
    let org = &resp.organizations[1];
    assert!(org.description.is_none());
    assert!(org.street_address.is_none());
    assert!(org.contacts.is_empty());
    assert_eq!(org.estimated_num_employees, Some(serde_json::json!("50-200")));
}

#[test]
fn deserialize_empty_search() {
    let resp: OrganizationSearchResponse = serde_json::from_str("{}").unwrap();
    assert!(resp.organizations.is_empty());
    assert!(resp.pagination.is_none());
}

#[test]
fn deserialize_single_organization() {
    let json = load_fixture("organization.json");
    let resp: OrganizationResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.organization.organization_type.as_deref(), Some("S Corp"));
}

#[test]
fn deserialize_linkedin_company() {
    let json = load_fixture("linkedin_company.json");
    let resp: Response<CompanyDetails> = serde_json::from_str(&json).unwrap();
    let details = resp.data;
    assert_eq!(details.industries.len(), 3);
    assert_eq!(details.staff_count, Some(serde_json::json!("51-200")));
    assert_eq!(details.locations[0].postal_code.as_deref(), Some("53186"));
}

#[test]
fn deserialize_yahoo_profile() {
    let json = load_fixture("yahoo_profile.json");
    let resp: QuoteSummaryResponse = serde_json::from_str(&json).unwrap();
    let profile = resp.into_profile().unwrap();
    assert_eq!(profile.sector_key.as_deref(), Some("4213"));
    assert_eq!(profile.full_time_employees, Some(serde_json::json!(135)));
    assert_eq!(profile.company_officers[0].title.as_deref(), Some("CEO & Founder"));
}

#[test]
fn deserialize_yahoo_empty_result() {
    let resp: QuoteSummaryResponse =
        serde_json::from_str(r#"{"quoteSummary": {"result": [], "error": null}}"#).unwrap();
    assert!(resp.into_profile().is_none());
}

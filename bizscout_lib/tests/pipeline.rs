//! End-to-end runs over hand-built records: classify, score, store, filter,
//! export, and plan the week.

use bizscout_lib::logistics::schedule::Schedule;
use bizscout_lib::{
    apply_criteria, assess_tax_potential, cluster_companies_by_region, create_route_map,
    generate_weekly_schedule, rank_by_similarity, rank_by_tax_potential, score_similarity,
    tax_potential::with_tax_potential, write_csv, Address, ClusterLabel, Company, Db, Financials,
    HaversineDistance, Industry, IndustryClassifier, LegalStructure, OutreachDay, SearchCriteria,
    TaxIndicators, TaxSavingPotential,
};

fn manufacturer(id: &str, name: &str, city: &str, lat: f64, lon: f64) -> Company {
    Company::new(id, name)
        .with_description("Precision machining and metal fabrication")
        .with_address(Address::new("100 Industrial Dr", city, "WI", "53000"))
        .with_industry(Industry::new("Fabricated Metal").with_naics("332312"))
        .with_financials(Financials {
            employee_count: Some(1000),
            estimated_revenue: Some(100_000_000.0),
            growth_rate: Some(20.0),
            ..Default::default()
        })
        .with_legal_structure(LegalStructure::CCorp)
        .with_location(lat, lon)
}

fn builder_in_illinois() -> Company {
    Company::new("cedar", "Cedar Builders")
        .with_description("Commercial general contractor")
        .with_address(Address::new("9 Oak St", "Rockford", "IL", "61101"))
        .with_industry(Industry::new("Commercial Construction").with_naics("236220"))
        .with_financials(Financials {
            employee_count: Some(10),
            estimated_revenue: Some(500_000.0),
            growth_rate: Some(-5.0),
            ..Default::default()
        })
        .with_legal_structure(LegalStructure::Llc)
        .with_location(42.2711, -89.0940)
}

fn five_signal_company() -> Company {
    Company::new("lake", "Lakeshore Fabrication")
        .with_address(Address::new("400 Lake Ave", "Racine", "WI", "53403"))
        .with_financials(Financials {
            employee_count: Some(180),
            estimated_revenue: Some(18_000_000.0),
            growth_rate: Some(22.0),
            payroll_trends: Some("Aggressive hiring across all shifts".into()),
            capex_trends: Some("Opened a new facility in 2024".into()),
        })
        .with_tax_indicators(TaxIndicators {
            succession_planning: Some("Formal succession plan in place".into()),
            government_contracts: Some("Federal contract award for DoD parts".into()),
            ..Default::default()
        })
        .with_location(42.7261, -87.7829)
}

#[test]
fn near_identical_records_score_high() {
    let a = manufacturer("a", "Acme Steel", "Racine", 42.7261, -87.7829);
    let b = manufacturer("b", "Acme Steel Works", "Racine", 42.7261, -87.7829);
    assert!(score_similarity(&a, &b) >= 0.9);
}

#[test]
fn unrelated_records_score_low() {
    let a = manufacturer("a", "Acme Steel", "Racine", 42.7261, -87.7829);
    let score = score_similarity(&a, &builder_in_illinois());
    assert!(score <= 0.3, "got {}", score);
}

#[test]
fn ranking_puts_the_twin_first() {
    let reference = manufacturer("a", "Acme Steel", "Racine", 42.7261, -87.7829);
    let candidates = vec![
        builder_in_illinois(),
        manufacturer("b", "Acme Steel Works", "Racine", 42.7261, -87.7829),
        reference.clone(),
    ];
    let ranked = rank_by_similarity(&reference, &candidates, 10);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].company.id, "b");
    assert!(ranked[0].score > ranked[1].score);
}

#[test]
fn five_strong_signals_rate_high() {
    let company = five_signal_company();
    let assessment = assess_tax_potential(&company);
    assert_eq!(assessment.potential, TaxSavingPotential::High);
    assert!((assessment.weighted - 1.0).abs() < 1e-9);

    let ranked = rank_by_tax_potential(&[builder_in_illinois(), company]);
    assert_eq!(ranked[0].0.id, "lake");
    assert_eq!(ranked[0].1, TaxSavingPotential::High);
    assert_eq!(ranked[1].1, TaxSavingPotential::Low);
}

#[test]
fn classify_store_and_discover() {
    let classifier = IndustryClassifier::embedded().expect("taxonomy");
    let companies: Vec<Company> = vec![
        manufacturer("a", "Acme Steel", "Racine", 42.7261, -87.7829),
        builder_in_illinois(),
        five_signal_company(),
    ]
    .into_iter()
    .map(|c| with_tax_potential(classifier.annotate(c)))
    .collect();

    let in_memory = apply_criteria(
        classifier,
        &companies,
        &SearchCriteria::default()
            .with_industry("manufacturing")
            .with_location("WI"),
    );
    assert_eq!(in_memory.len(), 1);
    assert_eq!(in_memory[0].id, "a");

    let mut db = Db::open_in_memory().expect("db");
    db.init().expect("init");
    assert_eq!(db.save_all(&companies).unwrap(), 3);

    let high = db
        .search(
            &SearchCriteria::default().with_tax_potential(TaxSavingPotential::High),
            None,
        )
        .unwrap();
    let ids: Vec<&str> = high.iter().map(|c| c.id.as_str()).collect();
    assert!(ids.contains(&"lake"));
    assert!(!ids.contains(&"cedar"));

    let mut csv = Vec::new();
    assert_eq!(write_csv(&high, &mut csv).unwrap(), high.len());
    let text = String::from_utf8(csv).unwrap();
    assert!(text.contains("Lakeshore Fabrication"));
    assert!(text.contains("HIGH"));
}

#[test]
fn week_covers_every_day_and_company() {
    let companies = vec![
        manufacturer("w", "Waukesha Tool", "Waukesha", 43.0117, -88.2315),
        manufacturer("r", "Racine Gear", "Racine", 42.7261, -87.7829),
        manufacturer("m", "Madison Molding", "Madison", 43.0731, -89.4012),
        manufacturer("g", "Green Bay Boxes", "Green Bay", 44.5133, -88.0133),
        Company::new("x", "No Address Co"),
    ];

    let weekly = generate_weekly_schedule(&companies, &Schedule::default(), &HaversineDistance);
    assert_eq!(weekly.routes().len(), 5);
    assert_eq!(weekly.company_count(), 4);

    let stop_ids = |day: OutreachDay| -> Vec<String> {
        weekly
            .route(day)
            .map(|r| r.companies().iter().map(|c| c.id.clone()).collect())
            .unwrap_or_default()
    };
    assert_eq!(stop_ids(OutreachDay::Monday), vec!["w"]);
    assert_eq!(stop_ids(OutreachDay::Tuesday), vec!["r"]);
    assert_eq!(stop_ids(OutreachDay::Wednesday), vec!["m"]);
    assert_eq!(stop_ids(OutreachDay::Thursday), vec!["g"]);
    assert!(stop_ids(OutreachDay::Friday).is_empty());
    assert!(weekly.total_distance() > 0.0);

    let tuesday = weekly.route(OutreachDay::Tuesday).unwrap();
    let map = create_route_map(tuesday, Schedule::default().start_location(OutreachDay::Tuesday));
    let json: serde_json::Value =
        serde_json::from_str(&map.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["type"], "FeatureCollection");
    // Start point, one stop, and the driving line.
    assert_eq!(json["features"].as_array().unwrap().len(), 3);
}

#[test]
fn nearby_companies_cluster_together() {
    let companies = vec![
        manufacturer("a", "A", "Racine", 42.7261, -87.7829),
        manufacturer("b", "B", "Racine", 42.7300, -87.7900),
        manufacturer("c", "C", "Madison", 43.0731, -89.4012),
    ];
    let clusters = cluster_companies_by_region(&companies);
    let first = clusters.get(&ClusterLabel::Cluster(0)).expect("cluster");
    assert_eq!(first.len(), 2);
    assert_eq!(clusters.get(&ClusterLabel::Noise).map(Vec::len), Some(1));
}

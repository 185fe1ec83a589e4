//! End-to-end pipeline tests.
//!
//! Trains a small pipeline on an in-memory reference population and
//! exercises the three caller-facing operations: predict, peer comparison,
//! and direct comparison.

use std::io::Write;

use viabilidad::prelude::*;

fn profile(json: &str) -> OrganizationProfile {
    serde_json::from_str(json).expect("valid profile json")
}

fn population_profiles() -> Vec<OrganizationProfile> {
    vec![
        profile(
            r#"{"Organization_Name": "PayFlow", "Industries": "Fintech, Payments",
                "Headquarters_Location": "San Francisco", "Estimated_Revenue": "$10M to $50M",
                "Founded_Date": 2014, "Investment_Stage": "Series B",
                "Industry_Groups": "Financial Services", "Number_of_Founders": 2,
                "Number_of_Employees": "101-250", "Number_of_Funding_Rounds": 4,
                "Funding_Status": "Late Stage Venture", "Total_Funding_Amount": "$80M",
                "Growth_Category": "High Growth", "Growth_Confidence": "High",
                "Monthly_visit": 500000, "Visit_Duration_Growth": 0.2,
                "Patents_Granted": 3, "Visit_Duration": 240}"#,
        ),
        profile(
            r#"{"Organization_Name": "LendFast", "Industries": "Fintech, Lending",
                "Headquarters_Location": "San Francisco", "Estimated_Revenue": "$1M to $10M",
                "Founded_Date": 2018, "Investment_Stage": "Series A",
                "Number_of_Founders": 3, "Number_of_Employees": "11-50",
                "Number_of_Funding_Rounds": 2, "Total_Funding_Amount": "$12M",
                "Growth_Confidence": "Medium", "Monthly_visit": 80000}"#,
        ),
        profile(
            r#"{"Organization_Name": "AgroSense", "Industries": "Agriculture, Sensors",
                "Headquarters_Location": "Des Moines", "Estimated_Revenue": "Less than $1M",
                "Founded_Date": 2021, "Investment_Stage": "Seed",
                "Number_of_Founders": 2, "Number_of_Employees": "1-10",
                "Number_of_Funding_Rounds": 1, "Total_Funding_Amount": "$500K",
                "Growth_Confidence": "Low", "Monthly_visit": 3000}"#,
        ),
        profile(
            r#"{"Organization_Name": "RoboWeld", "Industries": "Robotics, Manufacturing",
                "Headquarters_Location": "Detroit", "Estimated_Revenue": "$1M to $10M",
                "Founded_Date": 2016, "Investment_Stage": "Series A",
                "Number_of_Founders": 1, "Number_of_Employees": "51-100",
                "Number_of_Funding_Rounds": 3, "Total_Funding_Amount": "$25M",
                "Growth_Confidence": "Medium", "Patents_Granted": 7}"#,
        ),
        profile(
            r#"{"Organization_Name": "ShopTrail", "Industries": "E-Commerce, Retail",
                "Headquarters_Location": "New York", "Estimated_Revenue": "Unknown",
                "Founded_Date": 2019, "Investment_Stage": "Seed",
                "Number_of_Founders": 2, "Number_of_Employees": "11-50",
                "Total_Funding_Amount": "$2M", "Growth_Confidence": "Low"}"#,
        ),
        profile(
            r#"{"Organization_Name": "CloudParse", "Industries": "SaaS, Analytics",
                "Headquarters_Location": "Austin", "Estimated_Revenue": "$1M to $10M",
                "Founded_Date": 2017, "Investment_Stage": "Series A",
                "Number_of_Founders": 2, "Number_of_Employees": "11-50",
                "Number_of_Funding_Rounds": 2, "Total_Funding_Amount": "$9M",
                "Growth_Confidence": "High", "Monthly_visit": 120000}"#,
        ),
    ]
}

fn statuses() -> Vec<String> {
    vec![
        "Active".into(),
        "Active".into(),
        "Closed".into(),
        "Active".into(),
        "Closed".into(),
        "Active".into(),
    ]
}

fn trained_pipeline() -> ViabilityPipeline {
    ViabilityPipeline::train(
        ReferencePopulation::from_profiles(population_profiles()),
        &statuses(),
        Box::new(PriorClassifier::new()),
        2025.0,
    )
    .expect("training succeeds")
}

fn subject() -> OrganizationProfile {
    profile(
        r#"{"Organization_Name": "PayNova", "Industries": "Fintech, Payments",
            "Headquarters_Location": "San Francisco", "Estimated_Revenue": "$1M to $10M",
            "Founded_Date": 2020, "Investment_Stage": "Seed",
            "Number_of_Founders": 2, "Number_of_Employees": "11-50",
            "Number_of_Funding_Rounds": 2, "Total_Funding_Amount": "$4M",
            "Growth_Confidence": "High", "Monthly_visit": 40000}"#,
    )
}

#[test]
fn test_predict_full_bundle() {
    let pipeline = trained_pipeline();
    let result = pipeline.predict(&subject()).expect("predict");

    assert!(["Active", "Closed"].contains(&result.practical.label.as_str()));
    assert!(["Successful", "Struggling"].contains(&result.practical.display_label.as_str()));
    let p = result.practical.probability.expect("finite probability");
    assert!((0.0..=1.0).contains(&p));
    assert!(matches!(
        result.confidence_tier,
        ConfidenceTier::Low | ConfidenceTier::Medium | ConfidenceTier::High
    ));

    let raw_sum: f64 = result.raw_probabilities.iter().sum();
    let adj_sum: f64 = result.adjusted_probabilities.iter().sum();
    assert!((raw_sum - 1.0).abs() < 1e-9);
    assert!((adj_sum - 1.0).abs() < 1e-9);
    assert!(result.comparison.adjustment.abs() <= 0.2 + 1e-12);
}

#[test]
fn test_predict_is_reproducible() {
    let pipeline = trained_pipeline();
    let a = pipeline.predict(&subject()).expect("predict");
    let b = pipeline.predict(&subject()).expect("predict");
    assert_eq!(a.practical.label, b.practical.label);
    assert_eq!(a.practical.probability, b.practical.probability);
    assert_eq!(a.comparison.random_factor, b.comparison.random_factor);
    assert_eq!(a.adjusted_probabilities, b.adjusted_probabilities);
}

#[test]
fn test_predict_with_mostly_missing_fields() {
    // 10 of the 18 substantive attributes absent.
    let sparse = profile(
        r#"{"Organization_Name": "Sparse", "Industries": "Fintech",
            "Estimated_Revenue": "$1M to $10M", "Founded_Date": 2020,
            "Number_of_Employees": "11-50", "Growth_Confidence": "Medium",
            "Number_of_Funding_Rounds": 1, "Investment_Stage": "Seed"}"#,
    );
    let pipeline = trained_pipeline();
    let result = pipeline.predict(&sparse).expect("predict");
    assert!(["Active", "Closed"].contains(&result.practical.label.as_str()));
}

#[test]
fn test_predict_rejects_empty_profile() {
    let pipeline = trained_pipeline();
    let err = pipeline
        .predict(&OrganizationProfile::default())
        .expect_err("empty profile");
    assert!(matches!(err, ViabilidadError::Validation { .. }));
}

#[test]
fn test_peer_report_invariants() {
    let pipeline = trained_pipeline();
    let pop = ReferencePopulation::from_profiles(population_profiles());
    let report = pipeline
        .peer_comparison(&subject(), &pop, 5)
        .expect("peer report");

    assert_eq!(report.subject_name, "PayNova");
    assert!(report.peer_names.len() <= 5);
    assert!(!report.peer_names.contains(&"PayNova".to_string()));

    // Pros and cons partition the selected features exactly (no
    // placeholders expected for this subject).
    let has_placeholder = report.pros.iter().any(|p| p.starts_with("No strengths"))
        || report.cons.iter().any(|c| c.starts_with("No weaknesses"));
    if !has_placeholder {
        assert_eq!(
            report.pros.len() + report.cons.len(),
            report.raw_comparison.len()
        );
        for p in &report.pros {
            assert!(!report.cons.contains(p), "{p} appears in both buckets");
        }
    }

    // Chart series cover the same features and carry only finite values.
    assert_eq!(report.bar_chart.len(), report.raw_comparison.len());
    for bar in &report.bar_chart {
        assert!(bar.z_score.is_finite());
    }
    for spoke in &report.radar_chart {
        assert!(spoke.subject_z_score.is_finite());
        assert_eq!(spoke.peer_average, 0.0);
    }

    // The subject's own metrics are appended last in peer_data.
    assert_eq!(report.peer_data.len(), report.peer_names.len() + 1);
    assert_eq!(report.peer_data.last().expect("non-empty").name, "PayNova");
}

#[test]
fn test_peer_report_serializes_without_nan() {
    let pipeline = trained_pipeline();
    let pop = ReferencePopulation::from_profiles(population_profiles());
    let report = pipeline
        .peer_comparison(&subject(), &pop, 3)
        .expect("peer report");
    let json = serde_json::to_string(&report).expect("serializable");
    assert!(!json.contains("NaN"));
}

#[test]
fn test_direct_comparison() {
    let pipeline = trained_pipeline();
    let pop = ReferencePopulation::from_profiles(population_profiles());

    let report = pipeline
        .compare_to_named(&subject(), &pop, "PayFlow")
        .expect("direct report");
    assert_eq!(report.compared_to, "PayFlow");
    assert!(!report.pros.is_empty());
    assert!(!report.cons.is_empty());

    let err = pipeline
        .compare_to_named(&subject(), &pop, "NoSuchCo")
        .expect_err("absent peer");
    assert!(matches!(err, ViabilidadError::NotFound { ref name } if name == "NoSuchCo"));
}

#[test]
fn test_population_loading_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let json =
        serde_json::to_string(&population_profiles()).expect("profiles serialize");
    file.write_all(json.as_bytes()).expect("write");

    let pop = ReferencePopulation::from_json_path(file.path()).expect("load");
    assert_eq!(pop.len(), 6);

    let err = ReferencePopulation::from_json_path("/no/such/file.json")
        .expect_err("missing file");
    assert!(matches!(err, ViabilidadError::DataSource { .. }));
}

#[test]
fn test_training_on_loaded_population() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let json =
        serde_json::to_string(&population_profiles()).expect("profiles serialize");
    file.write_all(json.as_bytes()).expect("write");
    let pop = ReferencePopulation::from_json_path(file.path()).expect("load");

    let pipeline = ViabilityPipeline::train(
        pop,
        &statuses(),
        Box::new(PriorClassifier::new()),
        2025.0,
    )
    .expect("train");
    let result = pipeline.predict(&subject()).expect("predict");
    assert!(!result.practical.label.is_empty());
}

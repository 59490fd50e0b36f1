// ==========================================
// Merge engine integration tests
// ==========================================
// Goal: exercise identity grouping + fusion end to end over records
// shaped like real extraction/sheet output
// ==========================================


use expo_lead_fusion::logging;
use expo_lead_fusion::MergeEngine;
use std::collections::BTreeSet;
use test_helpers::record;

#[test]
fn test_scenario_website_normalization_groups() {
    logging::init_test();

    // same host spelled differently across sources
    let a = record(&[("Website", "https://acme.com"), ("Phone1", "021-555-0001")]);
    let b = record(&[("Website", "www.acme.com/"), ("Email", "x@acme.com")]);

    let outcome = MergeEngine::default().merge_sources(vec![a], vec![b]);

    assert_eq!(outcome.records.len(), 1);
    let merged = &outcome.records[0];

    // website present once, no [2] variant
    assert_eq!(merged.get("Website"), Some("https://acme.com"));
    assert_eq!(merged.get("Website[2]"), None);
    // each one-sided field passes through
    assert_eq!(merged.get("Phone1"), Some("021-555-0001"));
    assert_eq!(merged.get("Email"), Some("x@acme.com"));
}

#[test]
fn test_scenario_conflicting_phones_become_variants() {
    logging::init_test();

    let a = record(&[("Website", "acme.com"), ("Phone1", "0911")]);
    let b = record(&[("Website", "acme.com"), ("Phone1", "0912")]);

    let outcome = MergeEngine::default().merge_sources(vec![a], vec![b]);

    assert_eq!(outcome.records.len(), 1);
    let merged = &outcome.records[0];
    assert_eq!(merged.get("Phone1"), Some("0911"));
    assert_eq!(merged.get("Phone1[2]"), Some("0912"));
}

#[test]
fn test_scenario_company_names_group_after_stopwords() {
    logging::init_test();

    // "Acme Co." and "ACME" both normalize to "acme"
    let a = record(&[("CompanyNameEN", "Acme Co."), ("Industry", "steel")]);
    let b = record(&[("CompanyNameEN", "ACME"), ("ContactName", "A. Vaziri")]);

    let outcome = MergeEngine::default().merge_sources(vec![a], vec![b]);

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.stats.merged, 1);
    let merged = &outcome.records[0];
    assert_eq!(merged.get("Industry"), Some("steel"));
    assert_eq!(merged.get("ContactName"), Some("A. Vaziri"));
}

#[test]
fn test_priority_website_over_phone() {
    logging::init_test();

    // both records carry the same phone but different websites: the
    // website rules, so they stay apart
    let a = record(&[("Website", "acme.com"), ("Phone1", "021-555-0001")]);
    let b = record(&[("Website", "beta.ir"), ("Phone1", "021-555-0001")]);

    let outcome = MergeEngine::default().merge_sources(vec![a], vec![b]);

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.stats.merged, 0);
}

#[test]
fn test_every_record_lands_in_exactly_one_group() {
    logging::init_test();

    let extraction = vec![
        record(&[("Website", "acme.com")]),
        record(&[("file_id", "f1"), ("page", "1"), ("ocr_text", "x")]),
        record(&[("CompanyNameEN", "Gamma Trading")]),
    ];
    let sheet = vec![
        record(&[("Website", "acme.com"), ("Industry", "steel")]),
        record(&[("Email", "info@delta.ir")]),
    ];
    let outcome = MergeEngine::default().merge_sources(extraction, sheet);

    // 5 records -> 4 groups: one merged pair plus three singletons
    assert_eq!(outcome.stats.groups, 4);
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.stats.merged, 1);
    assert_eq!(outcome.stats.extraction_only, 2);
    assert_eq!(outcome.stats.sheet_only, 1);
}

#[test]
fn test_value_sets_stable_across_arrival_orders() {
    logging::init_test();

    // three records for one entity arriving in different orders: the
    // variant indices may differ, the value set must not
    let r1 = record(&[("Website", "acme.com"), ("Industry", "steel")]);
    let r2 = record(&[("Website", "acme.com"), ("Industry", "mining")]);
    let r3 = record(&[("Website", "acme.com"), ("Industry", "trade")]);

    let engine = MergeEngine::default();
    let orders = [
        vec![r1.clone(), r2.clone(), r3.clone()],
        vec![r3.clone(), r1.clone(), r2.clone()],
        vec![r2, r3, r1],
    ];

    let mut value_sets = Vec::new();
    for order in orders {
        let outcome = engine.merge_sources(order, Vec::new());
        assert_eq!(outcome.records.len(), 1);
        let values: BTreeSet<String> = outcome.records[0]
            .values_for_base("Industry")
            .into_iter()
            .map(str::to_string)
            .collect();
        value_sets.push(values);
    }

    assert_eq!(value_sets[0], value_sets[1]);
    assert_eq!(value_sets[1], value_sets[2]);
    assert_eq!(
        value_sets[0],
        BTreeSet::from(["steel".to_string(), "mining".to_string(), "trade".to_string()])
    );
}

//! End-to-end tests of collection and windowed reduction over raw documents

mod common;

use common::{release_documents, run};
use runboard::timeline::{collect_raw, reduce, Breakdown, TimelineEngine};
use serde_json::json;

#[test]
fn test_two_version_backfill_is_one_directional() {
    let documents = vec![
        run("v1", 5, 1, "core", "linux", "high"),
        run("v2", 3, 0, "net", "mac", "low"),
    ];

    let summaries = TimelineEngine::new(40).timeline(&documents).unwrap();
    assert_eq!(summaries.len(), 2);

    let v1 = &summaries[0];
    assert!(!v1.by_category.contains_key("net"));
    assert_eq!(v1.rel_passed(), Some(100.0 * 5.0 / 6.0));

    let v2 = &summaries[1];
    assert_eq!(v2.by_category["core"], Breakdown::new(5.0, 1.0));
    assert_eq!(v2.by_category["net"], Breakdown::new(3.0, 0.0));
    assert_eq!(v2.abs_passed, 8.0);
    assert_eq!(v2.abs_failed, -1.0);
}

#[test]
fn test_release_timeline() {
    let documents: Vec<_> = release_documents()
        .into_iter()
        .filter(|d| d["version"].as_str().unwrap().starts_with("2.0.0"))
        .collect();

    let summaries = TimelineEngine::default().timeline(&documents).unwrap();
    let versions: Vec<_> = summaries.iter().map(|s| s.version.as_str()).collect();
    assert_eq!(versions, vec!["2.0.0-10", "2.0.0-11", "2.0.0-9"]);

    let first = &summaries[0];
    assert_eq!(first.abs_passed, 48.0);
    assert_eq!(first.abs_failed, -2.0);
    assert_eq!(first.rel_passed(), Some(96.0));
    assert_eq!(first.rel_failed(), Some(4.0));
    // VIEW ran without a platform
    assert_eq!(first.by_platform.keys().collect::<Vec<_>>(), vec!["CENTOS"]);
    assert_eq!(first.by_category["VIEW"], Breakdown::new(8.0, 0.0));

    let second = &summaries[1];
    assert_eq!(second.by_category["VIEW"], Breakdown::new(8.0, 0.0));
    assert_eq!(second.by_priority["P1"], Breakdown::new(8.0, 0.0));
    assert!(!second.by_priority.contains_key("N/A"));
    assert_eq!(second.by_platform["WIN"], Breakdown::new(5.0, 5.0));
    assert_eq!(second.total(), 63.0);

    let third = &summaries[2];
    assert_eq!(third.by_category.len(), 3);
    assert_eq!(third.abs_passed, 48.0);
    assert_eq!(third.abs_failed, -10.0);
}

#[test]
fn test_malformed_documents_dropped_but_rest_aggregated() {
    let documents = vec![
        run("1.0", 4, 1, "KV", "CENTOS", "P0"),
        json!({"version": "1.0", "passed": null, "failed": 3, "category": "KV"}),
        json!({"version": "1.0", "passed": 2, "failed": 0, "category": ""}),
        json!({"build": "1.0", "failCount": 1, "totalCount": 3, "component": "VIEW", "os": "WIN"}),
    ];

    let groups = collect_raw(&documents).unwrap();
    assert_eq!(groups.record_count(), 2);

    let summary = &reduce(&groups, 40)[0];
    assert_eq!(summary.abs_passed, 6.0);
    assert_eq!(summary.abs_failed, -2.0);
    assert_eq!(summary.by_platform["WIN"], Breakdown::new(2.0, 1.0));
    assert!(!summary.by_priority.contains_key("VIEW"));
}

#[test]
fn test_empty_documents() {
    assert!(TimelineEngine::default().timeline(&[]).unwrap().is_empty());
}

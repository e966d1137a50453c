#![forbid(unsafe_code)]

//! End-to-end scenarios across the merge, suggestion, and chart crates,
//! driven by the employees/reviews fixtures.

use dm_chart::{ChartKind, recommend_charts};
use dm_conformance::{employees, reviews};
use dm_merge::{JoinSpec, JoinType, merge_datasets};
use dm_suggest::suggest_join_keys;
use dm_types::Value;

fn spec(join_type: JoinType) -> JoinSpec {
    JoinSpec::new("id", "employee_id", join_type)
}

#[test]
fn e2e_left_join_keeps_every_employee() {
    let result = merge_datasets(&employees(), &reviews(), &spec(JoinType::Left)).expect("merge");

    assert_eq!(result.data.len(), 3);
    let names: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "dept", "salary", "rating", "year"]);

    assert_eq!(result.data[0].get("dept"), Some(&Value::from("Engineering")));
    assert_eq!(result.data[0].get("rating"), Some(&Value::Float64(4.8)));
    assert_eq!(result.data[1].get("rating"), Some(&Value::Float64(3.9)));
    // Charlie has no review; the padded right side is null, not absent.
    assert_eq!(result.data[2].get("rating"), Some(&Value::Null));
    assert_eq!(result.data[2].get("year"), Some(&Value::Null));
}

#[test]
fn e2e_inner_join_drops_the_unreviewed_employee() {
    let result = merge_datasets(&employees(), &reviews(), &spec(JoinType::Inner)).expect("merge");
    assert_eq!(result.data.len(), 2);
    assert!(result.data.iter().all(|r| r.get("rating") != Some(&Value::Null)));
}

#[test]
fn e2e_full_join_adds_the_orphan_review() {
    let result = merge_datasets(&employees(), &reviews(), &spec(JoinType::Full)).expect("merge");
    assert_eq!(result.data.len(), 4);

    let orphan = &result.data[3];
    assert_eq!(orphan.get("id"), Some(&Value::Null));
    assert_eq!(orphan.get("name"), Some(&Value::Null));
    assert_eq!(orphan.get("rating"), Some(&Value::Float64(4.5)));
}

#[test]
fn e2e_append_stacks_both_datasets() {
    let result = merge_datasets(&employees(), &reviews(), &spec(JoinType::Append)).expect("merge");

    assert_eq!(result.data.len(), 6);
    assert_eq!(result.columns.len(), 7);
    // Every projected row covers the full unified column set.
    assert!(result.data.iter().all(|r| r.len() == 7));
    assert_eq!(result.data[4].get("name"), Some(&Value::Null));
    assert_eq!(result.data[4].get("rating"), Some(&Value::Float64(3.9)));
}

#[test]
fn e2e_suggested_key_drives_the_join() {
    let left = employees();
    let right = reviews();

    let suggestions = suggest_join_keys(&left.columns, &right.columns);
    let best = suggestions.first().expect("at least one suggestion");
    assert_eq!(best.left_key, "id");
    assert_eq!(best.right_key, "employee_id");

    let result = merge_datasets(
        &left,
        &right,
        &JoinSpec::new(best.left_key.clone(), best.right_key.clone(), JoinType::Inner),
    )
    .expect("merge");
    assert_eq!(result.data.len(), 2);
}

#[test]
fn e2e_merged_schema_feeds_chart_recommendations() {
    let result = merge_datasets(&employees(), &reviews(), &spec(JoinType::Left)).expect("merge");

    let ranked = recommend_charts(&result.columns, None, &[]);
    // 3 categoricals + 3 numerics: bars lead, scatter and radar unlock.
    assert_eq!(ranked[0].kind, ChartKind::BarClustered);
    assert!(ranked.iter().any(|s| s.kind == ChartKind::Radar));
    assert!(ranked.iter().any(|s| s.kind == ChartKind::Scatter));
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

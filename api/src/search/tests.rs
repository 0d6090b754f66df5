use super::types::{Predicate, RangeBounds};
use super::{build_where, compile, parse_query_pairs, SqlValue};

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn plain_parameters_compile_to_exact_matches() {
    let result = compile(&params(&[("city", "Fresno"), ("furnished", "Semi")]));
    assert_eq!(result.len(), 2);
    assert_eq!(result["city"], Predicate::Eq("Fresno".to_string()));
    assert_eq!(result["furnished"], Predicate::Eq("Semi".to_string()));
}

#[test]
fn hyphenated_numeric_value_compiles_to_closed_range() {
    let result = compile(&params(&[("price", "100-500")]));
    assert_eq!(
        result["price"],
        Predicate::Range(RangeBounds::closed(100.0, 500.0))
    );
}

#[test]
fn gt_suffix_strips_to_base_field() {
    let result = compile(&params(&[("price_gt", "100")]));
    assert_eq!(result.len(), 1);
    assert_eq!(
        result["price"],
        Predicate::Range(RangeBounds {
            gt: Some(100.0),
            ..RangeBounds::default()
        })
    );
}

#[test]
fn lt_lte_gte_suffixes_pick_their_operator() {
    let result = compile(&params(&[("rating_gte", "3.5")]));
    assert_eq!(
        result["rating"],
        Predicate::Range(RangeBounds {
            gte: Some(3.5),
            ..RangeBounds::default()
        })
    );

    let result = compile(&params(&[("bedrooms_lt", "4")]));
    assert_eq!(
        result["bedrooms"],
        Predicate::Range(RangeBounds {
            lt: Some(4.0),
            ..RangeBounds::default()
        })
    );

    let result = compile(&params(&[("areaSqFt_lte", "1200")]));
    assert_eq!(
        result["areaSqFt"],
        Predicate::Range(RangeBounds {
            lte: Some(1200.0),
            ..RangeBounds::default()
        })
    );
}

#[test]
fn non_numeric_hyphenated_value_falls_back_to_equality() {
    let result = compile(&params(&[("bedrooms", "abc-def")]));
    assert_eq!(result["bedrooms"], Predicate::Eq("abc-def".to_string()));
}

#[test]
fn half_numeric_hyphenated_value_falls_back_to_equality() {
    let result = compile(&params(&[("city", "100-oaks")]));
    assert_eq!(result["city"], Predicate::Eq("100-oaks".to_string()));
}

#[test]
fn split_happens_on_the_first_hyphen_only() {
    // "10-20-30": halves are "10" and "20-30"; the second fails to parse.
    let result = compile(&params(&[("price", "10-20-30")]));
    assert_eq!(result["price"], Predicate::Eq("10-20-30".to_string()));
}

#[test]
fn unparseable_operator_value_forwards_nan() {
    let result = compile(&params(&[("price_gt", "cheap")]));
    match &result["price"] {
        Predicate::Range(bounds) => {
            assert!(bounds.gt.unwrap().is_nan());
            assert!(bounds.has_nan_bound());
        }
        other => panic!("expected range, got {:?}", other),
    }
}

#[test]
fn later_parameter_for_the_same_base_field_wins() {
    let result = compile(&params(&[("price_gt", "100"), ("price", "200-300")]));
    assert_eq!(result.len(), 1);
    assert_eq!(
        result["price"],
        Predicate::Range(RangeBounds::closed(200.0, 300.0))
    );
}

#[test]
fn compilation_is_idempotent() {
    let input = params(&[
        ("city", "Fresno"),
        ("price", "100-500"),
        ("bedrooms_gte", "2"),
        ("tags", "budget"),
    ]);
    assert_eq!(compile(&input), compile(&input));
}

// ---------------------------------------------------------------------------
// SQL builder
// ---------------------------------------------------------------------------

#[test]
fn equality_on_text_column_binds_the_literal() {
    let (sql, binds) = build_where(&compile(&params(&[("city", "Fresno")])));
    assert_eq!(sql, "city = ?");
    assert_eq!(binds, vec![SqlValue::Text("Fresno".to_string())]);
}

#[test]
fn closed_range_builds_two_comparisons() {
    let (sql, binds) = build_where(&compile(&params(&[("price", "100-500")])));
    assert_eq!(sql, "price >= ? AND price <= ?");
    assert_eq!(binds, vec![SqlValue::Real(100.0), SqlValue::Real(500.0)]);
}

#[test]
fn strict_bound_builds_single_comparison() {
    let (sql, binds) = build_where(&compile(&params(&[("price_gt", "100")])));
    assert_eq!(sql, "price > ?");
    assert_eq!(binds, vec![SqlValue::Real(100.0)]);
}

#[test]
fn csv_column_matches_by_substring() {
    let (sql, binds) = build_where(&compile(&params(&[("amenities", "pool")])));
    assert_eq!(sql, "amenities LIKE ?");
    assert_eq!(binds, vec![SqlValue::Text("%pool%".to_string())]);
}

#[test]
fn nan_bound_becomes_a_never_matching_clause() {
    let (sql, binds) = build_where(&compile(&params(&[("price_gt", "cheap")])));
    assert_eq!(sql, "0 = 1");
    assert!(binds.is_empty());
}

#[test]
fn unknown_field_becomes_a_never_matching_clause() {
    let (sql, binds) = build_where(&compile(&params(&[("no_such_field", "x")])));
    assert_eq!(sql, "0 = 1");
    assert!(binds.is_empty());
}

#[test]
fn non_numeric_equality_on_numeric_column_matches_nothing() {
    let (sql, binds) = build_where(&compile(&params(&[("bedrooms", "many")])));
    assert_eq!(sql, "0 = 1");
    assert!(binds.is_empty());
}

#[test]
fn boolean_column_accepts_true_false_literals() {
    let (sql, binds) = build_where(&compile(&params(&[("isVerified", "true")])));
    assert_eq!(sql, "is_verified = ?");
    assert_eq!(binds, vec![SqlValue::Integer(1)]);

    let (sql, _) = build_where(&compile(&params(&[("isVerified", "sometimes")])));
    assert_eq!(sql, "0 = 1");
}

#[test]
fn empty_predicates_build_an_empty_clause() {
    let (sql, binds) = build_where(&compile(&[]));
    assert!(sql.is_empty());
    assert!(binds.is_empty());
}

#[test]
fn clauses_join_with_and_in_first_seen_order() {
    let (sql, _) = build_where(&compile(&params(&[
        ("city", "Fresno"),
        ("price", "100-500"),
        ("bedrooms_gte", "2"),
    ])));
    assert_eq!(sql, "city = ? AND price >= ? AND price <= ? AND bedrooms >= ?");
}

// ---------------------------------------------------------------------------
// Query-string parsing
// ---------------------------------------------------------------------------

#[test]
fn query_pairs_keep_wire_order() {
    let pairs = parse_query_pairs("b=2&a=1&b=3");
    assert_eq!(
        pairs,
        params(&[("b", "2"), ("a", "1"), ("b", "3")])
    );
}

#[test]
fn query_pairs_decode_percent_and_plus() {
    let pairs = parse_query_pairs("city=San+Jose&tags=lake%20view");
    assert_eq!(
        pairs,
        params(&[("city", "San Jose"), ("tags", "lake view")])
    );
}

#[test]
fn bare_key_gets_an_empty_value() {
    let pairs = parse_query_pairs("furnished");
    assert_eq!(pairs, params(&[("furnished", "")]));
}

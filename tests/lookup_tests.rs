// Lookups other than isnull, and how they meet SQL NULL.

use fieldcheck::{
    CheckConstraint, FieldType, Model, Record, Truth, parse_constraint,
};
use serde_json::json;

fn model() -> Model {
    Model::new("Product")
        .with_field("data", FieldType::Json)
        .with_field("name", FieldType::Text)
        .with_field("price", FieldType::Integer)
        .with_field("ratio", FieldType::Float)
        .with_field("active", FieldType::Boolean)
}

fn truth(constraint: &str, row: serde_json::Value) -> Truth {
    let model = model();
    let constraint =
        CheckConstraint::declare(&model, "c", parse_constraint(constraint).unwrap()).unwrap();
    let record = Record::from_json(&model, row).unwrap();
    constraint.bound().eval(&record)
}

fn check(constraint: &str, row: serde_json::Value) -> bool {
    truth(constraint, row).is_satisfied()
}

// ============================================================================
// Three-valued logic
// ============================================================================

#[test]
fn comparison_against_null_column_is_unknown() {
    assert_eq!(truth("price__gt = 0", json!({"price": null})), Truth::Unknown);
    assert_eq!(truth("price__gt = 0", json!({})), Truth::Unknown);
}

#[test]
fn unknown_passes_a_check() {
    assert!(check("price__gt = 0", json!({"price": null})));
    assert!(check("not price__gt = 0", json!({"price": null})));
}

#[test]
fn kleene_connectives() {
    let row = json!({"price": null, "active": true});
    assert_eq!(truth("price__gt = 0 and active = true", row.clone()), Truth::Unknown);
    assert_eq!(truth("price__gt = 0 and active = false", row.clone()), Truth::False);
    assert_eq!(truth("price__gt = 0 or active = true", row.clone()), Truth::True);
    assert_eq!(truth("price__gt = 0 or active = false", row), Truth::Unknown);
}

#[test]
fn truth_table() {
    use Truth::*;
    assert_eq!(True.and(Unknown), Unknown);
    assert_eq!(False.and(Unknown), False);
    assert_eq!(True.or(Unknown), True);
    assert_eq!(False.or(Unknown), Unknown);
    assert_eq!(Unknown.not(), Unknown);
    assert!(Unknown.is_satisfied());
    assert!(!False.is_satisfied());
}

// ============================================================================
// Column comparisons
// ============================================================================

#[test]
fn numeric_comparisons() {
    let row = json!({"price": 10, "ratio": 0.5});
    assert!(check("price__gt = 9", row.clone()));
    assert!(!check("price__gt = 10", row.clone()));
    assert!(check("price__gte = 10", row.clone()));
    assert!(check("price__lt = 11", row.clone()));
    assert!(check("price__lte = 10", row.clone()));
    assert!(check("ratio__lt = 1", row.clone()));
    assert!(check("ratio = 0.5", row));
}

#[test]
fn integer_in_float_column_equals_float_literal() {
    assert!(check("ratio = 2.0", json!({"ratio": 2})));
}

#[test]
fn in_lookup() {
    assert!(check("price__in = [1, 2, 3]", json!({"price": 2})));
    assert!(!check("price__in = [1, 3]", json!({"price": 2})));
    assert_eq!(truth("price__in = [1, null]", json!({"price": null})), Truth::Unknown);
    assert_eq!(truth("price__in = []", json!({"price": null})), Truth::False);
}

#[test]
fn in_drops_null_literals_on_columns() {
    // `2 IN (1, NULL)` would be unknown; the null is removed at declaration
    assert_eq!(truth("price__in = [1, null]", json!({"price": 2})), Truth::False);
}

#[test]
fn text_lookups() {
    let row = json!({"name": "Widget Pro"});
    assert!(check("name__contains = \"get P\"", row.clone()));
    assert!(check("name__startswith = \"Wid\"", row.clone()));
    assert!(check("name__endswith = \"Pro\"", row.clone()));
    assert!(check("name__regex = \"^W\\\\w+ \"", row.clone()));
    assert!(!check("name__regex = \"^Pro\"", row.clone()));
    assert!(check("name__gt = \"A\"", row));
}

// ============================================================================
// Key path lookups
// ============================================================================

#[test]
fn key_exact() {
    let row = json!({"data": {"size": 3, "tags": ["a"], "gone": null}});
    assert!(check("data__size = 3", row.clone()));
    assert!(check("data__size = 3.0", row.clone()));
    assert!(!check("data__size = \"3\"", row.clone()));
    assert!(check("data__tags = [\"a\"]", row.clone()));
    assert_eq!(truth("data__missing = 1", row.clone()), Truth::Unknown);
}

#[test]
fn key_exact_null_matches_json_null_only() {
    let row = json!({"data": {"gone": null, "here": 1}});
    assert_eq!(truth("data__gone = null", row.clone()), Truth::True);
    assert_eq!(truth("data__here = null", row.clone()), Truth::False);
    assert_eq!(truth("data__missing = null", row), Truth::Unknown);
}

#[test]
fn key_comparisons_follow_jsonb_order() {
    let row = json!({"data": {"n": 5, "s": "m", "z": null, "t": true, "e": [], "l": [0]}});
    assert!(check("data__n__gt = 4", row.clone()));
    assert!(check("data__n__lte = 5.5", row.clone()));
    assert!(check("data__s__lt = \"z\"", row.clone()));

    // null < string < number < boolean < array < object
    assert_eq!(truth("data__s__lt = 4", row.clone()), Truth::True);
    assert_eq!(truth("data__s__gt = 4", row.clone()), Truth::False);
    assert_eq!(truth("data__z__lt = 0", row.clone()), Truth::True);
    assert_eq!(truth("data__z__gte = \"\"", row.clone()), Truth::False);
    assert_eq!(truth("data__t__gt = 100", row.clone()), Truth::True);
    assert_eq!(truth("data__l__gt = true", row.clone()), Truth::True);

    // an empty array sorts below everything
    assert_eq!(truth("data__e__lt = \"\"", row.clone()), Truth::True);

    assert_eq!(truth("data__q__gt = 0", row), Truth::Unknown);
}

#[test]
fn key_text_lookups_use_extracted_text() {
    let row = json!({"data": {"code": 1234, "name": "abc", "f": 1.0, "o": {"bb": 1, "a": [1, 2]}, "z": null}});
    assert!(check("data__code__startswith = \"12\"", row.clone()));
    assert!(check("data__name__endswith = \"bc\"", row.clone()));
    assert!(check("data__f__endswith = \".0\"", row.clone()));
    assert!(check("data__o__startswith = '{\"a\": [1, 2], \"bb\"'", row.clone()));
    assert!(check("data__o__regex = \"^\\\\{.*\\\\}$\"", row.clone()));
    assert_eq!(truth("data__z__startswith = \"n\"", row), Truth::Unknown);
}

#[test]
fn key_contains_is_jsonb_containment() {
    let row = json!({"data": {"tags": ["a", "b"], "owner": {"name": "x", "age": 3}, "s": "abc", "z": null}});
    assert_eq!(truth("data__tags__contains = \"a\"", row.clone()), Truth::True);
    assert_eq!(truth("data__tags__contains = [\"b\", \"a\"]", row.clone()), Truth::True);
    assert_eq!(truth("data__tags__contains = [\"c\"]", row.clone()), Truth::False);
    assert_eq!(truth("data__owner__contains = {\"age\": 3.0}", row.clone()), Truth::True);
    assert_eq!(truth("data__owner__contains = {\"age\": 4}", row.clone()), Truth::False);

    // no substring matching on strings
    assert_eq!(truth("data__s__contains = \"b\"", row.clone()), Truth::False);
    assert_eq!(truth("data__s__contains = \"abc\"", row.clone()), Truth::True);

    assert_eq!(truth("data__z__contains = null", row.clone()), Truth::True);
    assert_eq!(truth("data__missing__contains = 1", row), Truth::Unknown);
}

#[test]
fn column_contains_on_document() {
    let row = json!({"data": {"a": 1, "nested": [[1, 2]]}});
    assert!(check("data__contains = {\"a\": 1}", row.clone()));
    assert!(check("data__contains = {\"nested\": [[2]]}", row.clone()));
    assert!(!check("data__contains = {\"nested\": [2]}", row.clone()));
    assert_eq!(truth("data__contains = {}", json!({"data": null})), Truth::Unknown);
}

#[test]
fn key_in_with_json_null() {
    let row = json!({"data": {"k": null}});
    assert!(check("data__k__in = [1, null]", row.clone()));
    assert_eq!(truth("data__k__in = [1, 2]", row), Truth::False);
}

#[test]
fn has_key_family() {
    let row = json!({"data": {"a": 1, "b": null, "nested": {"c": 2}}});
    assert!(check("data__has_key = \"b\"", row.clone()));
    assert!(!check("data__has_key = \"z\"", row.clone()));
    assert!(check("data__has_keys = [\"a\", \"b\"]", row.clone()));
    assert!(!check("data__has_keys = [\"a\", \"z\"]", row.clone()));
    assert!(check("data__has_any_keys = [\"z\", \"a\"]", row.clone()));
    assert!(check("data__nested__has_key = \"c\"", row.clone()));
    assert_eq!(truth("data__a__has_key = \"c\"", row.clone()), Truth::False);
    assert_eq!(truth("data__missing__has_key = \"c\"", row), Truth::Unknown);
    assert_eq!(truth("data__has_key = \"a\"", json!({"data": null})), Truth::Unknown);
}

#[test]
fn column_exact_on_whole_document() {
    let row = json!({"data": {"a": [1, 2], "b": {"c": true}}});
    assert!(check("data = {\"b\": {\"c\": true}, \"a\": [1, 2.0]}", row.clone()));
    assert!(!check("data = {\"a\": [1, 2]}", row));
}

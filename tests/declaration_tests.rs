// Constraints are type-checked when declared, never when evaluated.

use fieldcheck::ast::{F, LookupKind};
use fieldcheck::{
    CheckConstraint, DeclarationError, FieldType, FieldValue, Model, ModelConstraints, Record,
    Value, Violation, parse_constraint,
};
use serde_json::json;

fn model() -> Model {
    Model::new("Product")
        .with_field("data", FieldType::Json)
        .with_field("name", FieldType::Text)
        .with_field("price", FieldType::Integer)
        .with_field("active", FieldType::Boolean)
}

fn declare(input: &str) -> Result<CheckConstraint, DeclarationError> {
    CheckConstraint::declare(&model(), "c", parse_constraint(input).unwrap())
}

// ============================================================================
// Rejected declarations
// ============================================================================

#[test]
fn unknown_field() {
    let err = declare("colour = \"red\"").unwrap_err();
    assert!(matches!(
        err,
        DeclarationError::UnknownField { ref model, ref field } if model == "Product" && field == "colour"
    ));
}

#[test]
fn key_path_on_scalar_field() {
    let err = declare("name__first__isnull = true").unwrap_err();
    assert!(matches!(
        err,
        DeclarationError::KeyPathOnScalar { field_type: FieldType::Text, .. }
    ));
}

#[test]
fn unsupported_lookup_for_type() {
    let err = declare("active__gt = true").unwrap_err();
    assert!(matches!(
        err,
        DeclarationError::UnsupportedLookup { lookup: LookupKind::Gt, field_type: FieldType::Boolean, .. }
    ));

    let err = declare("price__contains = \"1\"").unwrap_err();
    assert!(matches!(err, DeclarationError::UnsupportedLookup { .. }));

    let err = declare("data__gt = 1").unwrap_err();
    assert!(matches!(
        err,
        DeclarationError::UnsupportedLookup { target: "column", .. }
    ));
}

#[test]
fn isnull_needs_a_boolean() {
    let err = declare("data__key__isnull = 1").unwrap_err();
    assert!(matches!(
        err,
        DeclarationError::InvalidOperand { lookup: LookupKind::IsNull, found: "integer", .. }
    ));
}

#[test]
fn column_literal_must_match_field_type() {
    let err = declare("price = \"ten\"").unwrap_err();
    assert!(matches!(
        err,
        DeclarationError::InvalidOperand { found: "string", .. }
    ));
    assert!(declare("price__in = [1, \"2\"]").is_err());
}

#[test]
fn key_comparison_needs_scalar_literal() {
    assert!(declare("data__n__gt = null").is_err());
    assert!(declare("data__n__gt = [1]").is_err());
    assert!(declare("data__n__gt = 1").is_ok());
}

#[test]
fn invalid_regex() {
    let err = declare("name__regex = \"(unclosed\"").unwrap_err();
    assert!(matches!(err, DeclarationError::InvalidPattern { .. }));
}

#[test]
fn has_keys_needs_key_names() {
    assert!(declare("data__has_keys = []").is_err());
    assert!(declare("data__has_keys = [\"a\", 1]").is_err());
    assert!(declare("data__has_key = 1").is_err());
}

#[test]
fn empty_name() {
    let err = CheckConstraint::declare(&model(), "", F::new("price").gt(0)).unwrap_err();
    assert!(matches!(err, DeclarationError::EmptyName));
}

#[test]
fn errors_deep_in_the_tree_are_found() {
    let err = declare("price__gt = 0 and (active = true or not data__x__isnull = \"no\")")
        .unwrap_err();
    assert!(matches!(err, DeclarationError::InvalidOperand { .. }));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn default_and_custom_messages() {
    let plain = declare("price__gt = 0").unwrap();
    assert_eq!(plain.violation_message(), "Constraint “c” is violated.");

    let custom = plain.with_message("%(name)s: price must be positive");
    assert_eq!(custom.violation_message(), "c: price must be positive");
}

#[test]
fn referenced_fields_are_deduplicated() {
    let constraint = declare("price__gt = 0 or (price__isnull = true and data__a = 1)").unwrap();
    assert_eq!(constraint.referenced_fields(), vec!["price", "data"]);
}

#[test]
fn validate_reports_violation() {
    let constraint = declare("data__owner__isnull = false").unwrap();
    let record = Record::new().with("data", FieldValue::Document(Value::Null));
    assert_eq!(
        constraint.validate(&record, &[]),
        Err(Violation {
            constraint: "c".to_string(),
            message: "Constraint “c” is violated.".to_string(),
        })
    );
}

#[test]
fn excluded_fields_skip_constraints() {
    let constraint = declare("data__owner__isnull = false").unwrap();
    let record = Record::new();
    assert!(constraint.validate(&record, &["data"]).is_ok());
    assert!(constraint.validate(&record, &["price"]).is_err());
}

#[test]
fn model_constraints_collect_all_violations() {
    let mut constraints = ModelConstraints::new(model());
    constraints
        .add("owner", parse_constraint("data__owner__isnull = false").unwrap())
        .unwrap();
    constraints.add("price", F::new("price").gte(0)).unwrap();
    constraints.add("active", F::new("active").isnull(false)).unwrap();

    let record = Record::from_json(
        constraints.model(),
        json!({"data": {"owner": null}, "price": -1, "active": true}),
    )
    .unwrap();

    let err = constraints.validate(&record, &[]).unwrap_err();
    let names: Vec<_> = err.violations.iter().map(|v| v.constraint.as_str()).collect();
    assert_eq!(names, vec!["owner", "price"]);
    assert!(err.to_string().starts_with("2 check constraint(s) violated"));

    let valid = Record::from_json(
        constraints.model(),
        json!({"data": {"owner": "ann"}, "price": 0, "active": false}),
    )
    .unwrap();
    assert!(constraints.validate(&valid, &[]).is_ok());
}

#[test]
fn display_shows_condition_and_name() {
    let constraint = declare("price__gt = 0").unwrap();
    assert_eq!(
        constraint.to_string(),
        "<CheckConstraint: condition=price__gt = 0 name='c'>"
    );
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn record_from_json_rejects_bad_input() {
    use fieldcheck::RecordError;

    assert!(matches!(
        Record::from_json(&model(), json!([1])),
        Err(RecordError::NotAnObject("array"))
    ));
    assert!(matches!(
        Record::from_json(&model(), json!({"nope": 1})),
        Err(RecordError::UnknownField { .. })
    ));
    assert!(matches!(
        Record::from_json(&model(), json!({"price": "1"})),
        Err(RecordError::TypeMismatch { expected: FieldType::Integer, found: "string", .. })
    ));
}

#[test]
fn record_keeps_absent_and_null_apart() {
    let record = Record::from_json(&model(), json!({"name": null})).unwrap();
    assert_eq!(record.get("name"), &FieldValue::Null);
    assert_eq!(record.get("price"), &FieldValue::Absent);
    assert_eq!(record.get("data"), &FieldValue::Absent);
    assert!(record.get("name").is_sql_null());
    assert!(record.get("data").is_sql_null());
    assert!(!FieldValue::Document(Value::Null).is_sql_null());
}

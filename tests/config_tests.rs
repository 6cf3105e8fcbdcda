use fieldcheck::{ConfigError, ConstraintConfig, FieldType, Record};
use serde_json::json;

const CONFIG: &str = r#"
[model]
name = "Product"
fields = [
    { name = "data", type = "json" },
    { name = "price", type = "integer" },
]

[[constraints]]
name = "owner_present"
check = "data__owner__isnull = false"

[[constraints]]
name = "price_positive"
check = "price__gt = 0 or price__isnull = true"
message = "%(name)s: price must be positive"
"#;

#[test]
fn test_parse_model_and_constraints() {
    let config = ConstraintConfig::from_toml_str(CONFIG).unwrap();
    assert_eq!(config.model.name, "Product");
    assert_eq!(config.model.field_type("data"), Some(FieldType::Json));
    assert_eq!(config.model.field_type("price"), Some(FieldType::Integer));
    assert_eq!(config.constraints.len(), 2);
    assert_eq!(config.constraints[0].message, None);
}

#[test]
fn test_build_and_validate() {
    let constraints = ConstraintConfig::from_toml_str(CONFIG)
        .unwrap()
        .build()
        .unwrap();

    let record = Record::from_json(
        constraints.model(),
        json!({"data": {"owner": null}, "price": -5}),
    )
    .unwrap();
    let err = constraints.validate(&record, &[]).unwrap_err();
    assert_eq!(err.violations.len(), 2);
    assert_eq!(err.violations[1].message, "price_positive: price must be positive");

    let record = Record::from_json(constraints.model(), json!({"data": {"owner": "x"}})).unwrap();
    assert!(constraints.validate(&record, &[]).is_ok());
}

#[test]
fn test_unknown_field_type() {
    let err = ConstraintConfig::from_toml_str(
        r#"
        [model]
        name = "M"
        fields = [{ name = "x", type = "uuid" }]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_duplicate_names() {
    let err = ConstraintConfig::from_toml_str(
        r#"
        [model]
        name = "M"
        fields = [{ name = "x", type = "integer" }, { name = "x", type = "text" }]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = ConstraintConfig::from_toml_str(
        r#"
        [model]
        name = "M"
        fields = [{ name = "x", type = "integer" }]

        [[constraints]]
        name = "c"
        check = "x = 1"

        [[constraints]]
        name = "c"
        check = "x = 2"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_bad_constraint_is_named() {
    let config = ConstraintConfig::from_toml_str(
        r#"
        [model]
        name = "M"
        fields = [{ name = "x", type = "integer" }]

        [[constraints]]
        name = "broken"
        check = "x__first__isnull = true"
        "#,
    )
    .unwrap();

    let err = config.build().unwrap_err();
    assert!(matches!(err, ConfigError::Declaration { ref name, .. } if name == "broken"));

    let config = ConstraintConfig::from_toml_str(
        r#"
        [model]
        name = "M"
        fields = [{ name = "x", type = "integer" }]

        [[constraints]]
        name = "typo"
        check = "x =="
        "#,
    )
    .unwrap();
    let err = config.build().unwrap_err();
    assert!(matches!(err, ConfigError::Parse { ref name, .. } if name == "typo"));
}

#[test]
fn test_missing_file() {
    let err = ConstraintConfig::load("/nonexistent/fieldcheck.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

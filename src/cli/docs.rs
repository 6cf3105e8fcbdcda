//! Documentation content for the fieldcheck CLI

use super::CliError;
use crate::registry::RULES;

/// Get the docs overview (topic listing)
pub fn get_docs_overview() -> &'static str {
    r#"FIELDCHECK DOCUMENTATION

fieldcheck evaluates database check constraints against candidate records
before they are written, with the same verdict the database would reach.

DOCUMENTATION TOPICS

  syntax      Constraint syntax: paths, lookups, literals, connectives
  lookups     Every supported lookup, by field type and target
  nulls       How SQL NULL, missing keys and JSON null are treated
  config      The TOML model and constraint file

QUICK REFERENCE

  price__gt = 0                    Column lookup
  data__owner__isnull = false      Key path lookup into a json field
  data__tags__0 = "new"            Array index, implicit exact
  a = 1 and (b = 2 or not c = 3)   Connectives
"#
}

/// Get the documentation for one topic
pub fn get_doc_topic(name: &str) -> Result<String, CliError> {
    match name.to_lowercase().as_str() {
        "syntax" => Ok(SYNTAX.to_string()),
        "lookups" | "lookup" => Ok(lookup_table()),
        "nulls" | "null" => Ok(NULLS.to_string()),
        "config" | "configuration" => Ok(CONFIG.to_string()),
        _ => Err(CliError::UnknownTopic(name.to_string())),
    }
}

/// Render the lookup registry as a text table
pub fn lookup_table() -> String {
    let mut out = String::from("LOOKUPS\n\n");
    out.push_str(&format!(
        "  {:<14} {:<9} {:<30} {}\n",
        "lookup", "target", "field types", "meaning"
    ));

    for rule in RULES {
        let types: Vec<&str> = rule.field_types.iter().map(|t| t.name()).collect();
        out.push_str(&format!(
            "  {:<14} {:<9} {:<30} {}\n",
            rule.lookup.name(),
            rule.target.name(),
            types.join(","),
            rule.summary
        ));
    }
    out
}

const SYNTAX: &str = r#"SYNTAX

LOOKUP
  <field>[__<key>...][__<lookup>] = <literal>

  The first segment names a field. On json fields further segments walk
  into the document; digit-only segments index arrays. If the last segment
  is a lookup name it selects the lookup, otherwise the lookup is exact.
  Keys that are not plain words are quoted; a quoted segment is always an
  object key, never an index or a lookup.

  Examples:
    price__gte = 10
    status = "active"
    data__owner__name__startswith = "A"
    data__tags__0__isnull = false
    data__"owner-name"__isnull = false
    data__"0" = "zero"

LITERALS
  null  true  false  42  -1.5  "text"  'text'  [1, 2, 3]  {"k": "v"}

CONNECTIVES
  and  &        both sides hold
  or   |        either side holds
  not  ~  !     negation (binds tightest)
  ( ... )       grouping

  Precedence: not > and > or
"#;

const NULLS: &str = r#"NULLS

COLUMNS
  A column is null when the record sets it to null or does not set it.
  A json column holding the JSON literal null is not a null column.

KEY PATHS
  data__key__isnull = true holds when:
    - data is null or not set
    - data has no key "key"
    - data["key"] is JSON null

  data__key__isnull = false is the exact negation.

OTHER LOOKUPS
  Comparing against a null column or a missing key is unknown. A check
  constraint only fails when its condition is false, so an unknown
  condition passes, as it does in the database.

  On key paths, gt/gte/lt/lte compare in jsonb order:
    null < string < number < boolean < array < object
  so a JSON-null key is less than any number. contains on a json value is
  jsonb containment, not a substring test.
"#;

const CONFIG: &str = r#"CONFIG

  [model]
  name = "Product"
  fields = [
      { name = "data", type = "json" },
      { name = "price", type = "integer" },
  ]

  [[constraints]]
  name = "owner_present"
  check = "data__owner__isnull = false"
  message = "%(name)s: owner is required"   # optional

  Field types: boolean, integer, float, text, json
"#;

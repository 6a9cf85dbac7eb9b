//! Check for user input interpolated into SQL through Liquid.
//!
//! # Rationale
//!
//! Liquid output tags are substituted into the generated SQL as-is. Values
//! that come from the user (filter values, parameter values, user
//! attributes) must go through `sql_quote` or a constrained parameter,
//! otherwise a crafted filter value can rewrite the query.
//!
//! # Detected Patterns
//!
//! - `{{ x._parameter_value }}`, `{{ _filters['f'] }}`,
//!   `{{ _user_attributes['a'] }}`, `{{ x.value }}` without `| sql_quote` - fail
//! - `{% parameter p %}` or `{{ p._parameter_value }}` where `p` is an
//!   `unquoted` parameter with no `allowed_value` list - warning

use crate::support::{sql_sources, Advice, Issues};
use lookml_qa_core::model::FieldKind;
use lookml_qa_core::utils::sql::{liquid_outputs, liquid_tag_arguments};
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};
use std::collections::HashSet;

/// Check id for sql-injection-protection.
pub const ID: &str = "sql-injection-protection";

/// Check name for sql-injection-protection.
pub const NAME: &str = "SQL Injection Protection";

/// Markers of user-controlled values inside a Liquid output tag.
const USER_INPUT_MARKERS: &[&str] = &["_filters", "_parameter_value", "_user_attributes", ".value"];

const FAIL_ADVICE: Advice = Advice::new(
    "Pass user-controlled Liquid values through `sql_quote`, or use `{% condition %}` for filters.",
)
.with_example(
    "sql: SELECT * FROM orders\n  WHERE region = {{ _user_attributes['region'] | sql_quote }} ;;",
);

const WARN_ADVICE: Advice = Advice::new(
    "Restrict unquoted parameters to a fixed list with `allowed_value`.",
)
.with_example(
    "parameter: metric {\n  type: unquoted\n  allowed_value: { value: \"revenue\" }\n  allowed_value: { value: \"cost\" }\n}",
);

/// Flags unescaped user input in Liquid-templated SQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlInjection;

impl SqlInjection {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn interpolates_user_input(output: &str) -> bool {
    USER_INPUT_MARKERS.iter().any(|m| output.contains(m))
}

fn is_quoted(output: &str) -> bool {
    output
        .split('|')
        .skip(1)
        .any(|filter| filter.trim().starts_with("sql_quote"))
}

impl Check for SqlInjection {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Security
    }

    fn description(&self) -> &'static str {
        "User input reaches SQL only through quoting or constrained parameters"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let open_parameters: HashSet<&str> = model
            .fields()
            .filter(|(_, f)| {
                f.kind == FieldKind::Parameter
                    && f.field_type.as_deref() == Some("unquoted")
                    && f.allowed_values.is_empty()
            })
            .map(|(_, f)| f.name.as_str())
            .collect();

        let mut issues = Issues::new();
        let mut templated = 0usize;

        for (at, sql) in sql_sources(model) {
            let outputs = liquid_outputs(sql);
            let parameters = liquid_tag_arguments(sql, "parameter");
            if outputs.is_empty() && parameters.is_empty() {
                continue;
            }
            templated += 1;

            for output in outputs {
                if interpolates_user_input(output) && !is_quoted(output) {
                    issues.fail(format!("{at} interpolates `{{{{ {output} }}}}` without sql_quote"));
                }
                if let Some((name, _)) = output.split_once("._parameter_value") {
                    let name = name.trim();
                    if open_parameters.contains(name) {
                        issues.warn(format!("{at} uses unrestricted unquoted parameter `{name}`"));
                    }
                }
            }
            for name in parameters {
                if open_parameters.contains(name) {
                    issues.warn(format!("{at} uses unrestricted unquoted parameter `{name}`"));
                }
            }
        }

        if templated == 0 {
            return CheckOutcome::pass("No Liquid templating in SQL; no user input is interpolated");
        }
        issues.into_outcome(
            format!("User input is safely handled in {templated} templated SQL expression(s)"),
            FAIL_ADVICE,
            WARN_ADVICE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;

    fn check_code(src: &str) -> CheckOutcome {
        let model = SourceModel::parse(src).expect("Failed to parse");
        SqlInjection::new().evaluate(&model)
    }

    #[test]
    fn test_no_liquid_passes() {
        let outcome = check_code("view: orders { dimension: id { sql: ${TABLE}.id ;; } }");
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(
            outcome.message(),
            "No Liquid templating in SQL; no user input is interpolated"
        );
    }

    #[test]
    fn test_unquoted_user_attribute_fails() {
        let outcome = check_code(
            r"
view: orders {
  derived_table: {
    sql: SELECT * FROM orders WHERE region = '{{ _user_attributes['region'] }}' ;;
  }
}",
        );
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.message().contains("derived table of view `orders`"));
        assert!(outcome.finding().unwrap().code_example.as_deref().unwrap().contains("sql_quote"));
    }

    #[test]
    fn test_sql_quote_passes() {
        let outcome = check_code(
            r"
view: orders {
  dimension: region {
    sql: {{ _user_attributes['region'] | sql_quote }} ;;
  }
}",
        );
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(
            outcome.message(),
            "User input is safely handled in 1 templated SQL expression(s)"
        );
    }

    #[test]
    fn test_open_unquoted_parameter_warns() {
        let outcome = check_code(
            r"
view: orders {
  parameter: metric { type: unquoted }
  measure: dynamic { type: sum sql: ${TABLE}.{% parameter metric %} ;; }
}",
        );
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("unrestricted unquoted parameter `metric`"));
    }

    #[test]
    fn test_restricted_parameter_passes() {
        let outcome = check_code(
            r#"
view: orders {
  parameter: metric {
    type: unquoted
    allowed_value: { value: "revenue" }
  }
  measure: dynamic { type: sum sql: ${TABLE}.{% parameter metric %} ;; }
}"#,
        );
        assert_eq!(outcome.status(), Status::Pass);
    }

    #[test]
    fn test_parameter_value_output_is_both_unquoted_and_open() {
        let outcome = check_code(
            r"
view: orders {
  parameter: metric { type: unquoted }
  measure: dynamic { type: sum sql: ${TABLE}.{{ metric._parameter_value }} ;; }
}",
        );
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.message().ends_with("(plus 1 warning(s))"));
    }
}

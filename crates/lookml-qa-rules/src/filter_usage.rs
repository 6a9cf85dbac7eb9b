//! Check that filters are wired up and dashboard queries are bounded.
//!
//! A templated `filter:` field does nothing unless some SQL applies it
//! with `{% condition <name> %}`. A filter with its own `sql:` applies
//! itself and is not inspected. Dashboard queries with neither filters
//! nor a row limit scan the whole explore on every load.

use crate::support::{sql_sources, Advice, Issues};
use lookml_qa_core::model::FieldKind;
use lookml_qa_core::utils::sql::liquid_tag_arguments;
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};
use std::collections::HashSet;

/// Check id for filter-usage.
pub const ID: &str = "filter-usage";

/// Check name for filter-usage.
pub const NAME: &str = "Filter Usage";

const ADVICE: Advice = Advice::new(
    "Apply templated filters with {% condition %} and give dashboard queries default filters or a limit.",
)
.with_example(
    "filter: region_filter { type: string }\n\nderived_table: {\n  sql: SELECT * FROM orders\n    WHERE {% condition region_filter %} region {% endcondition %} ;;\n}",
);

/// Flags unused templated filters and unbounded dashboard queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterUsage;

impl FilterUsage {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for FilterUsage {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Performance
    }

    fn description(&self) -> &'static str {
        "Templated filters are applied and dashboard queries are bounded"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();

        let applied: HashSet<&str> = sql_sources(model)
            .into_iter()
            .flat_map(|(_, sql)| liquid_tag_arguments(sql, "condition"))
            .collect();

        let mut filters = 0usize;
        for (view, field) in model.fields() {
            if field.kind != FieldKind::Filter || field.sql.is_some() {
                continue;
            }
            filters += 1;
            if !applied.contains(field.name.as_str()) {
                issues.warn(format!(
                    "filter `{}.{}` is never applied with {{% condition %}}",
                    view.base_name(),
                    field.name
                ));
            }
        }

        let mut queries = 0usize;
        for dashboard in model.dashboards() {
            for element in &dashboard.elements {
                let query = &element.query;
                if query.is_empty() {
                    continue;
                }
                queries += 1;
                if query.filters.is_empty() && query.limit.is_none() {
                    issues.warn(format!(
                        "element `{}` on dashboard `{}` has neither filters nor a limit",
                        element.display_name(),
                        dashboard.name
                    ));
                }
            }
        }

        if filters == 0 && queries == 0 {
            return CheckOutcome::pass("No filters or dashboard queries to inspect");
        }
        issues.into_outcome(
            format!("All {filters} filter(s) are applied and {queries} dashboard query(ies) are bounded"),
            ADVICE,
            ADVICE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;

    fn check_code(src: &str) -> CheckOutcome {
        let model = SourceModel::parse(src).expect("Failed to parse");
        FilterUsage::new().evaluate(&model)
    }

    #[test]
    fn test_applied_filter_passes() {
        let outcome = check_code(
            r"
view: sales {
  filter: region_filter { type: string }
  derived_table: {
    sql: SELECT * FROM sales WHERE {% condition region_filter %} region {% endcondition %} ;;
  }
}",
        );
        assert_eq!(outcome.status(), Status::Pass);
    }

    #[test]
    fn test_unused_filter_warns() {
        let outcome = check_code("view: sales { filter: region_filter { type: string } }");
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("`sales.region_filter`"));
    }

    #[test]
    fn test_filter_with_own_sql_is_not_templated() {
        let outcome = check_code(
            "view: orders { dimension: amount { type: number } filter: big_order { type: yesno sql: ${amount} > 100 ;; } }",
        );
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(outcome.message(), "No filters or dashboard queries to inspect");
    }

    #[test]
    fn test_unbounded_dashboard_query_warns() {
        let outcome = check_code(
            r#"
dashboard: d {
  elements: [
    { name: bounded query: { measures: [orders.count] limit: 10 } },
    { name: filtered query: { measures: [orders.count] filters: { orders.created_date: "30 days" } } },
    { name: open query: { measures: [orders.count] } },
    { name: text_tile type: text }
  ]
}"#,
        );
        assert_eq!(outcome.status(), Status::Warning);
        assert_eq!(
            outcome.message(),
            "1 issue(s): element `open` on dashboard `d` has neither filters nor a limit"
        );
    }

    #[test]
    fn test_nothing_to_inspect() {
        assert_eq!(
            check_code("view: a { dimension: id {} }").message(),
            "No filters or dashboard queries to inspect"
        );
    }
}

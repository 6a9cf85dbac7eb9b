//! Check for query shapes that are known to be slow.
//!
//! # Detected Patterns
//!
//! - `SELECT *` inside a derived table (scans and materializes every column)
//! - dashboard queries whose `limit` exceeds `max_query_limit`
//! - dashboards with more than `max_elements` elements (each runs a query)
//!
//! All findings are warnings.
//!
//! # Configuration
//!
//! - `max_query_limit`: Largest acceptable row limit (default: 5000)
//! - `max_elements`: Largest acceptable dashboard (default: 25)

use crate::support::{count_setting, Advice, Issues};
use lookml_qa_core::utils::sql::selects_star;
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};

/// Check id for performance-metrics.
pub const ID: &str = "performance-metrics";

/// Check name for performance-metrics.
pub const NAME: &str = "Performance Metrics";

/// Default largest acceptable query row limit.
pub const DEFAULT_MAX_QUERY_LIMIT: u64 = 5000;

/// Default largest acceptable number of dashboard elements.
pub const DEFAULT_MAX_ELEMENTS: usize = 25;

const ADVICE: Advice = Advice::new(
    "Select only the columns a derived table needs, keep row limits small and split crowded dashboards.",
)
.with_example(
    "derived_table: {\n  sql: SELECT id, user_id, sale_price FROM orders ;;\n  datagroup_trigger: daily\n}",
);

/// Flags expensive query patterns.
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    max_query_limit: u64,
    max_elements: usize,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMetrics {
    /// Creates a new check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_query_limit: DEFAULT_MAX_QUERY_LIMIT,
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }

    /// Creates the check from its `[checks.performance-metrics]` table.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new()
            .max_query_limit(
                config
                    .get_option::<u64>("max_query_limit")
                    .unwrap_or(DEFAULT_MAX_QUERY_LIMIT),
            )
            .max_elements(count_setting(config, "max_elements", DEFAULT_MAX_ELEMENTS))
    }

    /// Sets the largest acceptable row limit.
    #[must_use]
    pub fn max_query_limit(mut self, limit: u64) -> Self {
        self.max_query_limit = limit;
        self
    }

    /// Sets the largest acceptable number of elements per dashboard.
    #[must_use]
    pub fn max_elements(mut self, max: usize) -> Self {
        self.max_elements = max;
        self
    }
}

impl Check for PerformanceMetrics {
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
        "Derived tables, query limits and dashboard sizes stay within performance bounds"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();

        for view in model.views() {
            let sql = view.derived_table.as_ref().and_then(|d| d.sql.as_deref());
            if sql.is_some_and(selects_star) {
                issues.warn(format!("derived table of view `{}` uses SELECT *", view.name));
            }
        }

        for dashboard in model.dashboards() {
            if dashboard.elements.len() > self.max_elements {
                issues.warn(format!(
                    "dashboard `{}` has {} elements (max: {})",
                    dashboard.name,
                    dashboard.elements.len(),
                    self.max_elements
                ));
            }
            for element in &dashboard.elements {
                if let Some(limit) = element.query.limit.filter(|l| *l > self.max_query_limit) {
                    issues.warn(format!(
                        "element `{}` on dashboard `{}` requests {limit} rows (max: {})",
                        element.display_name(),
                        dashboard.name,
                        self.max_query_limit
                    ));
                }
            }
        }

        issues.into_outcome("Query performance is within acceptable range", ADVICE, ADVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;

    fn check_code(src: &str) -> CheckOutcome {
        let model = SourceModel::parse(src).expect("Failed to parse");
        PerformanceMetrics::new().evaluate(&model)
    }

    #[test]
    fn test_explicit_columns_pass() {
        let outcome = check_code(
            "view: recent { derived_table: { sql: SELECT id, total FROM orders ;; } }",
        );
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(outcome.message(), "Query performance is within acceptable range");
    }

    #[test]
    fn test_select_star_warns() {
        let outcome = check_code("view: recent { derived_table: { sql: select * from orders ;; } }");
        assert_eq!(outcome.status(), Status::Warning);
        assert_eq!(
            outcome.message(),
            "1 issue(s): derived table of view `recent` uses SELECT *"
        );
    }

    #[test]
    fn test_large_limit_warns() {
        let outcome = check_code(
            "dashboard: d { elements: [ { name: big query: { measures: [o.count] limit: 50000 } } ] }",
        );
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("requests 50000 rows (max: 5000)"));
    }

    #[test]
    fn test_crowded_dashboard_is_configurable() {
        let model = SourceModel::parse(
            "dashboard: d { elements: [ { name: a }, { name: b }, { name: c } ] }",
        )
        .unwrap();
        assert_eq!(PerformanceMetrics::new().evaluate(&model).status(), Status::Pass);

        let config = lookml_qa_core::Config::parse("[checks.performance-metrics]\nmax_elements = 2\n")
            .unwrap();
        let outcome = PerformanceMetrics::from_config(config.check(ID).unwrap()).evaluate(&model);
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("has 3 elements (max: 2)"));
    }
}

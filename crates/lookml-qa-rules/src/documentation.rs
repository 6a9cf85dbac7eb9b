//! Check description coverage of user-facing fields and explores.
//!
//! Hidden fields and explores are not counted.
//!
//! # Configuration
//!
//! - `min_coverage`: Share of documented items below which the check
//!   fails, between 0.0 and 1.0 (default: 0.5)

use crate::support::{enumerate, Advice};
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};

/// Check id for documentation.
pub const ID: &str = "documentation";

/// Check name for documentation.
pub const NAME: &str = "Documentation";

/// Default minimum description coverage.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.5;

const ADVICE: Advice = Advice::new(
    "Add a `description` to every visible field and explore so users understand what they are selecting.",
)
.with_example(
    "measure: total_revenue {\n  type: sum\n  sql: ${sale_price} ;;\n  description: \"Sum of sale price for completed orders\"\n}",
);

/// Measures description coverage.
#[derive(Debug, Clone)]
pub struct Documentation {
    min_coverage: f64,
}

impl Default for Documentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Documentation {
    /// Creates a new check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }

    /// Creates the check from its `[checks.documentation]` table.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new().min_coverage(config.get_float("min_coverage", DEFAULT_MIN_COVERAGE))
    }

    /// Sets the minimum coverage, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn min_coverage(mut self, min: f64) -> Self {
        self.min_coverage = min.clamp(0.0, 1.0);
        self
    }
}

impl Check for Documentation {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Documentation
    }

    fn description(&self) -> &'static str {
        "Visible fields and explores carry descriptions"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut total = 0usize;
        let mut missing = Vec::new();

        for (view, field) in model.fields() {
            if field.hidden {
                continue;
            }
            total += 1;
            if !field.is_documented() {
                missing.push(format!("{} `{}.{}`", field.kind, view.base_name(), field.name));
            }
        }
        for explore in model.explores() {
            if explore.hidden {
                continue;
            }
            total += 1;
            if !explore.description.as_deref().is_some_and(|d| !d.trim().is_empty()) {
                missing.push(format!("explore `{}`", explore.name));
            }
        }

        if total == 0 {
            return CheckOutcome::pass("No visible fields or explores to document");
        }
        if missing.is_empty() {
            return CheckOutcome::pass(format!(
                "All {total} visible fields and explores are documented"
            ));
        }

        let documented = total - missing.len();
        #[allow(clippy::cast_precision_loss)]
        let coverage = documented as f64 / total as f64;
        let summary = format!(
            "{documented} of {total} visible fields and explores are documented ({}%); undocumented: {}",
            documented * 100 / total,
            enumerate(&missing)
        );
        ADVICE.attach(if coverage < self.min_coverage {
            CheckOutcome::fail(summary)
        } else {
            CheckOutcome::warning(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;

    fn check_code(src: &str) -> CheckOutcome {
        let model = SourceModel::parse(src).expect("Failed to parse");
        Documentation::new().evaluate(&model)
    }

    #[test]
    fn test_fully_documented_passes() {
        let outcome = check_code(
            r#"
view: orders {
  dimension: id { description: "Order id" }
  dimension: internal { hidden: yes }
}
explore: orders { description: "Orders and their items" }
"#,
        );
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(outcome.message(), "All 2 visible fields and explores are documented");
    }

    #[test]
    fn test_partial_coverage_warns() {
        let outcome = check_code(
            r#"
view: orders {
  dimension: id { description: "Order id" }
  dimension: status { description: "Fulfilment status" }
  measure: count {}
}"#,
        );
        assert_eq!(outcome.status(), Status::Warning);
        assert_eq!(
            outcome.message(),
            "2 of 3 visible fields and explores are documented (66%); undocumented: measure `orders.count`"
        );
    }

    #[test]
    fn test_low_coverage_fails() {
        let outcome = check_code("view: orders { dimension: id {} measure: count {} }");
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.finding().unwrap().recommendation.is_some());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let model = SourceModel::parse(r#"view: orders { dimension: id { description: "x" } measure: count {} }"#)
            .unwrap();
        assert_eq!(Documentation::new().evaluate(&model).status(), Status::Warning);
        assert_eq!(
            Documentation::new().min_coverage(0.9).evaluate(&model).status(),
            Status::Fail
        );
    }

    #[test]
    fn test_blank_description_is_missing() {
        let outcome = check_code(r#"view: orders { dimension: id { description: "  " } }"#);
        assert_eq!(outcome.status(), Status::Fail);
    }
}

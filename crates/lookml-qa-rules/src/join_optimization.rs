//! Check that explore joins are declared efficiently.
//!
//! # Detected Patterns
//!
//! - joins without `relationship` (fanout cannot be reasoned about) - fail
//! - joins without `sql_on` or `foreign_key` (other than `type: cross`) - fail
//! - `full_outer` and `cross` joins - warning
//! - explores joining more than `max_joins` views - warning
//!
//! # Configuration
//!
//! - `max_joins`: Maximum joins per explore (default: 10)

use crate::support::{count_setting, Advice, Issues};
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};

/// Check id for join-optimization.
pub const ID: &str = "join-optimization";

/// Check name for join-optimization.
pub const NAME: &str = "Join Optimization";

/// Default maximum number of joins in one explore.
pub const DEFAULT_MAX_JOINS: usize = 10;

const FAIL_ADVICE: Advice = Advice::new(
    "Declare `relationship` and a join condition on every join so Looker can compute symmetric aggregates.",
)
.with_example(
    "join: users {\n  type: left_outer\n  relationship: many_to_one\n  sql_on: ${orders.user_id} = ${users.id} ;;\n}",
);

const WARN_ADVICE: Advice = Advice::new(
    "Prefer left_outer or inner joins and split very wide explores into focused ones.",
);

/// Flags joins that are ambiguous or expensive.
#[derive(Debug, Clone)]
pub struct JoinOptimization {
    max_joins: usize,
}

impl Default for JoinOptimization {
    fn default() -> Self {
        Self::new()
    }
}

impl JoinOptimization {
    /// Creates a new check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_joins: DEFAULT_MAX_JOINS,
        }
    }

    /// Creates the check from its `[checks.join-optimization]` table.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new().max_joins(count_setting(config, "max_joins", DEFAULT_MAX_JOINS))
    }

    /// Sets the maximum joins per explore.
    #[must_use]
    pub fn max_joins(mut self, max: usize) -> Self {
        self.max_joins = max;
        self
    }
}

impl Check for JoinOptimization {
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
        "Joins declare relationships and conditions and avoid expensive join types"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();
        let mut joins = 0usize;

        for explore in model.explores() {
            joins += explore.joins.len();
            for join in &explore.joins {
                let at = format!("join `{}` in explore `{}`", join.name, explore.name);
                let join_type = join.join_type.as_deref().unwrap_or("left_outer");
                if join.relationship.is_none() {
                    issues.fail(format!("{at} has no relationship"));
                }
                if join_type != "cross" && !join.has_condition() {
                    issues.fail(format!("{at} has no sql_on or foreign_key"));
                }
                if matches!(join_type, "full_outer" | "cross") {
                    issues.warn(format!("{at} uses a {join_type} join"));
                }
            }
            if explore.joins.len() > self.max_joins {
                issues.warn(format!(
                    "explore `{}` has {} joins (max: {})",
                    explore.name,
                    explore.joins.len(),
                    self.max_joins
                ));
            }
        }

        if joins == 0 {
            return CheckOutcome::pass("No joins to inspect");
        }
        issues.into_outcome(
            format!("All {joins} join(s) declare relationships and conditions"),
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
        JoinOptimization::new().evaluate(&model)
    }

    #[test]
    fn test_well_formed_join_passes() {
        let outcome = check_code(
            r"
explore: orders {
  join: users {
    type: left_outer
    relationship: many_to_one
    sql_on: ${orders.user_id} = ${users.id} ;;
  }
  join: items { relationship: one_to_many foreign_key: item_id }
}",
        );
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(outcome.message(), "All 2 join(s) declare relationships and conditions");
    }

    #[test]
    fn test_missing_relationship_and_condition_fail() {
        let outcome = check_code("explore: orders { join: users {} }");
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.message().starts_with("2 issue(s)"));
    }

    #[test]
    fn test_full_outer_warns() {
        let outcome = check_code(
            "explore: a { join: b { type: full_outer relationship: one_to_one sql_on: 1=1 ;; } }",
        );
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("full_outer"));
    }

    #[test]
    fn test_cross_join_needs_no_condition() {
        let outcome = check_code("explore: a { join: b { type: cross relationship: many_to_many } }");
        assert_eq!(outcome.status(), Status::Warning);
    }

    #[test]
    fn test_join_limit_is_configurable() {
        let config = lookml_qa_core::Config::parse("[checks.join-optimization]\nmax_joins = 1\n")
            .unwrap();
        let check = JoinOptimization::from_config(config.check(ID).unwrap());
        let model = SourceModel::parse(
            r"
explore: a {
  join: b { relationship: many_to_one foreign_key: b_id }
  join: c { relationship: many_to_one foreign_key: c_id }
}",
        )
        .unwrap();
        let outcome = check.evaluate(&model);
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("has 2 joins (max: 1)"));
    }

    #[test]
    fn test_no_joins() {
        assert_eq!(check_code("explore: a {}").message(), "No joins to inspect");
    }
}

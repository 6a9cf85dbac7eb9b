//! Surface unresolved view, field and access grant references.
//!
//! References are resolved once when the model is built; this check only
//! reports what resolution recorded.

use crate::support::{Advice, Issues};
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};

/// Check id for reference-integrity.
pub const ID: &str = "reference-integrity";

/// Check name for reference-integrity.
pub const NAME: &str = "Reference Integrity";

const ADVICE: Advice = Advice::new(
    "Fix the referenced names, or include the files that declare them.",
);

/// Reports the model's reference warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceIntegrity;

impl ReferenceIntegrity {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for ReferenceIntegrity {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Organization
    }

    fn description(&self) -> &'static str {
        "Every referenced view, field and access grant is declared"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();
        for warning in model.warnings() {
            issues.warn(warning.to_string());
        }
        issues.into_outcome("All references resolve", ADVICE, ADVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;

    fn check_code(src: &str) -> CheckOutcome {
        let model = SourceModel::parse(src).expect("Failed to parse");
        ReferenceIntegrity::new().evaluate(&model)
    }

    #[test]
    fn test_resolved_references_pass() {
        let outcome = check_code(
            "view: orders { dimension: id {} measure: total { sql: ${id} ;; } }\nexplore: orders {}",
        );
        assert_eq!(outcome, CheckOutcome::pass("All references resolve"));
    }

    #[test]
    fn test_unknown_join_view_warns() {
        let outcome = check_code(
            "view: orders { dimension: id {} }\nexplore: orders {\n  join: customers { sql_on: ${orders.id} = ${customers.id} ;; }\n}",
        );
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome
            .message()
            .contains("unresolved view `customers` in join `customers` of explore `orders` (line 3)"));
    }

    #[test]
    fn test_unknown_local_field_warns() {
        let outcome = check_code("view: orders { measure: total { sql: ${amount} ;; } }");
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("`amount`"));
    }
}

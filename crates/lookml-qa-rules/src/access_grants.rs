//! Check that access grants are complete and actually used.
//!
//! # Detected Patterns
//!
//! - grants missing `user_attribute` or `allowed_values` - fail
//! - `required_access_grants` naming a grant that is not declared - fail
//! - grants declared but required by no explore, join or field - warning

use crate::support::{Advice, Issues};
use lookml_qa_core::model::ReferenceKind;
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};
use std::collections::HashSet;

/// Check id for access-grants.
pub const ID: &str = "access-grants";

/// Check name for access-grants.
pub const NAME: &str = "Access Grants";

const FAIL_ADVICE: Advice = Advice::new(
    "Give every access grant a user attribute and allowed values, and declare every grant you require.",
)
.with_example(
    "access_grant: can_view_pii {\n  user_attribute: department\n  allowed_values: [\"finance\", \"legal\"]\n}",
);

const WARN_ADVICE: Advice = Advice::new(
    "Remove unused access grants or attach them with `required_access_grants`.",
);

/// Validates access grant declarations and usage.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGrants;

impl AccessGrants {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn required_grants(model: &SourceModel) -> HashSet<&str> {
    let mut required = HashSet::new();
    for explore in model.explores() {
        required.extend(explore.required_access_grants.iter().map(String::as_str));
        for join in &explore.joins {
            required.extend(join.required_access_grants.iter().map(String::as_str));
        }
    }
    for (_, field) in model.fields() {
        required.extend(field.required_access_grants.iter().map(String::as_str));
    }
    required
}

impl Check for AccessGrants {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Access
    }

    fn description(&self) -> &'static str {
        "Access grants are complete, declared and used"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let required = required_grants(model);
        let declared = model.access_grants().count();
        if declared == 0 && required.is_empty() {
            return CheckOutcome::pass("No access grants declared or required");
        }

        let mut issues = Issues::new();
        for grant in model.access_grants() {
            if grant.user_attribute.is_none() {
                issues.fail(format!("access grant `{}` has no user_attribute", grant.name));
            }
            if grant.allowed_values.is_empty() {
                issues.fail(format!("access grant `{}` has no allowed_values", grant.name));
            }
            if !required.contains(grant.name.as_str()) {
                issues.warn(format!("access grant `{}` is never required", grant.name));
            }
        }
        for warning in model.warnings() {
            if warning.kind == ReferenceKind::AccessGrant {
                issues.fail(format!(
                    "{} requires undeclared access grant `{}`",
                    warning.context, warning.reference
                ));
            }
        }

        issues.into_outcome("Access controls properly configured", FAIL_ADVICE, WARN_ADVICE)
    }
}

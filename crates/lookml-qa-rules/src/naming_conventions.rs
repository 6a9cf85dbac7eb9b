//! Check that LookML object names use lower `snake_case`.
//!
//! # Rationale
//!
//! Names end up in URLs, SQL aliases and `${view.field}` references. Mixed
//! case and stray punctuation make references error-prone; display text
//! belongs in `label`.
//!
//! # Inspected Names
//!
//! - models, views (refinement `+` prefix allowed), explores, joins
//! - dimensions, dimension groups, measures, filters, parameters
//! - access grants, dashboards and named dashboard elements

use crate::support::{Advice, Issues};
use lookml_qa_core::utils::is_snake_case;
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};

/// Check id for naming-conventions.
pub const ID: &str = "naming-conventions";

/// Check name for naming-conventions.
pub const NAME: &str = "Naming Conventions";

const ADVICE: Advice = Advice::new(
    "Rename objects to lower snake_case and move display text into `label`.",
)
.with_example("dimension: total_revenue {\n  label: \"Total Revenue\"\n}");

/// Requires lower `snake_case` names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingConventions;

impl NamingConventions {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for NamingConventions {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn description(&self) -> &'static str {
        "Object names use lower snake_case"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut names: Vec<(&str, &str)> = Vec::new();

        for m in model.models() {
            if let Some(name) = &m.name {
                names.push(("model", name.as_str()));
            }
            names.extend(m.access_grants.iter().map(|g| ("access grant", g.name.as_str())));
        }
        for view in model.views() {
            names.push(("view", view.name.as_str()));
            names.extend(view.fields.iter().map(|f| (f.kind.keyword(), f.name.as_str())));
        }
        for explore in model.explores() {
            names.push(("explore", explore.name.as_str()));
            names.extend(explore.joins.iter().map(|j| ("join", j.name.as_str())));
        }
        for dashboard in model.dashboards() {
            names.push(("dashboard", dashboard.name.as_str()));
            names.extend(
                dashboard
                    .elements
                    .iter()
                    .filter_map(|e| e.name.as_deref())
                    .map(|n| ("element", n)),
            );
        }

        if names.is_empty() {
            return CheckOutcome::pass("No named objects to inspect");
        }

        let mut issues = Issues::new();
        for (kind, name) in &names {
            if !is_snake_case(name) {
                issues.fail(format!("{kind} `{name}` is not snake_case"));
            }
        }
        issues.into_outcome(
            format!("All {} object names follow naming guidelines", names.len()),
            ADVICE,
            ADVICE,
        )
    }
}

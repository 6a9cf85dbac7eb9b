//! Check model structure: connections and unreachable views.
//!
//! A model that declares explores needs a `connection` to run them. When
//! the source declares explores, every view should be reachable from one of
//! them, either as a base view or through a join. Refinements, views that
//! others extend, and views used through `${view.SQL_TABLE_NAME}` count as
//! reachable.

use crate::support::{sql_sources, Advice, Issues};
use lookml_qa_core::utils::sql::{sql_references, SqlReference};
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};
use std::collections::HashSet;

/// Check id for model-organization.
pub const ID: &str = "model-organization";

/// Check name for model-organization.
pub const NAME: &str = "Model Organization";

const FAIL_ADVICE: Advice = Advice::new(
    "Declare the database connection in every model that defines explores.",
)
.with_example("connection: \"analytics_warehouse\"\ninclude: \"/views/*.view.lkml\"");

const WARN_ADVICE: Advice = Advice::new(
    "Join orphaned views into an explore or remove them from the project.",
);

/// Validates model connections and view reachability.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelOrganization;

impl ModelOrganization {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Views reachable from an explore, extended by another view, or named in a
/// `SQL_TABLE_NAME` reference.
fn reachable_views(model: &SourceModel) -> HashSet<&str> {
    let mut reachable: HashSet<&str> = model.explores().flat_map(|e| e.views()).collect();
    for view in model.views() {
        reachable.extend(view.extends.iter().map(String::as_str));
    }

    let table_sql = model.views().filter_map(|v| v.sql_table_name.as_deref());
    for sql in sql_sources(model).into_iter().map(|(_, sql)| sql).chain(table_sql) {
        for reference in sql_references(sql) {
            if let SqlReference::Qualified { view, .. } = &reference {
                if reference.is_table_name() {
                    if let Some(known) = model.find_view(view) {
                        reachable.insert(known.base_name());
                    }
                }
            }
        }
    }
    reachable
}

impl Check for ModelOrganization {
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
        "Models declare connections and every view is reachable from an explore"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();

        for lookml_model in model.models() {
            if !lookml_model.explores.is_empty() && lookml_model.connection.is_none() {
                issues.fail(format!(
                    "model `{}` declares explores but no connection",
                    lookml_model.display_name()
                ));
            }
        }

        if model.explores().next().is_some() {
            let reachable = reachable_views(model);
            for view in model.views() {
                if !view.is_refinement() && !reachable.contains(view.name.as_str()) {
                    issues.warn(format!("view `{}` is not used by any explore", view.name));
                }
            }
        }

        issues.into_outcome("Clean model structure maintained", FAIL_ADVICE, WARN_ADVICE)
    }
}

//! Check that SQL derived tables are persisted.
//!
//! An ephemeral derived table is re-run as a subquery on every query that
//! touches the view. Persisting it with `datagroup_trigger`, `persist_for`
//! or `sql_trigger_value` builds it once per refresh.
//!
//! Native derived tables (`explore_source`) are not inspected.

use crate::support::{Advice, Issues};
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};

/// Check id for derived-tables.
pub const ID: &str = "derived-tables";

/// Check name for derived-tables.
pub const NAME: &str = "Derived Tables";

const ADVICE: Advice = Advice::new(
    "Persist SQL derived tables with a datagroup so they are built once per refresh.",
)
.with_example(
    "derived_table: {\n  sql: SELECT user_id, COUNT(*) AS orders FROM orders GROUP BY 1 ;;\n  datagroup_trigger: nightly_etl\n}",
);

/// Flags SQL derived tables without persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedTables;

impl DerivedTables {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for DerivedTables {
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
        "SQL derived tables declare a persistence strategy"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();
        let mut tables = 0usize;

        for view in model.views() {
            let Some(derived) = &view.derived_table else {
                continue;
            };
            if derived.sql.is_none() {
                continue;
            }
            tables += 1;
            if !derived.persisted {
                issues.warn(format!(
                    "derived table of view `{}` is not persisted",
                    view.name
                ));
            }
        }

        if tables == 0 {
            return CheckOutcome::pass("No SQL derived tables to inspect");
        }
        issues.into_outcome(
            format!("All {tables} SQL derived table(s) are persisted"),
            ADVICE,
            ADVICE,
        )
    }
}

//! Check view size and SQL expression length.
//!
//! # Rationale
//!
//! Views with hundreds of fields are hard to navigate in the field picker
//! and hard to review. Long inline SQL belongs in a derived table where it
//! can be persisted and tested.
//!
//! # Configuration
//!
//! - `max_fields`: Fields per view before the check fails (default: 50)
//! - `max_sql_lines`: Lines per field SQL before the check warns (default: 20)

use crate::support::{count_setting, Advice, Issues};
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};

/// Check id for code-complexity.
pub const ID: &str = "code-complexity";

/// Check name for code-complexity.
pub const NAME: &str = "Code Complexity";

/// Default maximum fields per view.
pub const DEFAULT_MAX_FIELDS: usize = 50;

/// Default maximum lines of SQL per field.
pub const DEFAULT_MAX_SQL_LINES: usize = 20;

const FAIL_ADVICE: Advice = Advice::new(
    "Split large views by subject area, or move rarely used fields into a refinement or extension.",
);

const WARN_ADVICE: Advice = Advice::new(
    "Move long SQL into a derived table and reference its columns from simple dimensions.",
);

/// Flags oversized views and long field SQL.
#[derive(Debug, Clone)]
pub struct CodeComplexity {
    max_fields: usize,
    max_sql_lines: usize,
}

impl Default for CodeComplexity {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeComplexity {
    /// Creates a new check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_fields: DEFAULT_MAX_FIELDS,
            max_sql_lines: DEFAULT_MAX_SQL_LINES,
        }
    }

    /// Creates the check from its `[checks.code-complexity]` table.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new()
            .max_fields(count_setting(config, "max_fields", DEFAULT_MAX_FIELDS))
            .max_sql_lines(count_setting(config, "max_sql_lines", DEFAULT_MAX_SQL_LINES))
    }

    /// Sets the maximum fields per view.
    #[must_use]
    pub fn max_fields(mut self, max: usize) -> Self {
        self.max_fields = max;
        self
    }

    /// Sets the maximum SQL lines per field.
    #[must_use]
    pub fn max_sql_lines(mut self, max: usize) -> Self {
        self.max_sql_lines = max;
        self
    }
}

impl Check for CodeComplexity {
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
        "Views stay small and field SQL stays short"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();

        for view in model.views() {
            if view.fields.len() > self.max_fields {
                issues.fail(format!(
                    "view `{}` has {} fields (max: {})",
                    view.name,
                    view.fields.len(),
                    self.max_fields
                ));
            }
            for field in &view.fields {
                let lines = field.sql.as_deref().map_or(0, |sql| sql.trim().lines().count());
                if lines > self.max_sql_lines {
                    issues.warn(format!(
                        "{} `{}.{}` has {lines} lines of SQL (max: {})",
                        field.kind,
                        view.base_name(),
                        field.name,
                        self.max_sql_lines
                    ));
                }
            }
        }

        issues.into_outcome(
            "Views and field SQL are within complexity limits",
            FAIL_ADVICE,
            WARN_ADVICE,
        )
    }
}

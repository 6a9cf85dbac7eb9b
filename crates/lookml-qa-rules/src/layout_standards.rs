//! Check dashboard layout mode and grid placement.
//!
//! # Detected Patterns
//!
//! - dashboards whose `layout` is not the required one - fail
//! - elements whose `col + width` runs past the grid - fail
//! - elements missing `row`, `col`, `width` or `height` on a newspaper
//!   dashboard - warning
//!
//! A dashboard without `layout:` is treated as `tile`, Looker's default.
//!
//! # Configuration
//!
//! - `layout`: Required layout (default: `newspaper`)
//! - `grid_columns`: Grid width (default: 24)
//! - `require_positions`: Warn about unplaced elements (default: true)

use crate::support::{count_setting, Advice, Issues};
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};

/// Check id for layout-standards.
pub const ID: &str = "layout-standards";

/// Check name for layout-standards.
pub const NAME: &str = "Layout Standards";

/// Default required layout.
pub const DEFAULT_LAYOUT: &str = "newspaper";

/// Default grid width in columns.
pub const DEFAULT_GRID_COLUMNS: usize = 24;

const NEWSPAPER: &str = "newspaper";

const IMPLICIT_LAYOUT: &str = "tile";

const FAIL_ADVICE: Advice = Advice::new(
    "Use the newspaper layout and keep every element inside the 24-column grid.",
)
.with_example(
    "dashboard: sales {\n  layout: newspaper\n  elements: [\n    { name: revenue row: 0 col: 0 width: 12 height: 6 }\n  ]\n}",
);

const WARN_ADVICE: Advice = Advice::new(
    "Give every element an explicit row, col, width and height so the layout is reproducible.",
);

/// Validates dashboard layout.
#[derive(Debug, Clone)]
pub struct LayoutStandards {
    layout: String,
    grid_columns: usize,
    require_positions: bool,
}

impl Default for LayoutStandards {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutStandards {
    /// Creates a new check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.to_string(),
            grid_columns: DEFAULT_GRID_COLUMNS,
            require_positions: true,
        }
    }

    /// Creates the check from its `[checks.layout-standards]` table.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new()
            .layout(config.get_str("layout", DEFAULT_LAYOUT))
            .grid_columns(count_setting(config, "grid_columns", DEFAULT_GRID_COLUMNS))
            .require_positions(config.get_bool("require_positions", true))
    }

    /// Sets the required layout.
    #[must_use]
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Sets the grid width.
    #[must_use]
    pub fn grid_columns(mut self, columns: usize) -> Self {
        self.grid_columns = columns;
        self
    }

    /// Sets whether newspaper elements must carry a complete position.
    #[must_use]
    pub fn require_positions(mut self, required: bool) -> Self {
        self.require_positions = required;
        self
    }
}

impl Check for LayoutStandards {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::VisualStyle
    }

    fn description(&self) -> &'static str {
        "Dashboards use the standard layout and grid"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();
        let dashboards = model.dashboards();

        for dashboard in dashboards {
            let layout = dashboard.layout.as_deref().unwrap_or(IMPLICIT_LAYOUT);
            if layout != self.layout {
                issues.fail(format!(
                    "dashboard `{}` uses {layout} layout (expected: {})",
                    dashboard.name, self.layout
                ));
            }
            for element in &dashboard.elements {
                let placement = element.placement;
                if let Some(edge) = placement.right_edge() {
                    if !usize::try_from(edge).is_ok_and(|edge| edge <= self.grid_columns) {
                        issues.fail(format!(
                            "element `{}` on dashboard `{}` ends at column {edge} (grid: {})",
                            element.display_name(),
                            dashboard.name,
                            self.grid_columns
                        ));
                    }
                }
                if self.require_positions && layout == NEWSPAPER && !placement.is_complete() {
                    issues.warn(format!(
                        "element `{}` on dashboard `{}` has no complete position",
                        element.display_name(),
                        dashboard.name
                    ));
                }
            }
        }

        if dashboards.is_empty() {
            return CheckOutcome::pass("No dashboards to inspect");
        }
        issues.into_outcome(
            format!("All {} dashboard(s) follow layout standards", dashboards.len()),
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
        LayoutStandards::new().evaluate(&model)
    }

    #[test]
    fn test_placed_newspaper_dashboard_passes() {
        let outcome = check_code(
            "dashboard: d { layout: newspaper elements: [ { name: a row: 0 col: 12 width: 12 height: 6 } ] }",
        );
        assert_eq!(outcome.status(), Status::Pass);
        assert_eq!(outcome.message(), "All 1 dashboard(s) follow layout standards");
    }

    #[test]
    fn test_wrong_layout_fails() {
        let outcome = check_code("dashboard: d { layout: static }");
        assert_eq!(outcome.status(), Status::Fail);
        assert_eq!(
            outcome.message(),
            "1 issue(s): dashboard `d` uses static layout (expected: newspaper)"
        );
    }

    #[test]
    fn test_missing_layout_is_tile() {
        let outcome = check_code("dashboard: d {}");
        assert!(outcome.message().contains("uses tile layout"));
    }

    #[test]
    fn test_element_past_grid_fails() {
        let outcome = check_code(
            "dashboard: d { layout: newspaper elements: [ { name: a row: 0 col: 16 width: 12 height: 6 } ] }",
        );
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.message().contains("ends at column 28 (grid: 24)"));
    }

    #[test]
    fn test_unplaced_element_warns() {
        let outcome = check_code("dashboard: d { layout: newspaper elements: [ { name: a width: 8 } ] }");
        assert_eq!(outcome.status(), Status::Warning);
        assert!(outcome.message().contains("no complete position"));
    }

    #[test]
    fn test_overflowing_column_is_past_grid() {
        let outcome = check_code(
            "dashboard: d { layout: newspaper elements: [ { name: a row: 0 col: 4294967295 width: 2 height: 1 } ] }",
        );
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.message().contains("ends at column 4294967297 (grid: 24)"));
    }

    #[test]
    fn test_positions_can_be_optional() {
        let config = lookml_qa_core::Config::parse(
            "[checks.layout-standards]\nrequire_positions = false\n",
        )
        .unwrap();
        let check = LayoutStandards::from_config(config.check(ID).unwrap());
        let model = SourceModel::parse(
            "dashboard: d { layout: newspaper elements: [ { name: a width: 8 } ] }",
        )
        .unwrap();
        assert_eq!(check.evaluate(&model).status(), Status::Pass);
    }

    #[test]
    fn test_advice_example_parses() {
        let example = FAIL_ADVICE.example.unwrap();
        let model = SourceModel::parse(example).unwrap();
        assert_eq!(check_code(example).status(), Status::Pass);
        assert_eq!(model.dashboards().len(), 1);
    }

    #[test]
    fn test_no_dashboards() {
        assert_eq!(check_code("view: v {}").message(), "No dashboards to inspect");
    }
}

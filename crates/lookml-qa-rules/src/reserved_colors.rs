//! Check that traffic-light colors keep their meaning.
//!
//! Red, green and yellow signal bad, good and caution. They may appear in
//! `conditional_formatting` and on `single_value` tiles, where they encode
//! status. Anywhere else a series painted red reads as an alert.
//!
//! # Configuration
//!
//! - `reserved`: Reserved color literals (default: `#ea4335`, `#34a853`,
//!   `#fbbc04`)

use crate::support::{Advice, Issues};
use lookml_qa_core::utils::normalize_color;
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};

/// Check id for reserved-colors.
pub const ID: &str = "reserved-colors";

/// Check name for reserved-colors.
pub const NAME: &str = "Reserved Colors Usage";

/// Default reserved colors.
pub const DEFAULT_RESERVED: &[&str] = &["#ea4335", "#34a853", "#fbbc04"];

/// Visualization type allowed to use reserved colors directly.
const STATUS_TILE: &str = "single_value";

const ADVICE: Advice = Advice::new(
    "Reserve red, green and yellow for conditional formatting and status tiles; pick neutral palette colors for series.",
)
.with_example(
    "conditional_formatting: [{\n  type: less than\n  value: 0\n  background_color: \"#ea4335\"\n}]",
);

/// Flags reserved colors outside status contexts.
#[derive(Debug, Clone)]
pub struct ReservedColors {
    reserved: Vec<String>,
}

impl Default for ReservedColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservedColors {
    /// Creates a new check with the default reserved colors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reserved: DEFAULT_RESERVED.iter().map(|c| normalize_color(c)).collect(),
        }
    }

    /// Creates the check from its `[checks.reserved-colors]` table.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        let reserved = config.get_str_array("reserved");
        if reserved.is_empty() {
            Self::new()
        } else {
            Self::new().reserved(reserved)
        }
    }

    /// Replaces the reserved colors.
    #[must_use]
    pub fn reserved<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved = colors.into_iter().map(|c| normalize_color(c.as_ref())).collect();
        self
    }
}

impl Check for ReservedColors {
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
        "Traffic-light colors are used only for status"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();

        for dashboard in model.dashboards() {
            for element in &dashboard.elements {
                if element.viz_type.as_deref() == Some(STATUS_TILE) {
                    continue;
                }
                for color in element.style.colors.iter().filter(|c| !c.conditional) {
                    if self.reserved.contains(&normalize_color(&color.value)) {
                        issues.fail(format!(
                            "element `{}` on dashboard `{}` uses reserved color {} in `{}`",
                            element.display_name(),
                            dashboard.name,
                            color.value,
                            color.property
                        ));
                    }
                }
            }
        }

        issues.into_outcome(
            "Reserved colors are used only for conditional formatting and status tiles",
            ADVICE,
            ADVICE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;

    fn check_code(src: &str) -> CheckOutcome {
        let model = SourceModel::parse(src).expect("Failed to parse");
        ReservedColors::new().evaluate(&model)
    }

    #[test]
    fn test_conditional_formatting_passes() {
        let outcome = check_code(
            r##"
dashboard: d {
  elements: [
    { name: trend type: looker_line conditional_formatting: [{ background_color: "#EA4335" }] },
    { name: kpi type: single_value series_colors: { o.count: "#34a853" } }
  ]
}"##,
        );
        assert_eq!(outcome.status(), Status::Pass);
    }

    #[test]
    fn test_reserved_series_color_fails() {
        let outcome = check_code(
            r##"dashboard: d { elements: [ { name: trend type: looker_line series_colors: { o.count: "#EA4335" } } ] }"##,
        );
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.message().contains("uses reserved color #EA4335 in `series_colors.o.count`"));
    }

    #[test]
    fn test_reserved_list_from_config() {
        let config =
            lookml_qa_core::Config::parse("[checks.reserved-colors]\nreserved = [\"#000\"]\n").unwrap();
        let model = SourceModel::parse(
            r##"dashboard: d { elements: [ { name: a series_colors: { o.count: "#000000" } } ] }"##,
        )
        .unwrap();
        let outcome = ReservedColors::from_config(config.check(ID).unwrap()).evaluate(&model);
        assert_eq!(outcome.status(), Status::Fail);
    }
}

//! Check that each dashboard sticks to a few font sizes.
//!
//! Sizes compare by value, so `14` and `14px` are the same size. Values
//! that are not numbers (`large`) count as sizes of their own.
//!
//! # Configuration
//!
//! - `max_font_sizes`: Distinct font sizes per dashboard (default: 3)

use crate::support::{count_setting, Advice, Issues};
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};
use std::collections::BTreeSet;

/// Check id for typography-consistency.
pub const ID: &str = "typography-consistency";

/// Check name for typography-consistency.
pub const NAME: &str = "Typography Consistency";

/// Default maximum distinct font sizes per dashboard.
pub const DEFAULT_MAX_FONT_SIZES: usize = 3;

const ADVICE: Advice = Advice::new(
    "Settle on a small type scale, for example one size for titles and one for values.",
)
.with_example("title_text_size: 14\nvalue_text_size: 24");

/// Flags dashboards with too many font sizes.
#[derive(Debug, Clone)]
pub struct Typography {
    max_font_sizes: usize,
}

impl Default for Typography {
    fn default() -> Self {
        Self::new()
    }
}

impl Typography {
    /// Creates a new check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_font_sizes: DEFAULT_MAX_FONT_SIZES,
        }
    }

    /// Creates the check from its `[checks.typography-consistency]` table.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new().max_font_sizes(count_setting(config, "max_font_sizes", DEFAULT_MAX_FONT_SIZES))
    }

    /// Sets the maximum distinct font sizes per dashboard.
    #[must_use]
    pub fn max_font_sizes(mut self, max: usize) -> Self {
        self.max_font_sizes = max;
        self
    }
}

/// Parses `14`, `14px` or `14.5` into a point size.
fn font_size(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let number = raw.strip_suffix("px").unwrap_or(raw).trim();
    number.parse::<f64>().ok().filter(|size| size.is_finite())
}

/// Distinct sizes, numeric ones first in ascending order.
fn distinct_sizes<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut numeric = Vec::new();
    let mut named = BTreeSet::new();
    for value in raw {
        match font_size(value) {
            Some(size) => numeric.push(size),
            None => {
                named.insert(value.trim());
            }
        }
    }
    numeric.sort_by(f64::total_cmp);
    numeric.dedup();

    numeric
        .iter()
        .map(ToString::to_string)
        .chain(named.into_iter().map(String::from))
        .collect()
}

impl Check for Typography {
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
        "Dashboards use a consistent set of font sizes"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();

        for dashboard in model.dashboards() {
            let sizes = distinct_sizes(
                dashboard
                    .elements
                    .iter()
                    .flat_map(|e| e.style.font_sizes.iter().map(String::as_str)),
            );
            if sizes.len() > self.max_font_sizes {
                issues.warn(format!(
                    "dashboard `{}` uses {} font sizes ({}; max: {})",
                    dashboard.name,
                    sizes.len(),
                    sizes.join(", "),
                    self.max_font_sizes
                ));
            }
        }

        issues.into_outcome("Font sizes are consistent across dashboards", ADVICE, ADVICE)
    }
}

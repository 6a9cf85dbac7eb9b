//! Check dashboard element colors against the approved palette.
//!
//! Colors are compared after normalization, so `#1A73E8` and `#1a73e8`
//! match and `#fff` matches `#ffffff`.
//!
//! # Configuration
//!
//! - `palette`: Approved color literals (default: the standard Looker
//!   categorical palette plus black and white)

use crate::support::{Advice, Issues};
use lookml_qa_core::utils::normalize_color;
use lookml_qa_core::{Category, Check, CheckConfig, CheckOutcome, SourceModel};
use std::collections::HashSet;

/// Check id for color-palette-compliance.
pub const ID: &str = "color-palette-compliance";

/// Check name for color-palette-compliance.
pub const NAME: &str = "Color Palette Compliance";

/// Default approved colors.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#1a73e8", "#12b5cb", "#e52592", "#e8710a", "#f9ab00", "#7cb342", "#9334e6", "#80868b",
    "#079c98", "#a8a116", "#ea4335", "#ff8168", "#34a853", "#fbbc04", "#ffffff", "#000000",
];

const ADVICE: Advice = Advice::new(
    "Use colors from the approved palette so dashboards look consistent.",
)
.with_example("series_colors: {\n  orders.count: \"#1a73e8\"\n  orders.total: \"#12b5cb\"\n}");

/// Flags element colors outside the palette.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    palette: HashSet<String>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPalette {
    /// Creates a new check with the default palette.
    #[must_use]
    pub fn new() -> Self {
        Self::with_palette(DEFAULT_PALETTE.iter().copied())
    }

    /// Creates a check that approves exactly `colors`.
    pub fn with_palette<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            palette: colors.into_iter().map(|c| normalize_color(c.as_ref())).collect(),
        }
    }

    /// Creates the check from its `[checks.color-palette-compliance]` table.
    /// An empty or missing `palette` keeps the default.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        let palette = config.get_str_array("palette");
        if palette.is_empty() {
            Self::new()
        } else {
            Self::with_palette(palette)
        }
    }
}

impl Check for ColorPalette {
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
        "Element colors come from the approved palette"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();
        let mut colors = 0usize;

        for dashboard in model.dashboards() {
            for element in &dashboard.elements {
                for color in &element.style.colors {
                    colors += 1;
                    if !self.palette.contains(&normalize_color(&color.value)) {
                        issues.fail(format!(
                            "element `{}` on dashboard `{}` uses off-palette color {} in `{}`",
                            element.display_name(),
                            dashboard.name,
                            color.value,
                            color.property
                        ));
                    }
                }
            }
        }

        if colors == 0 {
            return CheckOutcome::pass("No element colors to inspect");
        }
        issues.into_outcome(
            format!("All {colors} element color(s) follow the palette"),
            ADVICE,
            ADVICE,
        )
    }
}

//! Check presets for common configurations.

use crate::{
    AccessGrants, CodeComplexity, ColorPalette, DataTypes, DerivedTables, DimensionGroups,
    Documentation, FilterUsage, JoinOptimization, LayoutStandards, ModelOrganization,
    NamingConventions, PerformanceMetrics, ReferenceIntegrity, ReservedColors, SqlInjection,
    Typography,
};
use lookml_qa_core::{Category, CheckBox, CheckConfig, CheckRegistry, Config};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Preset configurations for lookml-qa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every built-in check.
    #[default]
    Full,
    /// Model code checks only (everything except visual style).
    Code,
    /// Dashboard design checks only (visual style).
    Design,
}

/// Returned when a preset name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset `{0}` (expected full, code or design)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "code" => Ok(Self::Code),
            "design" => Ok(Self::Design),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Code => "code",
            Self::Design => "design",
        })
    }
}

impl Preset {
    /// Reads the `preset` key of a config, defaulting to [`Preset::Full`].
    ///
    /// # Errors
    ///
    /// Returns [`UnknownPreset`] if the key names no preset.
    pub fn from_config(config: &Config) -> Result<Self, UnknownPreset> {
        config
            .preset
            .as_deref()
            .map(str::parse)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Returns true if checks of `category` belong to this preset.
    #[must_use]
    pub fn includes(self, category: Category) -> bool {
        match self {
            Self::Full => true,
            Self::Code => category != Category::VisualStyle,
            Self::Design => category == Category::VisualStyle,
        }
    }

    /// Returns the checks of this preset in registry order, tuned by
    /// `config`.
    #[must_use]
    pub fn checks(self, config: &Config) -> Vec<CheckBox> {
        all_checks(config)
            .into_iter()
            .filter(|c| self.includes(c.category()))
            .collect()
    }

    /// Builds a registry holding this preset's checks.
    #[must_use]
    pub fn registry(self, config: &Config) -> CheckRegistry {
        let mut registry = CheckRegistry::new();
        for check in self.checks(config) {
            let id = check.id();
            if let Err(e) = registry.register_box(check) {
                warn!("Skipping check {}: {}", id, e);
            }
        }
        debug!("Preset {} registered {} checks", self, registry.len());
        registry
    }
}

/// Builds a tunable check from its `[checks.<id>]` table, or its defaults.
fn tuned<C>(config: &Config, id: &str, from_config: fn(&CheckConfig) -> C, default: fn() -> C) -> C {
    config.check(id).map_or_else(default, from_config)
}

/// Returns every built-in check in registry order.
///
/// Tunable checks read their options from the matching `[checks.<id>]`
/// table of `config`.
#[must_use]
pub fn all_checks(config: &Config) -> Vec<CheckBox> {
    vec![
        Box::new(NamingConventions::new()),
        Box::new(DataTypes::new()),
        Box::new(tuned(
            config,
            crate::join_optimization::ID,
            JoinOptimization::from_config,
            JoinOptimization::new,
        )),
        Box::new(FilterUsage::new()),
        Box::new(tuned(
            config,
            crate::documentation::ID,
            Documentation::from_config,
            Documentation::new,
        )),
        Box::new(SqlInjection::new()),
        Box::new(tuned(
            config,
            crate::performance_metrics::ID,
            PerformanceMetrics::from_config,
            PerformanceMetrics::new,
        )),
        Box::new(DimensionGroups::new()),
        Box::new(DerivedTables::new()),
        Box::new(tuned(
            config,
            crate::code_complexity::ID,
            CodeComplexity::from_config,
            CodeComplexity::new,
        )),
        Box::new(AccessGrants::new()),
        Box::new(ModelOrganization::new()),
        Box::new(ReferenceIntegrity::new()),
        Box::new(tuned(
            config,
            crate::color_palette::ID,
            ColorPalette::from_config,
            ColorPalette::new,
        )),
        Box::new(tuned(
            config,
            crate::reserved_colors::ID,
            ReservedColors::from_config,
            ReservedColors::new,
        )),
        Box::new(tuned(
            config,
            crate::layout_standards::ID,
            LayoutStandards::from_config,
            LayoutStandards::new,
        )),
        Box::new(tuned(
            config,
            crate::typography::ID,
            Typography::from_config,
            Typography::new,
        )),
    ]
}

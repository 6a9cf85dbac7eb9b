//! # lookml-qa-rules
//!
//! Built-in quality checks for lookml-qa.
//!
//! Each check inspects a parsed [`SourceModel`] and reports one
//! [`CheckOutcome`]. Checks are pure: the same model always yields the same
//! outcome.
//!
//! ## Available Checks
//!
//! | # | Id | Category | Description |
//! |---|----|----------|-------------|
//! | 1 | `naming-conventions` | naming | Object names use lower `snake_case` |
//! | 2 | `data-types` | types | Field types are valid and explicit |
//! | 3 | `join-optimization` | performance | Joins declare relationships and conditions |
//! | 4 | `filter-usage` | performance | Templated filters are applied, dashboard queries bounded |
//! | 5 | `documentation` | documentation | Visible fields and explores carry descriptions |
//! | 6 | `sql-injection-protection` | security | User input reaches SQL only through quoting |
//! | 7 | `performance-metrics` | performance | No `SELECT *`, oversized limits or crowded dashboards |
//! | 8 | `dimension-groups` | types | Time columns use dimension groups |
//! | 9 | `derived-tables` | performance | SQL derived tables are persisted |
//! | 10 | `code-complexity` | organization | Views stay small and field SQL short |
//! | 11 | `access-grants` | access | Access grants are complete, declared and used |
//! | 12 | `model-organization` | organization | Models have connections, views are reachable |
//! | 13 | `reference-integrity` | organization | Referenced names resolve |
//! | 14 | `color-palette-compliance` | visual-style | Element colors come from the palette |
//! | 15 | `reserved-colors` | visual-style | Traffic-light colors only signal status |
//! | 16 | `layout-standards` | visual-style | Dashboards use the standard layout and grid |
//! | 17 | `typography-consistency` | visual-style | Dashboards use few font sizes |
//!
//! ## Usage
//!
//! ```
//! use lookml_qa_core::{AnalysisSession, Config};
//! use lookml_qa_rules::Preset;
//!
//! let registry = Preset::Full.registry(&Config::default());
//! let report = AnalysisSession::new(&registry)
//!     .analyze("view: orders { dimension: id { type: number } }")
//!     .unwrap();
//! assert_eq!(report.len(), 17);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access_grants;
pub mod code_complexity;
pub mod color_palette;
pub mod data_types;
pub mod derived_tables;
pub mod dimension_groups;
pub mod documentation;
pub mod filter_usage;
pub mod join_optimization;
pub mod layout_standards;
pub mod model_organization;
pub mod naming_conventions;
pub mod performance_metrics;
mod presets;
pub mod reference_integrity;
pub mod reserved_colors;
pub mod sql_injection;
mod support;
pub mod typography;

pub use access_grants::AccessGrants;
pub use code_complexity::CodeComplexity;
pub use color_palette::ColorPalette;
pub use data_types::DataTypes;
pub use derived_tables::DerivedTables;
pub use dimension_groups::DimensionGroups;
pub use documentation::Documentation;
pub use filter_usage::FilterUsage;
pub use join_optimization::JoinOptimization;
pub use layout_standards::LayoutStandards;
pub use model_organization::ModelOrganization;
pub use naming_conventions::NamingConventions;
pub use performance_metrics::PerformanceMetrics;
pub use presets::{all_checks, Preset, UnknownPreset};
pub use reference_integrity::ReferenceIntegrity;
pub use reserved_colors::ReservedColors;
pub use sql_injection::SqlInjection;
pub use typography::Typography;

/// Re-export core types for convenience.
pub use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel, Status};

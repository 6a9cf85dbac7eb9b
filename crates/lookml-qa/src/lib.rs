//! # lookml-qa
//!
//! Static quality analysis for LookML.
//!
//! This is the facade crate: it re-exports the core pipeline and the
//! built-in checks, and offers one-call entry points over a shared default
//! registry.
//!
//! ## Quick Start
//!
//! ```
//! let report = lookml_qa::analyze(
//!     r#"
//! view: orders {
//!   sql_table_name: analytics.orders ;;
//!   dimension: id { type: number primary_key: yes description: "Order id" }
//! }
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(report.len(), 17);
//! let exported = lookml_qa::export(&report);
//! assert!(exported.file_name.starts_with("qa-report-"));
//! ```
//!
//! ## Custom Pipelines
//!
//! ```
//! use lookml_qa::{AnalysisSession, Config, RuleEngine};
//! use lookml_qa::rules::Preset;
//!
//! let config = Config::default();
//! let registry = Preset::Design.registry(&config);
//! let report = AnalysisSession::new(&registry)
//!     .with_engine(RuleEngine::from_config(&config).parallel(true))
//!     .analyze("dashboard: sales { layout: newspaper }")
//!     .unwrap();
//! assert_eq!(report.len(), 4);
//! ```

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use std::sync::OnceLock;

// Re-export core types and traits
pub use lookml_qa_core::*;

/// Built-in checks and presets.
pub mod rules {
    pub use lookml_qa_rules::*;
}

static DEFAULT_REGISTRY: OnceLock<CheckRegistry> = OnceLock::new();

/// Returns the registry of all built-in checks with default settings.
///
/// Built once and shared read-only by every caller.
pub fn default_registry() -> &'static CheckRegistry {
    DEFAULT_REGISTRY.get_or_init(|| rules::Preset::Full.registry(&Config::default()))
}

/// Parses `source` and runs every built-in check against it.
///
/// # Errors
///
/// Returns a [`ParseError`] if the source is not well-formed LookML.
pub fn analyze(source: &str) -> Result<Report, ParseError> {
    AnalysisSession::new(default_registry()).analyze(source)
}

/// Renders `report` as a downloadable text file stamped with the current
/// time.
#[must_use]
pub fn export(report: &Report) -> ExportedReport {
    export_at(report, Utc::now())
}

/// Renders `report` stamped with `generated_at`.
#[must_use]
pub fn export_at(report: &Report, generated_at: DateTime<Utc>) -> ExportedReport {
    ReportExporter::new().export(report, generated_at)
}

/// Describes every built-in check in registry order.
#[must_use]
pub fn list_checks() -> Vec<CheckDescriptor> {
    default_registry().descriptors()
}

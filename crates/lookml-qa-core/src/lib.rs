//! # lookml-qa-core
//!
//! Core framework for quality analysis of LookML projects.
//!
//! This crate provides the analysis pipeline:
//!
//! - [`parser`] and [`model`] turn LookML text into an immutable [`SourceModel`]
//! - [`Check`] trait for independent quality checks
//! - [`CheckRegistry`] for the ordered check catalog
//! - [`RuleEngine`] for isolated, optionally parallel evaluation
//! - [`Report`] and [`ReportExporter`] for aggregation and plain-text export
//! - [`AnalysisSession`] tying the steps together for one artifact
//!
//! ## Example
//!
//! ```
//! use lookml_qa_core::{AnalysisSession, Category, Check, CheckOutcome, CheckRegistry, SourceModel};
//!
//! struct HasExplores;
//!
//! impl Check for HasExplores {
//!     fn id(&self) -> &'static str { "has-explores" }
//!     fn name(&self) -> &'static str { "Has Explores" }
//!     fn category(&self) -> Category { Category::Organization }
//!     fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
//!         match model.explores().count() {
//!             0 => CheckOutcome::warning("No explores declared"),
//!             n => CheckOutcome::pass(format!("{n} explore(s) declared")),
//!         }
//!     }
//! }
//!
//! let mut registry = CheckRegistry::new();
//! registry.register(HasExplores).unwrap();
//!
//! let report = AnalysisSession::new(&registry)
//!     .analyze("view: orders {} explore: orders {}")
//!     .unwrap();
//! assert_eq!(report.passed(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod check;
mod config;
mod engine;
mod export;
mod registry;
mod report;
mod session;
mod types;

/// Typed LookML source model.
pub mod model;
/// LookML lexer and parser.
pub mod parser;
/// Utility modules for check implementations.
pub mod utils;

pub use check::{Check, CheckBox};
pub use config::{CheckConfig, Config, ConfigError, EngineConfig};
pub use engine::{RuleEngine, INTERNAL_ERROR_MESSAGE};
pub use export::{format_timestamp, ExportedReport, ReportExporter, DEFAULT_TITLE, GENERIC_RECOMMENDATION};
pub use model::{ModelBuilder, SourceModel};
pub use parser::error::{ParseError, ParseErrorKind};
pub use registry::{CheckRegistry, RegistryError};
pub use report::{aggregate, Report};
pub use session::AnalysisSession;
pub use types::{Category, CheckDescriptor, CheckOutcome, CheckResult, Finding, Status};

//! One analysis request: parse, run, aggregate, export.

use crate::engine::RuleEngine;
use crate::export::{ExportedReport, ReportExporter};
use crate::model::ModelBuilder;
use crate::parser::error::ParseError;
use crate::registry::CheckRegistry;
use crate::report::{aggregate, Report};
use chrono::{DateTime, Utc};
use tracing::info;

/// Runs the analysis pipeline for one source artifact.
///
/// Sessions borrow the registry and hold no mutable state, so any number of
/// them can run concurrently against the same registry.
///
/// # Example
///
/// ```
/// use lookml_qa_core::{AnalysisSession, CheckRegistry};
///
/// let registry = CheckRegistry::new();
/// let session = AnalysisSession::new(&registry);
/// let report = session.analyze("view: orders {}").unwrap();
/// assert!(report.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisSession<'r> {
    registry: &'r CheckRegistry,
    engine: RuleEngine,
    builder: ModelBuilder,
    exporter: ReportExporter,
}

impl<'r> AnalysisSession<'r> {
    /// Creates a session with a sequential engine and default settings.
    #[must_use]
    pub fn new(registry: &'r CheckRegistry) -> Self {
        Self {
            registry,
            engine: RuleEngine::new(),
            builder: ModelBuilder::new(),
            exporter: ReportExporter::new(),
        }
    }

    /// Replaces the engine.
    #[must_use]
    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Replaces the model builder.
    #[must_use]
    pub fn with_builder(mut self, builder: ModelBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Replaces the exporter.
    #[must_use]
    pub fn with_exporter(mut self, exporter: ReportExporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// Parses `text` and runs every enabled check against it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text cannot be parsed; no partial
    /// report is produced.
    pub fn analyze(&self, text: &str) -> Result<Report, ParseError> {
        let model = self.builder.build(text)?;
        let report = aggregate(self.engine.run(&model, self.registry));
        info!(
            "Analysis complete: {} passed, {} failed, {} warning(s)",
            report.passed(),
            report.failed(),
            report.warnings()
        );
        Ok(report)
    }

    /// Renders `report` as stamped at `generated_at`.
    #[must_use]
    pub fn export(&self, report: &Report, generated_at: DateTime<Utc>) -> ExportedReport {
        self.exporter.export(report, generated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;
    use crate::model::SourceModel;
    use crate::parser::error::ParseErrorKind;
    use crate::types::{Category, CheckOutcome, Status};

    struct CountViews;

    impl Check for CountViews {
        fn id(&self) -> &'static str {
            "count-views"
        }
        fn name(&self) -> &'static str {
            "Count Views"
        }
        fn category(&self) -> Category {
            Category::Organization
        }
        fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
            match model.views().count() {
                0 => CheckOutcome::warning("no views"),
                n => CheckOutcome::pass(format!("{n} view(s)")),
            }
        }
    }

    fn registry() -> CheckRegistry {
        let mut registry = CheckRegistry::new();
        registry.register(CountViews).unwrap();
        registry
    }

    #[test]
    fn analyze_runs_registry() {
        let registry = registry();
        let report = AnalysisSession::new(&registry)
            .analyze("view: a {} view: b {}")
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].message(), "2 view(s)");
    }

    #[test]
    fn parse_error_produces_no_report() {
        let registry = registry();
        let err = AnalysisSession::new(&registry)
            .analyze("model: m { explore: e {")
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedBlock);
    }

    #[test]
    fn empty_source_still_evaluates_checks() {
        let registry = registry();
        let report = AnalysisSession::new(&registry).analyze("").unwrap();
        assert_eq!(report.results()[0].status(), Status::Warning);
    }

    #[test]
    fn builder_depth_is_honoured() {
        let registry = registry();
        let session =
            AnalysisSession::new(&registry).with_builder(ModelBuilder::new().max_depth(1));
        assert!(session.analyze("view: a { derived_table: { } }").is_err());
    }
}

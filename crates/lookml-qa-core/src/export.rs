//! Plain-text report export.

use crate::report::Report;
use chrono::{DateTime, Utc};
use std::fmt;

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "LookML QA Analysis Report";

/// Recommendation printed for findings whose check gave none.
pub const GENERIC_RECOMMENDATION: &str = "Review this section and apply LookML best practices. \
Consider consulting the official documentation for specific guidance.";

/// An exported report ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    /// Suggested file name (`qa-report-<unix-millis>.txt`).
    pub file_name: String,
    /// UTF-8 report text.
    pub bytes: Vec<u8>,
}

/// Renders a [`Report`] as a plain-text document.
///
/// Rendering is deterministic for a given report and timestamp.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    title: String,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportExporter {
    /// Creates an exporter with the default title.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Sets the document title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Suggested file name for a report generated at `generated_at`.
    #[must_use]
    pub fn file_name(generated_at: DateTime<Utc>) -> String {
        format!("qa-report-{}.txt", generated_at.timestamp_millis())
    }

    /// Renders the report text.
    #[must_use]
    pub fn render(&self, report: &Report, generated_at: DateTime<Utc>) -> Vec<u8> {
        self.render_string(report, generated_at).into_bytes()
    }

    /// Renders the report and pairs it with its file name.
    #[must_use]
    pub fn export(&self, report: &Report, generated_at: DateTime<Utc>) -> ExportedReport {
        ExportedReport {
            file_name: Self::file_name(generated_at),
            bytes: self.render(report, generated_at),
        }
    }

    fn render_string(&self, report: &Report, generated_at: DateTime<Utc>) -> String {
        ReportText {
            title: &self.title,
            report,
            generated_at,
        }
        .to_string()
    }
}

/// The export document, written through [`fmt::Display`].
struct ReportText<'a> {
    title: &'a str,
    report: &'a Report,
    generated_at: DateTime<Utc>,
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Generated: {}", format_timestamp(self.generated_at))?;
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(f, "- Passed: {}", report.passed())?;
        writeln!(f, "- Failed: {}", report.failed())?;
        writeln!(f, "- Warnings: {}", report.warnings())?;
        writeln!(f, "- Total Checks: {}", report.len())?;
        writeln!(f)?;
        writeln!(f, "Detailed Results:")?;

        for (index, result) in report.results().iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{}. {}", index + 1, result.name)?;
            writeln!(f, "   Status: {}", result.status().label())?;
            writeln!(f, "   Message: {}", result.message())?;
            let Some(finding) = result.outcome.finding() else {
                continue;
            };
            let recommendation = finding
                .recommendation
                .as_deref()
                .unwrap_or(GENERIC_RECOMMENDATION);
            writeln!(f, "   Recommendation: {recommendation}")?;
            if let Some(example) = &finding.code_example {
                writeln!(f, "   Example:")?;
                for line in example.lines() {
                    writeln!(f, "      {line}")?;
                }
            }
        }
        Ok(())
    }
}

/// Formats a timestamp like `10/19/2026, 3:04:05 PM UTC`.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p UTC").to_string()
}

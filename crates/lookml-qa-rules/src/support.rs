//! Shared helpers for turning collected issues into one outcome.

use lookml_qa_core::{CheckConfig, CheckOutcome, SourceModel};
use std::fmt::Write;

/// How many issues are spelled out in a message.
const SHOWN_ISSUES: usize = 3;

/// Fix guidance attached to a failing or warning outcome.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Advice {
    pub recommendation: &'static str,
    pub example: Option<&'static str>,
}

impl Advice {
    pub const fn new(recommendation: &'static str) -> Self {
        Self {
            recommendation,
            example: None,
        }
    }

    pub const fn with_example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }

    /// Attaches the recommendation and example to a finding.
    pub fn attach(self, outcome: CheckOutcome) -> CheckOutcome {
        let outcome = outcome.with_recommendation(self.recommendation);
        match self.example {
            Some(example) => outcome.with_example(example),
            None => outcome,
        }
    }
}

/// Issues found by one check, at two severities.
#[derive(Debug, Default)]
pub(crate) struct Issues {
    failures: Vec<String>,
    warnings: Vec<String>,
}

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, issue: impl Into<String>) {
        self.failures.push(issue.into());
    }

    pub fn warn(&mut self, issue: impl Into<String>) {
        self.warnings.push(issue.into());
    }

    /// Folds the issues: any failure fails, else any warning warns, else
    /// the check passes with `pass_message`.
    pub fn into_outcome(
        self,
        pass_message: impl Into<String>,
        on_fail: Advice,
        on_warning: Advice,
    ) -> CheckOutcome {
        if !self.failures.is_empty() {
            let mut message = describe(&self.failures);
            if !self.warnings.is_empty() {
                let _ = write!(message, " (plus {} warning(s))", self.warnings.len());
            }
            on_fail.attach(CheckOutcome::fail(message))
        } else if !self.warnings.is_empty() {
            on_warning.attach(CheckOutcome::warning(describe(&self.warnings)))
        } else {
            CheckOutcome::pass(pass_message)
        }
    }
}

/// `"2 issue(s): first; second"`, truncated after a few entries.
pub(crate) fn describe(issues: &[String]) -> String {
    format!("{} issue(s): {}", issues.len(), enumerate(issues))
}

/// `"first; second; third; and 2 more"`.
pub(crate) fn enumerate(items: &[String]) -> String {
    let mut out = items
        .iter()
        .take(SHOWN_ISSUES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ");
    if items.len() > SHOWN_ISSUES {
        let _ = write!(out, "; and {} more", items.len() - SHOWN_ISSUES);
    }
    out
}

/// Every SQL expression in the model, labeled with where it is declared.
pub(crate) fn sql_sources(model: &SourceModel) -> Vec<(String, &str)> {
    let mut sources = Vec::new();
    for view in model.views() {
        if let Some(sql) = view.derived_table.as_ref().and_then(|d| d.sql.as_deref()) {
            sources.push((format!("derived table of view `{}`", view.name), sql));
        }
        for field in &view.fields {
            if let Some(sql) = field.sql.as_deref() {
                sources.push((format!("{} `{}.{}`", field.kind, view.base_name(), field.name), sql));
            }
        }
    }
    for explore in model.explores() {
        if let Some(sql) = explore.sql_always_where.as_deref() {
            sources.push((format!("sql_always_where of explore `{}`", explore.name), sql));
        }
        for join in &explore.joins {
            if let Some(sql) = join.sql_on.as_deref() {
                sources.push((
                    format!("join `{}` in explore `{}`", join.name, explore.name),
                    sql,
                ));
            }
        }
    }
    sources
}

/// Reads a non-negative count option, falling back to `default` when the
/// key is missing or not a valid count.
pub(crate) fn count_setting(config: &CheckConfig, key: &str, default: usize) -> usize {
    config.get_option::<usize>(key).unwrap_or(default)
}

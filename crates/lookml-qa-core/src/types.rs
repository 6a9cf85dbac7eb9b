//! Core types for check outcomes and results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Check category. Declaration order is the grouping order of reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Identifier conventions.
    Naming,
    /// Field types and time handling.
    Types,
    /// Query and join cost.
    Performance,
    /// Descriptions and labels.
    Documentation,
    /// SQL safety.
    Security,
    /// Access grants.
    Access,
    /// Project structure and complexity.
    Organization,
    /// Dashboard visual design.
    VisualStyle,
}

impl Category {
    /// All categories in enumeration order.
    pub const ALL: [Self; 8] = [
        Self::Naming,
        Self::Types,
        Self::Performance,
        Self::Documentation,
        Self::Security,
        Self::Access,
        Self::Organization,
        Self::VisualStyle,
    ];

    /// Returns the kebab-case identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::Types => "types",
            Self::Performance => "performance",
            Self::Documentation => "documentation",
            Self::Security => "security",
            Self::Access => "access",
            Self::Organization => "organization",
            Self::VisualStyle => "visual-style",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

/// Outcome status. Ordered by severity: `Pass < Warning < Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The check found nothing to report.
    Pass,
    /// Advisory finding.
    Warning,
    /// Blocking finding.
    Fail,
}

impl Status {
    /// Upper-case label used in exported reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warning => "WARNING",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warning => write!(f, "warning"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Details of a failing or warning outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Human-readable message.
    pub message: String,
    /// How to fix it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Example LookML showing the fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
}

impl Finding {
    /// Creates a finding with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recommendation: None,
            code_example: None,
        }
    }
}

/// What a single check concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckOutcome {
    /// Nothing to report.
    Pass {
        /// Summary of what was inspected.
        message: String,
    },
    /// Advisory finding.
    Warning(Finding),
    /// Blocking finding.
    Fail(Finding),
}

impl CheckOutcome {
    /// Creates a passing outcome.
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self::Pass {
            message: message.into(),
        }
    }

    /// Creates a warning outcome.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(Finding::new(message))
    }

    /// Creates a failing outcome.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(Finding::new(message))
    }

    /// Adds a recommendation. No effect on passing outcomes.
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        if let Self::Warning(f) | Self::Fail(f) = &mut self {
            f.recommendation = Some(recommendation.into());
        }
        self
    }

    /// Adds a code example. No effect on passing outcomes.
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        if let Self::Warning(f) | Self::Fail(f) = &mut self {
            f.code_example = Some(example.into());
        }
        self
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Pass { .. } => Status::Pass,
            Self::Warning(_) => Status::Warning,
            Self::Fail(_) => Status::Fail,
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Pass { message } => message,
            Self::Warning(f) | Self::Fail(f) => &f.message,
        }
    }

    /// Returns the finding of a warning or failure.
    #[must_use]
    pub fn finding(&self) -> Option<&Finding> {
        match self {
            Self::Pass { .. } => None,
            Self::Warning(f) | Self::Fail(f) => Some(f),
        }
    }
}

/// A check outcome tagged with the check that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check id.
    pub id: String,
    /// Check display name.
    pub name: String,
    /// Check category.
    pub category: Category,
    /// The outcome.
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl CheckResult {
    /// Returns the outcome status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.outcome.status()
    }

    /// Returns the outcome message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.outcome.message()
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.status(),
            self.id,
            self.name,
            self.message()
        )
    }
}

/// Static description of a registered check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDescriptor {
    /// Stable kebab-case id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: Category,
    /// What the check looks for.
    pub description: String,
}

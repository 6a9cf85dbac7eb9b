//! Aggregated analysis report.

use crate::types::{Category, CheckResult, Status};
use serde::Serialize;

/// Ordered check results with their status counters.
///
/// The counters are folded from the results once, so
/// `passed + failed + warnings == len` always holds. Every view keeps the
/// canonical (registry) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    results: Vec<CheckResult>,
    passed: usize,
    failed: usize,
    warnings: usize,
}

/// Folds results into a [`Report`].
#[must_use]
pub fn aggregate(results: Vec<CheckResult>) -> Report {
    let (passed, failed, warnings) =
        results
            .iter()
            .fold((0, 0, 0), |(p, f, w), r| match r.status() {
                Status::Pass => (p + 1, f, w),
                Status::Fail => (p, f + 1, w),
                Status::Warning => (p, f, w + 1),
            });
    Report {
        results,
        passed,
        failed,
        warnings,
    }
}

impl From<Vec<CheckResult>> for Report {
    fn from(results: Vec<CheckResult>) -> Self {
        aggregate(results)
    }
}

impl Report {
    /// All results in registry order.
    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Number of passing checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failing checks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Number of checks with warnings.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Total number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no check ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns true if any check failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Returns true if any result is at or above `threshold`.
    #[must_use]
    pub fn has_findings_at(&self, threshold: Status) -> bool {
        self.results.iter().any(|r| r.status() >= threshold)
    }

    /// Results with the given status.
    #[must_use]
    pub fn by_status(&self, status: Status) -> Vec<&CheckResult> {
        self.results.iter().filter(|r| r.status() == status).collect()
    }

    /// Results of one category.
    #[must_use]
    pub fn in_category(&self, category: Category) -> Vec<&CheckResult> {
        self.results
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Results grouped by category, in category order. Empty categories are
    /// omitted.
    #[must_use]
    pub fn by_category(&self) -> Vec<(Category, Vec<&CheckResult>)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.in_category(c)))
            .filter(|(_, results)| !results.is_empty())
            .collect()
    }
}

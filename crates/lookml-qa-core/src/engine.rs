//! Runs registered checks against a source model.

use crate::check::Check;
use crate::config::Config;
use crate::model::SourceModel;
use crate::registry::CheckRegistry;
use crate::types::{CheckOutcome, CheckResult};
use rayon::prelude::*;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Message of the failure recorded for a check that panicked.
pub const INTERNAL_ERROR_MESSAGE: &str = "check raised an internal error";

/// Evaluates every check of a registry and collects the results in
/// registry order.
///
/// A panicking check never aborts the run: it is recorded as a single
/// failure with [`INTERNAL_ERROR_MESSAGE`].
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    parallel: bool,
    disabled: HashSet<String>,
}

impl RuleEngine {
    /// Creates a sequential engine with every check enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            parallel: config.engine.parallel,
            disabled: config
                .checks
                .iter()
                .filter(|(_, c)| c.enabled == Some(false))
                .map(|(id, _)| id.clone())
                .collect(),
        }
    }

    /// Sets whether checks run on the rayon thread pool.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disables a check by id. Disabled checks produce no result.
    #[must_use]
    pub fn disable(mut self, id: impl Into<String>) -> Self {
        self.disabled.insert(id.into());
        self
    }

    /// Returns true if the check with this id will run.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.contains(id)
    }

    /// Runs the enabled checks of `registry` against `model`.
    #[must_use]
    pub fn run(&self, model: &SourceModel, registry: &CheckRegistry) -> Vec<CheckResult> {
        let checks: Vec<&dyn Check> = registry
            .all()
            .filter(|c| self.is_enabled(c.id()))
            .collect();

        let results = if self.parallel {
            let mut indexed: Vec<(usize, CheckResult)> = checks
                .par_iter()
                .enumerate()
                .map(|(index, check)| (index, evaluate(*check, model)))
                .collect();
            indexed.sort_by_key(|(index, _)| *index);
            indexed.into_iter().map(|(_, result)| result).collect()
        } else {
            checks.iter().map(|check| evaluate(*check, model)).collect()
        };

        info!(
            "Ran {} check(s){}",
            checks.len(),
            if self.parallel { " in parallel" } else { "" }
        );
        results
    }
}

fn evaluate(check: &dyn Check, model: &SourceModel) -> CheckResult {
    debug!("Evaluating check `{}`", check.id());
    let outcome = catch_unwind(AssertUnwindSafe(|| check.evaluate(model))).unwrap_or_else(|_| {
        warn!("Check `{}` panicked; recording a failure", check.id());
        CheckOutcome::fail(INTERNAL_ERROR_MESSAGE)
    });
    CheckResult {
        id: check.id().to_string(),
        name: check.name().to_string(),
        category: check.category(),
        outcome,
    }
}

//! Ordered catalog of checks.

use crate::check::{Check, CheckBox};
use crate::types::{Category, CheckDescriptor};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from registering or selecting checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A check with this id is already registered.
    #[error("check `{0}` is already registered")]
    DuplicateId(String),

    /// A selector matched no registered check.
    #[error("no check matches `{0}`")]
    UnknownSelector(String),

    /// A selector is not a valid glob pattern.
    #[error("invalid check pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Checks in registration order, which is also the order of results.
///
/// Registries are read-only once built and can be shared across threads.
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: Vec<Arc<dyn Check>>,
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.checks.iter().map(|c| c.id()))
            .finish()
    }
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the id is taken.
    pub fn register<C: Check + 'static>(&mut self, check: C) -> Result<(), RegistryError> {
        self.register_box(Box::new(check))
    }

    /// Registers a boxed check.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateId`] if the id is taken.
    pub fn register_box(&mut self, check: CheckBox) -> Result<(), RegistryError> {
        if self.get(check.id()).is_some() {
            return Err(RegistryError::DuplicateId(check.id().to_string()));
        }
        debug!("registered check `{}`", check.id());
        self.checks.push(Arc::from(check));
        Ok(())
    }

    /// Returns all checks in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(|c| &**c)
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Returns the check with the given id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Check> {
        self.all().find(|c| c.id() == id)
    }

    /// Returns descriptors of all checks in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<CheckDescriptor> {
        self.all().map(Check::descriptor).collect()
    }

    /// Returns a registry restricted to checks matching any selector.
    ///
    /// A selector matches a check by id, by display name (case-insensitive),
    /// by category (`visual-style`) or as a glob over ids (`color-*`).
    /// Registration order is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if a selector is an invalid pattern or matches
    /// nothing.
    pub fn filtered<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Self, RegistryError> {
        let matchers = selectors
            .iter()
            .map(|s| Selector::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        for matcher in &matchers {
            if !self.all().any(|c| matcher.matches(c)) {
                return Err(RegistryError::UnknownSelector(matcher.raw.clone()));
            }
        }

        Ok(Self {
            checks: self
                .checks
                .iter()
                .filter(|c| matchers.iter().any(|m| m.matches(&***c)))
                .cloned()
                .collect(),
        })
    }

    /// Returns a registry without the checks for which `keep` is false.
    #[must_use]
    pub fn retain<F: Fn(&dyn Check) -> bool>(&self, keep: F) -> Self {
        Self {
            checks: self
                .checks
                .iter()
                .filter(|c| keep(&***c))
                .cloned()
                .collect(),
        }
    }
}

struct Selector {
    raw: String,
    category: Option<Category>,
    pattern: Option<glob::Pattern>,
}

impl Selector {
    fn parse(raw: &str) -> Result<Self, RegistryError> {
        let raw = raw.trim();
        let pattern = if raw.contains(['*', '?', '[']) {
            Some(
                glob::Pattern::new(raw).map_err(|e| RegistryError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.to_string(),
                })?,
            )
        } else {
            None
        };
        Ok(Self {
            raw: raw.to_string(),
            category: raw.parse().ok(),
            pattern,
        })
    }

    fn matches(&self, check: &dyn Check) -> bool {
        check.id() == self.raw
            || check.name().eq_ignore_ascii_case(&self.raw)
            || self.category == Some(check.category())
            || self.pattern.as_ref().is_some_and(|p| p.matches(check.id()))
    }
}

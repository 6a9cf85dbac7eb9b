//! The check trait.

use crate::model::SourceModel;
use crate::types::{Category, CheckDescriptor, CheckOutcome};

/// A quality check evaluated against a whole [`SourceModel`].
///
/// Checks are pure: they read the model and return exactly one outcome.
/// They must not depend on other checks or on evaluation order, so the
/// engine is free to run them in parallel.
///
/// # Example
///
/// ```
/// use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};
///
/// pub struct HasViews;
///
/// impl Check for HasViews {
///     fn id(&self) -> &'static str { "has-views" }
///     fn name(&self) -> &'static str { "Has Views" }
///     fn category(&self) -> Category { Category::Organization }
///
///     fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
///         if model.views().next().is_some() {
///             CheckOutcome::pass("Views are declared")
///         } else {
///             CheckOutcome::warning("No views are declared")
///         }
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Returns the stable kebab-case id (e.g., "naming-conventions").
    fn id(&self) -> &'static str;

    /// Returns the display name (e.g., "Naming Conventions").
    fn name(&self) -> &'static str;

    /// Returns the category.
    fn category(&self) -> Category;

    /// Returns a brief description of what this check looks for.
    fn description(&self) -> &'static str {
        ""
    }

    /// Evaluates the check.
    fn evaluate(&self, model: &SourceModel) -> CheckOutcome;

    /// Returns the static description of this check.
    fn descriptor(&self) -> CheckDescriptor {
        CheckDescriptor {
            id: self.id().to_string(),
            name: self.name().to_string(),
            category: self.category(),
            description: self.description().to_string(),
        }
    }
}

/// Type alias for boxed Check trait objects.
pub type CheckBox = Box<dyn Check>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    struct TestCheck;

    impl Check for TestCheck {
        fn id(&self) -> &'static str {
            "test-check"
        }
        fn name(&self) -> &'static str {
            "Test Check"
        }
        fn category(&self) -> Category {
            Category::Naming
        }
        fn description(&self) -> &'static str {
            "A test check"
        }

        fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
            if model.is_empty() {
                CheckOutcome::warning("empty")
            } else {
                CheckOutcome::pass("ok")
            }
        }
    }

    #[test]
    fn test_check_trait() {
        let check = TestCheck;
        let descriptor = check.descriptor();
        assert_eq!(descriptor.id, "test-check");
        assert_eq!(descriptor.category, Category::Naming);
        assert_eq!(descriptor.description, "A test check");
        assert_eq!(
            check.evaluate(&SourceModel::default()).status(),
            Status::Warning
        );
    }
}

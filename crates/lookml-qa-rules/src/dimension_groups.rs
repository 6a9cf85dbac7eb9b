//! Check that time columns are modeled as `dimension_group`s.
//!
//! A plain dimension over a timestamp gives users one raw value instead of
//! the date, week, month and year breakdowns a `dimension_group` generates.
//! A dimension is treated as time-like when its type is a date or time type,
//! or when its name ends in `_at`, `_date`, `_time` or `_timestamp` and its
//! type does not say otherwise (`number`, `yesno`).

use crate::support::{Advice, Issues};
use lookml_qa_core::model::{Field, FieldKind};
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};

/// Check id for dimension-groups.
pub const ID: &str = "dimension-groups";

/// Check name for dimension-groups.
pub const NAME: &str = "Dimension Groups";

const TIME_TYPES: &[&str] = &["date", "time", "date_time", "datetime", "timestamp"];

const TIME_SUFFIXES: &[&str] = &["_at", "_date", "_time", "_timestamp"];

/// Types that mark a time-like name as something else.
const NON_TIME_TYPES: &[&str] = &["number", "yesno"];

const ADVICE: Advice = Advice::new(
    "Model timestamp columns as a `dimension_group` of type time with the timeframes users need.",
)
.with_example(
    "dimension_group: created {\n  type: time\n  timeframes: [raw, date, week, month, year]\n  sql: ${TABLE}.created_at ;;\n}",
);

/// Flags time-like plain dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionGroups;

impl DimensionGroups {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_time_like(field: &Field) -> bool {
    match field.field_type.as_deref() {
        Some(t) if TIME_TYPES.contains(&t) => true,
        Some(t) if NON_TIME_TYPES.contains(&t) => false,
        _ => TIME_SUFFIXES.iter().any(|s| field.name.ends_with(s)),
    }
}

impl Check for DimensionGroups {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn category(&self) -> Category {
        Category::Types
    }

    fn description(&self) -> &'static str {
        "Time columns use dimension groups"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();
        let mut groups = 0usize;

        for (view, field) in model.fields() {
            match field.kind {
                FieldKind::DimensionGroup => groups += 1,
                FieldKind::Dimension if is_time_like(field) => issues.fail(format!(
                    "dimension `{}.{}` looks like a timestamp; use a dimension_group",
                    view.base_name(),
                    field.name
                )),
                _ => {}
            }
        }

        issues.into_outcome(
            format!("Time columns are modeled as dimension groups ({groups} found)"),
            ADVICE,
            ADVICE,
        )
    }
}

//! Check that field `type:` values are valid LookML types.
//!
//! Unknown types fail. Dimensions without an explicit type silently default
//! to `string`, which hides numeric and date semantics, so they warn.
//! Dimension groups must declare `time` or `duration`.

use crate::support::{Advice, Issues};
use lookml_qa_core::model::FieldKind;
use lookml_qa_core::{Category, Check, CheckOutcome, SourceModel};

/// Check id for data-types.
pub const ID: &str = "data-types";

/// Check name for data-types.
pub const NAME: &str = "Data Types";

const DIMENSION_TYPES: &[&str] = &[
    "bin", "date", "date_date", "date_day_of_month", "date_day_of_week",
    "date_day_of_week_index", "date_day_of_year", "date_hour", "date_hour_of_day",
    "date_minute", "date_month", "date_month_name", "date_month_num", "date_quarter",
    "date_quarter_of_year", "date_raw", "date_second", "date_time", "date_time_of_day",
    "date_week", "date_week_of_year", "date_year", "distance", "duration_day",
    "duration_hour", "duration_minute", "duration_month", "duration_quarter",
    "duration_second", "duration_week", "duration_year", "int", "location", "number",
    "string", "tier", "time", "unquoted", "yesno", "zipcode",
];

const DIMENSION_GROUP_TYPES: &[&str] = &["time", "duration"];

const MEASURE_TYPES: &[&str] = &[
    "average", "average_distinct", "count", "count_distinct", "date", "int", "list", "max",
    "median", "median_distinct", "min", "number", "percent_of_previous", "percent_of_total",
    "percentile", "percentile_distinct", "period_over_period", "running_total", "string",
    "sum", "sum_distinct", "yesno",
];

const FILTER_TYPES: &[&str] = &[
    "date", "date_time", "distance", "location", "number", "string", "tier", "unquoted",
    "yesno", "zipcode",
];

const FAIL_ADVICE: Advice = Advice::new(
    "Use a valid LookML type for each field; see the dimension, measure and filter type references.",
)
.with_example("measure: total_revenue {\n  type: sum\n  sql: ${sale_price} ;;\n}");

const WARN_ADVICE: Advice = Advice::new(
    "Declare `type:` explicitly on dimensions so numbers, dates and flags are not treated as strings.",
)
.with_example("dimension: sale_price {\n  type: number\n  sql: ${TABLE}.sale_price ;;\n}");

fn valid_types(kind: FieldKind) -> &'static [&'static str] {
    match kind {
        FieldKind::Dimension => DIMENSION_TYPES,
        FieldKind::DimensionGroup => DIMENSION_GROUP_TYPES,
        FieldKind::Measure => MEASURE_TYPES,
        FieldKind::Filter | FieldKind::Parameter => FILTER_TYPES,
    }
}

/// Validates field types.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTypes;

impl DataTypes {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for DataTypes {
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
        "Field types are valid and explicit"
    }

    fn evaluate(&self, model: &SourceModel) -> CheckOutcome {
        let mut issues = Issues::new();
        let mut inspected = 0usize;

        for (view, field) in model.fields() {
            inspected += 1;
            let qualified = format!("{}.{}", view.base_name(), field.name);
            match field.field_type.as_deref() {
                Some(t) if !valid_types(field.kind).contains(&t) => {
                    issues.fail(format!("{} `{qualified}` has unknown type `{t}`", field.kind));
                }
                None if field.kind == FieldKind::DimensionGroup => {
                    issues.fail(format!("dimension_group `{qualified}` has no type"));
                }
                None if field.kind == FieldKind::Dimension => {
                    issues.warn(format!("dimension `{qualified}` has no explicit type"));
                }
                _ => {}
            }
        }

        if inspected == 0 {
            return CheckOutcome::pass("No fields to inspect");
        }
        issues.into_outcome(
            format!("Appropriate data types used across {inspected} field(s)"),
            FAIL_ADVICE,
            WARN_ADVICE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookml_qa_core::Status;

    fn check_code(src: &str) -> CheckOutcome {
        let model = SourceModel::parse(src).expect("Failed to parse");
        DataTypes::new().evaluate(&model)
    }

    #[test]
    fn test_valid_types_pass() {
        let outcome = check_code(
            r"
view: orders {
  dimension: id { type: number }
  dimension_group: created { type: time }
  measure: count { type: count }
  filter: region { type: string }
  parameter: metric { type: unquoted }
}",
        );
        assert_eq!(outcome.status(), Status::Pass);
    }

    #[test]
    fn test_unknown_type_fails() {
        let outcome = check_code("view: orders { measure: total { type: summ } }");
        assert_eq!(outcome.status(), Status::Fail);
        assert!(outcome.message().contains("measure `orders.total` has unknown type `summ`"));
    }

    #[test]
    fn test_measure_type_on_dimension_fails() {
        let outcome = check_code("view: orders { dimension: total { type: sum } }");
        assert_eq!(outcome.status(), Status::Fail);
    }

    #[test]
    fn test_missing_dimension_type_warns() {
        let outcome = check_code("view: orders { dimension: status { sql: ${TABLE}.status ;; } }");
        assert_eq!(outcome.status(), Status::Warning);
        let finding = outcome.finding().unwrap();
        assert!(finding.code_example.as_deref().unwrap().contains("type: number"));
    }

    #[test]
    fn test_no_fields() {
        assert_eq!(check_code("explore: orders {}").message(), "No fields to inspect");
    }
}

//! Post-construction reference resolution.
//!
//! Unresolved names never fail a build; they are collected as
//! [`ReferenceWarning`]s so checks can surface them.
//!
//! Views and fields are only resolved when the source declares at least one
//! view, and grants only when it declares an explore or a grant. A file that
//! holds just a dashboard or just explores refers to declarations living in
//! other files, and reporting every name there would be noise.

use super::{Explore, ReferenceKind, ReferenceWarning, SourceModel};
use crate::parser::syntax::Position;
use crate::utils::sql::{sql_references, SqlReference};
use tracing::warn;

pub(super) fn unresolved_references(source: &SourceModel) -> Vec<ReferenceWarning> {
    let mut resolver = Resolver {
        source,
        warnings: Vec::new(),
    };
    if source.views().next().is_some() {
        resolver.explores();
        resolver.view_sql();
        resolver.dashboard_queries();
    }
    if source.explores().next().is_some() || source.access_grants().next().is_some() {
        resolver.access_grants();
    }
    for warning in &resolver.warnings {
        warn!("{}", warning);
    }
    resolver.warnings
}

struct Resolver<'a> {
    source: &'a SourceModel,
    warnings: Vec<ReferenceWarning>,
}

impl Resolver<'_> {
    fn push(&mut self, kind: ReferenceKind, reference: String, context: String, position: Position) {
        self.warnings.push(ReferenceWarning {
            kind,
            reference,
            context,
            position,
        });
    }

    fn explores(&mut self) {
        let source = self.source;
        for explore in source.explores() {
            if explore.name.starts_with('+') && explore.view_name.is_none() {
                // Refinements point at an explore, not a view.
                continue;
            }
            if !source.has_view(explore.base_view()) {
                self.push(
                    ReferenceKind::View,
                    explore.base_view().to_string(),
                    format!("explore `{}`", explore.name),
                    explore.position,
                );
            }
            for join in &explore.joins {
                let context = format!("join `{}` of explore `{}`", join.name, explore.name);
                if !source.has_view(join.target_view()) {
                    self.push(
                        ReferenceKind::View,
                        join.target_view().to_string(),
                        context.clone(),
                        join.position,
                    );
                }
                if let Some(sql_on) = &join.sql_on {
                    self.explore_sql(explore, sql_on, &context, join.position);
                }
            }
        }
    }

    fn explore_sql(&mut self, explore: &Explore, sql: &str, context: &str, position: Position) {
        let source = self.source;
        for reference in sql_references(sql) {
            let SqlReference::Qualified { view: alias, field } = &reference else {
                continue;
            };
            let view = explore.view_for_alias(alias).unwrap_or(alias.as_str());
            if !source.has_view(view) {
                // Already reported for the join target or the explore.
                continue;
            }
            if reference.is_table_name() {
                continue;
            }
            if !source.view_has_field(view, field_name(field)) {
                self.push(
                    ReferenceKind::Field,
                    format!("{alias}.{field}"),
                    context.to_string(),
                    position,
                );
            }
        }
    }

    fn view_sql(&mut self) {
        let source = self.source;
        for view in source.views() {
            let derived = view
                .derived_table
                .as_ref()
                .and_then(|d| d.sql.as_deref().map(|sql| (sql, d.position)));
            let fields = view
                .fields
                .iter()
                .filter_map(|f| f.sql.as_deref().map(|sql| (sql, f.position)));

            for (sql, position) in derived.into_iter().chain(fields) {
                for reference in sql_references(sql) {
                    let (target_view, field, written) = match &reference {
                        SqlReference::Table => continue,
                        SqlReference::Local(field) => (view.base_name(), field.as_str(), field.clone()),
                        SqlReference::Qualified { view: other, field } => {
                            if !source.has_view(other) {
                                self.push(
                                    ReferenceKind::View,
                                    other.clone(),
                                    format!("view `{}`", view.name),
                                    position,
                                );
                                continue;
                            }
                            if reference.is_table_name() {
                                continue;
                            }
                            (other.as_str(), field.as_str(), format!("{other}.{field}"))
                        }
                    };
                    if !source.view_has_field(target_view, field_name(field)) {
                        self.push(
                            ReferenceKind::Field,
                            written,
                            format!("view `{}`", view.name),
                            position,
                        );
                    }
                }
            }
        }
    }

    fn dashboard_queries(&mut self) {
        let source = self.source;
        for dashboard in source.dashboards() {
            for element in &dashboard.elements {
                let explore = element
                    .query
                    .explore
                    .as_deref()
                    .and_then(|name| source.explores().find(|e| e.name == name));
                for reference in element.query.field_refs() {
                    let Some(alias) = reference.view.as_deref() else {
                        continue;
                    };
                    if reference.is_wildcard() {
                        continue;
                    }
                    let view = explore
                        .and_then(|e| e.view_for_alias(alias))
                        .unwrap_or(alias);
                    if !source.view_has_field(view, &reference.field) {
                        self.push(
                            ReferenceKind::Field,
                            reference.to_string(),
                            format!(
                                "element `{}` of dashboard `{}`",
                                element.display_name(),
                                dashboard.name
                            ),
                            reference.position,
                        );
                    }
                }
            }
        }
    }

    fn access_grants(&mut self) {
        let source = self.source;
        let mut required: Vec<(&str, String, Position)> = Vec::new();
        for explore in source.explores() {
            let context = format!("explore `{}`", explore.name);
            required.extend(
                explore
                    .required_access_grants
                    .iter()
                    .map(|g| (g.as_str(), context.clone(), explore.position)),
            );
            for join in &explore.joins {
                let context = format!("join `{}` of explore `{}`", join.name, explore.name);
                required.extend(
                    join.required_access_grants
                        .iter()
                        .map(|g| (g.as_str(), context.clone(), join.position)),
                );
            }
        }
        for (view, field) in source.fields() {
            let context = format!("field `{}.{}`", view.base_name(), field.name);
            required.extend(
                field
                    .required_access_grants
                    .iter()
                    .map(|g| (g.as_str(), context.clone(), field.position)),
            );
        }

        for (grant, context, position) in required {
            if !source.has_access_grant(grant) {
                self.push(ReferenceKind::AccessGrant, grant.to_string(), context, position);
            }
        }
    }
}

/// Strips property suffixes such as `._sql` or `._value` from a field reference.
fn field_name(field: &str) -> &str {
    field.split('.').next().unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warnings(text: &str) -> Vec<ReferenceWarning> {
        SourceModel::parse(text).expect("valid LookML").warnings().to_vec()
    }

    #[test]
    fn local_and_qualified_sql_references() {
        let found = warnings(
            r"
view: orders {
  dimension: amount { sql: ${TABLE}.amount ;; }
  dimension: net { sql: ${amount} - ${discount} ;; }
  dimension: fx { sql: ${amount} * ${rates.rate} ;; }
}
view: rates { dimension: rate {} }
",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ReferenceKind::Field);
        assert_eq!(found[0].reference, "discount");
        assert_eq!(found[0].context, "view `orders`");
        assert_eq!(found[0].position.line, 4);
    }

    #[test]
    fn timeframes_and_table_names_resolve() {
        let found = warnings(
            r"
view: orders {
  dimension_group: created { type: time timeframes: [date, week] sql: ${TABLE}.created_at ;; }
  dimension: day { sql: ${created_date} ;; }
}
view: summary { derived_table: { sql: SELECT * FROM ${orders.SQL_TABLE_NAME} ;; } }
",
        );
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn extended_fields_resolve() {
        let found = warnings(
            r"
view: base { dimension: id {} }
view: child { extends: [base] dimension: copy { sql: ${id} ;; } }
",
        );
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn missing_join_target_and_sql_on_field() {
        let found = warnings(
            r"
view: orders { dimension: user_id {} }
explore: orders {
  join: users { sql_on: ${orders.user_id} = ${users.id} ;; }
  join: items { sql_on: ${orders.missing} = ${items.id} ;; }
}
view: items { dimension: id {} }
",
        );
        let references: Vec<&str> = found.iter().map(|w| w.reference.as_str()).collect();
        assert_eq!(references, vec!["users", "orders.missing"]);
    }

    #[test]
    fn dashboard_fields_resolve_through_explore_aliases() {
        let found = warnings(
            r"
view: users { dimension: id {} }
view: orders { measure: count {} }
explore: orders { join: customer { from: users } }
dashboard: d {
  elements: [ { explore: orders fields: [customer.id, orders.count, orders.total, orders.*] } ]
}
",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reference, "orders.total");
    }

    #[test]
    fn dashboard_only_source_is_not_resolved() {
        assert!(warnings("dashboard: d { elements: [ { fields: [a.b] } ] }").is_empty());
    }

    #[test]
    fn undeclared_access_grants() {
        let found = warnings(
            r"
access_grant: finance { user_attribute: dept allowed_values: [finance] }
view: orders { dimension: margin { required_access_grants: [finance, hr] } }
explore: orders { required_access_grants: [exec] }
",
        );
        let references: Vec<&str> = found.iter().map(|w| w.reference.as_str()).collect();
        assert_eq!(references, vec!["exec", "hr"]);
        assert!(found.iter().all(|w| w.kind == ReferenceKind::AccessGrant));
    }
}

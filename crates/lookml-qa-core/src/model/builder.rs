//! Builds a typed [`SourceModel`] from the untyped syntax tree.

use super::{
    resolve, AccessGrant, ColorRef, Dashboard, DerivedTable, Element, ElementStyle, Explore,
    Field, FieldKind, FieldRef, Join, Model, Placement, Query, QueryFilter, SourceModel, Sort,
    View,
};
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::parser::syntax::{Body, ListItem, Pair, Position, Scalar, Value};
use crate::parser::{Parser, DEFAULT_MAX_DEPTH};
use crate::utils::is_color_literal;
use std::collections::HashMap;
use tracing::debug;

/// Parses LookML text into a [`SourceModel`].
///
/// # Example
///
/// ```
/// use lookml_qa_core::model::ModelBuilder;
///
/// let model = ModelBuilder::new()
///     .build("view: orders { dimension: id { type: number } }")
///     .unwrap();
/// assert_eq!(model.views().count(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ModelBuilder {
    parser: Parser,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Creates a builder with the default nesting limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new().max_depth(DEFAULT_MAX_DEPTH),
        }
    }

    /// Sets the maximum nesting depth accepted by the parser.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.parser = self.parser.max_depth(max_depth);
        self
    }

    /// Parses and types `text`, then records unresolved references.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input, duplicate identifiers
    /// within one scope, or properties with values of the wrong shape.
    pub fn build(&self, text: &str) -> Result<SourceModel, ParseError> {
        let statements = self.parser.parse(text)?;

        let mut model_names = Namespace::new("model");
        let mut dashboard_names = Namespace::new("dashboard");
        let mut file_model: Option<ModelScope> = None;
        let mut models = Vec::new();
        let mut dashboards = Vec::new();

        for pair in &statements {
            match pair.key.as_str() {
                "model" => {
                    let (name, body) = named_block(pair)?;
                    model_names.claim(name, pair.position)?;
                    let mut scope = ModelScope::new(Some(name.to_string()), pair.position);
                    for statement in body {
                        scope.add(statement)?;
                    }
                    debug!("parsed model `{}`", name);
                    models.push(scope.finish());
                }
                "dashboard" => {
                    let (name, body) = named_block(pair)?;
                    dashboard_names.claim(name, pair.position)?;
                    debug!("parsed dashboard `{}`", name);
                    dashboards.push(dashboard(name, body, pair.position)?);
                }
                _ => {
                    file_model
                        .get_or_insert_with(|| ModelScope::new(None, Position::new(0, 1, 1)))
                        .add(pair)?;
                }
            }
        }

        if let Some(scope) = file_model {
            let model = scope.finish();
            if !(model.views.is_empty()
                && model.explores.is_empty()
                && model.access_grants.is_empty()
                && model.connection.is_none()
                && model.includes.is_empty())
            {
                models.insert(0, model);
            }
        }

        let mut source = SourceModel {
            models,
            dashboards,
            warnings: Vec::new(),
        };
        source.warnings = resolve::unresolved_references(&source);
        Ok(source)
    }
}

/// Tracks identifiers declared in one uniqueness scope.
struct Namespace {
    kind: &'static str,
    seen: HashMap<String, usize>,
}

impl Namespace {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            seen: HashMap::new(),
        }
    }

    fn claim(&mut self, name: &str, position: Position) -> Result<(), ParseError> {
        // Refinements (`+orders`) may be repeated.
        if name.starts_with('+') {
            return Ok(());
        }
        if let Some(&first_line) = self.seen.get(name) {
            return Err(ParseError::new(
                ParseErrorKind::DuplicateIdentifier {
                    kind: self.kind,
                    name: name.to_string(),
                    first_line,
                },
                position,
            ));
        }
        self.seen.insert(name.to_string(), position.line);
        Ok(())
    }
}

struct ModelScope {
    model: Model,
    views: Namespace,
    explores: Namespace,
    grants: Namespace,
}

impl ModelScope {
    fn new(name: Option<String>, position: Position) -> Self {
        Self {
            model: Model {
                name,
                position,
                ..Model::default()
            },
            views: Namespace::new("view"),
            explores: Namespace::new("explore"),
            grants: Namespace::new("access grant"),
        }
    }

    fn add(&mut self, pair: &Pair) -> Result<(), ParseError> {
        match pair.key.as_str() {
            "connection" => self.model.connection = pair.as_str().map(String::from),
            "include" => self.model.includes.extend(scalar_items(pair)),
            "view" => {
                let (name, body) = named_block(pair)?;
                self.views.claim(name, pair.position)?;
                debug!("parsed view `{}`", name);
                self.model.views.push(view(name, body, pair.position)?);
            }
            "explore" => {
                let (name, body) = named_block(pair)?;
                self.explores.claim(name, pair.position)?;
                debug!("parsed explore `{}`", name);
                self.model.explores.push(explore(name, body, pair.position)?);
            }
            "access_grant" => {
                let (name, body) = named_block(pair)?;
                self.grants.claim(name, pair.position)?;
                self.model.access_grants.push(AccessGrant {
                    name: name.to_string(),
                    user_attribute: body.string("user_attribute").map(String::from),
                    allowed_values: body.words("allowed_values"),
                    position: pair.position,
                });
            }
            other => debug!("ignoring `{}` at line {}", other, pair.position.line),
        }
        Ok(())
    }

    fn finish(self) -> Model {
        self.model
    }
}

fn named_block(pair: &Pair) -> Result<(&str, &[Pair]), ParseError> {
    match (pair.name.as_deref(), pair.as_block()) {
        (Some(name), Some(body)) => Ok((name, body)),
        _ => Err(ParseError::new(
            ParseErrorKind::InvalidValue {
                key: pair.key.clone(),
                reason: "expected a named block `name { ... }`".to_string(),
            },
            pair.position,
        )),
    }
}

fn invalid(pair: &Pair, reason: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidValue {
            key: pair.key.clone(),
            reason: reason.to_string(),
        },
        pair.position,
    )
}

fn scalar_items(pair: &Pair) -> Vec<String> {
    match &pair.value {
        Value::Scalar(s) => vec![s.as_str().to_string()],
        Value::List(items) => items
            .iter()
            .filter_map(ListItem::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn view(name: &str, body: &[Pair], position: Position) -> Result<View, ParseError> {
    let mut fields = Vec::new();
    let mut names = Namespace::new("field");

    for pair in body {
        let Some(kind) = FieldKind::from_keyword(&pair.key) else {
            continue;
        };
        let (field_name, field_body) = named_block(pair)?;
        names.claim(field_name, pair.position)?;
        fields.push(field(kind, field_name, field_body, pair.position));
    }

    let derived_table = body
        .find("derived_table")
        .map(|pair| {
            pair.as_block()
                .map(|b| derived_table(b, pair.position))
                .ok_or_else(|| invalid(pair, "expected a block"))
        })
        .transpose()?;

    Ok(View {
        name: name.to_string(),
        label: body.string("label").map(String::from),
        description: body.string("description").map(String::from),
        sql_table_name: body.string("sql_table_name").map(String::from),
        derived_table,
        extends: body.words("extends"),
        fields,
        position,
    })
}

fn field(kind: FieldKind, name: &str, body: &[Pair], position: Position) -> Field {
    let mut timeframes = body.words("timeframes");
    timeframes.extend(body.words("intervals"));

    let allowed_values = body
        .find_all("allowed_value")
        .into_iter()
        .filter_map(|p| p.as_block().and_then(|b| b.string("value")))
        .map(String::from)
        .collect();

    Field {
        kind,
        name: name.to_string(),
        field_type: body.string("type").map(String::from),
        sql: body.string("sql").map(String::from),
        label: body.string("label").map(String::from),
        description: body.string("description").map(String::from),
        hidden: body.flag("hidden"),
        primary_key: body.flag("primary_key"),
        timeframes,
        allowed_values,
        required_access_grants: body.words("required_access_grants"),
        position,
    }
}

fn derived_table(body: &[Pair], position: Position) -> DerivedTable {
    let persisted = ["datagroup_trigger", "persist_for", "sql_trigger_value"]
        .iter()
        .any(|key| body.find(key).is_some())
        || body.flag("materialized_view");

    DerivedTable {
        sql: body.string("sql").map(String::from),
        explore_source: body
            .find("explore_source")
            .and_then(|p| p.name.clone().or_else(|| p.as_str().map(String::from))),
        persisted,
        position,
    }
}

fn explore(name: &str, body: &[Pair], position: Position) -> Result<Explore, ParseError> {
    let mut joins = Vec::new();
    let mut names = Namespace::new("join");

    for pair in body.find_all("join") {
        let (join_name, join_body) = named_block(pair)?;
        names.claim(join_name, pair.position)?;
        joins.push(Join {
            name: join_name.to_string(),
            from: join_body
                .string("from")
                .or_else(|| join_body.string("view_name"))
                .map(String::from),
            join_type: join_body.string("type").map(String::from),
            relationship: join_body.string("relationship").map(String::from),
            sql_on: join_body.string("sql_on").map(String::from),
            foreign_key: join_body.string("foreign_key").map(String::from),
            required_access_grants: join_body.words("required_access_grants"),
            position: pair.position,
        });
    }

    Ok(Explore {
        name: name.to_string(),
        view_name: body
            .string("from")
            .or_else(|| body.string("view_name"))
            .map(String::from),
        label: body.string("label").map(String::from),
        description: body.string("description").map(String::from),
        hidden: body.flag("hidden"),
        joins,
        required_access_grants: body.words("required_access_grants"),
        always_filter: body.find("always_filter").is_some()
            || body.find("conditionally_filter").is_some(),
        sql_always_where: body.string("sql_always_where").map(String::from),
        position,
    })
}

fn dashboard(name: &str, body: &[Pair], position: Position) -> Result<Dashboard, ParseError> {
    let mut elements = Vec::new();
    let mut names = Namespace::new("element");

    for pair in body {
        match pair.key.as_str() {
            "elements" => {
                let items = pair
                    .as_list()
                    .ok_or_else(|| invalid(pair, "expected a list of element blocks"))?;
                for item in items {
                    let ListItem::Block {
                        body: element_body,
                        position,
                    } = item
                    else {
                        return Err(ParseError::new(
                            ParseErrorKind::InvalidValue {
                                key: "elements".to_string(),
                                reason: "expected an element block".to_string(),
                            },
                            item.position(),
                        ));
                    };
                    let element = element(None, element_body, *position)?;
                    if let Some(element_name) = &element.name {
                        names.claim(element_name, *position)?;
                    }
                    elements.push(element);
                }
            }
            "element" => {
                let (element_name, element_body) = named_block(pair)?;
                names.claim(element_name, pair.position)?;
                elements.push(element(Some(element_name), element_body, pair.position)?);
            }
            _ => {}
        }
    }

    Ok(Dashboard {
        name: name.to_string(),
        title: body.string("title").map(String::from),
        layout: body.string("layout").map(String::from),
        elements,
        position,
    })
}

fn element(name: Option<&str>, body: &[Pair], position: Position) -> Result<Element, ParseError> {
    // Queries may be nested under `query:` or written inline on the element.
    let query_body = match body.find("query") {
        Some(pair) => pair
            .as_block()
            .ok_or_else(|| invalid(pair, "expected a block"))?,
        None => body,
    };

    let mut style = ElementStyle::default();
    collect_style(body, "", false, false, &mut style);

    Ok(Element {
        name: name
            .map(String::from)
            .or_else(|| body.string("name").map(String::from)),
        title: body.string("title").map(String::from),
        viz_type: body.string("type").map(String::from),
        query: query(query_body)?,
        style,
        placement: Placement {
            row: number(body, "row")?,
            col: number(body, "col")?,
            width: number(body, "width")?,
            height: number(body, "height")?,
        },
        position,
    })
}

fn query(body: &[Pair]) -> Result<Query, ParseError> {
    let mut filters = Vec::new();
    if let Some(pair) = body.find("filters") {
        let entries: Vec<&Pair> = match &pair.value {
            Value::Block(pairs) => pairs.iter().collect(),
            Value::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    ListItem::Pair(p) => Some(p),
                    _ => None,
                })
                .collect(),
            _ => return Err(invalid(pair, "expected a block of `field: expression` pairs")),
        };
        filters = entries
            .into_iter()
            .map(|p| QueryFilter {
                field: FieldRef::parse(&p.key, p.position),
                expression: p.as_str().unwrap_or_default().to_string(),
            })
            .collect();
    }

    let mut sorts = Vec::new();
    if let Some(pair) = body.find("sorts") {
        for item in pair.as_list().unwrap_or_default() {
            match item {
                ListItem::Pair(p) => sorts.push(Sort {
                    field: FieldRef::parse(&p.key, p.position),
                    descending: p.as_str().is_some_and(|d| d.eq_ignore_ascii_case("desc")),
                }),
                ListItem::Scalar { value, position } => {
                    let mut parts = value.as_str().split_whitespace();
                    if let Some(field) = parts.next() {
                        sorts.push(Sort {
                            field: FieldRef::parse(field, *position),
                            descending: parts.next().is_some_and(|d| d.eq_ignore_ascii_case("desc")),
                        });
                    }
                }
                ListItem::Block { .. } => {}
            }
        }
    }

    let limit = match body.find("limit") {
        Some(pair) => Some(
            pair.as_str()
                .and_then(|v| v.parse::<u64>().ok())
                .ok_or_else(|| invalid(pair, "expected a non-negative integer"))?,
        ),
        None => None,
    };

    Ok(Query {
        model: body.string("model").map(String::from),
        explore: body.string("explore").map(String::from),
        dimensions: field_refs(body, "dimensions"),
        measures: field_refs(body, "measures"),
        fields: field_refs(body, "fields"),
        filters,
        sorts,
        limit,
    })
}

fn field_refs(body: &[Pair], key: &str) -> Vec<FieldRef> {
    let Some(pair) = body.find(key) else {
        return Vec::new();
    };
    match &pair.value {
        Value::List(items) => items
            .iter()
            .filter_map(|item| match item {
                ListItem::Scalar { value, position } => {
                    Some(FieldRef::parse(value.as_str(), *position))
                }
                _ => None,
            })
            .collect(),
        Value::Scalar(value) => vec![FieldRef::parse(value.as_str(), pair.position)],
        _ => Vec::new(),
    }
}

fn number(body: &[Pair], key: &str) -> Result<Option<u32>, ParseError> {
    body.find(key)
        .map(|pair| {
            pair.as_str()
                .and_then(|v| v.parse::<u32>().ok())
                .ok_or_else(|| invalid(pair, "expected a non-negative integer"))
        })
        .transpose()
}

/// Walks element properties collecting color literals and font sizes.
///
/// Values nested under a key containing `color` (e.g. `series_colors`)
/// count as colors; anything under `conditional_formatting` is conditional.
fn collect_style(
    body: &[Pair],
    prefix: &str,
    in_color: bool,
    conditional: bool,
    style: &mut ElementStyle,
) {
    for pair in body {
        if pair.key == "query" {
            continue;
        }
        let property = if prefix.is_empty() {
            pair.key.clone()
        } else {
            format!("{prefix}.{}", pair.key)
        };
        let is_color = in_color || pair.key.contains("color");
        let is_conditional = conditional || pair.key == "conditional_formatting";

        match &pair.value {
            Value::Scalar(scalar) => {
                if is_color && is_color_literal(scalar.as_str()) {
                    style.colors.push(ColorRef {
                        property,
                        value: scalar.as_str().to_string(),
                        conditional: is_conditional,
                    });
                } else if pair.key.ends_with("font_size") || pair.key.ends_with("text_size") {
                    style.font_sizes.push(scalar.as_str().to_string());
                }
            }
            Value::Block(inner) => {
                collect_style(inner, &property, is_color, is_conditional, style);
            }
            Value::List(items) => {
                for item in items {
                    match item {
                        ListItem::Scalar {
                            value: Scalar::Word(v) | Scalar::Str(v),
                            ..
                        } if is_color && is_color_literal(v) => style.colors.push(ColorRef {
                            property: property.clone(),
                            value: v.clone(),
                            conditional: is_conditional,
                        }),
                        ListItem::Pair(p) => {
                            collect_style(
                                std::slice::from_ref(p),
                                &property,
                                is_color,
                                is_conditional,
                                style,
                            );
                        }
                        ListItem::Block { body: inner, .. } => {
                            collect_style(inner, &property, is_color, is_conditional, style);
                        }
                        ListItem::Scalar { .. } => {}
                    }
                }
            }
            Value::Expr(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceKind;

    fn build(text: &str) -> SourceModel {
        ModelBuilder::new().build(text).expect("valid LookML")
    }

    #[test]
    fn top_level_declarations_form_a_file_model() {
        let model = build(
            r#"
connection: "warehouse"
include: "*.view.lkml"
view: orders {
  sql_table_name: public.orders ;;
  dimension: id { primary_key: yes type: number sql: ${TABLE}.id ;; }
  measure: count { type: count }
}
explore: orders {}
"#,
        );
        assert_eq!(model.models().len(), 1);
        let file = &model.models()[0];
        assert_eq!(file.display_name(), "(file)");
        assert_eq!(file.connection.as_deref(), Some("warehouse"));
        assert_eq!(file.includes, vec!["*.view.lkml"]);
        assert_eq!(file.views[0].fields.len(), 2);
        assert!(file.views[0].fields[0].primary_key);
        assert!(model.warnings().is_empty());
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let err = ModelBuilder::new()
            .build(
                r"
view: orders {
  dimension: revenue { type: number }
  measure: revenue { type: sum }
}",
            )
            .unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::DuplicateIdentifier {
                kind: "field",
                name: "revenue".into(),
                first_line: 3,
            }
        );
        assert_eq!(err.line, 4);
    }

    #[test]
    fn duplicate_joins_and_views_are_rejected() {
        let err = ModelBuilder::new()
            .build("explore: a { join: b {} join: b {} }")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::DuplicateIdentifier { kind: "join", .. }));

        let err = ModelBuilder::new()
            .build("model: m { view: a {} view: a {} }")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::DuplicateIdentifier { kind: "view", .. }));
    }

    #[test]
    fn refinements_may_repeat() {
        let model = build("view: +orders {} view: +orders {}");
        assert_eq!(model.views().count(), 2);
    }

    #[test]
    fn same_name_in_different_models_is_allowed() {
        let model = build("model: a { view: v {} } model: b { view: v {} }");
        assert_eq!(model.models().len(), 2);
        assert_eq!(model.views().count(), 2);
    }

    #[test]
    fn view_needs_a_name() {
        let err = ModelBuilder::new().build("view: { }").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidValue { .. }));
    }

    #[test]
    fn derived_table_persistence() {
        let model = build(
            r"
view: a { derived_table: { sql: SELECT 1 ;; datagroup_trigger: nightly } }
view: b { derived_table: { sql: SELECT 2 ;; } }
view: c { derived_table: { explore_source: orders { column: id {} } } }
",
        );
        let views: Vec<&View> = model.views().collect();
        assert!(views[0].derived_table.as_ref().is_some_and(|d| d.persisted));
        assert!(views[1].derived_table.as_ref().is_some_and(|d| !d.persisted));
        assert_eq!(
            views[2]
                .derived_table
                .as_ref()
                .and_then(|d| d.explore_source.as_deref()),
            Some("orders")
        );
    }

    #[test]
    fn joins_belong_to_explores() {
        let model = build(
            r"
view: orders { dimension: user_id {} }
view: users { dimension: id {} }
explore: orders {
  join: customer {
    from: users
    type: left_outer
    relationship: many_to_one
    sql_on: ${orders.user_id} = ${customer.id} ;;
  }
}",
        );
        let explore = model.explores().next().expect("explore");
        assert_eq!(explore.joins[0].target_view(), "users");
        assert_eq!(explore.view_for_alias("customer"), Some("users"));
        assert!(model.warnings().is_empty());
    }

    #[test]
    fn dashboard_elements_and_queries() {
        let model = build(
            r##"
dashboard: sales_overview {
  title: "Sales Overview"
  layout: newspaper
  elements: [
    {
      name: total_revenue
      type: single_value
      query: {
        dimensions: []
        measures: [orders.total_revenue]
        filters: { orders.created_date: "30 days" }
        sorts: [orders.total_revenue: desc]
        limit: 10
      }
      row: 0
      col: 0
      width: 8
      height: 4
      series_colors: { orders.total_revenue: "#1A73E8" }
      conditional_formatting: [{ background_color: "#EA4335" }]
      title_text_size: 14
    }
  ]
}
"##,
        );
        let dashboard = &model.dashboards()[0];
        assert_eq!(dashboard.layout.as_deref(), Some("newspaper"));
        let element = &dashboard.elements[0];
        assert_eq!(element.display_name(), "total_revenue");
        assert_eq!(element.viz_type.as_deref(), Some("single_value"));
        assert_eq!(element.query.measures[0].to_string(), "orders.total_revenue");
        assert_eq!(element.query.filters[0].expression, "30 days");
        assert!(element.query.sorts[0].descending);
        assert_eq!(element.query.limit, Some(10));
        assert!(element.placement.is_complete());
        assert_eq!(element.placement.right_edge(), Some(8));
        assert_eq!(element.style.colors.len(), 2);
        assert_eq!(element.style.colors[0].property, "series_colors.orders.total_revenue");
        assert!(!element.style.colors[0].conditional);
        assert!(element.style.colors[1].conditional);
        assert_eq!(element.style.font_sizes, vec!["14"]);
    }

    #[test]
    fn inline_element_query() {
        let model = build(
            "dashboard: d { element: e { model: m explore: orders fields: [orders.id] limit: 5 } }",
        );
        let query = &model.dashboards()[0].elements[0].query;
        assert_eq!(query.explore.as_deref(), Some("orders"));
        assert_eq!(query.fields.len(), 1);
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn non_numeric_limit_is_rejected() {
        let err = ModelBuilder::new()
            .build("dashboard: d { elements: [ { query: { limit: many } } ] }")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidValue { ref key, .. } if key == "limit"));
    }

    #[test]
    fn duplicate_dashboard_elements_are_rejected() {
        let err = ModelBuilder::new()
            .build("dashboard: d { elements: [ { name: a }, { name: a } ] }")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::DuplicateIdentifier { kind: "element", .. }));
    }

    #[test]
    fn unresolved_explore_view_is_a_warning() {
        let model = build("view: orders {} explore: order_items {}");
        assert_eq!(model.warnings().len(), 1);
        assert_eq!(model.warnings()[0].kind, ReferenceKind::View);
        assert_eq!(model.warnings()[0].reference, "order_items");
    }
}

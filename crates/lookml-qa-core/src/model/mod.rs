//! Typed, immutable LookML source model.
//!
//! # Architecture
//!
//! ```text
//! source text
//!   ↓ parser (lexer + recursive descent)
//! untyped syntax tree (Vec<Pair>)
//!   ↓ builder (typing + uniqueness checks)
//! SourceModel
//!   ↓ resolve (name lookups)
//! SourceModel + ReferenceWarnings
//! ```
//!
//! A [`SourceModel`] is built once per analysis and only ever read after
//! that. Every node keeps the [`Position`] of its declaring keyword.

mod builder;
mod resolve;

use crate::parser::error::ParseError;
use crate::parser::syntax::Position;
use std::collections::HashSet;
use std::fmt;

pub use builder::ModelBuilder;

/// The parsed form of one LookML source artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceModel {
    models: Vec<Model>,
    dashboards: Vec<Dashboard>,
    warnings: Vec<ReferenceWarning>,
}

impl SourceModel {
    /// Parses LookML text with default settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text is malformed or declares a
    /// duplicate identifier.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        ModelBuilder::new().build(text)
    }

    /// Models in declaration order. A file-level model, if any, comes first.
    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Dashboards in declaration order.
    #[must_use]
    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    /// Unresolved references found after construction.
    #[must_use]
    pub fn warnings(&self) -> &[ReferenceWarning] {
        &self.warnings
    }

    /// Returns true if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.dashboards.is_empty()
    }

    /// All views across every model.
    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.models.iter().flat_map(|m| m.views.iter())
    }

    /// All explores across every model.
    pub fn explores(&self) -> impl Iterator<Item = &Explore> {
        self.models.iter().flat_map(|m| m.explores.iter())
    }

    /// All access grants across every model.
    pub fn access_grants(&self) -> impl Iterator<Item = &AccessGrant> {
        self.models.iter().flat_map(|m| m.access_grants.iter())
    }

    /// All fields of all views.
    pub fn fields(&self) -> impl Iterator<Item = (&View, &Field)> {
        self.views()
            .flat_map(|v| v.fields.iter().map(move |f| (v, f)))
    }

    /// Returns true if a view (or a refinement of it) named `name` exists.
    #[must_use]
    pub fn has_view(&self, name: &str) -> bool {
        self.views().any(|v| v.base_name() == name)
    }

    /// Returns the first declaration of the view named `name`.
    #[must_use]
    pub fn find_view(&self, name: &str) -> Option<&View> {
        self.views().find(|v| v.base_name() == name)
    }

    /// Returns true if `field` is declared on `view`, one of its
    /// refinements, or a view it extends.
    #[must_use]
    pub fn view_has_field(&self, view: &str, field: &str) -> bool {
        let mut visited = HashSet::new();
        self.view_has_field_inner(view, field, &mut visited)
    }

    fn view_has_field_inner<'a>(
        &'a self,
        view: &'a str,
        field: &str,
        visited: &mut HashSet<&'a str>,
    ) -> bool {
        if !visited.insert(view) {
            return false;
        }
        let declarations: Vec<&View> = self.views().filter(|v| v.base_name() == view).collect();
        declarations.iter().any(|v| v.resolves_field(field))
            || declarations.iter().any(|v| {
                v.extends
                    .iter()
                    .any(|parent| self.view_has_field_inner(parent, field, visited))
            })
    }

    /// Returns true if an access grant named `name` is declared.
    #[must_use]
    pub fn has_access_grant(&self, name: &str) -> bool {
        self.access_grants().any(|g| g.name == name)
    }

}

/// A `model:` block, or the implicit file-level model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// Declared name; `None` for the file-level model.
    pub name: Option<String>,
    /// Database connection name.
    pub connection: Option<String>,
    /// `include:` patterns, in order.
    pub includes: Vec<String>,
    /// Views declared in this model.
    pub views: Vec<View>,
    /// Explores declared in this model.
    pub explores: Vec<Explore>,
    /// Access grants declared in this model.
    pub access_grants: Vec<AccessGrant>,
    /// Position of the `model:` keyword (start of file for file-level).
    pub position: Position,
}

impl Model {
    /// Returns the model name, or `(file)` for the file-level model.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(file)")
    }
}

/// A `view:` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// Declared name, including a leading `+` for refinements.
    pub name: String,
    /// Display label.
    pub label: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// Physical table expression.
    pub sql_table_name: Option<String>,
    /// Derived table definition.
    pub derived_table: Option<DerivedTable>,
    /// Views this view extends.
    pub extends: Vec<String>,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Position of the `view:` keyword.
    pub position: Position,
}

impl View {
    /// Name without the refinement `+` prefix.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name.strip_prefix('+').unwrap_or(&self.name)
    }

    /// Returns true if this is a refinement (`view: +name`).
    #[must_use]
    pub fn is_refinement(&self) -> bool {
        self.name.starts_with('+')
    }

    /// Dimensions and dimension groups in order.
    pub fn dimensions(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind.is_dimension())
    }

    /// Measures in order.
    pub fn measures(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Measure)
    }

    /// Returns true if `name` refers to a field of this view, including the
    /// generated timeframe fields of dimension groups.
    #[must_use]
    pub fn resolves_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.answers_to(name))
    }
}

/// Kinds of view fields. All share one namespace within a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `dimension:`
    Dimension,
    /// `dimension_group:`
    DimensionGroup,
    /// `measure:`
    Measure,
    /// `filter:` (templated filter)
    Filter,
    /// `parameter:`
    Parameter,
}

impl FieldKind {
    /// Maps a LookML keyword to a field kind.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "dimension" => Some(Self::Dimension),
            "dimension_group" => Some(Self::DimensionGroup),
            "measure" => Some(Self::Measure),
            "filter" => Some(Self::Filter),
            "parameter" => Some(Self::Parameter),
            _ => None,
        }
    }

    /// Returns the LookML keyword.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::DimensionGroup => "dimension_group",
            Self::Measure => "measure",
            Self::Filter => "filter",
            Self::Parameter => "parameter",
        }
    }

    /// Returns true for dimensions and dimension groups.
    #[must_use]
    pub fn is_dimension(self) -> bool {
        matches!(self, Self::Dimension | Self::DimensionGroup)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A dimension, dimension group, measure, filter or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field kind.
    pub kind: FieldKind,
    /// Declared name.
    pub name: String,
    /// Explicit `type:` value.
    pub field_type: Option<String>,
    /// SQL expression.
    pub sql: Option<String>,
    /// Display label.
    pub label: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// `hidden: yes`
    pub hidden: bool,
    /// `primary_key: yes`
    pub primary_key: bool,
    /// Dimension group timeframes (or intervals for duration groups).
    pub timeframes: Vec<String>,
    /// Parameter `allowed_value` values.
    pub allowed_values: Vec<String>,
    /// Access grants required to see this field.
    pub required_access_grants: Vec<String>,
    /// Position of the field keyword.
    pub position: Position,
}

impl Field {
    /// Returns true if the field has a non-empty description.
    #[must_use]
    pub fn is_documented(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    /// Returns true if `name` refers to this field. A dimension group
    /// `created` answers to `created_date`, `created_week`, ...
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        if self.kind != FieldKind::DimensionGroup {
            return false;
        }
        name.strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|suffix| {
                self.timeframes.is_empty() || self.timeframes.iter().any(|t| t == suffix)
            })
    }
}

/// A `derived_table:` definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedTable {
    /// SQL body of a SQL-based derived table.
    pub sql: Option<String>,
    /// Explore backing a native derived table.
    pub explore_source: Option<String>,
    /// True if any persistence strategy is declared.
    pub persisted: bool,
    /// Position of the `derived_table:` keyword.
    pub position: Position,
}

/// An `explore:` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Explore {
    /// Declared name.
    pub name: String,
    /// Base view from `from:` or `view_name:`.
    pub view_name: Option<String>,
    /// Display label.
    pub label: Option<String>,
    /// Description text.
    pub description: Option<String>,
    /// `hidden: yes`
    pub hidden: bool,
    /// Joins in declaration order.
    pub joins: Vec<Join>,
    /// Access grants required to use this explore.
    pub required_access_grants: Vec<String>,
    /// True if `always_filter` or `conditionally_filter` is declared.
    pub always_filter: bool,
    /// `sql_always_where` expression.
    pub sql_always_where: Option<String>,
    /// Position of the `explore:` keyword.
    pub position: Position,
}

impl Explore {
    /// Name of the view this explore starts from.
    #[must_use]
    pub fn base_view(&self) -> &str {
        self.view_name
            .as_deref()
            .unwrap_or_else(|| self.name.strip_prefix('+').unwrap_or(&self.name))
    }

    /// Maps a reference alias (explore name or join name) to a view name.
    #[must_use]
    pub fn view_for_alias(&self, alias: &str) -> Option<&str> {
        let own_alias = self.name.strip_prefix('+').unwrap_or(&self.name);
        if alias == own_alias {
            return Some(self.base_view());
        }
        self.joins
            .iter()
            .find(|j| j.name == alias)
            .map(Join::target_view)
    }

    /// Names of every view reachable from this explore.
    pub fn views(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base_view()).chain(self.joins.iter().map(Join::target_view))
    }
}

/// A `join:` inside an explore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Join {
    /// Join alias.
    pub name: String,
    /// Joined view from `from:` or `view_name:`.
    pub from: Option<String>,
    /// `type:` (`left_outer`, `inner`, `full_outer`, `cross`).
    pub join_type: Option<String>,
    /// `relationship:` (`many_to_one`, ...).
    pub relationship: Option<String>,
    /// `sql_on:` condition.
    pub sql_on: Option<String>,
    /// `foreign_key:` dimension.
    pub foreign_key: Option<String>,
    /// Access grants required to use this join.
    pub required_access_grants: Vec<String>,
    /// Position of the `join:` keyword.
    pub position: Position,
}

impl Join {
    /// Name of the joined view.
    #[must_use]
    pub fn target_view(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.name)
    }

    /// Returns true if the join declares how rows are matched.
    #[must_use]
    pub fn has_condition(&self) -> bool {
        self.sql_on.as_deref().is_some_and(|s| !s.is_empty()) || self.foreign_key.is_some()
    }
}

/// An `access_grant:` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessGrant {
    /// Declared name.
    pub name: String,
    /// User attribute checked by the grant.
    pub user_attribute: Option<String>,
    /// Values of the attribute that grant access.
    pub allowed_values: Vec<String>,
    /// Position of the `access_grant:` keyword.
    pub position: Position,
}

/// A `dashboard:` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    /// Declared name.
    pub name: String,
    /// Display title.
    pub title: Option<String>,
    /// Layout mode (`newspaper`, `tile`, `static`, `grid`).
    pub layout: Option<String>,
    /// Elements in declaration order.
    pub elements: Vec<Element>,
    /// Position of the `dashboard:` keyword.
    pub position: Position,
}

/// One visualization on a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Element name.
    pub name: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Visualization type (`single_value`, `looker_column`, ...).
    pub viz_type: Option<String>,
    /// Query descriptor.
    pub query: Query,
    /// Style attributes.
    pub style: ElementStyle,
    /// Grid placement.
    pub placement: Placement,
    /// Position of the element's opening brace.
    pub position: Position,
}

impl Element {
    /// Name or title used in messages.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("(unnamed)")
    }
}

/// What an element queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Model name.
    pub model: Option<String>,
    /// Explore name.
    pub explore: Option<String>,
    /// Dimensions selected.
    pub dimensions: Vec<FieldRef>,
    /// Measures selected.
    pub measures: Vec<FieldRef>,
    /// Fields selected without a dimension/measure split.
    pub fields: Vec<FieldRef>,
    /// Filter expressions.
    pub filters: Vec<QueryFilter>,
    /// Sort order.
    pub sorts: Vec<Sort>,
    /// Row limit.
    pub limit: Option<u64>,
}

impl Query {
    /// Every field referenced by the query.
    pub fn field_refs(&self) -> impl Iterator<Item = &FieldRef> {
        self.dimensions
            .iter()
            .chain(&self.measures)
            .chain(&self.fields)
            .chain(self.filters.iter().map(|f| &f.field))
            .chain(self.sorts.iter().map(|s| &s.field))
    }

    /// Returns true if the query selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.measures.is_empty() && self.fields.is_empty()
    }
}

/// A `view.field` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// View part, if qualified.
    pub view: Option<String>,
    /// Field part.
    pub field: String,
    /// Where the reference appears.
    pub position: Position,
}

impl FieldRef {
    /// Splits `view.field` at the first dot.
    #[must_use]
    pub fn parse(text: &str, position: Position) -> Self {
        match text.split_once('.') {
            Some((view, field)) => Self {
                view: Some(view.to_string()),
                field: field.to_string(),
                position,
            },
            None => Self {
                view: None,
                field: text.to_string(),
                position,
            },
        }
    }

    /// Returns true for wildcard selections such as `orders.*`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.field.contains('*')
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.view {
            Some(view) => write!(f, "{view}.{}", self.field),
            None => f.write_str(&self.field),
        }
    }
}

/// One query filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// Filtered field.
    pub field: FieldRef,
    /// Filter expression (`"30 days"`, `"complete"`).
    pub expression: String,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Sorted field.
    pub field: FieldRef,
    /// Descending order.
    pub descending: bool,
}

/// Style attributes of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementStyle {
    /// Color literals with the property they were set on.
    pub colors: Vec<ColorRef>,
    /// Font and text size values.
    pub font_sizes: Vec<String>,
}

/// A color literal found in element style properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRef {
    /// Dotted property path (`series_colors.orders.count`).
    pub property: String,
    /// Color literal as written.
    pub value: String,
    /// True if set inside `conditional_formatting`.
    pub conditional: bool,
}

/// Grid placement of an element (newspaper layout).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placement {
    /// Row index.
    pub row: Option<u32>,
    /// Column index.
    pub col: Option<u32>,
    /// Width in grid columns.
    pub width: Option<u32>,
    /// Height in grid rows.
    pub height: Option<u32>,
}

impl Placement {
    /// Returns true if row, column, width and height are all set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.row.is_some() && self.col.is_some() && self.width.is_some() && self.height.is_some()
    }

    /// Rightmost column occupied, if column and width are set.
    ///
    /// Widened to `u64` so no `u32` column and width can overflow.
    #[must_use]
    pub fn right_edge(&self) -> Option<u64> {
        Some(u64::from(self.col?) + u64::from(self.width?))
    }
}

/// What kind of name failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A view name.
    View,
    /// A field name.
    Field,
    /// An access grant name.
    AccessGrant,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Field => "field",
            Self::AccessGrant => "access grant",
        })
    }
}

/// A name reference that could not be resolved within the model.
///
/// Non-fatal: recorded on the model for checks to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceWarning {
    /// Kind of the missing target.
    pub kind: ReferenceKind,
    /// The reference as written.
    pub reference: String,
    /// Where it was referenced from (`explore \`orders\``).
    pub context: String,
    /// Position of the referencing declaration.
    pub position: Position,
}

impl fmt::Display for ReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unresolved {} `{}` in {} (line {})",
            self.kind, self.reference, self.context, self.position.line
        )
    }
}

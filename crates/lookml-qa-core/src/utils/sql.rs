//! Scanning helpers for SQL expressions embedded in LookML.
//!
//! LookML SQL carries two kinds of markup: substitution references
//! (`${view.field}`, `${TABLE}`) and Liquid templating (`{{ output }}`,
//! `{% tag %}`).

/// A `${...}` substitution reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlReference {
    /// `${TABLE}`: the current view's table.
    Table,
    /// `${field}`: a field of the current view.
    Local(String),
    /// `${view.field}`: a field of another view.
    Qualified {
        /// View (or join alias) name.
        view: String,
        /// Field name.
        field: String,
    },
}

impl SqlReference {
    fn parse(inner: &str) -> Option<Self> {
        let inner = inner.trim();
        if inner.is_empty() {
            return None;
        }
        if inner == "TABLE" {
            return Some(Self::Table);
        }
        match inner.split_once('.') {
            Some((view, field)) => Some(Self::Qualified {
                view: view.to_string(),
                field: field.to_string(),
            }),
            None => Some(Self::Local(inner.to_string())),
        }
    }

    /// Returns true for references to a derived table's generated name.
    #[must_use]
    pub fn is_table_name(&self) -> bool {
        matches!(self, Self::Qualified { field, .. } if field == "SQL_TABLE_NAME")
    }
}

/// Extracts every `${...}` reference in order of appearance.
///
/// ```
/// use lookml_qa_core::utils::sql::{sql_references, SqlReference};
///
/// let refs = sql_references("${TABLE}.id = ${users.id}");
/// assert_eq!(refs[0], SqlReference::Table);
/// ```
#[must_use]
pub fn sql_references(sql: &str) -> Vec<SqlReference> {
    delimited(sql, "${", "}")
        .into_iter()
        .filter_map(SqlReference::parse)
        .collect()
}

/// Returns the trimmed inner text of every `{{ ... }}` output tag.
#[must_use]
pub fn liquid_outputs(sql: &str) -> Vec<&str> {
    delimited(sql, "{{", "}}")
}

/// Returns the trimmed inner text of every `{% ... %}` tag.
#[must_use]
pub fn liquid_tags(sql: &str) -> Vec<&str> {
    delimited(sql, "{%", "%}")
}

/// Returns the argument of every `{% <tag_name> arg %}` tag.
///
/// `liquid_tag_arguments(sql, "condition")` yields the filter names used by
/// templated-filter conditions.
#[must_use]
pub fn liquid_tag_arguments<'a>(sql: &'a str, tag_name: &str) -> Vec<&'a str> {
    liquid_tags(sql)
        .into_iter()
        .filter_map(|tag| {
            let mut parts = tag.split_whitespace();
            (parts.next() == Some(tag_name)).then(|| parts.next()).flatten()
        })
        .collect()
}

/// Returns true if the SQL selects every column (`SELECT *`).
#[must_use]
pub fn selects_star(sql: &str) -> bool {
    let normalized: Vec<String> = sql
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect();
    normalized
        .windows(2)
        .any(|w| w[0] == "SELECT" && (w[1] == "*" || w[1].starts_with("*,")))
        || normalized.iter().any(|w| w == "SELECT*")
}

fn delimited<'a>(text: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let after = &rest[start + open.len()..];
        let Some(end) = after.find(close) else {
            break;
        };
        found.push(after[..end].trim());
        rest = &after[end + close.len()..];
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_references() {
        let refs = sql_references("${TABLE}.amount * ${rate} + ${fx.rate} - ${base.SQL_TABLE_NAME}");
        assert_eq!(
            refs,
            vec![
                SqlReference::Table,
                SqlReference::Local("rate".into()),
                SqlReference::Qualified {
                    view: "fx".into(),
                    field: "rate".into()
                },
                SqlReference::Qualified {
                    view: "base".into(),
                    field: "SQL_TABLE_NAME".into()
                },
            ]
        );
        assert!(refs[3].is_table_name());
    }

    #[test]
    fn unterminated_reference_is_ignored() {
        assert!(sql_references("${TABLE").is_empty());
    }

    #[test]
    fn liquid_scanning() {
        let sql = "WHERE {% condition region_filter %} region {% endcondition %} AND id = {{ _filters['x'] | sql_quote }}";
        assert_eq!(liquid_tag_arguments(sql, "condition"), vec!["region_filter"]);
        assert_eq!(liquid_outputs(sql), vec!["_filters['x'] | sql_quote"]);
    }

    #[test]
    fn select_star_detection() {
        assert!(selects_star("select * from orders"));
        assert!(selects_star("SELECT\n  *\nFROM t"));
        assert!(!selects_star("SELECT id, COUNT(*) FROM t GROUP BY 1"));
    }
}

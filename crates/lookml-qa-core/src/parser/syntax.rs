//! Untyped syntax tree produced by the parser.
//!
//! The tree mirrors the surface grammar only: every statement is a
//! `key: value` pair, optionally named (`view: orders { ... }`). Meaning is
//! assigned later by the model builder.

use std::fmt;

/// A position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A scalar value: a bare word or a quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Unquoted word (`yes`, `number`, `orders.id`, `10`).
    Word(String),
    /// Double-quoted string with escapes already applied.
    Str(String),
}

impl Scalar {
    /// Returns the textual content regardless of quoting.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Word(s) | Self::Str(s) => s,
        }
    }
}

/// The right-hand side of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single scalar.
    Scalar(Scalar),
    /// Raw SQL/HTML text terminated by `;;` (terminator stripped, trimmed).
    Expr(String),
    /// A bracketed list.
    List(Vec<ListItem>),
    /// A braced block of statements.
    Block(Vec<Pair>),
}

/// One entry of a bracketed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// Plain scalar item.
    Scalar {
        /// The item value.
        value: Scalar,
        /// Where the item starts.
        position: Position,
    },
    /// `key: value` item, as used by `sorts: [orders.count: desc]`.
    Pair(Pair),
    /// Anonymous block item, as used by dashboard `elements`.
    Block {
        /// Statements inside the braces.
        body: Vec<Pair>,
        /// Position of the opening brace.
        position: Position,
    },
}

impl ListItem {
    /// Returns the scalar text of a plain scalar item.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns where this item starts.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::Scalar { position, .. } | Self::Block { position, .. } => *position,
            Self::Pair(pair) => pair.position,
        }
    }
}

/// A `key: value` or `key: name { ... }` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// Statement keyword.
    pub key: String,
    /// Declared identifier for named blocks.
    pub name: Option<String>,
    /// Statement value.
    pub value: Value,
    /// Position of the keyword.
    pub position: Position,
}

impl Pair {
    /// Returns scalar or expression text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::Scalar(s) => Some(s.as_str()),
            Value::Expr(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the block body, if the value is a block.
    #[must_use]
    pub fn as_block(&self) -> Option<&[Pair]> {
        match &self.value {
            Value::Block(body) => Some(body),
            _ => None,
        }
    }

    /// Returns the list items, if the value is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ListItem]> {
        match &self.value {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Property lookups over a block body.
pub trait Body {
    /// Returns the last statement with the given key.
    fn find(&self, key: &str) -> Option<&Pair>;

    /// Returns every statement with the given key, in order.
    fn find_all(&self, key: &str) -> Vec<&Pair>;

    /// Returns the scalar or expression text of the last `key` statement.
    fn string(&self, key: &str) -> Option<&str> {
        self.find(key).and_then(Pair::as_str)
    }

    /// Returns true when `key: yes` is set.
    fn flag(&self, key: &str) -> bool {
        self.string(key).is_some_and(|v| v == "yes")
    }

    /// Returns scalar list items of `key`; a lone scalar counts as one item.
    fn words(&self, key: &str) -> Vec<String> {
        match self.find(key).map(|p| &p.value) {
            Some(Value::List(items)) => items
                .iter()
                .filter_map(ListItem::as_str)
                .map(String::from)
                .collect(),
            Some(Value::Scalar(s)) => vec![s.as_str().to_string()],
            _ => Vec::new(),
        }
    }
}

impl Body for [Pair] {
    fn find(&self, key: &str) -> Option<&Pair> {
        self.iter().rev().find(|p| p.key == key)
    }

    fn find_all(&self, key: &str) -> Vec<&Pair> {
        self.iter().filter(|p| p.key == key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: Value) -> Pair {
        Pair {
            key: key.to_string(),
            name: None,
            value,
            position: Position::default(),
        }
    }

    #[test]
    fn last_statement_wins() {
        let body = vec![
            pair("type", Value::Scalar(Scalar::Word("string".into()))),
            pair("type", Value::Scalar(Scalar::Word("number".into()))),
        ];
        assert_eq!(body.string("type"), Some("number"));
        assert_eq!(body.find_all("type").len(), 2);
    }

    #[test]
    fn flag_requires_yes() {
        let body = vec![
            pair("hidden", Value::Scalar(Scalar::Word("yes".into()))),
            pair("primary_key", Value::Scalar(Scalar::Word("no".into()))),
        ];
        assert!(body.flag("hidden"));
        assert!(!body.flag("primary_key"));
        assert!(!body.flag("missing"));
    }

    #[test]
    fn words_accept_scalar_or_list() {
        let body = vec![
            pair("extends", Value::Scalar(Scalar::Word("base".into()))),
            pair(
                "timeframes",
                Value::List(vec![
                    ListItem::Scalar {
                        value: Scalar::Word("date".into()),
                        position: Position::default(),
                    },
                    ListItem::Scalar {
                        value: Scalar::Word("week".into()),
                        position: Position::default(),
                    },
                ]),
            ),
        ];
        assert_eq!(body.words("extends"), vec!["base"]);
        assert_eq!(body.words("timeframes"), vec!["date", "week"]);
    }
}

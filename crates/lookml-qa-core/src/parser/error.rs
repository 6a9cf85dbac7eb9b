//! Parse errors with source locations.

use super::syntax::Position;
use miette::{Diagnostic, SourceSpan};

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A character that cannot start any token.
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),

    /// A string literal without its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A SQL/HTML expression without its closing `;;`.
    #[error("expression for `{key}` is missing its closing `;;`")]
    UnterminatedExpression {
        /// The property whose expression is open.
        key: String,
    },

    /// A `{` that is never closed.
    #[error("block is never closed")]
    UnterminatedBlock,

    /// A `[` that is never closed.
    #[error("list is never closed")]
    UnterminatedList,

    /// A closing `}` or `]` with no matching opener.
    #[error("unmatched `{0}`")]
    UnmatchedClosing(char),

    /// A token that does not fit the grammar at this point.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: &'static str,
        /// Description of the token found instead.
        found: String,
    },

    /// Two declarations with the same identifier in one scope.
    #[error("duplicate {kind} `{name}` (first declared on line {first_line})")]
    DuplicateIdentifier {
        /// Declaration kind (`view`, `field`, `join`, ...).
        kind: &'static str,
        /// The repeated identifier.
        name: String,
        /// Line of the first declaration.
        first_line: usize,
    },

    /// Blocks or lists nested deeper than the configured limit.
    #[error("nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep {
        /// The configured depth limit.
        limit: usize,
    },

    /// A property whose value has the wrong shape.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue {
        /// The offending property.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Malformed LookML input.
///
/// Fatal to the requested analysis: no report is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("{kind} at line {line}, column {column}")]
#[diagnostic(code(lookml_qa::parse))]
pub struct ParseError {
    /// The cause.
    pub kind: ParseErrorKind,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    #[label("here")]
    span: SourceSpan,
}

impl ParseError {
    /// Creates an error located at `position`.
    #[must_use]
    pub fn new(kind: ParseErrorKind, position: Position) -> Self {
        Self {
            kind,
            line: position.line,
            column: position.column,
            span: SourceSpan::from((position.offset, 0)),
        }
    }

    /// Returns the byte offset of the error in the source.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location() {
        let err = ParseError::new(ParseErrorKind::UnterminatedBlock, Position::new(14, 2, 7));
        assert_eq!(err.to_string(), "block is never closed at line 2, column 7");
        assert_eq!(err.offset(), 14);
    }

    #[test]
    fn duplicate_message_names_first_line() {
        let err = ParseError::new(
            ParseErrorKind::DuplicateIdentifier {
                kind: "field",
                name: "revenue".into(),
                first_line: 3,
            },
            Position::new(40, 7, 3),
        );
        assert!(err
            .to_string()
            .contains("duplicate field `revenue` (first declared on line 3)"));
    }
}

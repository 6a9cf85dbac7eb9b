//! Recursive-descent parser for LookML source text.
//!
//! # Grammar
//!
//! ```text
//! file      := statement* EOF
//! statement := WORD ':' value ','?
//! value     := (WORD | STRING) '{' statement* '}'
//!            | '{' statement* '}'
//!            | '[' (item ','?)* ']'
//!            | WORD | STRING | EXPR
//! item      := WORD (':' (WORD | STRING))? | STRING | '{' statement* '}'
//! ```

pub mod error;
pub mod lexer;
pub mod syntax;

use error::{ParseError, ParseErrorKind};
use lexer::{Token, TokenKind};
use syntax::{ListItem, Pair, Position, Scalar, Value};

/// Default limit on block/list nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parses LookML text into an untyped syntax tree.
#[derive(Debug, Clone, Copy)]
pub struct Parser {
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Creates a parser with the default nesting limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting depth of blocks and lists.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses `src` into its top-level statements.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on lexical errors, unbalanced braces or
    /// brackets, grammar violations, or nesting beyond the limit.
    pub fn parse(&self, src: &str) -> Result<Vec<Pair>, ParseError> {
        let tokens = lexer::tokenize(src)?;
        let mut stream = TokenStream {
            tokens,
            index: 0,
            depth: 0,
            max_depth: self.max_depth,
        };
        stream.parse_body(None)
    }
}

struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
    max_depth: usize,
}

impl TokenStream {
    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof, and advance() never moves past it.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    fn enter(&mut self, position: Position) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep {
                    limit: self.max_depth,
                },
                position,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn unexpected(token: &Token, expected: &'static str) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected,
                found: token.kind.to_string(),
            },
            token.position,
        )
    }

    /// Parses statements until `}` (inside a block opened at `open`) or EOF.
    fn parse_body(&mut self, open: Option<Position>) -> Result<Vec<Pair>, ParseError> {
        let mut pairs = Vec::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => {
                    return match open {
                        Some(position) => Err(ParseError::new(
                            ParseErrorKind::UnterminatedBlock,
                            position,
                        )),
                        None => Ok(pairs),
                    };
                }
                TokenKind::RBrace if open.is_some() => {
                    self.advance();
                    return Ok(pairs);
                }
                TokenKind::RBrace => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnmatchedClosing('}'),
                        token.position,
                    ))
                }
                TokenKind::RBracket => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnmatchedClosing(']'),
                        token.position,
                    ))
                }
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::Word(_) => pairs.push(self.parse_pair()?),
                _ => return Err(Self::unexpected(&token, "a property name")),
            }
        }
    }

    fn parse_pair(&mut self) -> Result<Pair, ParseError> {
        let key_token = self.advance();
        let TokenKind::Word(key) = key_token.kind else {
            return Err(Self::unexpected(&key_token, "a property name"));
        };

        let colon = self.advance();
        if colon.kind != TokenKind::Colon {
            return Err(Self::unexpected(&colon, "`:`"));
        }

        let value_token = self.advance();
        let (name, value) = match value_token.kind {
            TokenKind::Word(word) | TokenKind::Str(word)
                if self.peek().kind == TokenKind::LBrace =>
            {
                let open = self.advance().position;
                (Some(word), Value::Block(self.parse_block(open)?))
            }
            TokenKind::Word(word) => (None, Value::Scalar(Scalar::Word(word))),
            TokenKind::Str(text) => (None, Value::Scalar(Scalar::Str(text))),
            TokenKind::Expr(text) => (None, Value::Expr(text)),
            TokenKind::LBrace => (None, Value::Block(self.parse_block(value_token.position)?)),
            TokenKind::LBracket => (None, Value::List(self.parse_list(value_token.position)?)),
            _ => return Err(Self::unexpected(&value_token, "a value")),
        };

        Ok(Pair {
            key,
            name,
            value,
            position: key_token.position,
        })
    }

    fn parse_block(&mut self, open: Position) -> Result<Vec<Pair>, ParseError> {
        self.enter(open)?;
        let body = self.parse_body(Some(open))?;
        self.leave();
        Ok(body)
    }

    fn parse_list(&mut self, open: Position) -> Result<Vec<ListItem>, ParseError> {
        self.enter(open)?;
        let mut items = Vec::new();
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::RBracket => break,
                TokenKind::Comma => {}
                TokenKind::Eof => {
                    return Err(ParseError::new(ParseErrorKind::UnterminatedList, open))
                }
                TokenKind::RBrace => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnmatchedClosing('}'),
                        token.position,
                    ))
                }
                TokenKind::Word(word) if self.peek().kind == TokenKind::Colon => {
                    self.advance();
                    let value_token = self.advance();
                    let value = match value_token.kind {
                        TokenKind::Word(v) => Scalar::Word(v),
                        TokenKind::Str(v) => Scalar::Str(v),
                        _ => return Err(Self::unexpected(&value_token, "a list value")),
                    };
                    items.push(ListItem::Pair(Pair {
                        key: word,
                        name: None,
                        value: Value::Scalar(value),
                        position: token.position,
                    }));
                }
                TokenKind::Word(word) => items.push(ListItem::Scalar {
                    value: Scalar::Word(word),
                    position: token.position,
                }),
                TokenKind::Str(text) => items.push(ListItem::Scalar {
                    value: Scalar::Str(text),
                    position: token.position,
                }),
                TokenKind::LBrace => {
                    let body = self.parse_block(token.position)?;
                    items.push(ListItem::Block {
                        body,
                        position: token.position,
                    });
                }
                _ => return Err(Self::unexpected(&token, "a list item")),
            }
        }
        self.leave();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntax::Body;

    fn parse(src: &str) -> Result<Vec<Pair>, ParseError> {
        Parser::new().parse(src)
    }

    #[test]
    fn named_and_anonymous_blocks() {
        let doc = parse(
            r"
view: orders {
  derived_table: {
    sql: SELECT 1 ;;
  }
  dimension: id { type: number }
}
",
        )
        .expect("parse");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].key, "view");
        assert_eq!(doc[0].name.as_deref(), Some("orders"));
        let body = doc[0].as_block().expect("block");
        assert_eq!(
            body.find("derived_table")
                .and_then(Pair::as_block)
                .and_then(|b| b.string("sql")),
            Some("SELECT 1")
        );
        assert_eq!(body.find("dimension").and_then(|p| p.name.as_deref()), Some("id"));
    }

    #[test]
    fn lists_allow_trailing_commas_and_pairs() {
        let doc = parse("sorts: [orders.total: desc, orders.count,]").expect("parse");
        let items = doc[0].as_list().expect("list");
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], ListItem::Pair(p) if p.key == "orders.total"));
        assert_eq!(items[1].as_str(), Some("orders.count"));
    }

    #[test]
    fn list_of_blocks() {
        let doc = parse(r#"elements: [ { name: "a" }, { name: "b" } ]"#).expect("parse");
        let items = doc[0].as_list().expect("list");
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[1], ListItem::Block { body, .. } if body.string("name") == Some("b")));
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let err = parse("model: m { explore: e {").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedBlock);
        assert_eq!((err.line, err.column), (1, 23));
    }

    #[test]
    fn unmatched_closing_brace() {
        let err = parse("view: a { }\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedClosing('}'));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn mismatched_bracket_inside_block() {
        let err = parse("view: a { timeframes: [date }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnmatchedClosing('}'));
    }

    #[test]
    fn unterminated_list() {
        let err = parse("fields: [a, b").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedList);
    }

    #[test]
    fn missing_colon() {
        let err = parse("view orders {}").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { expected: "`:`", .. }
        ));
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let deep = format!("{}{}", "a: {".repeat(10), "}".repeat(10));
        assert!(Parser::new().max_depth(10).parse(&deep).is_ok());
        let err = Parser::new().max_depth(9).parse(&deep).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep { limit: 9 });
    }

    #[test]
    fn pathological_nesting_does_not_overflow() {
        let deep = "a: {".repeat(100_000);
        let err = parse(&deep).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::NestingTooDeep {
                limit: DEFAULT_MAX_DEPTH
            }
        );
    }
}

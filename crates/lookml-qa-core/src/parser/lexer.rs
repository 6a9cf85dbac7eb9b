//! Tokenizer for LookML source text.

use super::error::{ParseError, ParseErrorKind};
use super::syntax::Position;
use std::fmt;

/// Token categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: identifiers, dotted references, numbers, wildcards.
    Word(String),
    /// Quoted string with escapes applied.
    Str(String),
    /// Raw expression text up to `;;`.
    Expr(String),
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => write!(f, "`{w}`"),
            Self::Str(_) => write!(f, "a string"),
            Self::Expr(_) => write!(f, "an expression"),
            Self::Colon => write!(f, "`:`"),
            Self::Comma => write!(f, "`,`"),
            Self::LBrace => write!(f, "`{{`"),
            Self::RBrace => write!(f, "`}}`"),
            Self::LBracket => write!(f, "`[`"),
            Self::RBracket => write!(f, "`]`"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// A token and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token category and payload.
    pub kind: TokenKind,
    /// Start position.
    pub position: Position,
}

/// Returns true for keys whose value is raw text terminated by `;;`.
#[must_use]
pub fn is_expression_key(key: &str) -> bool {
    key == "sql"
        || key == "html"
        || key.starts_with("sql_")
        || key.ends_with("_sql")
        || key.starts_with("expression")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '+' | '-' | '*' | '/' | '%' | '@')
}

/// Splits `src` into tokens. The last token is always [`TokenKind::Eof`].
///
/// # Errors
///
/// Returns a [`ParseError`] for unexpected characters, unterminated strings
/// and expressions missing their `;;` terminator.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn position(&self) -> Position {
        Position::new(self.pos, self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, position: Position) {
        self.tokens.push(Token { kind, position });
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some(c) = self.peek() {
            let start = self.position();
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' => self.skip_comment(),
                ':' => {
                    self.bump();
                    let expression_key = match self.tokens.last() {
                        Some(Token {
                            kind: TokenKind::Word(word),
                            ..
                        }) if is_expression_key(word) => Some(word.clone()),
                        _ => None,
                    };
                    self.push(TokenKind::Colon, start);
                    if let Some(key) = expression_key {
                        self.lex_expression(key, start)?;
                    }
                }
                ',' => {
                    self.bump();
                    self.push(TokenKind::Comma, start);
                }
                '{' => {
                    self.bump();
                    self.push(TokenKind::LBrace, start);
                }
                '}' => {
                    self.bump();
                    self.push(TokenKind::RBrace, start);
                }
                '[' => {
                    self.bump();
                    self.push(TokenKind::LBracket, start);
                }
                ']' => {
                    self.bump();
                    self.push(TokenKind::RBracket, start);
                }
                '"' => self.lex_string(start)?,
                c if is_word_char(c) => self.lex_word(start),
                other => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedChar(other),
                        start,
                    ))
                }
            }
        }

        let end = self.position();
        self.push(TokenKind::Eof, end);
        Ok(self.tokens)
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn lex_word(&mut self, start: Position) {
        while self.peek().is_some_and(is_word_char) {
            self.bump();
        }
        let word = self.src[start.offset..self.pos].to_string();
        self.push(TokenKind::Word(word), start);
    }

    fn lex_string(&mut self, start: Position) -> Result<(), ParseError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnterminatedString,
                        start,
                    ))
                }
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(escaped) => value.push(escaped),
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::UnterminatedString,
                            start,
                        ))
                    }
                },
                Some(c) => value.push(c),
            }
        }
        self.push(TokenKind::Str(value), start);
        Ok(())
    }

    /// Consumes raw text after `key:` up to and including `;;`.
    fn lex_expression(&mut self, key: String, colon: Position) -> Result<(), ParseError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        let start = self.position();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnterminatedExpression { key },
                        colon,
                    ))
                }
                Some(';') if self.peek_second() == Some(';') => {
                    let text = self.src[start.offset..self.pos].trim().to_string();
                    self.bump();
                    self.bump();
                    self.push(TokenKind::Expr(text), start);
                    return Ok(());
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn words_punctuation_and_strings() {
        assert_eq!(
            kinds(r#"view: orders { label: "All \"Orders\"" }"#),
            vec![
                TokenKind::Word("view".into()),
                TokenKind::Colon,
                TokenKind::Word("orders".into()),
                TokenKind::LBrace,
                TokenKind::Word("label".into()),
                TokenKind::Colon,
                TokenKind::Str("All \"Orders\"".into()),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn sql_values_are_raw_until_double_semicolon() {
        let tokens = kinds("sql: ${TABLE}.id + 1 ;; type: number");
        assert_eq!(tokens[2], TokenKind::Expr("${TABLE}.id + 1".into()));
        assert_eq!(tokens[3], TokenKind::Word("type".into()));
    }

    #[test]
    fn sql_prefixed_keys_are_expressions() {
        let tokens = kinds("sql_on: ${a.id} = ${b.a_id} ;;");
        assert_eq!(tokens[2], TokenKind::Expr("${a.id} = ${b.a_id}".into()));
        assert!(is_expression_key("sql_table_name"));
        assert!(is_expression_key("html"));
        assert!(!is_expression_key("type"));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("# header\nlimit: 10 # trailing"),
            vec![
                TokenKind::Word("limit".into()),
                TokenKind::Colon,
                TokenKind::Word("10".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = tokenize("a: b\n  c: d").expect("tokenize");
        assert_eq!(tokens[3].position, Position::new(7, 2, 3));
    }

    #[test]
    fn unterminated_string_points_at_opening_quote() {
        let err = tokenize("label: \"oops").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!((err.line, err.column), (1, 8));
    }

    #[test]
    fn unterminated_expression_is_rejected() {
        let err = tokenize("sql: select 1").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnterminatedExpression { key: "sql".into() }
        );
    }

    #[test]
    fn stray_character_is_rejected() {
        let err = tokenize("type = number").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('='));
    }
}

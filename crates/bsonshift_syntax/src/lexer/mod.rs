//! Lexer for the bsonshift source dialects.
//!
//! Handles tokenization including:
//! - Keywords and identifiers (per [`SyntaxFamily`]: `new`/`typeof` are JavaScript-only, `None`/`not` Python-only)
//! - Numeric literals, classified by lexical form (integer, decimal, hex, octal) with their source text kept
//! - String literals (single, double and Python triple quotes, Python `r` prefix)
//! - JavaScript regex literals, told apart from division by the previous token
//! - Comments (`//` and `/* */` for JavaScript, `#` for Python)
//!
//! Newlines are plain whitespace in both families: one source text is one expression (or a `;`-separated run of
//! them), never an indentation-structured block.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - String and regex literal scanning
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::SyntaxError;
use bsonshift_core::lang::operators::OperatorId;
use bsonshift_core::lang::punctuation::{self, PunctuationId};
use bsonshift_core::lang::registry::SyntaxFamily;

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lexer for one source text in one syntax family.
pub struct Lexer<'a> {
    source: &'a str,
    family: SyntaxFamily,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// Open brackets, for mismatch reporting.
    brackets: Vec<PunctuationId>,
    tokens: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, family: SyntaxFamily) -> Self {
        Self {
            source,
            family,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            brackets: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source text.
    ///
    /// The token stream always ends with an `Eof` token.
    ///
    /// ## Errors
    /// Returns every lexical error found; scanning continues past an error.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        if let Some(open) = self.brackets.last() {
            self.errors.push(SyntaxError::new(
                format!("Unclosed '{}'", punctuation::as_str(*open)),
                Span::new(self.current_pos, self.current_pos),
            ));
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(self.current_pos, self.current_pos)));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(SyntaxError::new(message, Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            ' ' | '\t' | '\n' | '\r' | '\u{feff}' | '\u{a0}' => {}

            '#' if self.family == SyntaxFamily::Python => self.skip_line_comment(),
            '/' if self.family == SyntaxFamily::JavaScript && self.peek() == Some('/') => self.skip_line_comment(),
            '/' if self.family == SyntaxFamily::JavaScript && self.peek() == Some('*') => {
                self.skip_block_comment(start)
            }
            '/' if self.family == SyntaxFamily::JavaScript && self.regex_allowed() => self.scan_regex(start),

            // Operators
            '+' => self.add_op(OperatorId::Plus, start),
            '-' => self.add_op(OperatorId::Minus, start),
            '*' => self.operator(start, OperatorId::Star, &[('*', OperatorId::StarStar)]),
            '/' => self.add_op(OperatorId::Slash, start),
            '%' => self.add_op(OperatorId::Percent, start),
            '=' => {
                if self.match_char('=') {
                    if self.family == SyntaxFamily::JavaScript && self.match_char('=') {
                        self.add_op(OperatorId::EqEqEq, start);
                    } else {
                        self.add_op(OperatorId::EqEq, start);
                    }
                } else {
                    self.add_op(OperatorId::Eq, start);
                }
            }
            '!' => {
                if self.match_char('=') {
                    if self.family == SyntaxFamily::JavaScript && self.match_char('=') {
                        self.add_op(OperatorId::NotEqEq, start);
                    } else {
                        self.add_op(OperatorId::NotEq, start);
                    }
                } else if self.family == SyntaxFamily::JavaScript {
                    self.add_op(OperatorId::Bang, start);
                } else {
                    self.error("Unexpected character '!'", start);
                }
            }
            '<' => self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq)]),
            '>' => self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]),
            '&' if self.family == SyntaxFamily::JavaScript && self.match_char('&') => {
                self.add_op(OperatorId::AndAnd, start)
            }
            '|' if self.family == SyntaxFamily::JavaScript && self.match_char('|') => {
                self.add_op(OperatorId::OrOr, start)
            }

            // Punctuation
            ',' => self.add_punct(PunctuationId::Comma, start),
            ':' => self.add_punct(PunctuationId::Colon, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            '?' => self.add_punct(PunctuationId::Question, start),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start, c),
            '.' => self.add_punct(PunctuationId::Dot, start),
            '(' => self.open_bracket(PunctuationId::LParen, start),
            ')' => self.close_bracket(PunctuationId::RParen, start),
            '[' => self.open_bracket(PunctuationId::LBracket, start),
            ']' => self.close_bracket(PunctuationId::RBracket, start),
            '{' => self.open_bracket(PunctuationId::LBrace, start),
            '}' => self.close_bracket(PunctuationId::RBrace, start),

            // Strings
            '"' | '\'' => self.scan_string(start, c, false),
            'r' | 'R' if self.family == SyntaxFamily::Python && matches!(self.peek(), Some('"' | '\'')) => {
                if let Some(quote) = self.advance() {
                    self.scan_string(start, quote, true);
                }
            }

            // Numbers
            '0'..='9' => self.scan_number(start, c),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => self.error(format!("Unexpected character '{c}'"), start),
        }
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self, start: usize) {
        self.advance();
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return;
                }
                Some(_) => {}
                None => {
                    self.error("Unterminated comment", start);
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Operator helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match compound operator, fallback to simple.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    fn open_bracket(&mut self, kind: PunctuationId, start: usize) {
        self.brackets.push(kind);
        self.add_punct(kind, start);
    }

    fn close_bracket(&mut self, kind: PunctuationId, start: usize) {
        match self.brackets.pop() {
            Some(open) if punctuation::closing(open) == Some(kind) => {}
            Some(open) => {
                self.error(
                    format!(
                        "Mismatched closing bracket: expected '{}', found '{}'",
                        punctuation::closing(open).map(punctuation::as_str).unwrap_or("?"),
                        punctuation::as_str(kind)
                    ),
                    start,
                );
            }
            None => self.error("Unmatched closing bracket", start),
        }
        self.add_punct(kind, start);
    }

    /// A `/` starts a regex unless the previous token ends an operand.
    fn regex_allowed(&self) -> bool {
        self.tokens.last().is_none_or(|t| !t.kind.ends_operand())
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling, self.family) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tokenize `source` in `family`.
///
/// ## Errors
/// Returns every lexical error; positions are byte spans (see [`SyntaxError::locate`]).
#[tracing::instrument(skip_all, fields(source_len = source.len(), family = ?family))]
pub fn lex(source: &str, family: SyntaxFamily) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source, family).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NumberKind;
    use bsonshift_core::lang::keywords::KeywordId;

    fn kinds(source: &str, family: SyntaxFamily) -> Vec<TokenKind> {
        lex(source, family)
            .expect("lex failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn js(source: &str) -> Vec<TokenKind> {
        kinds(source, SyntaxFamily::JavaScript)
    }

    fn number(kind: NumberKind, text: &str) -> TokenKind {
        TokenKind::Number {
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_numbers_keep_text_and_class() {
        assert_eq!(
            js("1 10.01 0x6 0o5 05 1e3 .5"),
            vec![
                number(NumberKind::Integer, "1"),
                number(NumberKind::Decimal, "10.01"),
                number(NumberKind::Hex, "0x6"),
                number(NumberKind::Octal, "0o5"),
                number(NumberKind::Octal, "05"),
                number(NumberKind::Decimal, "1e3"),
                number(NumberKind::Decimal, ".5"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_regex_versus_division() {
        assert_eq!(
            js("a / b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Operator(OperatorId::Slash),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            js("x(/a[/]b/gi)"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Punctuation(PunctuationId::LParen),
                TokenKind::Regex {
                    pattern: "a[/]b".into(),
                    flags: "gi".into()
                },
                TokenKind::Punctuation(PunctuationId::RParen),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strict_equality_is_javascript_only() {
        assert_eq!(js("a === b")[1], TokenKind::Operator(OperatorId::EqEqEq));
        assert_eq!(
            kinds("a == b", SyntaxFamily::Python)[1],
            TokenKind::Operator(OperatorId::EqEq)
        );
    }

    #[test]
    fn test_family_keywords() {
        assert_eq!(js("new")[0], TokenKind::Keyword(KeywordId::New));
        assert_eq!(kinds("new", SyntaxFamily::Python)[0], TokenKind::Ident("new".into()));
        assert_eq!(kinds("None", SyntaxFamily::Python)[0], TokenKind::Keyword(KeywordId::None));
        assert_eq!(kinds("True", SyntaxFamily::Python)[0], TokenKind::Keyword(KeywordId::True));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(js("1 // one\n/* two */ 2").len(), 3);
        assert_eq!(kinds("1 # one\n", SyntaxFamily::Python).len(), 2);
    }

    #[test]
    fn test_mismatched_bracket_is_reported() {
        let errs = lex("(]", SyntaxFamily::JavaScript).unwrap_err();
        assert!(errs[0].message.contains("Mismatched closing bracket"));
        let errs = lex("{", SyntaxFamily::JavaScript).unwrap_err();
        assert_eq!(errs[0].message, "Unclosed '{'");
    }

    #[test]
    fn test_single_ampersand_is_rejected() {
        let errs = lex("a & b", SyntaxFamily::JavaScript).unwrap_err();
        assert_eq!(errs[0].message, "Unexpected character '&'");
    }
}

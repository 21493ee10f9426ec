//! String and regex literal scanning.

use super::{Lexer, TokenKind};
use bsonshift_core::lang::registry::SyntaxFamily;
use bsonshift_core::strings::unescape;

impl<'a> Lexer<'a> {
    /// Scan a string literal whose opening quote was already consumed.
    ///
    /// Python triple-quoted strings may span lines; every other form ends at a newline with an error.
    pub(super) fn scan_string(&mut self, start: usize, quote: char, raw: bool) {
        let triple = self.family == SyntaxFamily::Python && self.peek() == Some(quote) && self.peek_next() == Some(quote);
        if triple {
            self.advance();
            self.advance();
        }
        let body_start = self.current_pos;

        loop {
            let Some(c) = self.advance() else {
                self.error("Unterminated string literal", start);
                return;
            };
            match c {
                '\\' => {
                    self.advance();
                }
                '\n' if !triple => {
                    self.error("Unterminated string literal", start);
                    return;
                }
                _ if c == quote => {
                    if !triple {
                        break;
                    }
                    if self.peek() == Some(quote) && self.peek_next() == Some(quote) {
                        self.advance();
                        self.advance();
                        break;
                    }
                }
                _ => {}
            }
        }

        let close_len = if triple { 3 } else { 1 };
        let body = &self.source[body_start..self.current_pos - close_len];
        let value = if raw { body.to_string() } else { unescape(body) };
        self.add_token(TokenKind::String(value), start);
    }

    /// Scan a regex literal whose opening `/` was already consumed.
    ///
    /// A `/` inside a character class does not close the literal.
    pub(super) fn scan_regex(&mut self, start: usize) {
        let body_start = self.current_pos;
        let mut in_class = false;

        loop {
            let Some(c) = self.advance() else {
                self.error("Unterminated regular expression literal", start);
                return;
            };
            match c {
                '\\' => {
                    if matches!(self.advance(), None | Some('\n')) {
                        self.error("Unterminated regular expression literal", start);
                        return;
                    }
                }
                '\n' => {
                    self.error("Unterminated regular expression literal", start);
                    return;
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }

        let pattern = self.source[body_start..self.current_pos - 1].to_string();
        let flags_start = self.current_pos;
        while self.peek().is_some_and(super::is_ident_continue) {
            self.advance();
        }
        let flags = self.source[flags_start..self.current_pos].to_string();
        self.add_token(TokenKind::Regex { pattern, flags }, start);
    }
}

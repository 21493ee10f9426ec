//! Numeric literal scanning.
//!
//! The token keeps the literal's source text; only its lexical class is decided here. Legacy `017` octal is a
//! JavaScript form: in Python a leading zero is just an integer spelling.

use super::{Lexer, TokenKind};
use crate::ast::NumberKind;
use bsonshift_core::lang::registry::SyntaxFamily;

impl<'a> Lexer<'a> {
    /// Scan a numeric literal whose first character (`0-9` or `.`) was already consumed.
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        let kind = if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            self.scan_radix_digits(start, |c| c.is_ascii_hexdigit(), "hexadecimal");
            NumberKind::Hex
        } else if first == '0' && matches!(self.peek(), Some('o' | 'O')) {
            self.advance();
            self.scan_radix_digits(start, |c| ('0'..='7').contains(&c), "octal");
            NumberKind::Octal
        } else if first == '0' && matches!(self.peek(), Some('b' | 'B')) {
            self.advance();
            self.scan_radix_digits(start, |c| c == '0' || c == '1', "binary");
            NumberKind::Integer
        } else {
            self.scan_decimal(start, first)
        };

        if self.peek().is_some_and(super::is_ident_start) {
            self.advance();
            self.error("Invalid numeric literal", start);
            return;
        }

        let text = self.source[start..self.current_pos].to_string();
        self.add_token(TokenKind::Number { kind, text }, start);
    }

    fn scan_radix_digits(&mut self, start: usize, is_digit: impl Fn(char) -> bool, name: &str) {
        let mut count = 0;
        while self.peek().is_some_and(&is_digit) {
            self.advance();
            count += 1;
        }
        if count == 0 {
            self.error(format!("Invalid {name} literal"), start);
        }
    }

    fn scan_decimal(&mut self, start: usize, first: char) -> NumberKind {
        let mut decimal = first == '.';
        self.skip_digits();

        if !decimal && self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.skip_digits();
            decimal = true;
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_next(), Some('+' | '-'));
            let mut lookahead = self.source[self.current_pos..].chars().skip(if signed { 2 } else { 1 });
            if lookahead.next().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
                if signed {
                    self.advance();
                }
                self.skip_digits();
                decimal = true;
            }
        }

        if decimal {
            return NumberKind::Decimal;
        }

        let text = &self.source[start..self.current_pos];
        if self.family == SyntaxFamily::JavaScript
            && text.len() > 1
            && text.starts_with('0')
            && text.chars().all(|c| ('0'..='7').contains(&c))
        {
            NumberKind::Octal
        } else {
            NumberKind::Integer
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::NumberKind;
    use crate::lexer::{TokenKind, lex};
    use bsonshift_core::lang::registry::SyntaxFamily;

    fn first(source: &str, family: SyntaxFamily) -> TokenKind {
        lex(source, family).expect("lex failed").remove(0).kind
    }

    #[test]
    fn test_python_leading_zero_is_integer() {
        assert_eq!(
            first("017", SyntaxFamily::Python),
            TokenKind::Number {
                kind: NumberKind::Integer,
                text: "017".into()
            }
        );
    }

    #[test]
    fn test_legacy_octal_with_eight_is_integer() {
        assert_eq!(
            first("018", SyntaxFamily::JavaScript),
            TokenKind::Number {
                kind: NumberKind::Integer,
                text: "018".into()
            }
        );
    }

    #[test]
    fn test_exponent_forms() {
        for text in ["1e10", "1E-3", "2.5e+2"] {
            assert_eq!(
                first(text, SyntaxFamily::JavaScript),
                TokenKind::Number {
                    kind: NumberKind::Decimal,
                    text: text.into()
                }
            );
        }
    }

    #[test]
    fn test_bad_literals() {
        assert!(lex("0x", SyntaxFamily::JavaScript).is_err());
        assert!(lex("12abc", SyntaxFamily::JavaScript).is_err());
    }

    #[test]
    fn test_member_call_on_integer_splits_at_dot() {
        let tokens = lex("1.toString", SyntaxFamily::JavaScript).expect("lex failed");
        assert_eq!(tokens.len(), 4);
    }
}

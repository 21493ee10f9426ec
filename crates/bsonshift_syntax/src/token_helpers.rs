//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These keep `matches!(...)` noise out of the parser and the lexer's regex-context check.

use crate::lexer::{Token, TokenKind};
use bsonshift_core::lang::keywords::KeywordId;
use bsonshift_core::lang::operators::OperatorId;
use bsonshift_core::lang::punctuation::PunctuationId;

impl TokenKind {
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` if this token can end an operand.
    ///
    /// A `/` after such a token is division; anywhere else it starts a regex literal.
    pub fn ends_operand(&self) -> bool {
        match self {
            TokenKind::Ident(_) | TokenKind::Number { .. } | TokenKind::String(_) | TokenKind::Regex { .. } => true,
            TokenKind::Punctuation(p) => matches!(
                p,
                PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace
            ),
            TokenKind::Keyword(k) => matches!(
                k,
                KeywordId::This
                    | KeywordId::Null
                    | KeywordId::Undefined
                    | KeywordId::True
                    | KeywordId::False
                    | KeywordId::None
            ),
            TokenKind::Operator(_) | TokenKind::Eof => false,
        }
    }
}

impl Token {
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind.is_keyword(id)
    }

    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    pub fn is_operator(&self, id: OperatorId) -> bool {
        self.kind.is_operator(id)
    }

    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        self.kind.is_punctuation(id)
    }
}

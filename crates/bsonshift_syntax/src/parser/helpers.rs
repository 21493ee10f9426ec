/// Token-stream helpers.
///
/// Peeking/consuming tokens, matching keywords, operators and punctuation, and building "expected X, found Y"
/// errors.
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// The token consumed most recently (or the first token before any is consumed).
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().is_keyword(id)
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().is_punctuation(id)
    }

    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the first operator in `ids` that matches the current token.
    fn match_any_op(&mut self, ids: &[OperatorId]) -> Option<OperatorId> {
        let found = ids.iter().copied().find(|id| self.check_op(*id))?;
        self.advance();
        Some(found)
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<Span, SyntaxError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// Consume an identifier, or any keyword spelled like one (property names may be reserved words).
    fn expect_name(&mut self, msg: &str) -> Result<(String, Span), SyntaxError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name.clone(), token.span))
            }
            TokenKind::Keyword(id) => {
                self.advance();
                Ok((keywords::as_str(*id).to_string(), token.span))
            }
            _ => Err(self.unexpected(msg)),
        }
    }

    /// Build an error for the current token.
    fn unexpected(&self, msg: &str) -> SyntaxError {
        let token = self.peek();
        SyntaxError::new(format!("{}, found {}", msg, describe(&token.kind)), token.span)
    }

    /// Skip a balanced bracket group starting at the current opening bracket; return the closing bracket's span.
    fn skip_balanced(&mut self, open: PunctuationId, msg: &str) -> Result<Span, SyntaxError> {
        let close = punctuation::closing(open).ok_or_else(|| self.unexpected(msg))?;
        self.expect_punct(open, msg)?;
        let mut depth = 1usize;
        while depth > 0 {
            if self.is_at_end() {
                return Err(self.unexpected(&format!("Expected '{}'", punctuation::as_str(close))));
            }
            let token = self.advance();
            if token.is_punctuation(open) {
                depth += 1;
            } else if token.is_punctuation(close) {
                depth -= 1;
            }
        }
        Ok(self.previous().span)
    }
}

/// Human-readable token description for error messages.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Keyword(id) => format!("keyword '{}'", keywords::as_str(*id)),
        TokenKind::Operator(id) => format!("'{}'", operators::as_str(*id)),
        TokenKind::Punctuation(id) => format!("'{}'", punctuation::as_str(*id)),
        TokenKind::Ident(name) => format!("identifier '{name}'"),
        TokenKind::Number { text, .. } => format!("number {text}"),
        TokenKind::String(_) => "string literal".to_string(),
        TokenKind::Regex { .. } => "regular expression".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}

/// Primary expressions: literals, identifiers, brackets, functions.
impl<'a> Parser<'a> {
    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.peek().clone();
        let literal = match &token.kind {
            TokenKind::Number { kind, text } => Some(Literal::Number {
                kind: *kind,
                text: text.clone(),
            }),
            TokenKind::String(value) => Some(Literal::String(value.clone())),
            TokenKind::Regex { pattern, flags } => Some(Literal::Regex {
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            TokenKind::Keyword(KeywordId::Null | KeywordId::None) => Some(Literal::Null),
            TokenKind::Keyword(KeywordId::Undefined) => Some(Literal::Undefined),
            TokenKind::Keyword(KeywordId::True) => Some(Literal::Bool(true)),
            TokenKind::Keyword(KeywordId::False) => Some(Literal::Bool(false)),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(self.node(ExprKind::Literal(literal), token.span));
        }

        match &token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(self.node(ExprKind::Identifier(name.clone()), token.span))
            }
            TokenKind::Keyword(KeywordId::This) => {
                self.advance();
                Ok(self.node(ExprKind::This, token.span))
            }
            TokenKind::Keyword(KeywordId::Function) => self.function(),
            TokenKind::Keyword(KeywordId::Lambda) => self.lambda(),
            TokenKind::Punctuation(PunctuationId::LParen) => self.parenthesized(),
            TokenKind::Punctuation(PunctuationId::LBracket) => self.array(),
            TokenKind::Punctuation(PunctuationId::LBrace) => self.object(),
            _ => Err(self.unexpected("Expected expression")),
        }
    }

    // ========================================================================
    // Brackets
    // ========================================================================

    /// `(expr)`, or a Python tuple: `()`, `(a,)`, `(a, b)`.
    fn parenthesized(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        if self.is_python() && self.check_punct(PunctuationId::RParen) {
            let close = self.advance().span;
            return Ok(self.node(ExprKind::Array(Vec::new()), start.merge(close)));
        }
        let first = self.expression()?;
        if self.is_python() && self.match_punct(PunctuationId::Comma) {
            let mut items = vec![Some(first)];
            while !self.check_punct(PunctuationId::RParen) {
                items.push(Some(self.expression()?));
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            let close = self.expect_punct(PunctuationId::RParen, "Expected ')' after tuple")?;
            return Ok(self.node(ExprKind::Array(items), start.merge(close)));
        }
        let close = self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
        Ok(self.node(ExprKind::Paren(Box::new(first)), start.merge(close)))
    }

    /// `[a, b]`; JavaScript also allows elisions (`[a, , b]`). A single trailing comma adds nothing.
    fn array(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        let mut items = Vec::new();
        loop {
            if self.check_punct(PunctuationId::RBracket) {
                break;
            }
            if self.check_punct(PunctuationId::Comma) {
                if self.is_python() {
                    return Err(self.unexpected("Expected list element"));
                }
                self.advance();
                items.push(None);
                continue;
            }
            items.push(Some(self.assignment()?));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        let close = self.expect_punct(PunctuationId::RBracket, "Expected ']' after array elements")?;
        Ok(self.node(ExprKind::Array(items), start.merge(close)))
    }

    /// `{key: value, ...}`; Python dict keys are arbitrary expressions.
    fn object(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        let mut properties = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            let (key, key_span) = self.property_key()?;
            self.expect_punct(PunctuationId::Colon, "Expected ':' after property name")?;
            let value = self.assignment()?;
            properties.push(Property { key, key_span, value });
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        let close = self.expect_punct(PunctuationId::RBrace, "Expected '}' after properties")?;
        Ok(self.node(ExprKind::Object(properties), start.merge(close)))
    }

    fn property_key(&mut self) -> Result<(PropertyKey, Span), SyntaxError> {
        let token = self.peek().clone();
        if self.is_python() {
            let key = self.ternary()?;
            let span = key.span;
            let key = match key.kind {
                ExprKind::Literal(Literal::String(value)) => PropertyKey::String(value),
                ExprKind::Literal(Literal::Number { text, .. }) => PropertyKey::Number(text),
                _ => PropertyKey::Computed(Box::new(key)),
            };
            return Ok((key, span));
        }
        match &token.kind {
            TokenKind::String(value) => {
                self.advance();
                Ok((PropertyKey::String(value.clone()), token.span))
            }
            TokenKind::Number { text, .. } => {
                self.advance();
                Ok((PropertyKey::Number(text.clone()), token.span))
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                let key = self.assignment()?;
                let close = self.expect_punct(PunctuationId::RBracket, "Expected ']' after computed key")?;
                Ok((PropertyKey::Computed(Box::new(key)), token.span.merge(close)))
            }
            _ => {
                let (name, span) = self.expect_name("Expected property name")?;
                Ok((PropertyKey::Identifier(name), span))
            }
        }
    }

    // ========================================================================
    // Functions (kept as raw source)
    // ========================================================================

    /// `function name? (params) { body }`; only the extent is recorded.
    fn function(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        if matches!(self.peek().kind, TokenKind::Ident(_)) {
            self.advance();
        }
        self.skip_balanced(PunctuationId::LParen, "Expected '(' after 'function'")?;
        let close = self.skip_balanced(PunctuationId::LBrace, "Expected '{' before function body")?;
        Ok(self.node(ExprKind::Function, start.merge(close)))
    }

    /// `lambda params: expr`; only the extent is recorded.
    fn lambda(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        while !self.check_punct(PunctuationId::Colon) {
            if self.is_at_end() {
                return Err(self.unexpected("Expected ':' in lambda"));
            }
            self.advance();
        }
        self.advance();
        let body = self.ternary()?;
        Ok(self.node(ExprKind::Lambda, start.merge(body.span)))
    }
}

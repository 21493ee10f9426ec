/// Expression parsing (precedence climbing).
///
/// Lowest to highest: assignment, ternary, `||`/`or`, `&&`/`and`, equality, relational (`<`, `in`, `instanceof`,
/// `is`), additive, multiplicative, unary, `**`, postfix (member, index, call), primary.
impl<'a> Parser<'a> {
    // ========================================================================
    // Binary levels
    // ========================================================================

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.assignment()
    }

    /// Every bracketed or argument position parses through here, so this is where nesting is counted.
    fn assignment(&mut self) -> Result<Expr, SyntaxError> {
        self.nested(|p| {
            let target = p.ternary()?;
            if p.match_op(OperatorId::Eq) {
                let value = p.assignment()?;
                let span = target.span.merge(value.span);
                return Ok(p.node(
                    ExprKind::Assign {
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    span,
                ));
            }
            Ok(target)
        })
    }

    fn ternary(&mut self) -> Result<Expr, SyntaxError> {
        let cond = self.logical_or()?;
        if !self.is_python() && self.match_punct(PunctuationId::Question) {
            let then = self.assignment()?;
            self.expect_punct(PunctuationId::Colon, "Expected ':' in conditional expression")?;
            let otherwise = self.assignment()?;
            let span = cond.span.merge(otherwise.span);
            return Ok(self.node(
                ExprKind::Ternary {
                    cond: Box::new(cond),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                },
                span,
            ));
        }
        Ok(cond)
    }

    fn logical_or(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut lhs = self.logical_and()?;
        while self.match_op(OperatorId::OrOr) || self.match_keyword(KeywordId::Or) {
            self.descend()?;
            let rhs = self.logical_and()?;
            lhs = self.binary(BinaryOp::Or, lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn logical_and(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut lhs = self.equality()?;
        while self.match_op(OperatorId::AndAnd) || self.match_keyword(KeywordId::And) {
            self.descend()?;
            let rhs = self.equality()?;
            lhs = self.binary(BinaryOp::And, lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut lhs = self.relational()?;
        while let Some(op) = self.match_any_op(&[
            OperatorId::EqEqEq,
            OperatorId::NotEqEq,
            OperatorId::EqEq,
            OperatorId::NotEq,
        ]) {
            self.descend()?;
            let rhs = self.relational()?;
            let span = lhs.span.merge(rhs.span);
            lhs = self.node(
                ExprKind::Equality {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn relational(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut lhs = self.additive()?;
        loop {
            let op = if let Some(op) =
                self.match_any_op(&[OperatorId::LtEq, OperatorId::GtEq, OperatorId::Lt, OperatorId::Gt])
            {
                BinaryOp::Relational(op)
            } else if self.match_keyword(KeywordId::In) {
                BinaryOp::In
            } else if self.match_keyword(KeywordId::Instanceof) {
                BinaryOp::Instanceof
            } else if self.match_keyword(KeywordId::Is) {
                BinaryOp::Is
            } else {
                break;
            };
            self.descend()?;
            let rhs = self.additive()?;
            lhs = self.binary(op, lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut lhs = self.multiplicative()?;
        while let Some(op) = self.match_any_op(&[OperatorId::Plus, OperatorId::Minus]) {
            self.descend()?;
            let rhs = self.multiplicative()?;
            lhs = self.binary(BinaryOp::Arithmetic(op), lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let depth = self.depth;
        let mut lhs = self.unary()?;
        while let Some(op) = self.match_any_op(&[OperatorId::Star, OperatorId::Slash, OperatorId::Percent]) {
            self.descend()?;
            let rhs = self.unary()?;
            lhs = self.binary(BinaryOp::Arithmetic(op), lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        let span = lhs.span.merge(rhs.span);
        self.node(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        )
    }

    // ========================================================================
    // Unary and power
    // ========================================================================

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.peek().span;
        let op = if self.match_op(OperatorId::Minus) {
            Some(UnaryOp::Minus)
        } else if self.match_op(OperatorId::Plus) {
            Some(UnaryOp::Plus)
        } else if self.match_op(OperatorId::Bang) || self.match_keyword(KeywordId::Not) {
            Some(UnaryOp::Not)
        } else if self.match_keyword(KeywordId::Typeof) {
            Some(UnaryOp::Typeof)
        } else if self.match_keyword(KeywordId::Void) {
            Some(UnaryOp::Void)
        } else if self.match_keyword(KeywordId::Delete) {
            Some(UnaryOp::Delete)
        } else {
            None
        };

        match op {
            Some(op) => {
                let operand = self.nested(Self::unary)?;
                let span = start.merge(operand.span);
                Ok(self.node(
                    ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    span,
                ))
            }
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.postfix()?;
        if self.match_op(OperatorId::StarStar) {
            let exponent = self.nested(Self::unary)?;
            return Ok(self.binary(BinaryOp::Arithmetic(OperatorId::StarStar), base, exponent));
        }
        Ok(base)
    }

    // ========================================================================
    // Postfix: member access, indexing, calls
    // ========================================================================

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = if self.check_keyword(KeywordId::New) {
            self.new_expression()?
        } else {
            self.primary()?
        };

        let depth = self.depth;
        loop {
            if self.check_punct(PunctuationId::LParen) {
                self.descend()?;
                expr = self.finish_call(expr)?;
            } else if self.at_member_suffix() {
                self.descend()?;
                expr = self.member_suffix(expr)?;
            } else {
                break;
            }
        }
        self.depth = depth;
        Ok(expr)
    }

    fn at_member_suffix(&self) -> bool {
        self.check_punct(PunctuationId::Dot) || self.check_punct(PunctuationId::LBracket)
    }

    /// Parse one `.name` or `[index]` suffix onto `object`.
    fn member_suffix(&mut self, object: Expr) -> Result<Expr, SyntaxError> {
        if self.match_punct(PunctuationId::Dot) {
            let (property, property_span) = self.expect_name("Expected property name after '.'")?;
            let span = object.span.merge(property_span);
            return Ok(self.node(
                ExprKind::Member {
                    object: Box::new(object),
                    property,
                    property_span,
                },
                span,
            ));
        }
        self.expect_punct(PunctuationId::LBracket, "Expected '[' or '.'")?;
        let index = self.expression()?;
        let close = self.expect_punct(PunctuationId::RBracket, "Expected ']' after index")?;
        let span = object.span.merge(close);
        Ok(self.node(
            ExprKind::Index {
                object: Box::new(object),
                index: Box::new(index),
            },
            span,
        ))
    }

    /// `new Target` / `new Target(args)`: the target takes member suffixes but at most one argument list.
    fn new_expression(&mut self) -> Result<Expr, SyntaxError> {
        let start = self.advance().span;
        let depth = self.depth;
        let mut target = if self.check_keyword(KeywordId::New) {
            self.nested(Self::new_expression)?
        } else {
            self.primary()?
        };
        while self.at_member_suffix() {
            self.descend()?;
            target = self.member_suffix(target)?;
        }
        self.depth = depth;
        if self.check_punct(PunctuationId::LParen) {
            target = self.finish_call(target)?;
        }
        let span = start.merge(target.span);
        Ok(self.node(ExprKind::New(Box::new(target)), span))
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, SyntaxError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        let mut args = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            args.push(self.argument()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        let close = self.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
        let span = callee.span.merge(close);
        Ok(self.node(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    fn argument(&mut self) -> Result<Argument, SyntaxError> {
        if self.is_python()
            && matches!(self.peek().kind, TokenKind::Ident(_))
            && self.peek_next().is_operator(OperatorId::Eq)
        {
            let (name, start) = self.expect_name("Expected keyword argument name")?;
            self.advance();
            let value = self.ternary()?;
            let span = start.merge(value.span);
            return Ok(Argument::Keyword { name, value, span });
        }
        Ok(Argument::Positional(self.assignment()?))
    }
}

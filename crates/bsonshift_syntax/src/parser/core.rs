/// Parser core types and entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser`.
/// - The parser stops at the first error: a transpiler input is one short expression, so a cascade of follow-on
///   errors would only bury the real one.
/// - Nesting (brackets, calls, prefix operators, operator and member chains) is capped at [`MAX_NESTING`] levels, so
///   hostile input fails with a syntax error instead of exhausting the stack here or in a later tree walk.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    family: SyntaxFamily,
    next_id: u32,
    depth: usize,
}

/// Deepest nesting the parser accepts. BSON documents themselves stop at 100 levels.
pub const MAX_NESTING: usize = 100;

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `bsonshift_syntax::lexer` for the same `family`.
    pub fn new(tokens: &'a [Token], family: SyntaxFamily) -> Self {
        Self {
            tokens,
            pos: 0,
            family,
            next_id: 0,
            depth: 0,
        }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// Statements are separated by `;`; empty statements are skipped.
    ///
    /// ## Errors
    /// Returns the first [`SyntaxError`] encountered, or an error if the input holds no expression at all.
    pub fn parse(mut self) -> Result<Program, Vec<SyntaxError>> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if self.match_punct(PunctuationId::Semicolon) {
                continue;
            }
            let expr = self.expression().map_err(|e| vec![e])?;
            statements.push(expr);
            if !self.is_at_end() && !self.check_punct(PunctuationId::Semicolon) {
                return Err(vec![self.unexpected("Expected ';' or end of input")]);
            }
        }

        if statements.is_empty() {
            return Err(vec![SyntaxError::new("Expected an expression", self.peek().span)]);
        }

        Ok(Program {
            statements,
            node_count: self.next_id,
        })
    }

    /// Allocate a node with a fresh id.
    fn node(&mut self, kind: ExprKind, span: Span) -> Expr {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Expr { id, span, kind }
    }

    /// Count one more level of nesting.
    ///
    /// ## Errors
    /// Fails once the input nests deeper than [`MAX_NESTING`].
    fn descend(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::new(
                format!("Expression nested deeper than {MAX_NESTING} levels"),
                self.peek().span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one nesting level down.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>) -> Result<T, SyntaxError> {
        self.descend()?;
        let parsed = parse(self);
        self.depth -= 1;
        parsed
    }

    fn is_python(&self) -> bool {
        self.family == SyntaxFamily::Python
    }
}

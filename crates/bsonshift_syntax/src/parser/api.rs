/// Parse a token stream into a [`Program`].
///
/// ## Parameters
/// - `tokens`: Token stream produced by `bsonshift_syntax::lexer` for the same `family`.
///
/// ## Errors
/// Returns `Err(Vec<SyntaxError>)` if parsing fails.
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), family = ?family))]
pub fn parse(tokens: &[Token], family: SyntaxFamily) -> Result<Program, Vec<SyntaxError>> {
    Parser::new(tokens, family).parse()
}

/// Lex and parse `source` in one step, with error positions resolved to line and column.
///
/// ## Errors
/// Returns the lexer's errors if lexing fails, otherwise the parser's.
pub fn parse_source(source: &str, family: SyntaxFamily) -> Result<Program, Vec<SyntaxError>> {
    let locate = |errors: Vec<SyntaxError>| errors.into_iter().map(|e| e.locate(source)).collect::<Vec<_>>();
    let tokens = crate::lexer::lex(source, family).map_err(locate)?;
    parse(&tokens, family).map_err(locate)
}

//! Property-based tests for the syntax frontend.
//!
//! The lexer and parser must reject bad input with errors, never panic, and keep literal text intact.

use bsonshift_core::lang::registry::SyntaxFamily;
use bsonshift_syntax::ast::{ExprKind, Literal, NumberKind};
use bsonshift_syntax::parser::parse_source;
use proptest::prelude::*;

proptest! {
    /// Property: arbitrary input never panics the frontend, in either family.
    #[test]
    fn frontend_never_panics(source in "\\PC{0,40}") {
        let _ = parse_source(&source, SyntaxFamily::JavaScript);
        let _ = parse_source(&source, SyntaxFamily::Python);
    }

    /// Property: bracket-heavy input never panics either.
    #[test]
    fn frontend_never_panics_on_brackets(source in "[\\[\\]{}(),:;'\"/a1 .]{0,30}") {
        let _ = parse_source(&source, SyntaxFamily::JavaScript);
        let _ = parse_source(&source, SyntaxFamily::Python);
    }

    /// Property: integer literals keep their exact text.
    #[test]
    fn integer_text_is_preserved(n in 1u64..u64::MAX) {
        let text = n.to_string();
        let program = parse_source(&text, SyntaxFamily::JavaScript).expect("parse failed");
        prop_assert_eq!(
            &program.statements[0].kind,
            &ExprKind::Literal(Literal::Number { kind: NumberKind::Integer, text: text.clone() })
        );
    }

    /// Property: errors always point inside the source (or at its end).
    #[test]
    fn error_positions_are_in_bounds(source in "[a-z{}:,\\[\\] 0-9'\\n]{1,30}") {
        if let Err(errors) = parse_source(&source, SyntaxFamily::JavaScript) {
            for err in errors {
                prop_assert!(err.span.start <= source.len());
                prop_assert!(err.line >= 1);
                prop_assert!(err.column >= 1);
            }
        }
    }
}

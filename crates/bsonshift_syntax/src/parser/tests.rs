#[cfg(test)]
/// Parser unit tests.
///
/// These cover the expression forms the transpiler walks and the Python-specific shapes.
mod tests {
    use super::*;

    fn js(source: &str) -> Expr {
        parse_source(source, SyntaxFamily::JavaScript)
            .expect("parse failed")
            .statements
            .remove(0)
    }

    fn py(source: &str) -> Expr {
        parse_source(source, SyntaxFamily::Python)
            .expect("parse failed")
            .statements
            .remove(0)
    }

    #[test]
    fn test_new_wraps_the_call() {
        let expr = js("new Date(2019, 1).getTime()");
        let ExprKind::Call { callee, .. } = &expr.kind else {
            panic!("expected call, got {:?}", expr.kind);
        };
        let ExprKind::Member { object, property, .. } = &callee.kind else {
            panic!("expected member");
        };
        assert_eq!(property, "getTime");
        let ExprKind::New(target) = &object.kind else {
            panic!("expected new");
        };
        let ExprKind::Call { args, .. } = &target.kind else {
            panic!("expected call under new");
        };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_new_without_arguments() {
        let expr = js("new MinKey");
        let ExprKind::New(target) = &expr.kind else {
            panic!("expected new");
        };
        assert_eq!(target.kind, ExprKind::Identifier("MinKey".into()));
    }

    #[test]
    fn test_array_elisions() {
        let expr = js("[1, , 2,]");
        let ExprKind::Array(items) = &expr.kind else {
            panic!("expected array");
        };
        assert_eq!(items.len(), 3);
        assert!(items[1].is_none());
    }

    #[test]
    fn test_object_key_forms() {
        let expr = js("{x: 1, 'y': 2, 3: 4, new: 5}");
        let ExprKind::Object(props) = &expr.kind else {
            panic!("expected object");
        };
        assert_eq!(props[0].key, PropertyKey::Identifier("x".into()));
        assert_eq!(props[1].key, PropertyKey::String("y".into()));
        assert_eq!(props[2].key, PropertyKey::Number("3".into()));
        assert_eq!(props[3].key, PropertyKey::Identifier("new".into()));
    }

    #[test]
    fn test_function_is_kept_as_extent() {
        let source = "Code(function(a) { return {x: a}; })";
        let expr = js(source);
        let ExprKind::Call { args, .. } = &expr.kind else {
            panic!("expected call");
        };
        let Argument::Positional(func) = &args[0] else {
            panic!("expected positional");
        };
        assert_eq!(func.kind, ExprKind::Function);
        assert_eq!(func.span.text(source), "function(a) { return {x: a}; }");
    }

    #[test]
    fn test_unary_minus_binds_tighter_than_call_args() {
        let expr = js("f(-1)");
        let ExprKind::Call { args, .. } = &expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(
            &args[0],
            Argument::Positional(Expr {
                kind: ExprKind::Unary { op: UnaryOp::Minus, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_equality_and_precedence() {
        let expr = js("a + 1 === b && c");
        let ExprKind::Binary { op: BinaryOp::And, lhs, .. } = &expr.kind else {
            panic!("expected &&");
        };
        assert!(matches!(lhs.kind, ExprKind::Equality { op: OperatorId::EqEqEq, .. }));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let program = parse_source("{a: [1, 2], b: f(x.y)}", SyntaxFamily::JavaScript).expect("parse failed");
        let mut ids = Vec::new();
        fn collect(expr: &Expr, ids: &mut Vec<NodeId>) {
            ids.push(expr.id);
            match &expr.kind {
                ExprKind::Object(props) => props.iter().for_each(|p| collect(&p.value, ids)),
                ExprKind::Array(items) => items.iter().flatten().for_each(|e| collect(e, ids)),
                ExprKind::Call { callee, args } => {
                    collect(callee, ids);
                    for arg in args {
                        if let Argument::Positional(e) = arg {
                            collect(e, ids);
                        }
                    }
                }
                ExprKind::Member { object, .. } => collect(object, ids),
                _ => {}
            }
        }
        collect(&program.statements[0], &mut ids);
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert!(ids.iter().all(|id| id.0 < program.node_count));
    }

    #[test]
    fn test_statements_split_on_semicolons() {
        let program = parse_source("1; 2;;", SyntaxFamily::JavaScript).expect("parse failed");
        assert_eq!(program.statements.len(), 2);
    }

    // ========================================================================
    // Python
    // ========================================================================

    #[test]
    fn test_python_dict_and_tuple() {
        let expr = py("{'x': (1, 2), 'y': (3)}");
        let ExprKind::Object(props) = &expr.kind else {
            panic!("expected dict");
        };
        assert_eq!(props[0].key, PropertyKey::String("x".into()));
        assert!(matches!(&props[0].value.kind, ExprKind::Array(items) if items.len() == 2));
        assert!(matches!(&props[1].value.kind, ExprKind::Paren(_)));
    }

    #[test]
    fn test_python_keyword_arguments() {
        let expr = py("Code('x', scope={'a': 1})");
        let ExprKind::Call { args, .. } = &expr.kind else {
            panic!("expected call");
        };
        assert!(matches!(&args[1], Argument::Keyword { name, .. } if name == "scope"));
    }

    #[test]
    fn test_python_word_operators() {
        let expr = py("not a and b");
        assert!(matches!(expr.kind, ExprKind::Binary { op: BinaryOp::And, .. }));
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_error_reports_position() {
        let errs = parse_source("{x: 1,\n y: }", SyntaxFamily::JavaScript).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].message, "Expected expression, found '}'");
        assert_eq!((errs[0].line, errs[0].column), (2, 5));
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let errs = parse_source("a b", SyntaxFamily::JavaScript).unwrap_err();
        assert_eq!(errs[0].message, "Expected ';' or end of input, found identifier 'b'");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let errs = parse_source("  ", SyntaxFamily::JavaScript).unwrap_err();
        assert_eq!(errs[0].message, "Expected an expression");
    }

    #[test]
    fn test_nesting_up_to_the_limit_parses() {
        let source = format!("{}{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
        assert!(parse_source(&source, SyntaxFamily::JavaScript).is_ok());
    }

    #[test]
    fn test_nesting_past_the_limit_is_an_error() {
        let source = format!("{}{}", "[".repeat(MAX_NESTING + 1), "]".repeat(MAX_NESTING + 1));
        let errs = parse_source(&source, SyntaxFamily::JavaScript).unwrap_err();
        insta::assert_snapshot!(errs[0].to_string(), @"Expression nested deeper than 100 levels");
        assert_eq!((errs[0].line, errs[0].column), (1, MAX_NESTING + 1));
    }

    #[test]
    fn test_deep_input_fails_without_overflowing() {
        let cases = [
            "[".repeat(20_000),
            "{a: ".repeat(20_000),
            "(".repeat(20_000),
            format!("{}1", "- ".repeat(20_000)),
            format!("f{}", "(1)".repeat(20_000)),
            format!("a{}", ".b".repeat(20_000)),
            format!("1{}", " + 1".repeat(20_000)),
        ];
        for source in &cases {
            let errs = parse_source(source, SyntaxFamily::JavaScript).unwrap_err();
            assert!(errs[0].message.starts_with("Expression nested deeper"), "{}", errs[0].message);
        }

        let python = format!("{}1{}", "[".repeat(20_000), "]".repeat(20_000));
        let errs = parse_source(&python, SyntaxFamily::Python).unwrap_err();
        insta::assert_snapshot!(errs[0].to_string(), @"Expression nested deeper than 100 levels");
    }
}

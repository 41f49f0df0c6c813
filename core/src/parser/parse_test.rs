use super::{ParseError, parse};
use crate::ast::{DeclarationKind, FunctionBody, Literal, Node, NodeKind, Span};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn statements(source: &str) -> Vec<Rc<Node>> {
    let program = parse(source).unwrap_or_else(|e| panic!("failed to parse {source:?}: {e}"));
    match &program.kind {
        NodeKind::Program(body) => body.to_vec(),
        other => panic!("expected a program, got {other:?}"),
    }
}

fn single(source: &str) -> Rc<Node> {
    let mut body = statements(source);
    assert_eq!(body.len(), 1, "expected exactly one statement in {source:?}");
    body.remove(0)
}

#[test]
fn test_empty_program() {
    assert!(statements("").is_empty());
    assert!(statements("  // nothing here\n").is_empty());
}

#[test]
fn test_literals() {
    let cases = [
        ("42;", Literal::Number(42.0)),
        ("2.5;", Literal::Number(2.5)),
        ("'single';", Literal::Str("single".to_string())),
        ("\"double\";", Literal::Str("double".to_string())),
        ("\"a\\tb\";", Literal::Str("a\tb".to_string())),
        ("true;", Literal::Bool(true)),
        ("false;", Literal::Bool(false)),
        ("null;", Literal::Null),
        ("undefined;", Literal::Undefined),
    ];
    for (source, expected) in cases {
        let statement = single(source);
        let NodeKind::ExpressionStatement(expression) = &statement.kind else {
            panic!("expected expression statement for {source:?}");
        };
        assert_eq!(expression.kind, NodeKind::Literal(expected), "{source}");
    }
}

#[test]
fn test_variable_declaration() {
    let statement = single("const answer = 42;");
    assert_eq!(statement.span, Span::new(0, 18));
    let NodeKind::VariableDeclaration { kind, name, init } = &statement.kind else {
        panic!("expected declaration, got {statement}");
    };
    assert_eq!(*kind, DeclarationKind::Const);
    assert_eq!(name, "answer");
    assert_eq!(init.kind, NodeKind::Literal(Literal::Number(42.0)));
    assert_eq!(init.span, Span::new(15, 17));
}

#[test]
fn test_function_declaration() {
    let statement = single("function add(a, b) { return a + b; }");
    let NodeKind::FunctionDeclaration(function) = &statement.kind else {
        panic!("expected function declaration, got {statement}");
    };
    assert_eq!(function.name.as_deref(), Some("add"));
    assert_eq!(function.params, vec!["a".to_string(), "b".to_string()]);
    let FunctionBody::Block(body) = &function.body else {
        panic!("function declarations always have block bodies");
    };
    assert_eq!(body.to_string(), "(block (return (+ a b)))");
}

#[test]
fn test_arrow_functions() {
    assert_eq!(
        single("x => x * 2;").to_string(),
        "(function => (x) (* x 2));"
    );
    assert_eq!(
        single("(a, b) => { return a; };").to_string(),
        "(function => (a b) (block (return a)));"
    );
    assert_eq!(single("() => 1;").to_string(), "(function => () 1);");
}

#[test]
fn test_if_else_chain() {
    assert_eq!(
        single("if (a) { 1; } else if (b) 2; else { 3; }").to_string(),
        "(if a (block 1;) (if b 2; (block 3;)))"
    );
    assert_eq!(single("if (a) b;").to_string(), "(if a b;)");
}

#[test]
fn test_amb_and_cut_are_plain_syntax() {
    let body = statements("let x = amb(1, 2, 3); cut; x;");
    let rendered: Vec<String> = body.iter().map(|s| s.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["(let x (call amb 1 2 3))", "cut;", "x;"]
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(single("x = y = 1;").to_string(), "(= x (= y 1));");
}

#[test]
fn test_logical_and_conditional() {
    assert_eq!(
        single("a && b || !c ? 1 : 2;").to_string(),
        "(? (|| (&& a b) (! c)) 1 2);"
    );
}

#[test]
fn test_call_span_covers_arguments() {
    let statement = single("f(1, 2);");
    let NodeKind::ExpressionStatement(call) = &statement.kind else {
        panic!("expected expression statement");
    };
    assert_eq!(call.span, Span::new(0, 7));
}

#[test]
fn test_syntax_error_has_location() {
    let err = parse("let x = ;").unwrap_err();
    assert!(matches!(err, ParseError::Syntax(_)));
    assert_eq!(err.span(), Span::new(8, 8));
}

#[test]
fn test_missing_semicolon_is_rejected() {
    assert!(parse("let x = 1").is_err());
    assert!(parse("x").is_err());
}

use super::parser::parse;

// Helper function to parse a single expression statement and render it.
//
// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same tree.
fn ast(source: &str) -> String {
    let source = format!("{source};");
    parse(&source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
        .to_string()
}

#[test]
fn test_addition_vs_subtraction() {
    assert_eq!(ast("a + b - c"), ast("(a + b) - c"));
    assert_eq!(ast("a - b + c"), ast("(a - b) + c"));
    assert_eq!(
        ast("a + b - c + d - e + f"),
        ast("((((a + b) - c) + d) - e) + f")
    );
}

#[test]
fn test_multiplication_vs_division() {
    assert_eq!(ast("a * b / c"), ast("(a * b) / c"));
    assert_eq!(ast("a / b * c % d"), ast("((a / b) * c) % d"));
}

#[test]
fn test_addition_vs_multiplication() {
    assert_eq!(ast("a + b * c"), ast("a + (b * c)"));
    assert_eq!(ast("a * b + c"), ast("(a * b) + c"));
}

#[test]
fn test_comparison_vs_arithmetic() {
    assert_eq!(ast("a + 1 < b * 2"), ast("(a + 1) < (b * 2)"));
    assert_eq!(ast("a < b === c >= d"), ast("(a < b) === (c >= d)"));
}

#[test]
fn test_and_vs_or() {
    assert_eq!(ast("a && b || c"), ast("(a && b) || c"));
    assert_eq!(ast("a || b && c"), ast("a || (b && c)"));
}

#[test]
fn test_equality_vs_logical() {
    assert_eq!(ast("a === 1 && b !== 2"), ast("(a === 1) && (b !== 2)"));
}

#[test]
fn test_negation_binds_tighter_than_multiplication() {
    assert_eq!(ast("-a * b"), ast("(-a) * b"));
    assert_eq!(ast("!a && b"), ast("(!a) && b"));
}

#[test]
fn test_call_binds_tightest() {
    assert_eq!(ast("-f(x)"), ast("-(f(x))"));
    assert_eq!(ast("f(x) + g(y)"), ast("(f(x)) + (g(y))"));
}

#[test]
fn test_conditional_is_lowest() {
    assert_eq!(ast("a || b ? c + 1 : d"), ast("(a || b) ? (c + 1) : d"));
    assert_eq!(ast("a ? b : c ? d : e"), ast("a ? b : (c ? d : e)"));
}

#[test]
fn test_rendering() {
    assert_eq!(ast("1 + 2 * 3"), "(program (+ 1 (* 2 3));)");
    assert_eq!(ast("amb(1, 2)"), "(program (call amb 1 2);)");
}

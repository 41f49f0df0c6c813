use super::error::ParseError;
use crate::ast::{
    BinaryOp, DeclarationKind, Function, FunctionBody, Literal, LogicalOp, Node, NodeKind,
    NodeList, Span, UnaryOp,
};
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use std::rc::Rc;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or, Assoc::Left))             // `||`
        .op(Op::infix(Rule::and, Assoc::Left))            // `&&`
        .op(
            Op::infix(Rule::strict_eq, Assoc::Left) |
            Op::infix(Rule::strict_neq, Assoc::Left)
        )                                                // `===`, `!==`
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left)
        )                                                // `<`, `<=`, `>`, `>=`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::rem, Assoc::Left)
        )                                                // `*`, `/`, `%`
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::not)) // `-`, `!`
        .op(Op::postfix(Rule::call))                      // `f(...)`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub struct ProgramParser;

/// Parse a whole program.
///
/// The returned node is always a `Program`.
pub fn parse(source: &str) -> Result<Rc<Node>, ParseError> {
    let mut pairs = ProgramParser::parse(Rule::main, source)?;
    let main = pairs.next().ok_or(ParseError::Malformed {
        expected: "program",
        span: Span::new(0, source.len()),
    })?;
    let span = span_of(&main);
    let body = build_statements(main.into_inner())?;
    Ok(Rc::new(Node::new(NodeKind::Program(body), span)))
}

fn span_of(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    Span::new(span.start(), span.end())
}

fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    expected: &'static str,
    span: &Span,
) -> Result<Pair<'i, Rule>, ParseError> {
    pairs.next().ok_or_else(|| ParseError::Malformed {
        expected,
        span: span.clone(),
    })
}

fn build_statements(pairs: Pairs<Rule>) -> Result<NodeList, ParseError> {
    let statements = pairs
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(build_statement)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(statements.into())
}

fn build_statement(pair: Pair<Rule>) -> Result<Rc<Node>, ParseError> {
    let span = span_of(&pair);
    let kind = match pair.as_rule() {
        Rule::block => NodeKind::Block(build_statements(pair.into_inner())?),

        Rule::function_declaration => {
            let mut inner = pair.into_inner();
            next_pair(&mut inner, "`function`", &span)?;
            let name = next_pair(&mut inner, "function name", &span)?
                .as_str()
                .to_string();
            let params = build_params(next_pair(&mut inner, "parameter list", &span)?);
            let body = build_statement(next_pair(&mut inner, "function body", &span)?)?;
            NodeKind::FunctionDeclaration(Rc::new(Function {
                name: Some(name),
                params,
                body: FunctionBody::Block(body),
                span: span.clone(),
            }))
        }

        Rule::variable_declaration => {
            let mut inner = pair.into_inner();
            let kind = match next_pair(&mut inner, "declaration kind", &span)?.as_str() {
                "const" => DeclarationKind::Const,
                "var" => DeclarationKind::Var,
                _ => DeclarationKind::Let,
            };
            let name = next_pair(&mut inner, "variable name", &span)?
                .as_str()
                .to_string();
            let init = build_expression(next_pair(&mut inner, "initializer", &span)?)?;
            NodeKind::VariableDeclaration { kind, name, init }
        }

        Rule::return_statement => {
            let mut inner = pair.into_inner();
            next_pair(&mut inner, "`return`", &span)?;
            let argument = inner.next().map(build_expression).transpose()?;
            NodeKind::Return { argument }
        }

        Rule::if_statement => {
            let mut inner = pair.into_inner();
            next_pair(&mut inner, "`if`", &span)?;
            let test = build_expression(next_pair(&mut inner, "condition", &span)?)?;
            let consequent = build_statement(next_pair(&mut inner, "consequent", &span)?)?;
            let alternate = match inner.next() {
                // `else` keyword, then the statement
                Some(_) => Some(build_statement(next_pair(
                    &mut inner,
                    "alternate",
                    &span,
                )?)?),
                None => None,
            };
            NodeKind::If {
                test,
                consequent,
                alternate,
            }
        }

        Rule::expression_statement => {
            let mut inner = pair.into_inner();
            NodeKind::ExpressionStatement(build_expression(next_pair(
                &mut inner,
                "expression",
                &span,
            )?)?)
        }

        _ => {
            return Err(ParseError::Malformed {
                expected: "statement",
                span,
            });
        }
    };
    Ok(Rc::new(Node::new(kind, span)))
}

fn build_params(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner().map(|p| p.as_str().to_string()).collect()
}

fn build_expression(pair: Pair<Rule>) -> Result<Rc<Node>, ParseError> {
    let span = span_of(&pair);
    match pair.as_rule() {
        Rule::expression => {
            let mut inner = pair.into_inner();
            build_expression(next_pair(&mut inner, "expression", &span)?)
        }

        Rule::arrow_function => {
            let mut inner = pair.into_inner();
            let head = next_pair(&mut inner, "parameters", &span)?;
            let params = match head.as_rule() {
                Rule::params => build_params(head),
                _ => vec![head.as_str().to_string()],
            };
            let body = next_pair(&mut inner, "arrow body", &span)?;
            let body = match body.as_rule() {
                Rule::block => FunctionBody::Block(build_statement(body)?),
                _ => FunctionBody::Expression(build_expression(body)?),
            };
            let function = Function {
                name: None,
                params,
                body,
                span: span.clone(),
            };
            Ok(Rc::new(Node::new(
                NodeKind::ArrowFunction(Rc::new(function)),
                span,
            )))
        }

        Rule::assignment => {
            let mut inner = pair.into_inner();
            let name = next_pair(&mut inner, "assignment target", &span)?
                .as_str()
                .to_string();
            let value = build_expression(next_pair(&mut inner, "assigned value", &span)?)?;
            Ok(Rc::new(Node::new(NodeKind::Assignment { name, value }, span)))
        }

        Rule::conditional => {
            let mut inner = pair.into_inner();
            let test = build_binary(next_pair(&mut inner, "operand", &span)?)?;
            let Some(consequent) = inner.next() else {
                return Ok(test);
            };
            let consequent = build_expression(consequent)?;
            let alternate = build_expression(next_pair(&mut inner, "`:` branch", &span)?)?;
            Ok(Rc::new(Node::new(
                NodeKind::Conditional {
                    test,
                    consequent,
                    alternate,
                },
                span,
            )))
        }

        Rule::binary => build_binary(pair),

        _ => build_primary(pair),
    }
}

fn build_binary(pair: Pair<Rule>) -> Result<Rc<Node>, ParseError> {
    PRATT_PARSER
        .map_primary(build_primary)
        .map_prefix(|op, rhs| {
            let argument = rhs?;
            let operator = match op.as_rule() {
                Rule::neg => UnaryOp::Neg,
                Rule::not => UnaryOp::Not,
                _ => {
                    return Err(ParseError::Malformed {
                        expected: "prefix operator",
                        span: span_of(&op),
                    });
                }
            };
            let span = Span::new(op.as_span().start(), argument.span.0.end);
            Ok(Rc::new(Node::new(
                NodeKind::Unary { operator, argument },
                span,
            )))
        })
        .map_infix(|lhs, op, rhs| {
            let (left, right) = (lhs?, rhs?);
            let span = Span::new(left.span.0.start, right.span.0.end);
            let kind = match op.as_rule() {
                Rule::and => NodeKind::Logical {
                    operator: LogicalOp::And,
                    left,
                    right,
                },
                Rule::or => NodeKind::Logical {
                    operator: LogicalOp::Or,
                    left,
                    right,
                },
                rule => {
                    let operator = match rule {
                        Rule::add => BinaryOp::Add,
                        Rule::sub => BinaryOp::Sub,
                        Rule::mul => BinaryOp::Mul,
                        Rule::div => BinaryOp::Div,
                        Rule::rem => BinaryOp::Rem,
                        Rule::strict_eq => BinaryOp::StrictEq,
                        Rule::strict_neq => BinaryOp::StrictNeq,
                        Rule::lt => BinaryOp::Lt,
                        Rule::le => BinaryOp::Le,
                        Rule::gt => BinaryOp::Gt,
                        Rule::ge => BinaryOp::Ge,
                        _ => {
                            return Err(ParseError::Malformed {
                                expected: "binary operator",
                                span: span_of(&op),
                            });
                        }
                    };
                    NodeKind::Binary {
                        operator,
                        left,
                        right,
                    }
                }
            };
            Ok(Rc::new(Node::new(kind, span)))
        })
        .map_postfix(|lhs, op| {
            let callee = lhs?;
            let span = Span::new(callee.span.0.start, op.as_span().end());
            let arguments = op
                .into_inner()
                .map(build_expression)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Rc::new(Node::new(
                NodeKind::Call {
                    callee,
                    arguments: arguments.into(),
                },
                span,
            )))
        })
        .parse(pair.into_inner())
}

fn build_primary(pair: Pair<Rule>) -> Result<Rc<Node>, ParseError> {
    let span = span_of(&pair);
    let literal = match pair.as_rule() {
        Rule::number => {
            let value = pair
                .as_str()
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidLiteral {
                    what: "number",
                    text: pair.as_str().to_string(),
                    span: span.clone(),
                })?;
            Literal::Number(value)
        }
        Rule::string => {
            let mut inner = pair.into_inner();
            let contents = next_pair(&mut inner, "string contents", &span)?;
            Literal::Str(unescape(contents.as_str()))
        }
        Rule::boolean => Literal::Bool(pair.as_str() == "true"),
        Rule::null => Literal::Null,
        Rule::undefined => Literal::Undefined,
        Rule::ident => {
            return Ok(Rc::new(Node::new(
                NodeKind::Identifier(pair.as_str().to_string()),
                span,
            )));
        }
        Rule::expression => return build_expression(pair),
        _ => {
            return Err(ParseError::Malformed {
                expected: "operand",
                span,
            });
        }
    };
    Ok(Rc::new(Node::literal(literal, span)))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"it\'s"), "it's");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn test_program_span_covers_source() {
        let source = "1;";
        let program = parse(source).unwrap();
        assert_eq!(program.span, Span::new(0, 2));
    }
}

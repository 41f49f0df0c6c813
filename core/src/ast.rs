//! Abstract syntax tree consumed by the evaluator.
//!
//! Children are reference counted so that evaluation streams, closures and
//! re-enumeration on backtrack can all share the same subtrees. The tree is
//! never mutated after parsing.

use core::fmt;
use core::ops::Range;
use std::rc::Rc;

/// Byte range in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span(start..end)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.0.start <= offset && offset <= self.0.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.0.start, self.0.end)
    }
}

/// Ordered list of statements or arguments.
pub type NodeList = Rc<[Rc<Node>]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn literal(literal: Literal, span: Span) -> Self {
        Self::new(NodeKind::Literal(literal), span)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Literal),
    Identifier(String),
    Call {
        callee: Rc<Node>,
        arguments: NodeList,
    },
    Unary {
        operator: UnaryOp,
        argument: Rc<Node>,
    },
    Binary {
        operator: BinaryOp,
        left: Rc<Node>,
        right: Rc<Node>,
    },
    Logical {
        operator: LogicalOp,
        left: Rc<Node>,
        right: Rc<Node>,
    },
    Conditional {
        test: Rc<Node>,
        consequent: Rc<Node>,
        alternate: Rc<Node>,
    },
    VariableDeclaration {
        kind: DeclarationKind,
        name: String,
        init: Rc<Node>,
    },
    Assignment {
        name: String,
        value: Rc<Node>,
    },
    FunctionDeclaration(Rc<Function>),
    ArrowFunction(Rc<Function>),
    If {
        test: Rc<Node>,
        consequent: Rc<Node>,
        alternate: Option<Rc<Node>>,
    },
    Return {
        argument: Option<Rc<Node>>,
    },
    Block(NodeList),
    ExpressionStatement(Rc<Node>),
    Program(NodeList),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// `None` for anonymous arrow functions.
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Rc<Node>),
    /// Concise arrow body, evaluated as `{ return expr; }`.
    Expression(Rc<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Let,
    Const,
    Var,
}

impl DeclarationKind {
    pub fn is_constant(self) -> bool {
        self == DeclarationKind::Const
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    StrictEq,
    StrictNeq,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNeq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        };
        write!(f, "{symbol}")
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "&&"),
            LogicalOp::Or => write!(f, "||"),
        }
    }
}

/// Compact s-expression rendering, ignoring spans.
///
/// Used by tests and debug logging to compare tree shapes.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, head: &str, nodes: &[Rc<Node>]) -> fmt::Result {
            write!(f, "({head}")?;
            for node in nodes {
                write!(f, " {node}")?;
            }
            write!(f, ")")
        }

        match &self.kind {
            NodeKind::Literal(literal) => match literal {
                Literal::Number(n) => write!(f, "{n}"),
                Literal::Str(s) => write!(f, "{s:?}"),
                Literal::Bool(b) => write!(f, "{b}"),
                Literal::Null => write!(f, "null"),
                Literal::Undefined => write!(f, "undefined"),
            },
            NodeKind::Identifier(name) => write!(f, "{name}"),
            NodeKind::Call { callee, arguments } => {
                write!(f, "(call {callee}")?;
                for argument in arguments.iter() {
                    write!(f, " {argument}")?;
                }
                write!(f, ")")
            }
            NodeKind::Unary { operator, argument } => write!(f, "({operator} {argument})"),
            NodeKind::Binary {
                operator,
                left,
                right,
            } => write!(f, "({operator} {left} {right})"),
            NodeKind::Logical {
                operator,
                left,
                right,
            } => write!(f, "({operator} {left} {right})"),
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => write!(f, "(? {test} {consequent} {alternate})"),
            NodeKind::VariableDeclaration { kind, name, init } => {
                let keyword = match kind {
                    DeclarationKind::Let => "let",
                    DeclarationKind::Const => "const",
                    DeclarationKind::Var => "var",
                };
                write!(f, "({keyword} {name} {init})")
            }
            NodeKind::Assignment { name, value } => write!(f, "(= {name} {value})"),
            NodeKind::FunctionDeclaration(function) | NodeKind::ArrowFunction(function) => {
                let name = function.name.as_deref().unwrap_or("=>");
                write!(f, "(function {name} ({})", function.params.join(" "))?;
                match &function.body {
                    FunctionBody::Block(body) | FunctionBody::Expression(body) => {
                        write!(f, " {body})")
                    }
                }
            }
            NodeKind::If {
                test,
                consequent,
                alternate: Some(alternate),
            } => write!(f, "(if {test} {consequent} {alternate})"),
            NodeKind::If {
                test, consequent, ..
            } => write!(f, "(if {test} {consequent})"),
            NodeKind::Return { argument: Some(argument) } => write!(f, "(return {argument})"),
            NodeKind::Return { argument: None } => write!(f, "(return)"),
            NodeKind::Block(body) => list(f, "block", body),
            NodeKind::ExpressionStatement(expression) => write!(f, "{expression};"),
            NodeKind::Program(body) => list(f, "program", body),
        }
    }
}

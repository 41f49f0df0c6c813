//! Names in scope at a source position, for editor completion.
//!
//! This is a purely syntactic walk. It does not evaluate anything and does
//! not consult a context.

use crate::ast::{FunctionBody, Node, NodeKind};
use std::rc::Rc;

/// Names declared in every scope enclosing `offset`, outermost first.
///
/// A scope is the program, a block, or a function body. For each one whose
/// span contains the offset, its top-level `let`/`const`/`var` and function
/// declarations are collected, along with the parameters of an enclosing
/// function. Duplicates keep their outermost position.
pub fn declarations_at(program: &Node, offset: usize) -> Vec<String> {
    let mut names = Vec::new();
    visit(program, offset, &mut names);
    names
}

fn push(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}

fn declare_top_level(statements: &[Rc<Node>], names: &mut Vec<String>) {
    for statement in statements {
        match &statement.kind {
            NodeKind::VariableDeclaration { name, .. } => push(names, name),
            NodeKind::FunctionDeclaration(function) => {
                if let Some(name) = &function.name {
                    push(names, name);
                }
            }
            _ => {}
        }
    }
}

fn visit(node: &Node, offset: usize, names: &mut Vec<String>) {
    if !node.span.contains(offset) {
        return;
    }
    match &node.kind {
        NodeKind::Program(statements) | NodeKind::Block(statements) => {
            declare_top_level(statements, names);
            for statement in statements.iter() {
                visit(statement, offset, names);
            }
        }
        NodeKind::FunctionDeclaration(function) | NodeKind::ArrowFunction(function) => {
            for param in &function.params {
                push(names, param);
            }
            match &function.body {
                FunctionBody::Block(body) | FunctionBody::Expression(body) => {
                    visit(body, offset, names)
                }
            }
        }
        NodeKind::Literal(_) | NodeKind::Identifier(_) => {}
        NodeKind::Call { callee, arguments } => {
            visit(callee, offset, names);
            for argument in arguments.iter() {
                visit(argument, offset, names);
            }
        }
        NodeKind::Unary { argument, .. } => visit(argument, offset, names),
        NodeKind::Binary { left, right, .. } | NodeKind::Logical { left, right, .. } => {
            visit(left, offset, names);
            visit(right, offset, names);
        }
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visit(test, offset, names);
            visit(consequent, offset, names);
            visit(alternate, offset, names);
        }
        NodeKind::If {
            test,
            consequent,
            alternate,
        } => {
            visit(test, offset, names);
            visit(consequent, offset, names);
            if let Some(alternate) = alternate {
                visit(alternate, offset, names);
            }
        }
        NodeKind::VariableDeclaration { init: child, .. }
        | NodeKind::Assignment { value: child, .. }
        | NodeKind::ExpressionStatement(child)
        | NodeKind::Return {
            argument: Some(child),
        } => visit(child, offset, names),
        NodeKind::Return { argument: None } => {}
    }
}

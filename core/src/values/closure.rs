use crate::ast::{Function, FunctionBody, Node, NodeKind};
use crate::environment::Environment;
use core::fmt;
use std::rc::Rc;

/// A function value: its definition plus the environment it closes over.
pub struct Closure {
    function: Rc<Function>,
    environment: Environment,
    body: Rc<Node>,
}

impl Closure {
    pub fn new(function: Rc<Function>, environment: Environment) -> Self {
        let body = match &function.body {
            FunctionBody::Block(block) => block.clone(),
            // `x => expr` runs as `x => { return expr; }`.
            FunctionBody::Expression(expr) => {
                let span = expr.span.clone();
                let ret = Node::new(
                    NodeKind::Return {
                        argument: Some(expr.clone()),
                    },
                    span.clone(),
                );
                Rc::new(Node::new(NodeKind::Block(Rc::from([Rc::new(ret)])), span))
            }
        };
        Self {
            function,
            environment,
            body,
        }
    }

    pub fn name(&self) -> &str {
        self.function.name.as_deref().unwrap_or("anonymous")
    }

    pub fn params(&self) -> &[String] {
        &self.function.params
    }

    pub fn function(&self) -> &Rc<Function> {
        &self.function
    }

    /// Environment captured when the function expression was evaluated.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Body as a block node, whatever form it was written in.
    pub fn body(&self) -> &Rc<Node> {
        &self.body
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The environment may refer back to this closure.
        f.debug_struct("Closure")
            .field("name", &self.name())
            .field("params", &self.function.params)
            .finish_non_exhaustive()
    }
}

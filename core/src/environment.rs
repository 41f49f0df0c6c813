//! Lexical frames and the bindings they hold.
//!
//! A frame maps names to bindings and links to the frame it was created in.
//! Frames are shared: every closure created inside a frame keeps it alive,
//! and a block re-pushes the same frame each time it is resumed.
//!
//! Name resolution walks the `tail` chain from the innermost frame outwards:
//! ```text
//! { let a = 1; { let b = a + 1; } }   // inner frame -> outer frame -> global
//! ```

use crate::ast::Span;
use crate::values::{Closure, Value};
use core::cell::{Ref, RefCell};
use core::fmt;
use hashbrown::HashMap;
use std::rc::Rc;

pub type Environment = Rc<Frame>;

/// State of one name in one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Declared by hoisting, not yet initialised.
    Unassigned,
    Assigned { value: Value, mutable: bool },
}

impl Binding {
    /// Unassigned slots report as mutable in redeclaration errors.
    pub fn is_mutable(&self) -> bool {
        match self {
            Binding::Unassigned => true,
            Binding::Assigned { mutable, .. } => *mutable,
        }
    }
}

/// Call that produced a function frame, kept for error messages.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub span: Span,
    pub arguments: Vec<Value>,
}

pub struct Frame {
    name: String,
    head: RefCell<HashMap<String, Binding>>,
    tail: Option<Environment>,
    this_context: Option<Value>,
    call: Option<CallRecord>,
}

impl Frame {
    /// A frame with no parent.
    pub fn root(name: &str) -> Environment {
        Rc::new(Self {
            name: name.to_string(),
            head: RefCell::new(HashMap::new()),
            tail: None,
            this_context: None,
            call: None,
        })
    }

    /// An empty frame nested inside `tail`.
    pub fn child(name: &str, tail: &Environment) -> Environment {
        Rc::new(Self {
            name: name.to_string(),
            head: RefCell::new(HashMap::new()),
            tail: Some(tail.clone()),
            this_context: None,
            call: None,
        })
    }

    /// Activation frame for a call: parameters bound as mutable, nested
    /// inside the closure's captured environment.
    pub fn activation(
        closure: &Closure,
        arguments: Vec<Value>,
        span: Span,
        this_context: Option<Value>,
    ) -> Environment {
        let head = closure
            .params()
            .iter()
            .zip(&arguments)
            .map(|(param, value)| {
                (
                    param.clone(),
                    Binding::Assigned {
                        value: value.clone(),
                        mutable: true,
                    },
                )
            })
            .collect();
        Rc::new(Self {
            name: closure.name().to_string(),
            head: RefCell::new(head),
            tail: Some(closure.environment().clone()),
            this_context,
            call: Some(CallRecord { span, arguments }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tail(&self) -> Option<&Environment> {
        self.tail.as_ref()
    }

    pub fn this_context(&self) -> Option<&Value> {
        self.this_context.as_ref()
    }

    pub fn call(&self) -> Option<&CallRecord> {
        self.call.as_ref()
    }

    /// Binding for `name` in this frame only.
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.head.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.head.borrow().contains_key(name)
    }

    pub(crate) fn bindings(&self) -> Ref<'_, HashMap<String, Binding>> {
        self.head.borrow()
    }

    pub(crate) fn insert(&self, name: &str, binding: Binding) {
        self.head.borrow_mut().insert(name.to_string(), binding);
    }

    pub(crate) fn replace_bindings(&self, bindings: HashMap<String, Binding>) {
        *self.head.borrow_mut() = bindings;
    }

    /// Adds `name` as unassigned.
    pub fn declare(&self, name: &str) -> Result<(), BindError> {
        let mut head = self.head.borrow_mut();
        if let Some(existing) = head.get(name) {
            return Err(BindError::Redeclared {
                mutable: existing.is_mutable(),
            });
        }
        head.insert(name.to_string(), Binding::Unassigned);
        Ok(())
    }

    /// Completes a declared binding. Fails unless the slot exists and is
    /// still unassigned.
    pub fn define(&self, name: &str, value: Value, constant: bool) -> Result<(), BindError> {
        let mut head = self.head.borrow_mut();
        match head.get_mut(name) {
            Some(slot) if matches!(slot, Binding::Unassigned) => {
                *slot = Binding::Assigned {
                    value,
                    mutable: !constant,
                };
                Ok(())
            }
            Some(existing) => Err(BindError::Redeclared {
                mutable: existing.is_mutable(),
            }),
            None => Err(BindError::Redeclared { mutable: !constant }),
        }
    }

    /// Iterates this frame and its ancestors, innermost first.
    pub fn chain(self: &Rc<Self>) -> impl Iterator<Item = Environment> {
        core::iter::successors(Some(self.clone()), |frame| frame.tail.clone())
    }
}

/// Resolves `name` starting at `env`.
pub fn lookup(env: &Environment, name: &str) -> Result<Value, BindError> {
    for frame in env.chain() {
        let head = frame.head.borrow();
        match head.get(name) {
            Some(Binding::Assigned { value, .. }) => return Ok(value.clone()),
            Some(Binding::Unassigned) => return Err(BindError::Unassigned),
            None => {}
        }
    }
    Err(BindError::Undefined)
}

/// Overwrites the nearest assigned binding of `name`. Unassigned slots are
/// skipped as if absent.
pub fn assign(env: &Environment, name: &str, value: Value) -> Result<(), BindError> {
    for frame in env.chain() {
        let mut head = frame.head.borrow_mut();
        match head.get_mut(name) {
            Some(Binding::Assigned { mutable: false, .. }) => return Err(BindError::Constant),
            Some(Binding::Assigned { value: slot, .. }) => {
                *slot = value;
                return Ok(());
            }
            Some(Binding::Unassigned) | None => {}
        }
    }
    Err(BindError::Undefined)
}

/// Failure of a frame operation, before a source location is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The name already exists in the frame.
    Redeclared { mutable: bool },
    /// The name was found but has not been initialised.
    Unassigned,
    /// No frame on the chain has the name.
    Undefined,
    /// The nearest binding is constant.
    Constant,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Redeclared { .. } => write!(f, "Name already declared in this frame"),
            BindError::Unassigned => write!(f, "Name used before it was assigned"),
            BindError::Undefined => write!(f, "Name not found in any frame"),
            BindError::Constant => write!(f, "Cannot assign to a constant"),
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.head.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Frame")
            .field("name", &self.name)
            .field("names", &names)
            .field("tail", &self.tail.as_ref().map(|tail| tail.name.clone()))
            .finish()
    }
}

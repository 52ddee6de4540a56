//! Runtime value types

use std::fmt;
use std::rc::Rc;

use crate::ast::{Block, Identifier};
use crate::environment::Environment;

/// Runtime values
#[derive(Clone)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Integer value
    Number(i64),

    /// Result of declarations and assignments
    Void,

    /// Function value with its captured scope
    Closure(Rc<Closure>),
}

impl Value {
    /// Kind tag used when rendering values
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Void => "void",
            Value::Closure(_) => "closure",
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Void => write!(f, "void"),
            Value::Closure(c) => write!(f, "<function ({})>", c.parameter.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Void, Value::Void) => true,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A function value: parameter, unevaluated body and the environment that
/// was active when the function expression was evaluated
#[derive(Debug)]
pub struct Closure {
    pub parameter: Identifier,
    pub body: Rc<Block>,
    pub environment: Environment,
}

impl Closure {
    pub fn new(parameter: Identifier, body: Rc<Block>, environment: Environment) -> Self {
        Self {
            parameter,
            body,
            environment,
        }
    }
}

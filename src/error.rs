//! Error types
//!
//! Two layers that never mix: parse errors reject a malformed input tree
//! before anything runs, while runtime errors are ordinary evaluation
//! results produced by the evaluator.

use std::fmt;

use thiserror::Error;

/// Which operand of an expression failed its type check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Left,
    Right,
    Argument,
    Test,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Left => write!(f, "left"),
            Operand::Right => write!(f, "right"),
            Operand::Argument => write!(f, "argument"),
            Operand::Test => write!(f, "test"),
        }
    }
}

/// Language-level errors. These are values, not process failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{operand} value of {expression} expression ({value}) must be {expected}")]
    TypeMismatch {
        operand: Operand,
        expression: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in arithmetic expression")]
    Overflow,

    #[error("unbound identifier `{0}`")]
    UnboundIdentifier(String),

    #[error("variable `{0}` already declared")]
    AlreadyDeclared(String),

    #[error("callee `{0}` is not a function")]
    NotCallable(String),

    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

/// Parse error kinds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("unrecognized node type '{0}'")]
    UnrecognizedNode(String),

    #[error("expected a node object")]
    ExpectedNode,

    #[error("missing field '{field}' on {node}")]
    MissingField { node: String, field: &'static str },

    #[error("field '{field}' on {node} must be {expected}")]
    InvalidField {
        node: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("unsupported {node} operator '{operator}'")]
    UnsupportedOperator { node: &'static str, operator: String },

    #[error("invalid literal value {0}")]
    InvalidLiteral(String),

    #[error("functions take exactly one parameter, found {0}")]
    WrongParameterCount(usize),

    #[error("calls take exactly one argument, found {0}")]
    WrongArgumentCount(usize),

    #[error("expected {expected}, found {found}")]
    Misplaced { expected: &'static str, found: String },

    #[error("{0} body must not be empty")]
    EmptyBody(&'static str),
}

/// A parse error with the JSON path of the offending node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub path: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self { kind, path: None }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        if self.path.is_none() && !path.is_empty() {
            self.path = Some(path.to_string());
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[at {}] Parse error: {}", path, self.kind),
            None => write!(f, "Parse error: {}", self.kind),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        ParseError::new(kind)
    }
}

/// Failures that stop the tool before a result can be printed
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for parsing and driving the evaluator
pub type Result<T> = std::result::Result<T, Error>;

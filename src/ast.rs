//! Abstract Syntax Tree definitions
//!
//! The tree is built once by the parser and only read afterwards. Function
//! bodies sit behind an `Rc` so closures can hold on to them cheaply.

use std::rc::Rc;

/// A variable name as it appears in the source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Boolean literal: true, false
    Bool(bool),

    /// Integer literal: 42
    Number(i64),

    /// Arithmetic: a + b, a / b
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Comparison: a == b, a < b
    Relational {
        op: RelationalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Short-circuiting logic: a && b, a || b
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Negation: !a
    Unary { argument: Box<Expr> },

    /// Ternary: test ? consequent : alternate
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },

    /// Variable reference
    Ident(Identifier),

    /// Anonymous function: function (x) { ... }
    Function {
        parameter: Identifier,
        body: Rc<Block>,
    },

    /// Single-argument call: f(x)
    Call {
        callee: Box<Expr>,
        argument: Box<Expr>,
    },

    /// Assignment to an existing binding: x = value
    Assignment {
        target: Identifier,
        value: Box<Expr>,
    },
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
}

impl ArithmeticOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(ArithmeticOp::Add),
            "-" => Some(ArithmeticOp::Sub),
            "*" => Some(ArithmeticOp::Mul),
            "/" => Some(ArithmeticOp::Div),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "+"),
            ArithmeticOp::Sub => write!(f, "-"),
            ArithmeticOp::Mul => write!(f, "*"),
            ArithmeticOp::Div => write!(f, "/"),
        }
    }
}

/// Relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOp {
    Eq, // ==
    Lt, // <
}

impl RelationalOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(RelationalOp::Eq),
            "<" => Some(RelationalOp::Lt),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationalOp::Eq => write!(f, "=="),
            RelationalOp::Lt => write!(f, "<"),
        }
    }
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(LogicalOp::And),
            "||" => Some(LogicalOp::Or),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOp::And => write!(f, "&&"),
            LogicalOp::Or => write!(f, "||"),
        }
    }
}

/// One `name = init` pair of a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub identifier: Identifier,
    pub initializer: Expr,
}

/// `let a = 1, b = a + 1`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub declarators: Vec<Declarator>,
}

/// Declarations followed by the expression whose value the block yields
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub declarations: Vec<VariableDeclaration>,
    pub tail: Expr,
}

/// A complete program. Same shape as a block, at top level.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<VariableDeclaration>,
    pub tail: Expr,
}

impl Program {
    pub fn new(declarations: Vec<VariableDeclaration>, tail: Expr) -> Self {
        Self { declarations, tail }
    }
}

/// Any node the parser can produce and the evaluator can run
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Program(Program),
    Block(Block),
    Declaration(VariableDeclaration),
    Declarator(Declarator),
    Expr(Expr),
}

impl From<Expr> for Node {
    fn from(expr: Expr) -> Self {
        Node::Expr(expr)
    }
}

impl From<Program> for Node {
    fn from(program: Program) -> Self {
        Node::Program(program)
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<VariableDeclaration> for Node {
    fn from(declaration: VariableDeclaration) -> Self {
        Node::Declaration(declaration)
    }
}

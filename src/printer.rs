//! Textual rendering of trees and evaluation results
//!
//! Nodes print as parenthesized, kind-tagged forms such as
//! `(arithmetic + (number 1) (identifier x))`. Results print as
//! `(value (number 3))` or `(error "message")`.

use std::fmt;

use crate::ast::{Block, Declarator, Expr, Identifier, Node, Program, VariableDeclaration};
use crate::error::RuntimeError;
use crate::value::Value;

/// Render any node
pub fn render_node(node: &Node) -> String {
    node.to_string()
}

/// Render an evaluation result
pub fn render_result(result: &Result<Value, RuntimeError>) -> String {
    match result {
        Ok(value) => format!("(value {})", render_value(value)),
        Err(err) => format!("(error \"{}\")", err),
    }
}

/// Render a value tagged with its kind
pub fn render_value(value: &Value) -> String {
    let tag = value.type_name();
    match value {
        Value::Bool(b) => format!("({} {})", tag, b),
        Value::Number(n) => format!("({} {})", tag, n),
        Value::Void => format!("({})", tag),
        Value::Closure(c) => format!("({} {})", tag, c.parameter.name),
    }
}

fn write_declarations(
    f: &mut fmt::Formatter<'_>,
    declarations: &[VariableDeclaration],
) -> fmt::Result {
    for (i, declaration) in declarations.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", declaration)?;
    }
    Ok(())
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(identifier {})", self.name)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Bool(b) => write!(f, "(boolean {})", b),
            Expr::Number(n) => write!(f, "(number {})", n),
            Expr::Arithmetic { op, left, right } => {
                write!(f, "(arithmetic {} {} {})", op, left, right)
            }
            Expr::Relational { op, left, right } => {
                write!(f, "(relational {} {} {})", op, left, right)
            }
            Expr::Logical { op, left, right } => {
                write!(f, "(logical {} {} {})", op, left, right)
            }
            Expr::Unary { argument } => write!(f, "(unary ! {})", argument),
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => write!(f, "(conditional {} {} {})", test, consequent, alternate),
            Expr::Ident(identifier) => write!(f, "{}", identifier),
            Expr::Function { parameter, body } => write!(f, "(function {} {})", parameter, body),
            Expr::Call { callee, argument } => write!(f, "(call {} {})", callee, argument),
            Expr::Assignment { target, value } => write!(f, "(assignment {} {})", target, value),
        }
    }
}

impl fmt::Display for Declarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(variable_declarator {} {})", self.identifier, self.initializer)
    }
}

impl fmt::Display for VariableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(variable_declaration ")?;
        for (i, declarator) in self.declarators.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", declarator)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(block_statement ")?;
        if !self.declarations.is_empty() {
            write_declarations(f, &self.declarations)?;
            write!(f, " ")?;
        }
        write!(f, "{})", self.tail)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for declaration in &self.declarations {
            writeln!(f, "{}", declaration)?;
        }
        write!(f, "{}", self.tail)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Program(program) => write!(f, "{}", program),
            Node::Block(block) => write!(f, "{}", block),
            Node::Declaration(declaration) => write!(f, "{}", declaration),
            Node::Declarator(declarator) => write!(f, "{}", declarator),
            Node::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

//! Parser for ESTree JSON
//!
//! Converts the JSON tree emitted by acorn into the AST. Only the subset of
//! ESTree the language supports is accepted; anything else is rejected with
//! the JSON path of the offending node.

use std::rc::Rc;

use serde_json::Value as JsonValue;

use crate::ast::{
    ArithmeticOp, Block, Declarator, Expr, Identifier, LogicalOp, Node, Program, RelationalOp,
    VariableDeclaration,
};
use crate::error::{ParseError, ParseErrorKind};

type PResult<T> = std::result::Result<T, ParseError>;

/// Parse JSON text holding an ESTree `Program`
pub fn parse_str(source: &str) -> PResult<Program> {
    let tree: JsonValue = serde_json::from_str(source)
        .map_err(|e| ParseError::new(ParseErrorKind::MalformedJson(e.to_string())))?;
    Parser::new().parse_program(&tree)
}

/// Parse any supported ESTree node
pub fn parse_node(tree: &JsonValue) -> PResult<Node> {
    Parser::new().parse_node(tree)
}

/// Where the final statement of a body may come from
#[derive(Clone, Copy, PartialEq)]
enum Body {
    Program,
    Block,
}

impl Body {
    fn name(self) -> &'static str {
        match self {
            Body::Program => "program",
            Body::Block => "block",
        }
    }
}

/// The parser state: the path from the root to the node being parsed
pub struct Parser {
    path: Vec<String>,
}

impl Parser {
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Parse a tree whose root must be a `Program`
    pub fn parse_program(&mut self, tree: &JsonValue) -> PResult<Program> {
        let kind = self.node_type(tree)?;
        if kind != "Program" {
            return Err(self.error(ParseErrorKind::Misplaced {
                expected: "a Program",
                found: kind.to_string(),
            }));
        }
        self.program(tree)
    }

    /// Parse a tree rooted at any supported node
    pub fn parse_node(&mut self, tree: &JsonValue) -> PResult<Node> {
        match self.node_type(tree)? {
            "Program" => self.program(tree).map(Node::Program),
            "BlockStatement" => self.block(tree).map(Node::Block),
            "VariableDeclaration" => self.declaration(tree).map(Node::Declaration),
            "VariableDeclarator" => self.declarator(tree).map(Node::Declarator),
            "ExpressionStatement" => self.descend(".expression", |p| {
                let expression = p.field(tree, "ExpressionStatement", "expression")?;
                p.expression(expression)
            })
            .map(Node::Expr),
            "ReturnStatement" => self.descend(".argument", |p| {
                let argument = p.field(tree, "ReturnStatement", "argument")?;
                p.expression(argument)
            })
            .map(Node::Expr),
            _ => self.expression(tree).map(Node::Expr),
        }
    }

    // ==================== Statements ====================

    fn program(&mut self, tree: &JsonValue) -> PResult<Program> {
        let body = self.array(tree, "Program", "body")?;
        let (declarations, tail) = self.descend(".body", |p| p.body(body, Body::Program))?;
        Ok(Program::new(declarations, tail))
    }

    fn block(&mut self, tree: &JsonValue) -> PResult<Block> {
        let body = self.array(tree, "BlockStatement", "body")?;
        let (declarations, tail) = self.descend(".body", |p| p.body(body, Body::Block))?;
        Ok(Block { declarations, tail })
    }

    /// Declarations followed by exactly one final expression
    fn body(
        &mut self,
        items: &[JsonValue],
        body: Body,
    ) -> PResult<(Vec<VariableDeclaration>, Expr)> {
        let Some((last, leading)) = items.split_last() else {
            return Err(self.error(ParseErrorKind::EmptyBody(body.name())));
        };

        let mut declarations = Vec::with_capacity(leading.len());
        for (i, item) in leading.iter().enumerate() {
            let declaration = self.descend(&format!("[{}]", i), |p| {
                let kind = p.node_type(item)?;
                if kind != "VariableDeclaration" {
                    return Err(p.error(ParseErrorKind::Misplaced {
                        expected: "a variable declaration",
                        found: kind.to_string(),
                    }));
                }
                p.declaration(item)
            })?;
            declarations.push(declaration);
        }

        let tail = self.descend(&format!("[{}]", leading.len()), |p| p.tail(last, body))?;
        Ok((declarations, tail))
    }

    fn tail(&mut self, item: &JsonValue, body: Body) -> PResult<Expr> {
        let kind = self.node_type(item)?;
        match kind {
            "ExpressionStatement" => {
                let expression = self.field(item, kind, "expression")?;
                self.descend(".expression", |p| p.expression(expression))
            }
            "ReturnStatement" if body == Body::Block => {
                let argument = self.field(item, kind, "argument")?;
                self.descend(".argument", |p| p.expression(argument))
            }
            _ => Err(self.error(ParseErrorKind::Misplaced {
                expected: "a final expression",
                found: kind.to_string(),
            })),
        }
    }

    fn declaration(&mut self, tree: &JsonValue) -> PResult<VariableDeclaration> {
        let items = self.array(tree, "VariableDeclaration", "declarations")?;
        if items.is_empty() {
            return Err(self.error(ParseErrorKind::EmptyBody("variable declaration")));
        }

        let mut declarators = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let declarator = self.descend(&format!(".declarations[{}]", i), |p| {
                let kind = p.node_type(item)?;
                if kind != "VariableDeclarator" {
                    return Err(p.error(ParseErrorKind::Misplaced {
                        expected: "a VariableDeclarator",
                        found: kind.to_string(),
                    }));
                }
                p.declarator(item)
            })?;
            declarators.push(declarator);
        }
        Ok(VariableDeclaration { declarators })
    }

    fn declarator(&mut self, tree: &JsonValue) -> PResult<Declarator> {
        let id = self.field(tree, "VariableDeclarator", "id")?;
        let init = self.field(tree, "VariableDeclarator", "init")?;

        let identifier = self.descend(".id", |p| p.identifier(id))?;
        let initializer = self.descend(".init", |p| p.expression(init))?;
        Ok(Declarator {
            identifier,
            initializer,
        })
    }

    // ==================== Expressions ====================

    fn expression(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let kind = self.node_type(tree)?;
        match kind {
            "Literal" => self.literal(tree),
            "Identifier" => self.identifier(tree).map(Expr::Ident),
            "BinaryExpression" => self.binary(tree),
            "LogicalExpression" => self.logical(tree),
            "UnaryExpression" => self.unary(tree),
            "ConditionalExpression" => self.conditional(tree),
            "FunctionExpression" => self.function(tree),
            "CallExpression" => self.call(tree),
            "AssignmentExpression" => self.assignment(tree),
            "Program" | "BlockStatement" | "VariableDeclaration" | "VariableDeclarator"
            | "ExpressionStatement" | "ReturnStatement" => {
                Err(self.error(ParseErrorKind::Misplaced {
                    expected: "an expression",
                    found: kind.to_string(),
                }))
            }
            _ => Err(self.error(ParseErrorKind::UnrecognizedNode(kind.to_string()))),
        }
    }

    fn literal(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let value = self.field(tree, "Literal", "value")?;
        match value {
            JsonValue::Bool(b) => Ok(Expr::Bool(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(n) => Ok(Expr::Number(n)),
                None => Err(self.error(ParseErrorKind::InvalidLiteral(n.to_string()))),
            },
            other => Err(self.error(ParseErrorKind::InvalidLiteral(other.to_string()))),
        }
    }

    fn identifier(&mut self, tree: &JsonValue) -> PResult<Identifier> {
        let kind = self.node_type(tree)?;
        if kind != "Identifier" {
            return Err(self.error(ParseErrorKind::Misplaced {
                expected: "an Identifier",
                found: kind.to_string(),
            }));
        }
        let name = self.string(tree, "Identifier", "name")?;
        Ok(Identifier::new(name))
    }

    fn binary(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let operator = self.string(tree, "BinaryExpression", "operator")?;
        let (left, right) = self.operands(tree, "BinaryExpression")?;

        if let Some(op) = ArithmeticOp::from_symbol(operator) {
            Ok(Expr::Arithmetic { op, left, right })
        } else if let Some(op) = RelationalOp::from_symbol(operator) {
            Ok(Expr::Relational { op, left, right })
        } else {
            Err(self.error(ParseErrorKind::UnsupportedOperator {
                node: "binary",
                operator: operator.to_string(),
            }))
        }
    }

    fn logical(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let operator = self.string(tree, "LogicalExpression", "operator")?;
        let Some(op) = LogicalOp::from_symbol(operator) else {
            return Err(self.error(ParseErrorKind::UnsupportedOperator {
                node: "logical",
                operator: operator.to_string(),
            }));
        };
        let (left, right) = self.operands(tree, "LogicalExpression")?;
        Ok(Expr::Logical { op, left, right })
    }

    fn operands(&mut self, tree: &JsonValue, kind: &str) -> PResult<(Box<Expr>, Box<Expr>)> {
        let left = self.field(tree, kind, "left")?;
        let right = self.field(tree, kind, "right")?;
        let left = self.descend(".left", |p| p.expression(left))?;
        let right = self.descend(".right", |p| p.expression(right))?;
        Ok((Box::new(left), Box::new(right)))
    }

    fn unary(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let operator = self.string(tree, "UnaryExpression", "operator")?;
        let argument = self.field(tree, "UnaryExpression", "argument")?;
        let argument = self.descend(".argument", |p| p.expression(argument))?;

        match (operator, argument) {
            ("!", argument) => Ok(Expr::Unary {
                argument: Box::new(argument),
            }),
            // acorn emits `-7` as a negated literal
            ("-", Expr::Number(n)) => match n.checked_neg() {
                Some(n) => Ok(Expr::Number(n)),
                None => Err(self.error(ParseErrorKind::InvalidLiteral(format!("-{}", n)))),
            },
            _ => Err(self.error(ParseErrorKind::UnsupportedOperator {
                node: "unary",
                operator: operator.to_string(),
            })),
        }
    }

    fn conditional(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let test = self.field(tree, "ConditionalExpression", "test")?;
        let consequent = self.field(tree, "ConditionalExpression", "consequent")?;
        let alternate = self.field(tree, "ConditionalExpression", "alternate")?;

        let test = self.descend(".test", |p| p.expression(test))?;
        let consequent = self.descend(".consequent", |p| p.expression(consequent))?;
        let alternate = self.descend(".alternate", |p| p.expression(alternate))?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn function(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let params = self.array(tree, "FunctionExpression", "params")?;
        let [param] = params.as_slice() else {
            return Err(self.error(ParseErrorKind::WrongParameterCount(params.len())));
        };
        let body = self.field(tree, "FunctionExpression", "body")?;

        let parameter = self.descend(".params[0]", |p| p.identifier(param))?;
        let body = self.descend(".body", |p| {
            let kind = p.node_type(body)?;
            if kind != "BlockStatement" {
                return Err(p.error(ParseErrorKind::Misplaced {
                    expected: "a BlockStatement",
                    found: kind.to_string(),
                }));
            }
            p.block(body)
        })?;
        Ok(Expr::Function {
            parameter,
            body: Rc::new(body),
        })
    }

    fn call(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let callee = self.field(tree, "CallExpression", "callee")?;
        let arguments = self.array(tree, "CallExpression", "arguments")?;
        let [argument] = arguments.as_slice() else {
            return Err(self.error(ParseErrorKind::WrongArgumentCount(arguments.len())));
        };

        let callee = self.descend(".callee", |p| p.expression(callee))?;
        let argument = self.descend(".arguments[0]", |p| p.expression(argument))?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            argument: Box::new(argument),
        })
    }

    fn assignment(&mut self, tree: &JsonValue) -> PResult<Expr> {
        let operator = self.string(tree, "AssignmentExpression", "operator")?;
        if operator != "=" {
            return Err(self.error(ParseErrorKind::UnsupportedOperator {
                node: "assignment",
                operator: operator.to_string(),
            }));
        }
        let left = self.field(tree, "AssignmentExpression", "left")?;
        let right = self.field(tree, "AssignmentExpression", "right")?;

        let target = self.descend(".left", |p| p.identifier(left))?;
        let value = self.descend(".right", |p| p.expression(right))?;
        Ok(Expr::Assignment {
            target,
            value: Box::new(value),
        })
    }

    // ==================== Helpers ====================

    /// Run `f` one level deeper in the tree, tagging any error with the path
    fn descend<T>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        self.path.push(segment.to_string());
        let result = f(self).map_err(|e| e.with_path(&self.current_path()));
        self.path.pop();
        result
    }

    fn current_path(&self) -> String {
        let path = self.path.concat();
        path.trim_start_matches('.').to_string()
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind).with_path(&self.current_path())
    }

    fn node_type<'a>(&self, tree: &'a JsonValue) -> PResult<&'a str> {
        let Some(object) = tree.as_object() else {
            return Err(self.error(ParseErrorKind::ExpectedNode));
        };
        match object.get("type") {
            Some(JsonValue::String(kind)) => Ok(kind.as_str()),
            Some(_) => Err(self.error(ParseErrorKind::InvalidField {
                node: "node".to_string(),
                field: "type",
                expected: "a string",
            })),
            None => Err(self.error(ParseErrorKind::MissingField {
                node: "node".to_string(),
                field: "type",
            })),
        }
    }

    /// A required field. `null` counts as missing.
    fn field<'a>(
        &self,
        tree: &'a JsonValue,
        kind: &str,
        field: &'static str,
    ) -> PResult<&'a JsonValue> {
        match tree.get(field) {
            Some(JsonValue::Null) | None => Err(self.error(ParseErrorKind::MissingField {
                node: kind.to_string(),
                field,
            })),
            Some(value) => Ok(value),
        }
    }

    fn array<'a>(
        &self,
        tree: &'a JsonValue,
        kind: &str,
        field: &'static str,
    ) -> PResult<&'a Vec<JsonValue>> {
        self.field(tree, kind, field)?.as_array().ok_or_else(|| {
            self.error(ParseErrorKind::InvalidField {
                node: kind.to_string(),
                field,
                expected: "an array",
            })
        })
    }

    fn string<'a>(&self, tree: &'a JsonValue, kind: &str, field: &'static str) -> PResult<&'a str> {
        self.field(tree, kind, field)?.as_str().ok_or_else(|| {
            self.error(ParseErrorKind::InvalidField {
                node: kind.to_string(),
                field,
                expected: "a string",
            })
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

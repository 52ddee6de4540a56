//! Rendering of parsed trees

mod common;

use std::rc::Rc;

use common::*;
use estree_eval::ast::{
    ArithmeticOp, Block, Declarator, Expr, Identifier, LogicalOp, Node, Program,
    VariableDeclaration,
};
use estree_eval::printer::render_node;
use estree_eval::{parse_node, parse_str};
use pretty_assertions::assert_eq;

fn sample_tree() -> serde_json::Value {
    // let a = 1, f = function (x) { let y = x; return y && true }; a - 2
    program(vec![
        let_(&[
            ("a", num(1)),
            (
                "f",
                function(
                    "x",
                    vec![
                        let_(&[("y", ident("x"))]),
                        ret(logical("&&", ident("y"), boolean(true))),
                    ],
                ),
            ),
        ]),
        stmt(binary("-", ident("a"), num(2))),
    ])
}

fn sample_ast() -> Program {
    let body = Block {
        declarations: vec![VariableDeclaration {
            declarators: vec![Declarator {
                identifier: Identifier::new("y"),
                initializer: Expr::Ident(Identifier::new("x")),
            }],
        }],
        tail: Expr::Logical {
            op: LogicalOp::And,
            left: Box::new(Expr::Ident(Identifier::new("y"))),
            right: Box::new(Expr::Bool(true)),
        },
    };
    Program::new(
        vec![VariableDeclaration {
            declarators: vec![
                Declarator {
                    identifier: Identifier::new("a"),
                    initializer: Expr::Number(1),
                },
                Declarator {
                    identifier: Identifier::new("f"),
                    initializer: Expr::Function {
                        parameter: Identifier::new("x"),
                        body: Rc::new(body),
                    },
                },
            ],
        }],
        Expr::Arithmetic {
            op: ArithmeticOp::Sub,
            left: Box::new(Expr::Ident(Identifier::new("a"))),
            right: Box::new(Expr::Number(2)),
        },
    )
}

#[test]
fn test_render_parsed_program() {
    let parsed = parse_str(&sample_tree().to_string()).unwrap();
    let expected = "(variable_declaration \
        (variable_declarator (identifier a) (number 1)), \
        (variable_declarator (identifier f) (function (identifier x) (block_statement \
        (variable_declaration (variable_declarator (identifier y) (identifier x))) \
        (logical && (identifier y) (boolean true))))))\n\
        (arithmetic - (identifier a) (number 2))";
    assert_eq!(render_node(&Node::Program(parsed)), expected);
}

#[test]
fn test_parsed_and_hand_built_render_identically() {
    let parsed = parse_str(&sample_tree().to_string()).unwrap();
    let built = sample_ast();
    assert_eq!(parsed, built);
    assert_eq!(
        render_node(&Node::Program(parsed)),
        render_node(&Node::Program(built))
    );
}

#[test]
fn test_render_is_stable_across_reparse() {
    let first = render_node(&parse_node(&sample_tree()).unwrap());
    let second = render_node(&parse_node(&sample_tree()).unwrap());
    assert_eq!(first, second);
}

#[test]
fn test_render_remaining_kinds() {
    let tree = stmt(cond(
        not(binary("==", ident("a"), num(0))),
        call(ident("f"), num(1)),
        assign("a", num(3)),
    ));
    assert_eq!(
        render_node(&parse_node(&tree).unwrap()),
        "(conditional (unary ! (relational == (identifier a) (number 0))) \
         (call (identifier f) (number 1)) (assignment (identifier a) (number 3)))"
    );
}

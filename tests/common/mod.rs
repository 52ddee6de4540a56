//! ESTree JSON builders shaped like acorn output

#![allow(dead_code)]

use estree_eval::{run, RuntimeResult, Value};
use serde_json::{json, Value as JsonValue};

pub fn program(body: Vec<JsonValue>) -> JsonValue {
    json!({ "type": "Program", "body": body, "sourceType": "script" })
}

pub fn stmt(expression: JsonValue) -> JsonValue {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

pub fn ret(argument: JsonValue) -> JsonValue {
    json!({ "type": "ReturnStatement", "argument": argument })
}

pub fn let_(declarators: &[(&str, JsonValue)]) -> JsonValue {
    let declarations: Vec<JsonValue> = declarators
        .iter()
        .map(|(name, init)| {
            json!({ "type": "VariableDeclarator", "id": ident(name), "init": init })
        })
        .collect();
    json!({ "type": "VariableDeclaration", "kind": "let", "declarations": declarations })
}

pub fn num(n: i64) -> JsonValue {
    json!({ "type": "Literal", "value": n, "raw": n.to_string() })
}

pub fn boolean(b: bool) -> JsonValue {
    json!({ "type": "Literal", "value": b, "raw": b.to_string() })
}

pub fn ident(name: &str) -> JsonValue {
    json!({ "type": "Identifier", "name": name })
}

pub fn binary(operator: &str, left: JsonValue, right: JsonValue) -> JsonValue {
    json!({ "type": "BinaryExpression", "operator": operator, "left": left, "right": right })
}

pub fn logical(operator: &str, left: JsonValue, right: JsonValue) -> JsonValue {
    json!({ "type": "LogicalExpression", "operator": operator, "left": left, "right": right })
}

pub fn not(argument: JsonValue) -> JsonValue {
    json!({ "type": "UnaryExpression", "operator": "!", "prefix": true, "argument": argument })
}

pub fn cond(test: JsonValue, consequent: JsonValue, alternate: JsonValue) -> JsonValue {
    json!({
        "type": "ConditionalExpression",
        "test": test,
        "consequent": consequent,
        "alternate": alternate,
    })
}

pub fn function(param: &str, body: Vec<JsonValue>) -> JsonValue {
    json!({
        "type": "FunctionExpression",
        "id": null,
        "params": [ident(param)],
        "body": { "type": "BlockStatement", "body": body },
    })
}

pub fn call(callee: JsonValue, argument: JsonValue) -> JsonValue {
    json!({ "type": "CallExpression", "callee": callee, "arguments": [argument], "optional": false })
}

pub fn assign(name: &str, value: JsonValue) -> JsonValue {
    json!({ "type": "AssignmentExpression", "operator": "=", "left": ident(name), "right": value })
}

/// Parse and evaluate a tree, failing the test on parse errors
pub fn eval(tree: JsonValue) -> RuntimeResult {
    run(&tree.to_string()).expect("tree should parse")
}

pub fn eval_ok(tree: JsonValue) -> Value {
    match eval(tree) {
        Ok(value) => value,
        Err(e) => panic!("expected a value, got error: {}", e),
    }
}

pub fn eval_err(tree: JsonValue) -> String {
    match eval(tree) {
        Ok(value) => panic!("expected an error, got {:?}", value),
        Err(e) => e.to_string(),
    }
}

//! Tree-walking evaluator
//!
//! Evaluation threads an environment and a heap through every step. The
//! environment is passed down explicitly and only declarations extend it;
//! the heap lives in the evaluator and is handed back to the caller when
//! evaluation finishes. Language-level errors are ordinary `Err` values
//! that stop evaluation at the first failure.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::ast::{
    ArithmeticOp, Declarator, Expr, Identifier, LogicalOp, Node, Program, RelationalOp,
    VariableDeclaration,
};
use crate::environment::Environment;
use crate::error::{Operand, RuntimeError};
use crate::heap::Heap;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Closure, Value};

/// Maximum nesting of closure calls
const MAX_CALL_DEPTH: usize = 256;

/// Either a value or a language-level error
pub type RuntimeResult = std::result::Result<Value, RuntimeError>;

/// Outcome of an evaluation together with the state it ended in
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub result: RuntimeResult,
    pub environment: Environment,
    pub heap: Heap,
}

/// Evaluate `node` starting from `environment` and `heap`.
///
/// The returned environment carries the bindings added by top-level
/// declarations of the node; bindings made inside function calls never
/// escape. The returned heap reflects every allocation and write, including
/// those performed inside calls, up to the point evaluation stopped.
pub fn evaluate(node: &Node, environment: Environment, heap: Heap) -> Evaluation {
    let mut evaluator = Evaluator::new(heap);
    let mut environment = environment;

    let result = match node {
        Node::Program(program) => {
            evaluator.body(&program.declarations, &program.tail, &mut environment)
        }
        Node::Block(block) => evaluator.body(&block.declarations, &block.tail, &mut environment),
        Node::Declaration(declaration) => evaluator
            .declaration(declaration, &mut environment)
            .map(|()| Value::Void),
        Node::Declarator(declarator) => evaluator
            .declarator(declarator, &mut environment)
            .map(|()| Value::Void),
        Node::Expr(expr) => evaluator.expr(expr, &environment),
    };

    if let Err(err) = &result {
        debug!(error = %err, "evaluation stopped");
    }

    Evaluation {
        result,
        environment,
        heap: evaluator.heap,
    }
}

/// Evaluate a program from a fresh, empty environment and heap
pub fn evaluate_program(program: &Program) -> Evaluation {
    evaluate_program_in(program, Environment::new(), Heap::new())
}

/// Evaluate a program against existing state
pub fn evaluate_program_in(program: &Program, environment: Environment, heap: Heap) -> Evaluation {
    let mut evaluator = Evaluator::new(heap);
    let mut environment = environment;
    let result = evaluator.body(&program.declarations, &program.tail, &mut environment);
    Evaluation {
        result,
        environment,
        heap: evaluator.heap,
    }
}

/// Evaluation state that outlives a single program: top-level bindings and
/// the heap they point into
#[derive(Debug, Clone, Default)]
pub struct Session {
    environment: Environment,
    heap: Heap,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `program`, keeping its top-level declarations for later programs
    pub fn run(&mut self, program: &Program) -> RuntimeResult {
        let evaluation =
            evaluate_program_in(program, self.environment.clone(), self.heap.clone());
        self.environment = evaluation.environment;
        self.heap = evaluation.heap;
        evaluation.result
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }
}

struct Evaluator {
    heap: Heap,
    depth: usize,
}

impl Evaluator {
    fn new(heap: Heap) -> Self {
        Self { heap, depth: 0 }
    }

    // ==================== Declarations ====================

    /// Declarations in order, then the tail in the extended environment
    fn body(
        &mut self,
        declarations: &[VariableDeclaration],
        tail: &Expr,
        env: &mut Environment,
    ) -> RuntimeResult {
        for declaration in declarations {
            self.declaration(declaration, env)?;
        }
        self.expr(tail, env)
    }

    fn declaration(
        &mut self,
        declaration: &VariableDeclaration,
        env: &mut Environment,
    ) -> Result<(), RuntimeError> {
        for declarator in &declaration.declarators {
            self.declarator(declarator, env)?;
        }
        Ok(())
    }

    fn declarator(
        &mut self,
        declarator: &Declarator,
        env: &mut Environment,
    ) -> Result<(), RuntimeError> {
        let value = self.expr(&declarator.initializer, env)?;
        let name = &declarator.identifier.name;

        // Extend before allocating so a rejected name leaves no orphan cell.
        let extended = env.extend(name, self.heap.next_address())?;
        let address = self.heap.allocate(value);
        debug!(name = %name, %address, "declared");

        *env = extended;
        Ok(())
    }

    // ==================== Expressions ====================

    fn expr(&mut self, expr: &Expr, env: &Environment) -> RuntimeResult {
        ensure_sufficient_stack(|| self.expr_inner(expr, env))
    }

    fn expr_inner(&mut self, expr: &Expr, env: &Environment) -> RuntimeResult {
        match expr {
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Arithmetic { op, left, right } => self.arithmetic(*op, left, right, env),
            Expr::Relational { op, left, right } => self.relational(*op, left, right, env),
            Expr::Logical { op, left, right } => self.logical(*op, left, right, env),
            Expr::Unary { argument } => {
                let value = self.expr(argument, env)?;
                let b = expect_bool(&value, Operand::Argument, "unary")?;
                Ok(Value::Bool(!b))
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let value = self.expr(test, env)?;
                if expect_bool(&value, Operand::Test, "conditional")? {
                    self.expr(consequent, env)
                } else {
                    self.expr(alternate, env)
                }
            }
            Expr::Ident(identifier) => self.identifier(identifier, env),
            Expr::Function { parameter, body } => Ok(Value::Closure(Rc::new(Closure::new(
                parameter.clone(),
                Rc::clone(body),
                env.clone(),
            )))),
            Expr::Call { callee, argument } => self.call(callee, argument, env),
            Expr::Assignment { target, value } => {
                let value = self.expr(value, env)?;
                let address = env
                    .lookup(&target.name)
                    .ok_or_else(|| RuntimeError::UnboundIdentifier(target.name.clone()))?;
                trace!(name = %target.name, %address, %value, "assigned");
                self.heap.write(address, value);
                Ok(Value::Void)
            }
        }
    }

    fn arithmetic(
        &mut self,
        op: ArithmeticOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> RuntimeResult {
        // Both sides run even when the left one fails.
        let left = self.expr(left, env);
        let right = self.expr(right, env);
        let (left, right) = (left?, right?);

        let a = expect_number(&left, Operand::Left, "arithmetic")?;
        let b = expect_number(&right, Operand::Right, "arithmetic")?;

        let result = match op {
            ArithmeticOp::Add => a.checked_add(b),
            ArithmeticOp::Sub => a.checked_sub(b),
            ArithmeticOp::Mul => a.checked_mul(b),
            ArithmeticOp::Div => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                floor_div(a, b)
            }
        };
        result.map(Value::Number).ok_or(RuntimeError::Overflow)
    }

    fn relational(
        &mut self,
        op: RelationalOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> RuntimeResult {
        let left = self.expr(left, env);
        let right = self.expr(right, env);
        let (left, right) = (left?, right?);

        let a = expect_number(&left, Operand::Left, "relational")?;
        let b = expect_number(&right, Operand::Right, "relational")?;

        Ok(Value::Bool(match op {
            RelationalOp::Eq => a == b,
            RelationalOp::Lt => a < b,
        }))
    }

    fn logical(
        &mut self,
        op: LogicalOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> RuntimeResult {
        let left = self.expr(left, env)?;
        let a = expect_bool(&left, Operand::Left, "logical")?;

        match (op, a) {
            (LogicalOp::And, false) => return Ok(Value::Bool(false)),
            (LogicalOp::Or, true) => return Ok(Value::Bool(true)),
            _ => {}
        }

        let right = self.expr(right, env)?;
        let b = expect_bool(&right, Operand::Right, "logical")?;
        Ok(Value::Bool(b))
    }

    fn identifier(&self, identifier: &Identifier, env: &Environment) -> RuntimeResult {
        match env.lookup(&identifier.name) {
            Some(address) => Ok(self.heap.read(address).clone()),
            None => Err(RuntimeError::UnboundIdentifier(identifier.name.clone())),
        }
    }

    fn call(&mut self, callee: &Expr, argument: &Expr, env: &Environment) -> RuntimeResult {
        let Value::Closure(closure) = self.expr(callee, env)? else {
            return Err(RuntimeError::NotCallable(callee.to_string()));
        };
        let argument = self.expr(argument, env)?;

        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded(MAX_CALL_DEPTH));
        }

        let address = self.heap.allocate(argument);
        let mut local = closure.environment.bind(&closure.parameter.name, address);
        trace!(
            parameter = %closure.parameter.name,
            %address,
            depth = self.depth,
            "calling closure"
        );

        self.depth += 1;
        let result = self.body(&closure.body.declarations, &closure.body.tail, &mut local);
        self.depth -= 1;
        result
    }
}

fn expect_number(
    value: &Value,
    operand: Operand,
    expression: &'static str,
) -> Result<i64, RuntimeError> {
    value.as_number().ok_or_else(|| RuntimeError::TypeMismatch {
        operand,
        expression,
        value: value.to_string(),
        expected: "number",
    })
}

fn expect_bool(
    value: &Value,
    operand: Operand,
    expression: &'static str,
) -> Result<bool, RuntimeError> {
    value.as_bool().ok_or_else(|| RuntimeError::TypeMismatch {
        operand,
        expression,
        value: value.to_string(),
        expected: "boolean",
    })
}

/// Quotient rounded toward negative infinity. `None` on overflow.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Block;

    fn num(n: i64) -> Box<Expr> {
        Box::new(Expr::Number(n))
    }

    fn boolean(b: bool) -> Box<Expr> {
        Box::new(Expr::Bool(b))
    }

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::Ident(Identifier::new(name)))
    }

    fn let_(name: &str, init: Expr) -> VariableDeclaration {
        VariableDeclaration {
            declarators: vec![Declarator {
                identifier: Identifier::new(name),
                initializer: init,
            }],
        }
    }

    fn eval(expr: Expr) -> RuntimeResult {
        evaluate(&Node::Expr(expr), Environment::new(), Heap::new()).result
    }

    #[test]
    fn test_floor_div() {
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(-7, -2), Some(3));
        assert_eq!(floor_div(6, 3), Some(2));
        assert_eq!(floor_div(-6, 3), Some(-2));
        assert_eq!(floor_div(i64::MIN, -1), None);
    }

    #[test]
    fn test_arithmetic_left_error_wins() {
        let expr = Expr::Arithmetic {
            op: ArithmeticOp::Add,
            left: ident("a"),
            right: ident("b"),
        };
        assert_eq!(eval(expr), Err(RuntimeError::UnboundIdentifier("a".into())));
    }

    #[test]
    fn test_arithmetic_right_runs_after_left_fails() {
        // x = 5 on the right must still happen although the left side fails
        let program = Program::new(
            vec![let_("x", Expr::Number(1))],
            Expr::Arithmetic {
                op: ArithmeticOp::Add,
                left: ident("missing"),
                right: Box::new(Expr::Assignment {
                    target: Identifier::new("x"),
                    value: num(5),
                }),
            },
        );
        let evaluation = evaluate_program(&program);
        assert_eq!(
            evaluation.result,
            Err(RuntimeError::UnboundIdentifier("missing".into()))
        );
        let address = evaluation.environment.lookup("x").unwrap();
        assert_eq!(evaluation.heap.read(address), &Value::Number(5));
    }

    #[test]
    fn test_bool_operand_rejected() {
        let expr = Expr::Relational {
            op: RelationalOp::Eq,
            left: num(1),
            right: boolean(true),
        };
        assert_eq!(
            eval(expr).unwrap_err().to_string(),
            "right value of relational expression (true) must be number"
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let expr = Expr::Arithmetic {
            op: ArithmeticOp::Mul,
            left: num(i64::MAX),
            right: num(2),
        };
        assert_eq!(eval(expr), Err(RuntimeError::Overflow));
    }

    #[test]
    fn test_untaken_branch_not_evaluated() {
        let expr = Expr::Conditional {
            test: boolean(true),
            consequent: num(1),
            alternate: ident("boom"),
        };
        assert_eq!(eval(expr), Ok(Value::Number(1)));
    }

    #[test]
    fn test_declaration_returns_extended_environment() {
        let node = Node::Declaration(VariableDeclaration {
            declarators: vec![
                Declarator {
                    identifier: Identifier::new("a"),
                    initializer: Expr::Number(2),
                },
                Declarator {
                    identifier: Identifier::new("b"),
                    initializer: *ident("a"),
                },
            ],
        });
        let evaluation = evaluate(&node, Environment::new(), Heap::new());
        assert_eq!(evaluation.result, Ok(Value::Void));
        assert_eq!(evaluation.environment.len(), 2);
        let b = evaluation.environment.lookup("b").unwrap();
        assert_eq!(evaluation.heap.read(b), &Value::Number(2));
    }

    #[test]
    fn test_rejected_declaration_allocates_nothing() {
        let program = Program::new(
            vec![let_("a", Expr::Number(1)), let_("a", Expr::Number(2))],
            *ident("a"),
        );
        let evaluation = evaluate_program(&program);
        assert_eq!(evaluation.result, Err(RuntimeError::AlreadyDeclared("a".into())));
        assert_eq!(evaluation.heap.len(), 1);
    }

    #[test]
    fn test_call_does_not_leak_environment() {
        let function = Expr::Function {
            parameter: Identifier::new("p"),
            body: Rc::new(Block {
                declarations: vec![let_("inner", Expr::Number(3))],
                tail: *ident("inner"),
            }),
        };
        let program = Program::new(
            vec![let_("f", function)],
            Expr::Call {
                callee: ident("f"),
                argument: num(0),
            },
        );
        let evaluation = evaluate_program(&program);
        assert_eq!(evaluation.result, Ok(Value::Number(3)));
        assert!(!evaluation.environment.contains("p"));
        assert!(!evaluation.environment.contains("inner"));
        // f, the argument cell and inner
        assert_eq!(evaluation.heap.len(), 3);
    }

    #[test]
    fn test_call_depth_limit() {
        // let f = 0, ignored = (f = function (n) { return f(n) }); f(0)
        let program = Program::new(
            vec![
                let_("f", Expr::Number(0)),
                let_(
                    "ignored",
                    Expr::Assignment {
                        target: Identifier::new("f"),
                        value: Box::new(Expr::Function {
                            parameter: Identifier::new("n"),
                            body: Rc::new(Block {
                                declarations: vec![],
                                tail: Expr::Call {
                                    callee: ident("f"),
                                    argument: ident("n"),
                                },
                            }),
                        }),
                    },
                ),
            ],
            Expr::Call {
                callee: ident("f"),
                argument: num(0),
            },
        );
        assert_eq!(
            evaluate_program(&program).result,
            Err(RuntimeError::CallDepthExceeded(MAX_CALL_DEPTH))
        );
    }

    #[test]
    fn test_session_keeps_declarations() {
        let mut session = Session::new();
        let first = Program::new(vec![let_("x", Expr::Number(4))], *ident("x"));
        assert_eq!(session.run(&first), Ok(Value::Number(4)));

        let second = Program::new(
            vec![],
            Expr::Arithmetic {
                op: ArithmeticOp::Mul,
                left: ident("x"),
                right: num(2),
            },
        );
        assert_eq!(session.run(&second), Ok(Value::Number(8)));
        assert_eq!(session.heap().len(), 1);
    }
}

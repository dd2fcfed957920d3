//! AST → runtime values.
//!
//! Grounded on `original_source/src/interpreter.py`'s `Interpreter`
//! class: one dispatch per statement/expression node kind, a
//! `Return`-as-exception unwind replaced here by the `Signal` sum type
//! §9 calls for, and block scoping via a guaranteed-restore guard
//! instead of a `try/finally`.

use crate::ast::{Expr, FunctionDecl, IfStmt, Program, ReturnStmt, Statement, WhileStmt};
use crate::environment::Env;
use crate::error::{Error, Result};
use crate::token::{Token, TokenKind};
use crate::value::{Closure, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// The result of executing one statement: either control falls through
/// normally, or a `return` is unwinding toward the nearest enclosing
/// call frame. Not an error — see `crate::error::Error` for those.
enum Signal {
    Normal,
    Return(Value, usize),
}

pub struct Interpreter {
    globals: Env,
    env: RefCell<Env>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Env::global();
        Self { env: RefCell::new(globals.clone()), globals }
    }

    /// Walks every top-level statement in order. A `return` that
    /// escapes all the way to the top is a runtime error: there is no
    /// call frame left to deliver it to.
    #[tracing::instrument(skip_all)]
    pub fn interpret(&self, program: &Program) -> Result<()> {
        *self.env.borrow_mut() = self.globals.clone();
        for statement in &program.statements {
            match self.execute(statement)? {
                Signal::Normal => {}
                Signal::Return(_, line) => return Err(Error::runtime("return outside function", line)),
            }
        }
        Ok(())
    }

    fn current_env(&self) -> Env {
        self.env.borrow().clone()
    }

    fn execute(&self, statement: &Statement) -> Result<Signal> {
        match statement {
            Statement::VarDecl(decl) => {
                let value = match &decl.initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.current_env().define(decl.name.lexeme.clone(), value);
                Ok(Signal::Normal)
            }
            Statement::FunctionDecl(decl) => {
                self.define_function(decl);
                Ok(Signal::Normal)
            }
            Statement::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Signal::Normal)
            }
            Statement::Print(expr) => {
                let value = self.evaluate(expr)?;
                println!("{value}");
                Ok(Signal::Normal)
            }
            Statement::Block(block) => self.execute_block(&block.statements, self.current_env().child()),
            Statement::If(stmt) => self.execute_if(stmt),
            Statement::While(stmt) => self.execute_while(stmt),
            Statement::Return(stmt) => self.execute_return(stmt),
        }
    }

    fn define_function(&self, decl: &FunctionDecl) {
        let declaration = Rc::new(FunctionDecl {
            name: decl.name.clone(),
            params: decl.params.clone(),
            body: decl.body.clone(),
        });
        let closure = Closure { declaration, captured: self.current_env() };
        self.current_env().define(decl.name.lexeme.clone(), Value::Function(Rc::new(closure)));
    }

    /// Pushes `new_env`, runs `block`'s statements, and restores the
    /// prior environment on every exit path: normal completion,
    /// `return`, or error.
    fn execute_block(&self, statements: &[Statement], new_env: Env) -> Result<Signal> {
        let previous = self.current_env();
        *self.env.borrow_mut() = new_env;
        let _guard = ScopeGuard { interpreter: self, previous };

        for statement in statements {
            match self.execute(statement)? {
                Signal::Normal => {}
                signal @ Signal::Return(_, _) => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn execute_if(&self, stmt: &IfStmt) -> Result<Signal> {
        if self.evaluate(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.then_branch)
        } else if let Some(else_branch) = &stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Signal::Normal)
        }
    }

    fn execute_while(&self, stmt: &WhileStmt) -> Result<Signal> {
        while self.evaluate(&stmt.condition)?.is_truthy() {
            match self.execute(&stmt.body)? {
                Signal::Normal => {}
                signal @ Signal::Return(_, _) => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    fn execute_return(&self, stmt: &ReturnStmt) -> Result<Signal> {
        let value = match &stmt.value {
            Some(expr) => self.evaluate(expr)?,
            None => Value::Nil,
        };
        Ok(Signal::Return(value, stmt.keyword.line()))
    }

    fn evaluate(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(token) => self.evaluate_literal(token),
            Expr::Identifier(name) => self.current_env().get(&name.lexeme, name.line()),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.current_env().assign(&name.lexeme, value.clone(), name.line())?;
                Ok(value)
            }
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Expr::Call { callee, paren, arguments } => self.evaluate_call(callee, paren, arguments),
        }
    }

    fn evaluate_literal(&self, token: &Token) -> Result<Value> {
        match &token.kind {
            TokenKind::Integer(digits) => digits
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| Error::runtime(format!("Invalid integer literal '{digits}'"), token.line())),
            TokenKind::Float(digits) => digits
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| Error::runtime(format!("Invalid float literal '{digits}'"), token.line())),
            TokenKind::Str(s) => Ok(Value::str(s.clone())),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Nil => Ok(Value::Nil),
            other => unreachable!("parser never produces a Literal node wrapping {other:?}"),
        }
    }

    fn evaluate_unary(&self, operator: &Token, right: &Expr) -> Result<Value> {
        let value = self.evaluate(right)?;
        match operator.kind {
            TokenKind::Minus => match value {
                Value::Int(i) => Ok(Value::Int(-i)),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(Error::runtime(format!("Operand of '-' must be numeric, got {}", other.type_name()), operator.line())),
            },
            TokenKind::Not => Ok(Value::Bool(!value.is_truthy())),
            ref other => unreachable!("parser never produces a Unary node with operator {other:?}"),
        }
    }

    fn evaluate_binary(&self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.kind {
            TokenKind::Plus => match (&left, &right) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{a}{b}"))),
                _ => numeric_binary(&left, &right, operator, |a, b| a.checked_add(b), |a, b| a + b),
            },
            TokenKind::Minus => numeric_binary(&left, &right, operator, |a, b| a.checked_sub(b), |a, b| a - b),
            TokenKind::Multiply => numeric_binary(&left, &right, operator, |a, b| a.checked_mul(b), |a, b| a * b),
            TokenKind::Divide => divide(&left, &right, operator),
            TokenKind::Lt => compare(&left, &right, operator, |o| o.is_lt()),
            TokenKind::Lte => compare(&left, &right, operator, |o| o.is_le()),
            TokenKind::Gt => compare(&left, &right, operator, |o| o.is_gt()),
            TokenKind::Gte => compare(&left, &right, operator, |o| o.is_ge()),
            TokenKind::Eq => Ok(Value::Bool(values_equal(&left, &right))),
            TokenKind::Neq => Ok(Value::Bool(!values_equal(&left, &right))),
            ref other => unreachable!("parser never produces a Binary node with operator {other:?}"),
        }
    }

    fn evaluate_call(&self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> Result<Value> {
        let callee_value = self.evaluate(callee)?;
        let mut argument_values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            argument_values.push(self.evaluate(argument)?);
        }

        let closure = match callee_value {
            Value::Function(closure) => closure,
            other => return Err(Error::runtime(format!("Can only call functions, got {}", other.type_name()), paren.line())),
        };

        if argument_values.len() != closure.arity() {
            return Err(Error::runtime(
                format!("Expected {} arguments but got {}", closure.arity(), argument_values.len()),
                paren.line(),
            ));
        }

        self.call(&closure, argument_values)
    }

    /// Every call gets exactly one new environment, enclosed by the
    /// closure's captured environment rather than the caller's, so
    /// recursion and mutual recursion resolve the function's own name
    /// through the scope it was declared in.
    fn call(&self, closure: &Closure, arguments: Vec<Value>) -> Result<Value> {
        let call_env = closure.captured.child();
        for (param, argument) in closure.declaration.params.iter().zip(arguments) {
            call_env.define(param.lexeme.clone(), argument);
        }

        match self.execute_block(&closure.declaration.body, call_env)? {
            Signal::Return(value, _) => Ok(value),
            Signal::Normal => Ok(Value::Nil),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores the interpreter's current environment to `previous` when
/// dropped, regardless of whether the scope exited normally, via
/// `return`, or via a propagated error.
struct ScopeGuard<'a> {
    interpreter: &'a Interpreter,
    previous: Env,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        *self.interpreter.env.borrow_mut() = self.previous.clone();
    }
}

fn numeric_binary(
    left: &Value,
    right: &Value,
    operator: &Token,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| Error::runtime("Integer overflow", operator.line())),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(float_op(*a as f64, *b))),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(float_op(*a, *b as f64))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
        _ => Err(type_error(operator, left, right)),
    }
}

/// `/` always errors on a zero right operand (integer or float), and
/// truncates toward zero for an all-integer pair.
fn divide(left: &Value, right: &Value, operator: &Token) -> Result<Value> {
    match (left, right) {
        (Value::Int(_), Value::Int(0)) => Err(Error::runtime("Division by zero", operator.line())),
        (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a / b)),
        (Value::Int(a), Value::Float(b)) => {
            if *b == 0.0 {
                return Err(Error::runtime("Division by zero", operator.line()));
            }
            Ok(Value::Float(*a as f64 / b))
        }
        (Value::Float(a), Value::Int(b)) => {
            if *b == 0 {
                return Err(Error::runtime("Division by zero", operator.line()));
            }
            Ok(Value::Float(a / *b as f64))
        }
        (Value::Float(a), Value::Float(b)) => {
            if *b == 0.0 {
                return Err(Error::runtime("Division by zero", operator.line()));
            }
            Ok(Value::Float(a / b))
        }
        _ => Err(type_error(operator, left, right)),
    }
}

fn compare(left: &Value, right: &Value, operator: &Token, accept: impl Fn(std::cmp::Ordering) -> bool) -> Result<Value> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => return Ok(Value::Bool(accept(a.as_ref().cmp(b.as_ref())))),
        _ => return Err(type_error(operator, left, right)),
    };
    let ordering = match ordering {
        Some(o) => o,
        None => return Err(Error::runtime("Cannot compare NaN", operator.line())),
    };
    Ok(Value::Bool(accept(ordering)))
}

/// Structural equality: differing kinds are unequal except that an
/// int and a float of equal mathematical value compare equal.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

fn type_error(operator: &Token, left: &Value, right: &Value) -> Error {
    Error::runtime(
        format!("Operands of '{}' must be numeric or both strings, got {} and {}", operator.kind, left.type_name(), right.type_name()),
        operator.line(),
    )
}

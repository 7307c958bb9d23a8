//! Unary and binary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch over a fixed operator set. Logical operators
//! are not here: they short-circuit, so the interpreter evaluates them
//! itself.

use lox_ir::{BinaryOp, UnaryOp};

use crate::errors::{
    operand_must_be_number, operands_must_be_numbers, operands_must_be_numbers_or_strings,
    EvalResult,
};
use crate::Value;

/// Evaluate a binary operation on already-evaluated operands.
///
/// `==`/`!=` accept any operands. `+` accepts two numbers or two strings;
/// every other operator requires two numbers. Division follows IEEE-754
/// (dividing by zero yields an infinity or `NaN`, not an error).
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left.equals(right))),
        BinaryOp::NotEq => Ok(Value::Bool(!left.equals(right))),
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => numeric(left, right, op, |a, b| Value::Number(a - b)),
        BinaryOp::Mul => numeric(left, right, op, |a, b| Value::Number(a * b)),
        BinaryOp::Div => numeric(left, right, op, |a, b| Value::Number(a / b)),
        BinaryOp::Lt => numeric(left, right, op, |a, b| Value::Bool(a < b)),
        BinaryOp::LtEq => numeric(left, right, op, |a, b| Value::Bool(a <= b)),
        BinaryOp::Gt => numeric(left, right, op, |a, b| Value::Bool(a > b)),
        BinaryOp::GtEq => numeric(left, right, op, |a, b| Value::Bool(a >= b)),
    }
}

#[inline]
fn numeric(
    left: &Value,
    right: &Value,
    op: BinaryOp,
    f: impl FnOnce(f64, f64) -> Value,
) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(f(*a, *b)),
        _ => Err(operands_must_be_numbers(op)),
    }
}

fn add(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(a), Value::Str(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        _ => Err(operands_must_be_numbers_or_strings()),
    }
}

/// Evaluate a unary operation.
pub fn evaluate_unary(operand: &Value, op: UnaryOp) -> EvalResult {
    match op {
        UnaryOp::Neg => match operand {
            Value::Number(n) => Ok(Value::Number(-n)),
            _ => Err(operand_must_be_number()),
        },
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
    }
}

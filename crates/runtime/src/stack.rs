//! Value stack helpers
//!
//! The stack is a plain `Vec<Value>` with the top at the end. The typed pop
//! helpers take the name of the operation for error messages.

use std::sync::Arc;

use crate::error::RuntimeError;
use crate::value::{Block, Value};

pub type Stack = Vec<Value>;

/// Pop the top value
pub fn pop(stack: &mut Stack, op: &str) -> Result<Value, RuntimeError> {
    stack.pop().ok_or_else(|| RuntimeError::StackUnderflow { op: op.to_string() })
}

/// Pop two values, returning them in push order `(a, b)` where `b` was on top
pub fn pop_two(stack: &mut Stack, op: &str) -> Result<(Value, Value), RuntimeError> {
    if stack.len() < 2 {
        return Err(RuntimeError::StackUnderflow { op: op.to_string() });
    }
    let b = pop(stack, op)?;
    let a = pop(stack, op)?;
    Ok((a, b))
}

fn mismatch(op: &str, expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        op: op.to_string(),
        expected,
        found: found.type_name(),
    }
}

/// Pop a value whose contents may be inspected: anything without a quotation
pub fn pop_plain(stack: &mut Stack, op: &str) -> Result<Value, RuntimeError> {
    let value = pop(stack, op)?;
    if value.contains_quotation() {
        return Err(mismatch(op, "value without quotations", &value));
    }
    Ok(value)
}

pub fn pop_int(stack: &mut Stack, op: &str) -> Result<i64, RuntimeError> {
    match pop(stack, op)? {
        Value::Int(n) => Ok(n),
        other => Err(mismatch(op, "Int", &other)),
    }
}

pub fn pop_bool(stack: &mut Stack, op: &str) -> Result<bool, RuntimeError> {
    match pop(stack, op)? {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(op, "Bool", &other)),
    }
}

pub fn pop_string(stack: &mut Stack, op: &str) -> Result<String, RuntimeError> {
    match pop(stack, op)? {
        Value::String(s) => Ok(s),
        other => Err(mismatch(op, "String", &other)),
    }
}

pub fn pop_list(stack: &mut Stack, op: &str) -> Result<Vec<Value>, RuntimeError> {
    match pop(stack, op)? {
        Value::List(items) => Ok(items),
        other => Err(mismatch(op, "List", &other)),
    }
}

pub fn pop_quotation(stack: &mut Stack, op: &str) -> Result<Arc<Block>, RuntimeError> {
    match pop(stack, op)? {
        Value::Quotation(block) => Ok(block),
        other => Err(mismatch(op, "Quotation", &other)),
    }
}

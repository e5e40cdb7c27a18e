//! Primitive words
//!
//! One function per builtin declared in `tacitc::builtins`, dispatched by
//! name through [`lookup`].
//!
//! # Overflow Behavior
//!
//! Integer arithmetic uses **wrapping semantics**: `i64::MAX 1 add` wraps to
//! `i64::MIN` and `i64::MIN -1 div` wraps to `i64::MIN`. Division and modulo
//! by zero fail with [`RuntimeError::DivisionByZero`].
//!
//! # Argument lists
//!
//! The point-free converter keeps a definition's parameters in a `List` on
//! top of the stack. `arg_list` creates it, `swons` prepends the value below
//! it, `argN` copies element N out from under it, and `embed_args` captures it
//! into the quotation pushed above it so the quotation can read the
//! parameters later.

use crate::error::RuntimeError;
use crate::interpreter::Machine;
use crate::stack::{
    Stack, pop, pop_bool, pop_int, pop_list, pop_plain, pop_quotation, pop_string, pop_two,
};
use crate::value::Value;

pub type Primitive = fn(&mut Machine<'_>, &mut Stack) -> Result<(), RuntimeError>;

/// Primitive implementing `name`
pub fn lookup(name: &str) -> Option<Primitive> {
    let primitive: Primitive = match name {
        "add" => add,
        "sub" => sub,
        "mul" => mul,
        "div" => div,
        "mod" => modulo,
        "eq" => eq,
        "lt" => lt,
        "gt" => gt,
        "and" => and,
        "or" => or,
        "not" => not,
        "concat" => concat,
        "dup" => dup,
        "pop" => discard,
        "swap" => swap,
        "print" => print,
        "writeln" => writeln,
        "apply" => apply,
        "dip" => dip,
        "if" => if_,
        "compose" => compose,
        "arg_list" => arg_list,
        "swons" => swons,
        "embed_args" => embed_args,
        "arg0" => arg0,
        "arg1" => arg1,
        "arg2" => arg2,
        "arg3" => arg3,
        "arg4" => arg4,
        "arg5" => arg5,
        "arg6" => arg6,
        "arg7" => arg7,
        "arg8" => arg8,
        "arg9" => arg9,
        _ => return None,
    };
    Some(primitive)
}

// ---------------------------------------------------------------------------
// Arithmetic and comparison
// ---------------------------------------------------------------------------

fn int_binary(
    stack: &mut Stack,
    op: &str,
    f: impl FnOnce(i64, i64) -> Result<Value, RuntimeError>,
) -> Result<(), RuntimeError> {
    let b = pop_int(stack, op)?;
    let a = pop_int(stack, op)?;
    stack.push(f(a, b)?);
    Ok(())
}

fn add(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    int_binary(stack, "add", |a, b| Ok(Value::Int(a.wrapping_add(b))))
}

fn sub(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    int_binary(stack, "sub", |a, b| Ok(Value::Int(a.wrapping_sub(b))))
}

fn mul(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    int_binary(stack, "mul", |a, b| Ok(Value::Int(a.wrapping_mul(b))))
}

fn div(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    int_binary(stack, "div", |a, b| {
        if b == 0 {
            return Err(RuntimeError::DivisionByZero("div".to_string()));
        }
        Ok(Value::Int(a.wrapping_div(b)))
    })
}

fn modulo(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    int_binary(stack, "mod", |a, b| {
        if b == 0 {
            return Err(RuntimeError::DivisionByZero("mod".to_string()));
        }
        Ok(Value::Int(a.wrapping_rem(b)))
    })
}

/// Quotations compare by behavior, which cannot be decided, so they are
/// rejected
fn eq(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    if stack.len() < 2 {
        return Err(RuntimeError::StackUnderflow { op: "eq".to_string() });
    }
    let b = pop_plain(stack, "eq")?;
    let a = pop_plain(stack, "eq")?;
    stack.push(Value::Bool(a == b));
    Ok(())
}

fn lt(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    int_binary(stack, "lt", |a, b| Ok(Value::Bool(a < b)))
}

fn gt(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    int_binary(stack, "gt", |a, b| Ok(Value::Bool(a > b)))
}

// ---------------------------------------------------------------------------
// Logic and strings
// ---------------------------------------------------------------------------

fn and(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let b = pop_bool(stack, "and")?;
    let a = pop_bool(stack, "and")?;
    stack.push(Value::Bool(a && b));
    Ok(())
}

fn or(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let b = pop_bool(stack, "or")?;
    let a = pop_bool(stack, "or")?;
    stack.push(Value::Bool(a || b));
    Ok(())
}

fn not(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let a = pop_bool(stack, "not")?;
    stack.push(Value::Bool(!a));
    Ok(())
}

fn concat(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let b = pop_string(stack, "concat")?;
    let mut a = pop_string(stack, "concat")?;
    a.push_str(&b);
    stack.push(Value::String(a));
    Ok(())
}

// ---------------------------------------------------------------------------
// Stack shuffles
// ---------------------------------------------------------------------------

fn dup(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let top = pop(stack, "dup")?;
    stack.push(top.clone());
    stack.push(top);
    Ok(())
}

fn discard(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    pop(stack, "pop")?;
    Ok(())
}

fn swap(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let (a, b) = pop_two(stack, "swap")?;
    stack.push(b);
    stack.push(a);
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print(machine: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let value = pop_plain(stack, "print")?;
    machine.emit("print", value.to_string())
}

fn writeln(machine: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let line = pop_string(stack, "writeln")?;
    machine.emit("writeln", line)
}

// ---------------------------------------------------------------------------
// Quotations
// ---------------------------------------------------------------------------

/// ( ..a ( ..a -- ..b ) -- ..b )
fn apply(machine: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let quot = pop_quotation(stack, "apply")?;
    machine.run_block(&quot, stack)
}

/// ( ..a T ( ..a -- ..b ) -- ..b T )
fn dip(machine: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let quot = pop_quotation(stack, "dip")?;
    let saved = pop(stack, "dip")?;
    machine.run_block(&quot, stack)?;
    stack.push(saved);
    Ok(())
}

/// ( ..a Bool ( ..a -- ..b ) ( ..a -- ..b ) -- ..b )
fn if_(machine: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let else_branch = pop_quotation(stack, "if")?;
    let then_branch = pop_quotation(stack, "if")?;
    let cond = pop_bool(stack, "if")?;
    let branch = if cond { then_branch } else { else_branch };
    machine.run_block(&branch, stack)
}

fn compose(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let second = pop_quotation(stack, "compose")?;
    let first = pop_quotation(stack, "compose")?;
    stack.push(Value::quotation(first.then(&second)));
    Ok(())
}

// ---------------------------------------------------------------------------
// Argument lists
// ---------------------------------------------------------------------------

fn arg_list(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    stack.push(Value::List(Vec::new()));
    Ok(())
}

/// ( ..a T List -- ..a List ): T becomes element 0
fn swons(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let mut list = pop_list(stack, "swons")?;
    let value = pop(stack, "swons")?;
    list.insert(0, value);
    stack.push(Value::List(list));
    Ok(())
}

/// ( ..a List ( ..b List -- ..c ) -- ..a ( ..b -- ..c ) List ): the
/// quotation moves under the list
fn embed_args(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
    let quot = pop_quotation(stack, "embed_args")?;
    let list = pop_list(stack, "embed_args")?;
    stack.push(Value::quotation(quot.capture(Value::List(list.clone()))));
    stack.push(Value::List(list));
    Ok(())
}

/// ( ..a List -- ..a T List ): copy element `index` out from under the list
fn arg_at(stack: &mut Stack, op: &str, index: usize) -> Result<(), RuntimeError> {
    let list = pop_list(stack, op)?;
    let value = list
        .get(index)
        .cloned()
        .ok_or_else(|| RuntimeError::IndexOutOfRange {
            op: op.to_string(),
            index,
            len: list.len(),
        })?;
    stack.push(value);
    stack.push(Value::List(list));
    Ok(())
}

macro_rules! arg_accessors {
    ($($name:ident => $index:expr),* $(,)?) => {
        $(
            fn $name(_: &mut Machine<'_>, stack: &mut Stack) -> Result<(), RuntimeError> {
                arg_at(stack, stringify!($name), $index)
            }
        )*
    };
}

arg_accessors! {
    arg0 => 0,
    arg1 => 1,
    arg2 => 2,
    arg3 => 3,
    arg4 => 4,
    arg5 => 5,
    arg6 => 6,
    arg7 => 7,
    arg8 => 8,
    arg9 => 9,
}

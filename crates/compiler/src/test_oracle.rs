//! Minimal oracle for unit and property tests
//!
//! Knows integers and quotations plus a handful of words:
//! - `add`, `dup`, `pop`, `swap`: the builtins
//! - `print`: side-effecting builtin
//! - `boom`: pure primitive that always faults
//! - `opaque`: pure primitive pushing a value with no literal form
//! - `double`: user definition, `dup add`
//!
//! Anything else is unknown.

use crate::ast::{Literal, Term};
use crate::builtins::builtin_signature;
use crate::partial_eval::{Declaration, Fault, Oracle};
use crate::types::{FunctionType, Kind, TypeVector};

#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Int(i64),
    Quote(Vec<Term>),
    Opaque,
}

pub struct MockOracle;

/// Words the mock can run; used by generators
pub const MOCK_WORDS: &[&str] = &[
    "add", "dup", "pop", "swap", "print", "boom", "opaque", "double", "mystery",
];

fn pure_push() -> FunctionType {
    FunctionType::new(
        TypeVector::from_top_down(vec![Kind::row_var("a")]),
        TypeVector::from_bottom_up(vec![Kind::row_var("a"), Kind::var("T")]),
    )
}

fn pop(stack: &mut Vec<MockValue>, word: &str) -> Result<MockValue, Fault> {
    stack
        .pop()
        .ok_or_else(|| Fault::Runtime(format!("{}: stack underflow", word)))
}

fn pop_int(stack: &mut Vec<MockValue>, word: &str) -> Result<i64, Fault> {
    match pop(stack, word)? {
        MockValue::Int(n) => Ok(n),
        other => Err(Fault::Runtime(format!("{}: expected Int, got {:?}", word, other))),
    }
}

impl MockOracle {
    fn run_word(&self, word: &str, stack: &mut Vec<MockValue>) -> Result<(), Fault> {
        match word {
            "add" => {
                let b = pop_int(stack, word)?;
                let a = pop_int(stack, word)?;
                stack.push(MockValue::Int(a.wrapping_add(b)));
            }
            "dup" => {
                let v = pop(stack, word)?;
                stack.push(v.clone());
                stack.push(v);
            }
            "pop" => {
                pop(stack, word)?;
            }
            "swap" => {
                let b = pop(stack, word)?;
                let a = pop(stack, word)?;
                stack.push(b);
                stack.push(a);
            }
            "double" => {
                self.run_word("dup", stack)?;
                self.run_word("add", stack)?;
            }
            "opaque" => stack.push(MockValue::Opaque),
            "print" => return Err(Fault::SideEffect(word.to_string())),
            "boom" => return Err(Fault::Runtime("boom".to_string())),
            other => return Err(Fault::MissingType(other.to_string())),
        }
        Ok(())
    }
}

impl Oracle for MockOracle {
    type Value = MockValue;

    fn declaration(&self, word: &str) -> Declaration {
        match word {
            "double" => Declaration::Defined,
            "boom" | "opaque" => Declaration::Primitive(pure_push()),
            _ => builtin_signature(word)
                .map(|sig| Declaration::Primitive(sig.clone()))
                .unwrap_or(Declaration::Unknown),
        }
    }

    fn execute(&self, term: &Term, stack: &mut Vec<MockValue>) -> Result<(), Fault> {
        match term {
            Term::Literal(Literal::Int(n)) => {
                stack.push(MockValue::Int(*n));
                Ok(())
            }
            Term::Literal(other) => Err(Fault::Runtime(format!("unsupported literal {}", other))),
            Term::Quotation(body) => {
                stack.push(MockValue::Quote(body.clone()));
                Ok(())
            }
            Term::Word(word) => self.run_word(word, stack),
        }
    }

    fn reify(&self, value: &MockValue) -> Option<Term> {
        match value {
            MockValue::Int(n) => Some(Term::int(*n)),
            MockValue::Quote(body) => Some(Term::Quotation(body.clone())),
            MockValue::Opaque => None,
        }
    }
}

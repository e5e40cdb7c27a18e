//! Runtime values
//!
//! Quotations are reference counted so duplicating one on the stack is O(1).
//! A quotation value is a [`Block`]: the terms it runs, possibly preceded by
//! values captured when it was built (`embed_args` captures the argument
//! list this way).

use std::fmt;
use std::sync::Arc;

use tacitc::ast::format_terms;
use tacitc::{Literal, Term};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    List(Vec<Value>),
    Quotation(Arc<Block>),
}

/// Body of a quotation value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Push a captured value
    Push(Value),
    /// Run a term
    Run(Term),
}

impl Block {
    pub fn from_terms(terms: &[Term]) -> Self {
        Block {
            steps: terms.iter().cloned().map(Step::Run).collect(),
        }
    }

    /// A block that pushes `value` and then runs this one
    pub fn capture(&self, value: Value) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.push(Step::Push(value));
        steps.extend(self.steps.iter().cloned());
        Block { steps }
    }

    /// A block that runs this one and then `next`
    pub fn then(&self, next: &Block) -> Self {
        Block {
            steps: self.steps.iter().chain(next.steps.iter()).cloned().collect(),
        }
    }

    /// Terms equivalent to this block, if every captured value has a
    /// literal form
    pub fn to_terms(&self) -> Option<Vec<Term>> {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Push(value) => value.to_term(),
                Step::Run(term) => Some(term.clone()),
            })
            .collect()
    }
}

impl Value {
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::String(s) => Value::String(s.clone()),
        }
    }

    pub fn quotation(block: Block) -> Self {
        Value::Quotation(Arc::new(block))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Quotation(_) => "Quotation",
        }
    }

    /// True for quotations and lists holding one. The partial evaluator
    /// rewrites quotation bodies, so only their behavior is observable.
    pub fn contains_quotation(&self) -> bool {
        match self {
            Value::Quotation(_) => true,
            Value::List(items) => items.iter().any(Value::contains_quotation),
            _ => false,
        }
    }

    /// Term that pushes this value. Lists have no literal syntax, so lists
    /// and quotations that captured one have no term.
    pub fn to_term(&self) -> Option<Term> {
        match self {
            Value::Int(n) => Some(Term::int(*n)),
            Value::Float(x) => Some(Term::float(*x)),
            Value::Bool(b) => Some(Term::bool(*b)),
            Value::String(s) => Some(Term::string(s.clone())),
            Value::List(_) => None,
            Value::Quotation(block) => block.to_terms().map(Term::Quotation),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{{{}}}", parts.join(" "))
            }
            Value::Quotation(block) => match block.to_terms() {
                Some(terms) => write!(f, "[{}]", format_terms(&terms)),
                None => write!(f, "[<closure>]"),
            },
        }
    }
}

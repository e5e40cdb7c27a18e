//! Reference interpreter
//!
//! Runs point-free Tacit code on a [`Stack`]. The interpreter has two modes:
//!
//! - effectful, through [`Interpreter::run`]: output words append lines to
//!   the interpreter's output buffer
//! - pure, through the [`Oracle`] implementation used by the partial
//!   evaluator: output words fail with [`RuntimeError::SideEffect`]
//!
//! User definitions are looked up before primitives. Definitions with named
//! parameters are converted to point-free form when they are added.

use std::collections::HashMap;

use tacitc::builtins::builtin_signature;
use tacitc::{ConvertError, Declaration, Definition, Fault, Oracle, Program, Term};
use tracing::trace;

use crate::error::RuntimeError;
use crate::primitives;
use crate::stack::Stack;
use crate::value::{Block, Step, Value};

/// Nesting limit for calls and quotation invocations
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone)]
pub struct Interpreter {
    words: HashMap<String, Vec<Term>>,
    max_depth: usize,
    output: Vec<String>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            words: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            output: Vec::new(),
        }
    }

    /// Interpreter knowing every definition of `program`
    pub fn from_program(program: &Program) -> Result<Self, ConvertError> {
        let mut interpreter = Interpreter::new();
        for def in &program.definitions {
            interpreter.define(def.clone())?;
        }
        Ok(interpreter)
    }

    /// Add or replace a definition
    pub fn define(&mut self, mut definition: Definition) -> Result<(), ConvertError> {
        tacitc::convert_to_point_free(&mut definition)?;
        self.words.insert(definition.name, definition.body);
        Ok(())
    }

    /// Set the nesting limit (builder pattern)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.words.contains_key(name)
    }

    /// Point-free body of a definition
    pub fn body(&self, name: &str) -> Option<&[Term]> {
        self.words.get(name).map(Vec::as_slice)
    }

    /// Execute terms with side effects enabled
    pub fn run(&mut self, terms: &[Term], stack: &mut Stack) -> Result<(), RuntimeError> {
        let mut machine = Machine {
            words: &self.words,
            output: Some(&mut self.output),
            depth: 0,
            max_depth: self.max_depth,
        };
        machine.eval_terms(terms, stack)
    }

    /// Execute terms on a fresh stack and return the final stack
    pub fn run_fresh(&mut self, terms: &[Term]) -> Result<Stack, RuntimeError> {
        let mut stack = Stack::new();
        self.run(terms, &mut stack)?;
        Ok(stack)
    }

    /// Execute terms with side effects rejected
    pub fn run_pure(&self, terms: &[Term], stack: &mut Stack) -> Result<(), RuntimeError> {
        self.pure_machine().eval_terms(terms, stack)
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn pure_machine(&self) -> Machine<'_> {
        Machine {
            words: &self.words,
            output: None,
            depth: 0,
            max_depth: self.max_depth,
        }
    }
}

impl Oracle for Interpreter {
    type Value = Value;

    fn declaration(&self, word: &str) -> Declaration {
        if self.is_defined(word) {
            return Declaration::Defined;
        }
        match builtin_signature(word) {
            Some(sig) => Declaration::Primitive(sig.clone()),
            None => Declaration::Unknown,
        }
    }

    fn execute(&self, term: &Term, stack: &mut Vec<Value>) -> Result<(), Fault> {
        self.pure_machine().eval_term(term, stack).map_err(Fault::from)
    }

    fn reify(&self, value: &Value) -> Option<Term> {
        value.to_term()
    }
}

/// Execution state for one run
pub struct Machine<'a> {
    words: &'a HashMap<String, Vec<Term>>,
    /// `None` in pure mode
    output: Option<&'a mut Vec<String>>,
    depth: usize,
    max_depth: usize,
}

impl Machine<'_> {
    pub fn eval_terms(&mut self, terms: &[Term], stack: &mut Stack) -> Result<(), RuntimeError> {
        for term in terms {
            self.eval_term(term, stack)?;
        }
        Ok(())
    }

    pub fn eval_term(&mut self, term: &Term, stack: &mut Stack) -> Result<(), RuntimeError> {
        match term {
            Term::Literal(lit) => stack.push(Value::from_literal(lit)),
            Term::Quotation(body) => stack.push(Value::quotation(Block::from_terms(body))),
            Term::Word(name) => self.call(name, stack)?,
        }
        Ok(())
    }

    /// Call a user definition or a primitive
    pub fn call(&mut self, name: &str, stack: &mut Stack) -> Result<(), RuntimeError> {
        let words = self.words;
        if let Some(body) = words.get(name) {
            self.descend()?;
            let result = self.eval_terms(body, stack);
            self.depth -= 1;
            return result;
        }
        match primitives::lookup(name) {
            Some(primitive) => {
                trace!(word = name, depth = stack.len(), "primitive");
                primitive(self, stack)
            }
            None => Err(RuntimeError::UnknownWord(name.to_string())),
        }
    }

    /// Invoke a quotation value
    pub fn run_block(&mut self, block: &Block, stack: &mut Stack) -> Result<(), RuntimeError> {
        self.descend()?;
        let result = block.steps.iter().try_for_each(|step| match step {
            Step::Push(value) => {
                stack.push(value.clone());
                Ok(())
            }
            Step::Run(term) => self.eval_term(term, stack),
        });
        self.depth -= 1;
        result
    }

    /// Write a line of output; fails in pure mode
    pub fn emit(&mut self, op: &str, line: String) -> Result<(), RuntimeError> {
        match self.output.as_deref_mut() {
            Some(output) => {
                output.push(line);
                Ok(())
            }
            None => Err(RuntimeError::SideEffect(op.to_string())),
        }
    }

    fn descend(&mut self) -> Result<(), RuntimeError> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::CallDepthExceeded(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }
}

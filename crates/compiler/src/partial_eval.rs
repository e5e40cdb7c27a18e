//! Speculative partial evaluation
//!
//! Folds the statically computable parts of a term sequence into literals by
//! running the terms against an empty private stack. Execution is delegated to
//! an [`Oracle`], normally the reference interpreter. Every time a term cannot
//! run (it is unknown, it has side effects, or the oracle reports a fault) the
//! values computed so far are written back as literal pushes, the term itself
//! is kept, and folding starts over on a fresh stack after it.
//!
//! Some values have no literal form (an argument list, say). The fold then
//! keeps the latest stack that could be written as literals and replays the
//! terms that ran after it:
//!
//! ```text
//! 1 2 add arg_list print   =>   3 arg_list print
//! ```
//!
//! ```text
//! 2 3 add "x" writeln 1 1 add   =>   5 "x" writeln 2
//! ```
//!
//! No static analysis is performed: the oracle's failure is the fold boundary.

use tracing::debug;

use crate::ast::Term;
use crate::types::FunctionType;

/// Reason the oracle could not run a term
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Fault {
    #[error("'{0}' has side effects")]
    SideEffect(String),
    #[error("no stack effect known for '{0}'")]
    MissingType(String),
    #[error("{0}")]
    Runtime(String),
}

/// What the oracle knows about a word
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// User definition; executed without looking at its signature
    Defined,
    /// Primitive with a known stack effect
    Primitive(FunctionType),
    /// No definition and no signature
    Unknown,
}

/// Execution engine used to test whether terms can run at compile time
pub trait Oracle {
    type Value: Clone;

    fn declaration(&self, word: &str) -> Declaration;

    /// Run one term. Must not perform observable side effects; a failed call
    /// may leave `stack` in any state.
    fn execute(&self, term: &Term, stack: &mut Vec<Self::Value>) -> Result<(), Fault>;

    /// Term that pushes `value`, if there is one
    fn reify(&self, value: &Self::Value) -> Option<Term>;
}

/// Fold a term sequence; the result is semantically equivalent to `terms`
pub fn partial_evaluate<O: Oracle + ?Sized>(oracle: &O, terms: &[Term]) -> Vec<Term> {
    let mut fold = Fold::new(oracle);
    for term in terms {
        fold.step(term);
    }
    fold.finish()
}

struct Fold<'o, O: Oracle + ?Sized> {
    oracle: &'o O,
    stack: Vec<O::Value>,
    /// Literal pushes for the latest stack of this segment that had a
    /// literal form for every value
    folded: Vec<Term>,
    /// Terms executed since `folded` was taken
    pending: Vec<Term>,
    output: Vec<Term>,
}

impl<'o, O: Oracle + ?Sized> Fold<'o, O> {
    fn new(oracle: &'o O) -> Self {
        Fold {
            oracle,
            stack: Vec::new(),
            folded: Vec::new(),
            pending: Vec::new(),
            output: Vec::new(),
        }
    }

    fn step(&mut self, term: &Term) {
        let candidate = match term {
            Term::Quotation(body) => Term::Quotation(partial_evaluate(self.oracle, body)),
            other => other.clone(),
        };

        match self.try_execute(&candidate) {
            Ok(()) => match self.reify_stack() {
                Some(terms) => {
                    self.folded = terms;
                    self.pending.clear();
                }
                None => self.pending.push(candidate),
            },
            Err(fault) => {
                debug!(term = %candidate, %fault, "fold boundary");
                self.flush();
                self.output.push(candidate);
                self.stack.clear();
            }
        }
    }

    fn try_execute(&mut self, term: &Term) -> Result<(), Fault> {
        if let Term::Word(name) = term {
            match self.oracle.declaration(name) {
                Declaration::Defined => {}
                Declaration::Primitive(sig) if sig.has_side_effects() => {
                    return Err(Fault::SideEffect(name.clone()));
                }
                Declaration::Primitive(_) => {}
                Declaration::Unknown => return Err(Fault::MissingType(name.clone())),
            }
        }
        self.oracle.execute(term, &mut self.stack)
    }

    /// Literal pushes rebuilding the current stack, bottom first
    fn reify_stack(&self) -> Option<Vec<Term>> {
        self.stack.iter().map(|v| self.oracle.reify(v)).collect()
    }

    /// Emit the last stack that had a literal form, then replay the terms
    /// that ran after it.
    fn flush(&mut self) {
        self.output.append(&mut self.folded);
        self.output.append(&mut self.pending);
    }

    fn finish(mut self) -> Vec<Term> {
        self.flush();
        self.output
    }
}

//! Abstract Syntax Tree for Tacit
//!
//! Programs are lists of definitions. A definition may name its parameters,
//! in which case its body refers to them by name; the point-free converter
//! rewrites such definitions into pure stack code.

use std::fmt;

use crate::builtins;

/// Pseudo-reference to the whole argument list of the enclosing definition
pub const ARGS: &str = "args";

/// Literal value pushed by a term
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    /// IEEE 754 double
    Float(f64),
    Bool(bool),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Word call: a builtin, a user definition, or a parameter reference
    Word(String),

    /// Push a literal value
    Literal(Literal),

    /// Quotation: an unevaluated term sequence pushed as a value
    Quotation(Vec<Term>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    /// Named parameters, first parameter deepest on the stack
    pub params: Vec<String>,
    pub body: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub definitions: Vec<Definition>,
}

impl Term {
    pub fn word(name: impl Into<String>) -> Self {
        Term::Word(name.into())
    }

    pub fn int(value: i64) -> Self {
        Term::Literal(Literal::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Term::Literal(Literal::Float(value))
    }

    pub fn bool(value: bool) -> Self {
        Term::Literal(Literal::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Term::Literal(Literal::String(value.into()))
    }

    pub fn quotation(terms: Vec<Term>) -> Self {
        Term::Quotation(terms)
    }
}

impl Definition {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Vec<Term>) -> Self {
        Definition {
            name: name.into(),
            params,
            body,
        }
    }

    /// A definition without named parameters
    pub fn point_free(name: impl Into<String>, body: Vec<Term>) -> Self {
        Definition::new(name, Vec::new(), body)
    }

    pub fn is_point_free(&self) -> bool {
        self.params.is_empty()
    }
}

impl Program {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Program { definitions }
    }

    pub fn find_definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Validate that every word call references a builtin, a definition,
    /// a parameter of the enclosing definition, or `args` inside a
    /// definition with parameters
    pub fn validate_word_calls(&self) -> Result<(), String> {
        for def in &self.definitions {
            self.validate_terms(def, &def.body)?;
        }
        Ok(())
    }

    fn validate_terms(&self, def: &Definition, terms: &[Term]) -> Result<(), String> {
        for term in terms {
            match term {
                Term::Word(name) => {
                    let known = builtins::is_builtin(name)
                        || self.find_definition(name).is_some()
                        || def.params.contains(name)
                        || (name == ARGS && !def.params.is_empty());
                    if !known {
                        return Err(format!(
                            "Undefined word '{}' called in definition '{}'",
                            name, def.name
                        ));
                    }
                }
                Term::Quotation(body) => self.validate_terms(def, body)?,
                Term::Literal(_) => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            // Debug keeps the decimal point on whole numbers
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Word(name) => write!(f, "{}", name),
            Term::Literal(lit) => write!(f, "{}", lit),
            Term::Quotation(body) => write!(f, "[{}]", format_terms(body)),
        }
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define {}", self.name)?;
        if !self.params.is_empty() {
            write!(f, " ({})", self.params.join(" "))?;
        }
        write!(f, " {{ {} }}", format_terms(&self.body))
    }
}

/// Space-separated rendering of a term sequence
pub fn format_terms(terms: &[Term]) -> String {
    terms
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

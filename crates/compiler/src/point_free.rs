//! Point-free conversion
//!
//! Rewrites definitions with named parameters into pure stack code. The
//! parameters are collected into an argument list that stays on top of the
//! stack while the body runs:
//!
//! ```text
//! define f (x y) { y x sub }
//! ```
//!
//! becomes
//!
//! ```text
//! define f { arg_list swons swons arg1 arg0 [sub] dip pop }
//! ```
//!
//! - a parameter reference becomes the matching `argN` accessor
//! - `args` becomes `dup` (a copy of the list itself)
//! - any other term runs below the list through `[term] dip`
//! - a quotation is converted the same way and followed by `embed_args`,
//!   which captures the list so the quotation can still reach the
//!   parameters when it is called later
//! - `pop` discards the list at the end of each converted sequence

use tracing::info;

use crate::ast::{ARGS, Definition, Program, Term, format_terms};
use crate::builtins::{ARG_ACCESSORS, ARG_LIST, DIP, DUP, EMBED_ARGS, POP, SWONS};
use crate::config::CompilerConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error(
        "definition '{definition}': parameter '{parameter}' is at index {index}, \
         but only {max} parameters are supported",
        max = ARG_ACCESSORS.len()
    )]
    UnsupportedArity {
        definition: String,
        parameter: String,
        index: usize,
    },
}

/// Convert a definition with the default configuration
pub fn convert_to_point_free(definition: &mut Definition) -> Result<(), ConvertError> {
    convert_definition(definition, &CompilerConfig::default())
}

/// Convert a definition in place.
///
/// Point-free definitions are left untouched. On error the definition is left
/// unchanged.
pub fn convert_definition(
    definition: &mut Definition,
    config: &CompilerConfig,
) -> Result<(), ConvertError> {
    if definition.is_point_free() {
        return Ok(());
    }

    let converted = convert_terms(&definition.name, &definition.params, &definition.body)?;

    // Build the list first: the last parameter (top of stack) is consed first
    let mut body = Vec::with_capacity(converted.len() + definition.params.len() + 1);
    body.push(Term::word(ARG_LIST));
    body.extend(definition.params.iter().map(|_| Term::word(SWONS)));
    body.extend(converted);

    definition.body = body;
    definition.params.clear();

    if config.show_point_free_conversion {
        info!(
            definition = %definition.name,
            body = %format_terms(&definition.body),
            "point-free conversion"
        );
    }
    Ok(())
}

/// Rewrite a term sequence that runs with the argument list on top of the
/// stack
pub fn convert_terms(
    definition: &str,
    params: &[String],
    terms: &[Term],
) -> Result<Vec<Term>, ConvertError> {
    let mut out = Vec::with_capacity(terms.len() * 2 + 1);
    for term in terms {
        match term {
            Term::Quotation(body) => {
                out.push(Term::Quotation(convert_terms(definition, params, body)?));
                out.push(Term::word(EMBED_ARGS));
            }
            Term::Word(name) if name == ARGS => out.push(Term::word(DUP)),
            // A repeated parameter name resolves to its first position
            Term::Word(name) => match params.iter().position(|p| p == name) {
                Some(index) => out.push(accessor(definition, name, index)?),
                None => push_dipped(&mut out, term),
            },
            Term::Literal(_) => push_dipped(&mut out, term),
        }
    }
    out.push(Term::word(POP));
    Ok(out)
}

/// Run `term` below the argument list
fn push_dipped(out: &mut Vec<Term>, term: &Term) {
    out.push(Term::Quotation(vec![term.clone()]));
    out.push(Term::word(DIP));
}

fn accessor(definition: &str, name: &str, index: usize) -> Result<Term, ConvertError> {
    ARG_ACCESSORS
        .get(index)
        .map(|accessor| Term::word(*accessor))
        .ok_or_else(|| ConvertError::UnsupportedArity {
            definition: definition.to_string(),
            parameter: name.to_string(),
            index,
        })
}

/// Convert every definition of a program
pub fn convert_program(program: &mut Program, config: &CompilerConfig) -> Result<(), ConvertError> {
    for def in &mut program.definitions {
        convert_definition(def, config)?;
    }
    Ok(())
}

pub fn is_point_free(definition: &Definition) -> bool {
    definition.is_point_free()
}

pub fn is_program_point_free(program: &Program) -> bool {
    program.definitions.iter().all(Definition::is_point_free)
}

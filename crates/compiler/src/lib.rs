//! Tacit Compiler Library
//!
//! The semantic core of the Tacit concatenative language:
//!
//! - [`types`]: the Kind algebra for stack effects
//! - [`unification`]: resolving kinds against an inferred substitution
//! - [`point_free`]: rewriting named-parameter definitions into stack code
//! - [`partial_eval`]: folding statically computable code through an
//!   injected [`Oracle`]
//!
//! Parsing and type inference live outside this crate. The reference
//! execution engine lives in `tacit-runtime`.
//!
//! # Optimizing a program
//!
//! ```rust,ignore
//! use tacitc::{CompilerConfig, optimize_program};
//! use tacit_runtime::Interpreter;
//!
//! let config = CompilerConfig::from_file("tacit.toml")?;
//! let mut interpreter = Interpreter::new();
//! optimize_program(&mut program, &interpreter, &config)?;
//! ```

pub mod ast;
pub mod builtins;
pub mod config;
pub mod error;
pub mod fresh;
pub mod partial_eval;
pub mod point_free;
pub mod types;
pub mod unification;

#[cfg(test)]
mod prop_tests;
#[cfg(test)]
mod test_oracle;

pub use ast::{Definition, Literal, Program, Term};
pub use config::{CompilerConfig, ConfigError};
pub use error::CompileError;
pub use fresh::FreshNames;
pub use partial_eval::{Declaration, Fault, Oracle, partial_evaluate};
pub use point_free::{ConvertError, convert_program, convert_to_point_free, is_point_free};
pub use types::{FunctionType, Kind, TypeError, TypeVector};
pub use unification::{InferenceSession, Substitution, UnifyError, unify};

use tracing::debug;

/// Convert every definition to point-free form, then fold each body when
/// `config.partial_evaluation` is set.
///
/// Folding executes user definitions through the oracle, so the oracle must
/// already know their point-free bodies.
pub fn optimize_program<O: Oracle + ?Sized>(
    program: &mut Program,
    oracle: &O,
    config: &CompilerConfig,
) -> Result<(), CompileError> {
    convert_program(program, config)?;
    if config.partial_evaluation {
        for def in &mut program.definitions {
            fold_definition(def, oracle);
        }
    }
    Ok(())
}

/// Replace a definition's body with its folded form
pub fn fold_definition<O: Oracle + ?Sized>(definition: &mut Definition, oracle: &O) {
    let folded = partial_evaluate(oracle, &definition.body);
    debug!(
        definition = %definition.name,
        before = definition.body.len(),
        after = folded.len(),
        "folded definition"
    );
    definition.body = folded;
}

/// Resolve an inferred signature and check that it is well typed
pub fn resolve_signature(
    session: &InferenceSession,
    signature: &FunctionType,
    subst: &Substitution,
) -> Result<FunctionType, CompileError> {
    let resolved = match session.normalize(&Kind::Function(signature.clone()), subst)? {
        Kind::Function(f) => f,
        // Function types resolve to function types
        other => unreachable!("function type resolved to {}", other),
    };
    resolved.check_well_typed()?;
    Ok(resolved)
}

//! Error type for the compiler pipeline.

use crate::config::ConfigError;
use crate::point_free::ConvertError;
use crate::types::TypeError;
use crate::unification::UnifyError;

/// Any error a compiler pass can report.
///
/// Oracle faults are not listed: the partial evaluator always recovers from
/// them locally.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Unify(#[from] UnifyError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

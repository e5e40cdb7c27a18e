//! Runtime errors
//!
//! Every primitive reports failure through [`RuntimeError`] instead of
//! panicking. When the interpreter runs as the partial evaluator's oracle the
//! error becomes a [`Fault`] and marks a fold boundary.

use tacitc::Fault;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("{op}: stack underflow")]
    StackUnderflow { op: String },
    #[error("{op}: expected {expected}, got {found}")]
    TypeMismatch {
        op: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown word '{0}'")]
    UnknownWord(String),
    #[error("{0}: side effects are not allowed here")]
    SideEffect(String),
    #[error("{0}: division by zero")]
    DivisionByZero(String),
    #[error("{op}: index {index} out of range for list of length {len}")]
    IndexOutOfRange { op: String, index: usize, len: usize },
    #[error("call depth exceeded {0}")]
    CallDepthExceeded(usize),
}

impl From<RuntimeError> for Fault {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::SideEffect(word) => Fault::SideEffect(word),
            RuntimeError::UnknownWord(word) => Fault::MissingType(word),
            other => Fault::Runtime(other.to_string()),
        }
    }
}

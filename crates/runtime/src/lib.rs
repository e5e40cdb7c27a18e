//! Tacit Runtime: reference interpreter
//!
//! Key design principles:
//! - Value: what the language talks about (Int, Bool, List, Quotation, etc.)
//! - Stack: a `Vec<Value>` with the top at the end
//! - Interpreter: runs point-free code, and doubles as the execution oracle
//!   for the compiler's partial evaluator

pub mod error;
pub mod interpreter;
pub mod primitives;
pub mod stack;
pub mod value;

pub use error::RuntimeError;
pub use interpreter::{DEFAULT_MAX_DEPTH, Interpreter, Machine};
pub use stack::Stack;
pub use value::{Block, Step, Value};

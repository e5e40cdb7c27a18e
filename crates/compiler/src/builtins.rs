//! Built-in word signatures for Tacit
//!
//! Defines the stack effects of every primitive the runtime provides,
//! including the argument-list combinators the point-free converter emits.
//!
//! Uses declarative macros to keep the table readable. The `builtin!` macro
//! takes a Forth-like notation `(a Type1 Type2 -- a Type3)` where:
//! - `a` is the row variable (representing "rest of stack")
//! - Concrete types: `Int`, `Float`, `Bool`, `String`, `List`
//! - Type variables: `T`, `U`, `V`
//!
//! Side-effecting words use `~~` in place of `--`. Higher-order words whose
//! signatures mention quotation types are built by hand below.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::{FunctionType, Kind, TypeVector};

/// Build the empty argument list
pub const ARG_LIST: &str = "arg_list";
/// Prepend the value under the list to the list
pub const SWONS: &str = "swons";
/// Capture the argument list into the quotation above it
pub const EMBED_ARGS: &str = "embed_args";
pub const DIP: &str = "dip";
pub const DUP: &str = "dup";
pub const POP: &str = "pop";

/// Indexed accessors into the argument list; the converter supports as many
/// parameters as there are accessors.
pub const ARG_ACCESSORS: [&str; 10] = [
    "arg0", "arg1", "arg2", "arg3", "arg4", "arg5", "arg6", "arg7", "arg8", "arg9",
];

/// Convert a type token to a Kind
macro_rules! ty {
    (Int) => {
        Kind::named("Int")
    };
    (Float) => {
        Kind::named("Float")
    };
    (Bool) => {
        Kind::named("Bool")
    };
    (String) => {
        Kind::named("String")
    };
    (List) => {
        Kind::named("List")
    };
    // Single uppercase letter = type variable
    (T) => {
        Kind::var("T")
    };
    (U) => {
        Kind::var("U")
    };
    (V) => {
        Kind::var("V")
    };
}

/// Build a stack vector from row variable 'a' plus types listed bottom to top
macro_rules! stack {
    (a $($t:ident)*) => {
        TypeVector::from_bottom_up(vec![Kind::row_var("a") $(, ty!($t))*])
    };
}

/// Define a builtin signature with Forth-like stack effect notation
///
/// Usage: `builtin!(sigs, "name", (a Type1 Type2 -- a Type3));`
macro_rules! builtin {
    ($sigs:ident, $name:expr, (a $($i:ident)* -- a $($o:ident)*)) => {
        $sigs.insert(
            $name.to_string(),
            FunctionType::new(stack!(a $($i)*), stack!(a $($o)*)),
        );
    };
    ($sigs:ident, $name:expr, (a $($i:ident)* ~~ a $($o:ident)*)) => {
        $sigs.insert(
            $name.to_string(),
            FunctionType::with_side_effects(stack!(a $($i)*), stack!(a $($o)*)),
        );
    };
}

/// Define several builtins sharing one signature
macro_rules! builtins_same {
    ($sigs:ident, $sig:tt, [$($name:expr),* $(,)?]) => {
        $(
            builtin!($sigs, $name, $sig);
        )*
    };
}

static SIGNATURES: LazyLock<HashMap<String, FunctionType>> = LazyLock::new(build_signatures);

/// Get the stack effect of a builtin word
pub fn builtin_signature(name: &str) -> Option<&'static FunctionType> {
    SIGNATURES.get(name)
}

/// All builtin signatures
pub fn builtin_signatures() -> &'static HashMap<String, FunctionType> {
    &SIGNATURES
}

/// True for names the runtime provides
pub fn is_builtin(name: &str) -> bool {
    SIGNATURES.contains_key(name)
}

fn build_signatures() -> HashMap<String, FunctionType> {
    let mut sigs = HashMap::new();

    // Arithmetic
    builtins_same!(sigs, (a Int Int -- a Int), ["add", "sub", "mul", "div", "mod"]);

    // Comparison
    builtin!(sigs, "eq", (a T T -- a Bool));
    builtins_same!(sigs, (a Int Int -- a Bool), ["lt", "gt"]);

    // Logic
    builtins_same!(sigs, (a Bool Bool -- a Bool), ["and", "or"]);
    builtin!(sigs, "not", (a Bool -- a Bool));

    builtin!(sigs, "concat", (a String String -- a String));

    // Stack shuffles
    builtin!(sigs, DUP, (a T -- a T T));
    builtin!(sigs, POP, (a T -- a));
    builtin!(sigs, "swap", (a T U -- a U T));

    // Output
    builtin!(sigs, "print", (a T ~~ a));
    builtin!(sigs, "writeln", (a String ~~ a));

    // Argument-list combinators
    builtin!(sigs, ARG_LIST, (a -- a List));
    builtin!(sigs, SWONS, (a T List -- a List));
    for name in ARG_ACCESSORS {
        builtin!(sigs, name, (a List -- a T List));
    }

    // Higher-order words
    let a = || Kind::row_var("a");
    let b = || Kind::row_var("b");
    let c = || Kind::row_var("c");
    let d = || Kind::row_var("d");

    // apply: ( ..a ( ..a -- ..b ) -- ..b )
    sigs.insert(
        "apply".to_string(),
        FunctionType::new(
            TypeVector::from_bottom_up(vec![a(), quotation(a(), b())]),
            TypeVector::from_bottom_up(vec![b()]),
        ),
    );

    // dip: ( ..a T ( ..a -- ..b ) -- ..b T )
    sigs.insert(
        DIP.to_string(),
        FunctionType::new(
            TypeVector::from_bottom_up(vec![a(), ty!(T), quotation(a(), b())]),
            TypeVector::from_bottom_up(vec![b(), ty!(T)]),
        ),
    );

    // if: ( ..a Bool ( ..a -- ..b ) ( ..a -- ..b ) -- ..b )
    sigs.insert(
        "if".to_string(),
        FunctionType::new(
            TypeVector::from_bottom_up(vec![
                a(),
                ty!(Bool),
                quotation(a(), b()),
                quotation(a(), b()),
            ]),
            TypeVector::from_bottom_up(vec![b()]),
        ),
    );

    // compose: ( ..a ( ..b -- ..c ) ( ..c -- ..d ) -- ..a ( ..b -- ..d ) )
    sigs.insert(
        "compose".to_string(),
        FunctionType::new(
            TypeVector::from_bottom_up(vec![a(), quotation(b(), c()), quotation(c(), d())]),
            TypeVector::from_bottom_up(vec![a(), quotation(b(), d())]),
        ),
    );

    // embed_args: ( ..a List ( ..b List -- ..c ) -- ..a ( ..b -- ..c ) List )
    sigs.insert(
        EMBED_ARGS.to_string(),
        FunctionType::new(
            TypeVector::from_bottom_up(vec![
                a(),
                ty!(List),
                Kind::Function(FunctionType::new(
                    TypeVector::from_bottom_up(vec![b(), ty!(List)]),
                    TypeVector::from_bottom_up(vec![c()]),
                )),
            ]),
            TypeVector::from_bottom_up(vec![a(), quotation(b(), c()), ty!(List)]),
        ),
    );

    sigs
}

/// `( ..from -- ..to )` as a kind
fn quotation(from: Kind, to: Kind) -> Kind {
    Kind::Function(FunctionType::new(
        TypeVector::from_top_down(vec![from]),
        TypeVector::from_top_down(vec![to]),
    ))
}

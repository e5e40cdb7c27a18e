//! Kind algebra for Tacit stack effects
//!
//! Every type-level entity the compiler reasons about is a [`Kind`]. Stack
//! effects are [`FunctionType`]s built from two [`TypeVector`]s, and row
//! polymorphism is expressed with stack variables: `( ..a Int Int -- ..a Int )`
//! consumes two `Int`s from any stack `..a` and leaves one `Int` on it.
//!
//! # Vector orientation
//!
//! A [`TypeVector`] stores its kinds **top of stack first**. When the vector is
//! open, its last element is the stack variable standing for everything below
//! the visible slots. The `Display` format prints bottom to top so that it reads
//! like a signature:
//!
//! ```text
//! kinds: [Int, Bool, ..a]     displays as: ..a Bool Int
//! ```
//!
//! Side-effecting functions print `~~` where pure ones print `--`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::fresh::FreshNames;

/// A type-level entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Self reference inside a recursive signature
    SelfType,
    /// Concrete named type (Int, Bool, String, List, ...)
    Named(String),
    /// Type variable standing for one unknown value
    /// Example: T in ( ..a T -- ..a T T )
    Var(String),
    /// Stack variable standing for an unknown rest of the stack
    /// Example: ..a in ( ..a T -- ..a T T )
    RowVar(String),
    /// Stack effect
    Function(FunctionType),
    /// Sequence of kinds. Only valid nested inside a function type.
    Vector(TypeVector),
}

/// Ordered sequence of kinds, top of stack first
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeVector {
    kinds: Vec<Kind>,
}

/// Stack effect: what is consumed from the top of the stack and what is
/// produced in its place
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    /// Stack shape before the function runs
    pub consumption: TypeVector,
    /// Stack shape after the function runs
    pub production: TypeVector,
    /// Whether running the function does more than rearrange the stack
    pub side_effects: bool,
}

/// Error raised by the well-typedness check
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("ill-typed function {function}: {var} appears in production and not in consumption")]
    IllTyped { var: String, function: String },
}

impl Kind {
    pub fn named(name: impl Into<String>) -> Self {
        Kind::Named(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Kind::Var(name.into())
    }

    pub fn row_var(name: impl Into<String>) -> Self {
        Kind::RowVar(name.into())
    }

    /// True for type variables and stack variables
    pub fn is_var(&self) -> bool {
        matches!(self, Kind::Var(_) | Kind::RowVar(_))
    }

    /// Name of a type or stack variable
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Kind::Var(name) | Kind::RowVar(name) => Some(name),
            _ => None,
        }
    }

    /// All variable names occurring anywhere in this kind, in first-occurrence order
    pub fn vars(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_vars(&mut seen, &mut out);
        out
    }

    fn collect_vars(&self, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        match self {
            Kind::Var(name) | Kind::RowVar(name) => {
                if seen.insert(name.clone()) {
                    out.push(name.clone());
                }
            }
            Kind::Function(f) => {
                for k in f.consumption.iter().chain(f.production.iter()) {
                    k.collect_vars(seen, out);
                }
            }
            Kind::Vector(v) => {
                for k in v.iter() {
                    k.collect_vars(seen, out);
                }
            }
            Kind::SelfType | Kind::Named(_) => {}
        }
    }

    /// Rename every variable by order of first occurrence.
    ///
    /// Two kinds are alpha-equivalent exactly when their canonical forms are
    /// equal. Type variables become `t0, t1, ...` and stack variables
    /// `s0, s1, ...`.
    pub fn canonicalize(&self) -> Kind {
        let mut renamer = Renamer::default();
        renamer.rename(self)
    }

    /// Structural equality up to consistent renaming of variables
    pub fn equivalent(&self, other: &Kind) -> bool {
        self.canonicalize() == other.canonicalize()
    }
}

#[derive(Default)]
struct Renamer {
    types: HashMap<String, String>,
    rows: HashMap<String, String>,
}

impl Renamer {
    fn rename(&mut self, kind: &Kind) -> Kind {
        match kind {
            Kind::Var(name) => {
                let next = self.types.len();
                Kind::Var(
                    self.types
                        .entry(name.clone())
                        .or_insert_with(|| format!("t{}", next))
                        .clone(),
                )
            }
            Kind::RowVar(name) => {
                let next = self.rows.len();
                Kind::RowVar(
                    self.rows
                        .entry(name.clone())
                        .or_insert_with(|| format!("s{}", next))
                        .clone(),
                )
            }
            Kind::Function(f) => Kind::Function(FunctionType {
                consumption: self.rename_vector(&f.consumption),
                production: self.rename_vector(&f.production),
                side_effects: f.side_effects,
            }),
            Kind::Vector(v) => Kind::Vector(self.rename_vector(v)),
            Kind::SelfType | Kind::Named(_) => kind.clone(),
        }
    }

    fn rename_vector(&mut self, vector: &TypeVector) -> TypeVector {
        TypeVector::from_top_down(vector.iter().map(|k| self.rename(k)).collect())
    }
}

impl TypeVector {
    /// Create an empty (closed) vector
    pub fn new() -> Self {
        TypeVector { kinds: Vec::new() }
    }

    /// Create a vector from kinds listed top of stack first
    pub fn from_top_down(kinds: Vec<Kind>) -> Self {
        TypeVector { kinds }
    }

    /// Create a vector from kinds listed bottom of stack first (signature order)
    pub fn from_bottom_up(mut kinds: Vec<Kind>) -> Self {
        kinds.reverse();
        TypeVector { kinds }
    }

    /// Kinds, top of stack first
    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Kind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The kind on top of the stack
    pub fn top(&self) -> Option<&Kind> {
        self.kinds.first()
    }

    /// The deepest kind (the stack variable of an open vector)
    pub fn bottom(&self) -> Option<&Kind> {
        self.kinds.last()
    }

    /// The stack variable closing this vector, if it is open
    pub fn row_var(&self) -> Option<&str> {
        match self.bottom() {
            Some(Kind::RowVar(name)) => Some(name),
            _ => None,
        }
    }

    /// True when the last element is a stack variable
    pub fn is_open(&self) -> bool {
        self.row_var().is_some()
    }

    /// Push a kind on top of the stack
    pub fn push_top(&mut self, kind: Kind) {
        self.kinds.insert(0, kind);
    }

    /// Add a kind underneath everything else
    pub fn push_bottom(&mut self, kind: Kind) {
        self.kinds.push(kind);
    }
}

impl FunctionType {
    /// Create a pure stack effect
    pub fn new(consumption: TypeVector, production: TypeVector) -> Self {
        FunctionType {
            consumption,
            production,
            side_effects: false,
        }
    }

    /// Create a stack effect that performs observable effects
    pub fn with_side_effects(consumption: TypeVector, production: TypeVector) -> Self {
        FunctionType {
            consumption,
            production,
            side_effects: true,
        }
    }

    pub fn has_side_effects(&self) -> bool {
        self.side_effects
    }

    /// Make a closed signature row-polymorphic.
    ///
    /// `( Int -- Bool )` becomes `( ..a$n Int -- ..a$n Bool )` with a fresh
    /// stack variable shared by both sides. Open signatures are returned as is.
    pub fn with_implicit_row_var(mut self, fresh: &FreshNames) -> Self {
        if self.consumption.is_open() {
            return self;
        }
        let rho = Kind::RowVar(fresh.fresh("a"));
        self.consumption.push_bottom(rho.clone());
        self.production.push_bottom(rho);
        self
    }

    /// Number of slots consumed when the function leaves the rest of the stack
    /// untouched; `None` when the depth it reaches is unbounded
    pub fn max_consumption(&self) -> Option<usize> {
        visible_depth(&self.consumption, &self.production)
    }

    /// Number of slots produced on top of the untouched rest of the stack;
    /// `None` when unbounded
    pub fn max_production(&self) -> Option<usize> {
        visible_depth(&self.production, &self.consumption)
    }

    /// Check that every variable at the top level of the production is
    /// introduced somewhere in the consumption.
    ///
    /// The simplest ill-typed signature is `( ..a -- ..b )`. A `self` in the
    /// consumption implicitly carries all of the consumption variables, so such
    /// signatures are always accepted.
    pub fn check_well_typed(&self) -> Result<(), TypeError> {
        if self.consumption.iter().any(|k| matches!(k, Kind::SelfType)) {
            return Ok(());
        }

        let mut seen = HashSet::new();
        let mut cons_vars = Vec::new();
        for k in self.consumption.iter() {
            k.collect_vars(&mut seen, &mut cons_vars);
        }

        for k in self.production.iter() {
            if let Some(name) = k.var_name()
                && !seen.contains(name)
            {
                return Err(TypeError::IllTyped {
                    var: k.to_string(),
                    function: self.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn visible_depth(side: &TypeVector, other: &TypeVector) -> Option<usize> {
    let last = side.len().saturating_sub(1);
    for (i, k) in side.iter().enumerate() {
        if let Kind::RowVar(_) = k {
            return if i == last && other.bottom() == Some(k) {
                Some(i)
            } else {
                None
            };
        }
    }
    Some(side.len())
}

impl From<FunctionType> for Kind {
    fn from(f: FunctionType) -> Self {
        Kind::Function(f)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::SelfType => write!(f, "self"),
            Kind::Named(name) => write!(f, "{}", name),
            Kind::Var(name) => write!(f, "{}", name),
            Kind::RowVar(name) => write!(f, "..{}", name),
            Kind::Function(func) => write!(f, "{}", func),
            Kind::Vector(v) => write!(f, "{{{}}}", v),
        }
    }
}

impl fmt::Display for TypeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.kinds.iter().rev().map(|k| k.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec!["(".to_string()];
        if !self.consumption.is_empty() {
            parts.push(self.consumption.to_string());
        }
        parts.push(if self.side_effects { "~~" } else { "--" }.to_string());
        if !self.production.is_empty() {
            parts.push(self.production.to_string());
        }
        parts.push(")".to_string());
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Kind {
        Kind::named("Int")
    }

    fn binary_int_op() -> FunctionType {
        // ( ..a Int Int -- ..a Int )
        FunctionType::new(
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), int(), int()]),
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), int()]),
        )
    }

    #[test]
    fn test_vector_orientation() {
        let v = TypeVector::from_bottom_up(vec![Kind::row_var("a"), int(), Kind::named("Bool")]);
        assert_eq!(v.top(), Some(&Kind::named("Bool")));
        assert_eq!(v.bottom(), Some(&Kind::row_var("a")));
        assert_eq!(v.row_var(), Some("a"));
        assert!(v.is_open());
        assert_eq!(v.to_string(), "..a Int Bool");
    }

    #[test]
    fn test_push_top_and_bottom() {
        let mut v = TypeVector::new();
        v.push_top(int());
        v.push_top(Kind::named("Bool"));
        v.push_bottom(Kind::row_var("r"));
        assert_eq!(
            v.kinds(),
            &[Kind::named("Bool"), int(), Kind::row_var("r")]
        );
    }

    #[test]
    fn test_closed_vector() {
        let v = TypeVector::from_top_down(vec![int()]);
        assert!(!v.is_open());
        assert_eq!(v.row_var(), None);
    }

    #[test]
    fn test_display_function() {
        assert_eq!(binary_int_op().to_string(), "( ..a Int Int -- ..a Int )");

        let print = FunctionType::with_side_effects(
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), Kind::var("T")]),
            TypeVector::from_bottom_up(vec![Kind::row_var("a")]),
        );
        assert_eq!(print.to_string(), "( ..a T ~~ ..a )");

        let empty = FunctionType::new(TypeVector::new(), TypeVector::new());
        assert_eq!(empty.to_string(), "( -- )");
    }

    #[test]
    fn test_display_nested_function() {
        // apply: ( ..a ( ..a -- ..b ) -- ..b )
        let body = FunctionType::new(
            TypeVector::from_top_down(vec![Kind::row_var("a")]),
            TypeVector::from_top_down(vec![Kind::row_var("b")]),
        );
        let apply = FunctionType::new(
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), body.into()]),
            TypeVector::from_top_down(vec![Kind::row_var("b")]),
        );
        assert_eq!(apply.to_string(), "( ..a ( ..a -- ..b ) -- ..b )");
    }

    #[test]
    fn test_vars_first_occurrence_order() {
        let k = Kind::Function(FunctionType::new(
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), Kind::var("T"), Kind::var("U")]),
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), Kind::var("U")]),
        ));
        // Top first: U, T, then ..a
        assert_eq!(k.vars(), vec!["U", "T", "a"]);
    }

    #[test]
    fn test_equivalent_up_to_renaming() {
        let f = |row: &str, t: &str| {
            Kind::Function(FunctionType::new(
                TypeVector::from_bottom_up(vec![Kind::row_var(row), Kind::var(t)]),
                TypeVector::from_bottom_up(vec![Kind::row_var(row), Kind::var(t), Kind::var(t)]),
            ))
        };
        assert!(f("a", "T").equivalent(&f("r$3", "x$9")));
        assert_ne!(f("a", "T"), f("r$3", "x$9"));
    }

    #[test]
    fn test_not_equivalent_when_sharing_differs() {
        let shared = Kind::Function(FunctionType::new(
            TypeVector::from_top_down(vec![Kind::var("T")]),
            TypeVector::from_top_down(vec![Kind::var("T")]),
        ));
        let distinct = Kind::Function(FunctionType::new(
            TypeVector::from_top_down(vec![Kind::var("T")]),
            TypeVector::from_top_down(vec![Kind::var("U")]),
        ));
        assert!(!shared.equivalent(&distinct));
    }

    #[test]
    fn test_type_and_stack_vars_are_distinct() {
        assert!(!Kind::var("a").equivalent(&Kind::row_var("a")));
    }

    #[test]
    fn test_implicit_row_var() {
        let fresh = FreshNames::new();
        let f = FunctionType::new(
            TypeVector::from_top_down(vec![int()]),
            TypeVector::from_top_down(vec![Kind::named("Bool")]),
        )
        .with_implicit_row_var(&fresh);
        assert_eq!(f.consumption.row_var(), Some("a$0"));
        assert_eq!(f.production.row_var(), Some("a$0"));

        // Already open: unchanged
        let g = binary_int_op().with_implicit_row_var(&fresh);
        assert_eq!(g, binary_int_op());
    }

    #[test]
    fn test_max_consumption_and_production() {
        let add = binary_int_op();
        assert_eq!(add.max_consumption(), Some(2));
        assert_eq!(add.max_production(), Some(1));

        // ( ..a -- ..b ): unrelated rows, unbounded
        let call = FunctionType::new(
            TypeVector::from_top_down(vec![Kind::row_var("a")]),
            TypeVector::from_top_down(vec![Kind::row_var("b")]),
        );
        assert_eq!(call.max_consumption(), None);
        assert_eq!(call.max_production(), None);

        // Closed ( Int -- Int Int )
        let closed = FunctionType::new(
            TypeVector::from_top_down(vec![int()]),
            TypeVector::from_top_down(vec![int(), int()]),
        );
        assert_eq!(closed.max_consumption(), Some(1));
        assert_eq!(closed.max_production(), Some(2));
    }

    #[test]
    fn test_well_typed() {
        assert!(binary_int_op().check_well_typed().is_ok());
    }

    #[test]
    fn test_ill_typed_production_var() {
        let f = FunctionType::new(
            TypeVector::from_top_down(vec![Kind::row_var("a")]),
            TypeVector::from_top_down(vec![Kind::row_var("b")]),
        );
        let err = f.check_well_typed().unwrap_err();
        assert_eq!(
            err,
            TypeError::IllTyped {
                var: "..b".to_string(),
                function: "( ..a -- ..b )".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_consumption_var_counts() {
        // ( ..a ( ..a -- ..b ) -- ..b ) is fine: ..b is introduced by the quotation
        let body = FunctionType::new(
            TypeVector::from_top_down(vec![Kind::row_var("a")]),
            TypeVector::from_top_down(vec![Kind::row_var("b")]),
        );
        let apply = FunctionType::new(
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), body.into()]),
            TypeVector::from_top_down(vec![Kind::row_var("b")]),
        );
        assert!(apply.check_well_typed().is_ok());
    }

    #[test]
    fn test_self_type_is_always_well_typed() {
        let f = FunctionType::new(
            TypeVector::from_bottom_up(vec![Kind::row_var("a"), Kind::SelfType]),
            TypeVector::from_top_down(vec![Kind::row_var("b")]),
        );
        assert!(f.check_well_typed().is_ok());
    }
}

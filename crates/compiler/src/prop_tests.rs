//! Property tests for the unifier and the partial evaluator using proptest.
//!
//! Key properties:
//!
//! 1. Normalization is idempotent up to renaming:
//!    normalize(normalize(k, u), {}) is alpha-equivalent to normalize(k, u)
//! 2. Normalizing a function type keeps its side-effect flag and the lengths
//!    of both vectors
//! 3. Cyclic substitutions of any length resolve without looping
//! 4. Partial evaluation is a fixed point on its own output

use proptest::prelude::*;

use crate::ast::Term;
use crate::partial_eval::partial_evaluate;
use crate::test_oracle::{MOCK_WORDS, MockOracle};
use crate::types::{FunctionType, Kind, TypeVector};
use crate::unification::{InferenceSession, Substitution};

// ---------------------------------------------------------------------------
// Strategies for generating kinds
// ---------------------------------------------------------------------------

const VAR_POOL: &[&str] = &["a", "b", "c", "T", "U", "V"];
const NAME_POOL: &[&str] = &["Int", "Bool", "String", "Float", "List"];

fn arb_leaf() -> impl Strategy<Value = Kind> {
    prop_oneof![
        3 => prop::sample::select(NAME_POOL).prop_map(Kind::named),
        2 => prop::sample::select(VAR_POOL).prop_map(Kind::var),
        2 => prop::sample::select(VAR_POOL).prop_map(Kind::row_var),
        1 => Just(Kind::SelfType),
    ]
}

fn arb_function(inner: BoxedStrategy<Kind>) -> impl Strategy<Value = FunctionType> {
    (
        prop::collection::vec(inner.clone(), 0..=4),
        prop::collection::vec(inner, 0..=4),
        any::<bool>(),
    )
        .prop_map(|(cons, prod, side_effects)| FunctionType {
            consumption: TypeVector::from_top_down(cons),
            production: TypeVector::from_top_down(prod),
            side_effects,
        })
}

/// Generate kinds of bounded depth. Depth 0 = leaf kinds only.
fn arb_kind(depth: u32) -> BoxedStrategy<Kind> {
    if depth == 0 {
        arb_leaf().boxed()
    } else {
        prop_oneof![
            3 => arb_leaf(),
            1 => arb_function(arb_kind(depth - 1)).prop_map(Kind::Function),
        ]
        .boxed()
    }
}

/// Substitutions over the variable pool. Bindings may mention the variables
/// they bind, so cycles are common.
fn arb_substitution() -> impl Strategy<Value = Substitution> {
    prop::collection::hash_map(
        prop::sample::select(VAR_POOL).prop_map(str::to_string),
        arb_kind(2),
        0..=6,
    )
}

// ---------------------------------------------------------------------------
// Strategies for generating terms
// ---------------------------------------------------------------------------

fn arb_simple_term() -> impl Strategy<Value = Term> {
    prop_oneof![
        2 => (-20i64..20).prop_map(Term::int),
        3 => prop::sample::select(MOCK_WORDS).prop_map(Term::word),
    ]
}

fn arb_terms(depth: u32) -> BoxedStrategy<Vec<Term>> {
    if depth == 0 {
        prop::collection::vec(arb_simple_term(), 0..8).boxed()
    } else {
        let term = prop_oneof![
            4 => arb_simple_term(),
            1 => arb_terms(depth - 1).prop_map(Term::Quotation),
        ];
        prop::collection::vec(term, 0..10).boxed()
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// Resolving an already resolved kind only renames its variables.
    #[test]
    fn normalize_idempotent_up_to_renaming(kind in arb_kind(3), subst in arb_substitution()) {
        let session = InferenceSession::default();
        let once = session.normalize(&kind, &subst).unwrap();
        let twice = session.normalize(&once, &Substitution::new()).unwrap();
        prop_assert!(once.equivalent(&twice), "{} vs {}", once, twice);
    }

    #[test]
    fn normalize_preserves_function_shape(
        f in arb_function(arb_kind(2)),
        subst in arb_substitution(),
    ) {
        let session = InferenceSession::default();
        let resolved = session.normalize(&Kind::Function(f.clone()), &subst).unwrap();
        match resolved {
            Kind::Function(g) => {
                prop_assert_eq!(g.side_effects, f.side_effects);
                prop_assert_eq!(g.consumption.len(), f.consumption.len());
                prop_assert_eq!(g.production.len(), f.production.len());
            }
            other => prop_assert!(false, "expected a function type, got {}", other),
        }
    }

    #[test]
    fn normalize_terminates_on_cycles(len in 1usize..1200, start in 0usize..1200) {
        let session = InferenceSession::default();
        let mut subst = Substitution::new();
        for i in 0..len {
            subst.insert(format!("v{}", i), Kind::var(format!("v{}", (i + 1) % len)));
        }
        let resolved = session.normalize(&Kind::var(format!("v{}", start % len)), &subst).unwrap();
        prop_assert!(resolved.is_var());
    }

    /// Folding the folded sequence changes nothing.
    #[test]
    fn partial_evaluate_fixed_point(terms in arb_terms(2)) {
        let once = partial_evaluate(&MockOracle, &terms);
        let twice = partial_evaluate(&MockOracle, &once);
        prop_assert_eq!(once, twice);
    }

    /// Folding never grows a sequence of pure integer arithmetic.
    #[test]
    fn partial_evaluate_pure_prefix_collapses(
        values in prop::collection::vec(-100i64..100, 1..10),
    ) {
        let mut terms: Vec<Term> = values.iter().map(|v| Term::int(*v)).collect();
        terms.extend(std::iter::repeat_n(Term::word("add"), values.len() - 1));
        let folded = partial_evaluate(&MockOracle, &terms);
        prop_assert_eq!(folded, vec![Term::int(values.iter().sum())]);
    }
}

//! Fresh variable names
//!
//! Inference and unification need variable names that no other part of the
//! current session uses. A [`FreshNames`] counter hands out `base$n` names; the
//! counter is atomic so one instance can be shared, but independent inference
//! runs should each own their counter (see `InferenceSession`).
//! [`FreshNames::global`] is the process-wide fallback used by `unify`.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

static GLOBAL: FreshNames = FreshNames::new();

/// Monotonic generator of unique variable names
#[derive(Debug, Default)]
pub struct FreshNames {
    next: AtomicUsize,
}

impl FreshNames {
    pub const fn new() -> Self {
        FreshNames {
            next: AtomicUsize::new(0),
        }
    }

    /// The process-wide counter
    pub fn global() -> &'static FreshNames {
        &GLOBAL
    }

    /// Next raw counter value
    pub fn next_id(&self) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Generate `base$n`.
    ///
    /// A base that is itself a generated name is stripped back to its stem, so
    /// freshening `a$3` yields `a$7` rather than `a$3$7`.
    pub fn fresh(&self, base: &str) -> String {
        let stem = base.split_once('$').map_or(base, |(stem, _)| stem);
        format!("{}${}", stem, self.next_id())
    }

    /// Generate a name that is not in `reserved`
    pub fn fresh_avoiding(&self, base: &str, reserved: &HashSet<String>) -> String {
        loop {
            let name = self.fresh(base);
            if !reserved.contains(&name) {
                return name;
            }
        }
    }
}

//! Substitution application for Tacit kinds
//!
//! Type inference (outside this crate) produces a [`Substitution`] binding
//! variable names to kinds. [`unify`] resolves a kind against it: bound
//! variables are replaced by their fully resolved bindings and variables left
//! unbound are renamed to fresh names, so the result never refers to a name the
//! inference engine still has in flight.
//!
//! Substitutions may be cyclic (`a := ( a -- Int )` comes out of recursive
//! definitions). Resolution keeps a stack of the kinds currently being resolved
//! and returns a kind unchanged when it is met again on the same path, which
//! makes [`unify`] total.
//!
//! A bare [`Kind::Vector`] is only meaningful inside a function type; asking to
//! resolve one directly is a caller bug and reported as
//! [`UnifyError::BareTypeVector`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::config::CompilerConfig;
use crate::fresh::FreshNames;
use crate::types::{FunctionType, Kind, TypeVector};

/// Variable name to kind
pub type Substitution = HashMap<String, Kind>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnifyError {
    #[error("internal error: bare type vector {{{0}}} reached the unifier outside a function type")]
    BareTypeVector(String),
}

/// Resolve `kind` against `subst`, freshening unbound variables with the
/// process-wide name counter
pub fn unify(kind: &Kind, subst: &Substitution) -> Result<Kind, UnifyError> {
    Resolver::new(subst, FreshNames::global(), false).resolve_top(kind)
}

/// One inference run: its own fresh-name counter plus diagnostic flags
#[derive(Debug, Default)]
pub struct InferenceSession {
    fresh: FreshNames,
    verbose: bool,
    show_inferred: bool,
}

impl InferenceSession {
    pub fn new(config: &CompilerConfig) -> Self {
        InferenceSession {
            fresh: FreshNames::new(),
            verbose: config.verbose_inference,
            show_inferred: config.show_inferred_type,
        }
    }

    /// Fresh-name counter owned by this session
    pub fn fresh_names(&self) -> &FreshNames {
        &self.fresh
    }

    /// Session-scoped [`unify`]
    pub fn normalize(&self, kind: &Kind, subst: &Substitution) -> Result<Kind, UnifyError> {
        let resolved = Resolver::new(subst, &self.fresh, self.verbose).resolve_top(kind)?;
        if self.show_inferred {
            info!(kind = %kind, inferred = %resolved, "inferred type");
        }
        Ok(resolved)
    }
}

/// Pending step of a resolution
enum Work<'k> {
    /// Resolve a kind and push the result
    Enter { kind: &'k Kind, nested: bool },
    /// Drop entries from the visited path
    Leave(usize),
    /// Assemble a function type from the last results
    Function {
        consumption: usize,
        production: usize,
        side_effects: bool,
    },
    /// Assemble a nested vector from the last results
    Vector(usize),
}

struct Resolver<'a> {
    subst: &'a Substitution,
    fresh: &'a FreshNames,
    verbose: bool,
    /// Kinds on the active resolution path
    visited: Vec<Kind>,
    /// Unbound variable to its fresh replacement, for this call only
    generated: HashMap<Kind, Kind>,
    /// Names a fresh variable must not take
    reserved: HashSet<String>,
}

impl<'a> Resolver<'a> {
    fn new(subst: &'a Substitution, fresh: &'a FreshNames, verbose: bool) -> Self {
        let mut reserved: HashSet<String> = subst.keys().cloned().collect();
        for binding in subst.values() {
            reserved.extend(binding.vars());
        }
        Resolver {
            subst,
            fresh,
            verbose,
            visited: Vec::new(),
            generated: HashMap::new(),
            reserved,
        }
    }

    fn resolve_top(mut self, kind: &Kind) -> Result<Kind, UnifyError> {
        self.reserved.extend(kind.vars());
        self.resolve(kind)
    }

    /// Resolution runs on an explicit work stack: cycles through function
    /// types can be arbitrarily long and must not grow the call stack.
    fn resolve<'k>(&mut self, root: &'k Kind) -> Result<Kind, UnifyError>
    where
        'a: 'k,
    {
        let mut work = vec![Work::Enter {
            kind: root,
            nested: false,
        }];
        let mut results: Vec<Kind> = Vec::new();

        while let Some(item) = work.pop() {
            match item {
                Work::Enter { kind, nested } => {
                    self.enter(kind, nested, &mut work, &mut results)?;
                }
                Work::Leave(count) => {
                    self.visited.truncate(self.visited.len() - count);
                }
                Work::Function {
                    consumption,
                    production,
                    side_effects,
                } => {
                    let produced = results.split_off(results.len() - production);
                    let consumed = results.split_off(results.len() - consumption);
                    results.push(Kind::Function(FunctionType {
                        consumption: TypeVector::from_top_down(consumed),
                        production: TypeVector::from_top_down(produced),
                        side_effects,
                    }));
                }
                Work::Vector(len) => {
                    let kinds = results.split_off(results.len() - len);
                    results.push(Kind::Vector(TypeVector::from_top_down(kinds)));
                }
            }
        }

        debug_assert_eq!(results.len(), 1);
        debug_assert!(self.visited.is_empty());
        Ok(results.pop().unwrap_or_else(|| root.clone()))
    }

    /// `nested` is true inside a function type's vectors, the only place a
    /// vector may appear.
    fn enter<'k>(
        &mut self,
        kind: &'k Kind,
        nested: bool,
        work: &mut Vec<Work<'k>>,
        results: &mut Vec<Kind>,
    ) -> Result<(), UnifyError>
    where
        'a: 'k,
    {
        if self.visited.contains(kind) {
            results.push(kind.clone());
            return Ok(());
        }
        match kind {
            Kind::SelfType | Kind::Named(_) => results.push(kind.clone()),
            Kind::Var(_) | Kind::RowVar(_) => self.enter_var(kind, nested, work, results),
            Kind::Function(f) => {
                self.visited.push(kind.clone());
                work.push(Work::Leave(1));
                work.push(Work::Function {
                    consumption: f.consumption.len(),
                    production: f.production.len(),
                    side_effects: f.side_effects,
                });
                // Children are resolved consumption first, each vector top first
                for child in f.consumption.iter().chain(f.production.iter()).rev() {
                    work.push(Work::Enter {
                        kind: child,
                        nested: true,
                    });
                }
            }
            Kind::Vector(v) if nested => {
                self.visited.push(kind.clone());
                work.push(Work::Leave(1));
                work.push(Work::Vector(v.len()));
                for child in v.iter().rev() {
                    work.push(Work::Enter {
                        kind: child,
                        nested: true,
                    });
                }
            }
            Kind::Vector(v) => return Err(UnifyError::BareTypeVector(v.to_string())),
        }
        Ok(())
    }

    /// Follow a variable's bindings. Every variable passed on the way stays on
    /// the visited path until the binding it ends in has been resolved.
    fn enter_var<'k>(
        &mut self,
        var: &'k Kind,
        nested: bool,
        work: &mut Vec<Work<'k>>,
        results: &mut Vec<Kind>,
    ) where
        'a: 'k,
    {
        let subst = self.subst;
        let mut current = var;
        self.visited.push(var.clone());
        let mut pushed = 1;

        loop {
            let Some(binding) = current.var_name().and_then(|name| subst.get(name)) else {
                let fresh = self.freshen(current);
                results.push(fresh);
                break;
            };
            if self.verbose {
                debug!(var = %current, binding = %binding, "dereferencing");
            }
            if self.visited.contains(binding) {
                results.push(binding.clone());
                break;
            }
            if binding.is_var() {
                self.visited.push(binding.clone());
                pushed += 1;
                current = binding;
                continue;
            }
            work.push(Work::Leave(pushed));
            work.push(Work::Enter {
                kind: binding,
                nested,
            });
            return;
        }

        self.visited.truncate(self.visited.len() - pushed);
    }

    fn freshen(&mut self, var: &Kind) -> Kind {
        if let Some(fresh) = self.generated.get(var) {
            return fresh.clone();
        }
        let fresh = match var {
            Kind::Var(name) => Kind::Var(self.fresh.fresh_avoiding(name, &self.reserved)),
            Kind::RowVar(name) => Kind::RowVar(self.fresh.fresh_avoiding(name, &self.reserved)),
            other => other.clone(),
        };
        self.generated.insert(var.clone(), fresh.clone());
        fresh
    }
}

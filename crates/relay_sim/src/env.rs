//! The signal-binding environment and the definitions index.
//!
//! An [`Env`] is a mutable `SigRef → bool` store. One long-lived instance
//! is owned by the kernel and re-bound once per cycle per signal; short
//! per-call scopes are built for function application and dropped when the
//! call returns. Lookup never traverses to an enclosing scope: a function
//! body sees exactly its parameters, nothing from the call site.
//!
//! The read-only view of the circuit's definitions is a separate
//! [`DefIndex`], shared by every scope through the evaluation context.

use std::collections::HashMap;

use relay_common::Name;
use relay_ir::{Definition, SigRef};

/// A mutable mapping from signal references to boolean values.
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: HashMap<SigRef, bool>,
}

impl Env {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the fresh scope for one function application.
    ///
    /// The scope contains exactly the `params[i] → values[i]` bindings and
    /// nothing inherited from the caller.
    ///
    /// # Panics
    ///
    /// Panics if the slices disagree in length; the evaluator checks arity
    /// before building the scope.
    pub fn call_scope(params: &[Name], values: &[bool]) -> Self {
        assert_eq!(params.len(), values.len());
        let bindings = params
            .iter()
            .zip(values)
            .map(|(&p, &v)| (SigRef::Named(p), v))
            .collect();
        Self { bindings }
    }

    /// Returns the binding for `sig` in this scope, if present.
    ///
    /// Deliberately does not consult any other scope.
    pub fn lookup(&self, sig: SigRef) -> Option<bool> {
        self.bindings.get(&sig).copied()
    }

    /// Inserts or overwrites the binding for `sig`.
    pub fn bind(&mut self, sig: SigRef, value: bool) {
        self.bindings.insert(sig, value);
    }

    /// Returns `true` if `sig` is bound in this scope.
    pub fn has_binding(&self, sig: SigRef) -> bool {
        self.bindings.contains_key(&sig)
    }

    /// Iterates over all bindings, in no particular order.
    pub fn bindings(&self) -> impl Iterator<Item = (SigRef, bool)> + '_ {
        self.bindings.iter().map(|(&s, &v)| (s, v))
    }

    /// Returns the number of bound signals.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A read-only `Name → Definition` index, built once per run.
///
/// Definitions are process-wide and immutable once simulation starts;
/// every evaluation scope resolves calls through the same index. When two
/// definitions share a name, the later one shadows the earlier.
#[derive(Debug)]
pub struct DefIndex<'a> {
    by_name: HashMap<Name, &'a Definition>,
}

impl<'a> DefIndex<'a> {
    /// Builds the index over a circuit's definition list.
    pub fn build(definitions: &'a [Definition]) -> Self {
        let by_name = definitions.iter().map(|d| (d.name, d)).collect();
        Self { by_name }
    }

    /// Resolves a function name to its definition.
    pub fn get(&self, name: Name) -> Option<&'a Definition> {
        self.by_name.get(&name).copied()
    }

    /// Returns the number of distinct function names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no functions are defined.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

//! User-defined function definitions.

use crate::expr::Expr;
use relay_common::Name;
use serde::{Deserialize, Serialize};

/// A named, parameterized boolean function.
///
/// Definitions are populated once, before simulation starts, and never
/// mutated. The body may reference the formal parameters and may call other
/// definitions (including itself); whether every reference in the body is
/// actually bound is checked at evaluation time, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The function name, e.g. `xor`.
    pub name: Name,
    /// The ordered formal parameter names, pairwise distinct.
    pub params: Vec<Name>,
    /// The function body.
    pub body: Expr,
}

impl Definition {
    /// Returns the number of formal parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

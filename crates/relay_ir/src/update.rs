//! Combinational update statements.

use crate::expr::Expr;
use relay_common::Name;
use serde::{Deserialize, Serialize};

/// A combinational assignment: re-bind `target` to the value of `expr`.
///
/// Updates are evaluated once per cycle, in declaration order. The target
/// is always a user-named signal; the registered output of a latch is
/// written by the simulation kernel itself and cannot be the target of an
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// The signal being assigned.
    pub target: Name,
    /// The expression producing the new value.
    pub expr: Expr,
}

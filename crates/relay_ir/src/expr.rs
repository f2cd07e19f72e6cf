//! Boolean expression trees.
//!
//! [`Expr`] is a closed sum type over the five expression forms the
//! simulator evaluates. Trees are immutable pure data: evaluation happens
//! in `relay_sim` against an externally supplied environment, and an
//! expression never holds updates, circuits, or mutable state. Adding an
//! operator means adding a variant here and a match arm in the evaluator,
//! checked exhaustively at compile time.

use crate::sigref::SigRef;
use relay_common::Name;
use serde::{Deserialize, Serialize};

/// A boolean expression over circuit signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// A signal reference; evaluates to the signal's current binding.
    Signal(SigRef),
    /// Conjunction of two subexpressions.
    And {
        /// The left operand.
        lhs: Box<Expr>,
        /// The right operand.
        rhs: Box<Expr>,
    },
    /// Disjunction of two subexpressions.
    Or {
        /// The left operand.
        lhs: Box<Expr>,
        /// The right operand.
        rhs: Box<Expr>,
    },
    /// Negation of a subexpression.
    Not(Box<Expr>),
    /// Application of a user-defined function to argument expressions.
    Call {
        /// The function name, resolved against the circuit's definitions.
        func: Name,
        /// The argument expressions, evaluated in the caller's environment.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Shorthand for a reference to the named signal.
    pub fn signal(name: Name) -> Expr {
        Expr::Signal(SigRef::Named(name))
    }

    /// Shorthand for a reference to a latch's registered output.
    pub fn latch_out(name: Name) -> Expr {
        Expr::Signal(SigRef::LatchOut(name))
    }

    /// Builds the conjunction `lhs * rhs`.
    pub fn and(lhs: Expr, rhs: Expr) -> Expr {
        Expr::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Builds the disjunction `lhs + rhs`.
    pub fn or(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Builds the negation `/operand`.
    pub fn not(operand: Expr) -> Expr {
        Expr::Not(Box::new(operand))
    }

    /// Builds the application `func(args…)`.
    pub fn call(func: Name, args: Vec<Expr>) -> Expr {
        Expr::Call { func, args }
    }
}

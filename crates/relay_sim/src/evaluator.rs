//! Strict boolean expression evaluation.
//!
//! [`eval_expr`] recursively evaluates an [`Expr`] tree against an [`Env`],
//! resolving function calls through the [`EvalContext`]'s definitions
//! index. Evaluation is strict: both operands of a conjunction or
//! disjunction are evaluated before combining, so an unbound signal or a
//! bad call in either operand always surfaces, regardless of the other
//! operand's value.

use relay_common::{Name, NameTable};
use relay_ir::Expr;

use crate::env::{DefIndex, Env};
use crate::error::SimError;

/// Default bound on nested function applications.
///
/// Well above any realistic definition nesting; a circuit that exceeds it
/// almost certainly contains non-terminating recursion.
pub const DEFAULT_MAX_CALL_DEPTH: u32 = 64;

/// Shared, read-only context for one evaluation.
///
/// Carries the definitions index (the process-wide definitions view every
/// scope resolves calls through), the name table for error messages, and
/// the call-depth bound.
pub struct EvalContext<'a> {
    /// The name table, used to render names in error messages.
    pub names: &'a NameTable,
    /// The definitions index built over the circuit's definition list.
    pub defs: &'a DefIndex<'a>,
    /// Maximum nesting of function applications before aborting.
    pub max_call_depth: u32,
}

impl<'a> EvalContext<'a> {
    /// Creates a context with the default call-depth bound.
    pub fn new(names: &'a NameTable, defs: &'a DefIndex<'a>) -> Self {
        Self {
            names,
            defs,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Evaluates `expr` against `env`, returning its boolean value.
///
/// The environment is read, never written; the only allocation is the
/// transient scope built per function application.
pub fn eval_expr(ctx: &EvalContext<'_>, env: &Env, expr: &Expr) -> Result<bool, SimError> {
    eval_at_depth(ctx, env, expr, 0)
}

fn eval_at_depth(
    ctx: &EvalContext<'_>,
    env: &Env,
    expr: &Expr,
    depth: u32,
) -> Result<bool, SimError> {
    match expr {
        Expr::Signal(sig) => env
            .lookup(*sig)
            .ok_or_else(|| SimError::UnboundSignal(sig.display(ctx.names))),

        Expr::And { lhs, rhs } => {
            let l = eval_at_depth(ctx, env, lhs, depth)?;
            let r = eval_at_depth(ctx, env, rhs, depth)?;
            Ok(l && r)
        }

        Expr::Or { lhs, rhs } => {
            let l = eval_at_depth(ctx, env, lhs, depth)?;
            let r = eval_at_depth(ctx, env, rhs, depth)?;
            Ok(l || r)
        }

        Expr::Not(operand) => Ok(!eval_at_depth(ctx, env, operand, depth)?),

        Expr::Call { func, args } => apply(ctx, env, *func, args, depth),
    }
}

/// Applies a user-defined function.
///
/// Arguments are evaluated in the caller's environment (call-by-value);
/// the body runs in a fresh scope containing only the parameter bindings.
fn apply(
    ctx: &EvalContext<'_>,
    env: &Env,
    func: Name,
    args: &[Expr],
    depth: u32,
) -> Result<bool, SimError> {
    let def = ctx
        .defs
        .get(func)
        .ok_or_else(|| SimError::UndefinedFunction(ctx.names.resolve(func).to_string()))?;

    if args.len() != def.arity() {
        return Err(SimError::ArityMismatch {
            function: ctx.names.resolve(func).to_string(),
            expected: def.arity(),
            actual: args.len(),
        });
    }

    if depth >= ctx.max_call_depth {
        return Err(SimError::CallDepthExceeded(ctx.max_call_depth));
    }

    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(eval_at_depth(ctx, env, arg, depth)?);
    }

    let scope = Env::call_scope(&def.params, &values);
    eval_at_depth(ctx, &scope, &def.body, depth + 1)
}

//! # function.rs
//!
//! The compiled form of an expression: an immutable program of stack
//! operations in Reverse Polish order, executed by a small stack machine.
//!
//! A [`CompiledFunction`] owns everything it needs. Callees of function
//! calls and derivative calls are captured by value at build time (cheaply,
//! behind an `Arc`), so redefining a registry entry later never changes a
//! function that was already compiled against the old definition. The type
//! is `Send + Sync` and cloning shares the underlying program, which makes
//! it safe to hand the same function to a plotting loop and a parallel root
//! sweep at once.
//!
//! Evaluation never fails: division by zero, powers of negative bases, and
//! out-of-domain built-in arguments all flow through as `NaN` or infinities
//! for the consumer to skip.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::builtins::Builtin;
use crate::derivative::central_difference;
use crate::operators::BinaryOperatorKind;
use crate::Real;

/// One stack operation of a compiled program.
#[derive(Debug, Clone)]
pub(crate) enum Op {
    /// Push a literal value.
    Number(Real),
    /// Push the evaluation point.
    Variable,
    /// Pop two values (right, then left) and push the operator result.
    Binary(BinaryOperatorKind),
    /// Pop one value and push the built-in applied to it.
    Builtin(Builtin),
    /// Pop one value and push the captured function applied to it.
    Call(CompiledFunction),
    /// Pop one value and push the numerical derivative of the captured
    /// function at that point.
    Derivative(CompiledFunction),
}

/// A compiled, immutable expression: one real argument in, one real value
/// out.
///
/// Obtained from [`crate::compile`] or from
/// [`crate::registry::FunctionRegistry::define`]. Cloning is cheap and
/// shares the program.
///
/// # Examples
///
/// ```rust
/// let f = calcgraph::compile("3*x^2-5").unwrap();
/// assert_eq!(f.eval(5.0), 70.0);
/// assert_eq!(f.eval(6.0), 103.0);
/// ```
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    program: Arc<[Op]>,
}

impl CompiledFunction {
    /// Wraps a finished program. The builder guarantees the program is
    /// balanced: every operation finds its operands on the stack and exactly
    /// one value remains at the end.
    pub(crate) fn from_ops(ops: Vec<Op>) -> Self {
        Self { program: ops.into() }
    }

    /// The identity function.
    pub(crate) fn identity() -> Self {
        Self::from_ops(vec![Op::Variable])
    }

    /// A built-in lifted to a standalone function.
    pub(crate) fn from_builtin(builtin: Builtin) -> Self {
        Self::from_ops(vec![Op::Variable, Op::Builtin(builtin)])
    }

    /// Evaluates the function at `x`.
    ///
    /// Runs the program left to right over an operand stack. Non-finite
    /// intermediate values propagate; they are never an error.
    pub fn eval(&self, x: Real) -> Real {
        let mut stack: SmallVec<[Real; 16]> = SmallVec::new();
        for op in self.program.iter() {
            match op {
                Op::Number(value) => stack.push(*value),
                Op::Variable => stack.push(x),
                Op::Binary(oper) => {
                    let r = stack.pop().unwrap();
                    let l = stack.pop().unwrap();
                    stack.push(oper.apply(l, r));
                }
                Op::Builtin(builtin) => {
                    let arg = stack.pop().unwrap();
                    stack.push(builtin.apply(arg));
                }
                Op::Call(callee) => {
                    let arg = stack.pop().unwrap();
                    stack.push(callee.eval(arg));
                }
                Op::Derivative(callee) => {
                    let arg = stack.pop().unwrap();
                    stack.push(central_difference(callee, arg));
                }
            }
        }
        stack.pop().unwrap()
    }
}

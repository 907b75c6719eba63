//! # derivative.rs
//!
//! Numerical differentiation via the symmetric (central) difference
//! formula `(f(x + h) - f(x - h)) / (2h)`.
//!
//! The step `h` is the square root of the machine epsilon of [`Real`],
//! the classical trade-off between truncation and cancellation error for
//! this formula. It is computed once at first use and shared process-wide
//! as an immutable value.

use std::sync::LazyLock;

use num_traits::Float;

use crate::function::{CompiledFunction, Op};
use crate::Real;

/// Central-difference step, computed once from the machine epsilon.
static EPSILON_SQRT: LazyLock<Real> = LazyLock::new(|| <Real as Float>::epsilon().sqrt());

/// Evaluates the central difference of `f` at `x`.
pub(crate) fn central_difference(f: &CompiledFunction, x: Real) -> Real {
    let h = *EPSILON_SQRT;
    (f.eval(x + h) - f.eval(x - h)) / (2.0 * h)
}

/// Returns the numerical derivative of a compiled function.
///
/// The result is an ordinary [`CompiledFunction`]: it can be plotted,
/// searched for roots, or differentiated again. There is no special case
/// for higher orders: composing `derivative` twice yields a numerical
/// second derivative with compounded error.
///
/// # Examples
///
/// ```rust
/// use calcgraph::{compile, derivative::derivative};
///
/// let f = compile("sin(x)").unwrap();
/// let df = derivative(&f);
/// assert!((df.eval(0.0) - 1.0).abs() < 1.0e-6);
/// ```
pub fn derivative(f: &CompiledFunction) -> CompiledFunction {
    CompiledFunction::from_ops(vec![Op::Variable, Op::Derivative(f.clone())])
}

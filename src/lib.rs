//! # calcgraph
//!
//! `calcgraph` is the computational core of a function grapher: it compiles
//! user-typed algebraic expressions of one variable into callable functions
//! and enumerates their zero crossings.
//!
//! ## Overview
//! - Compile expressions containing numeric literals, the variable `x`,
//!   the operators `+ - * / ^`, parentheses, and function calls.
//! - Call built-in functions (`sin`, `cos`, `exp`, `ln`, ...) and
//!   user-defined functions registered under single-letter identifiers.
//! - Take numerical derivatives with the `'` marker, as in `f'(x)`, or
//!   programmatically with [`derivative::derivative`].
//! - Find every zero crossing of a compiled function over a bounded domain
//!   with a parallel multi-start Newton-Raphson sweep.
//! - Save and restore whole definition sets losslessly through
//!   [`FunctionRegistry::export_all`] and [`FunctionRegistry::import_all`].
//!
//! Internally, expressions are tokenized, reordered into Reverse Polish
//! Notation with the Shunting-yard algorithm, and compiled into a flat
//! program of stack operations for fast repeated execution; evaluating a
//! compiled function never re-parses anything.
//!
//! ## Evaluation model
//! A [`CompiledFunction`] is immutable, cheap to clone, and `Send + Sync`.
//! Evaluation performs no error handling at all: division by zero and
//! out-of-domain arguments produce `NaN` or infinities, which consumers
//! (plotting, root finding) treat as invalid samples rather than failures.
//! All errors are raised at definition time instead, see [`error`].
//!
//! ## Example
//! ```rust
//! use calcgraph::{compile, FunctionRegistry, RootFinder};
//!
//! // Standalone expression.
//! let f = compile("3*x^2-5").expect("failed to compile");
//! assert_eq!(f.eval(5.0), 70.0);
//!
//! // Definitions that build on each other.
//! let mut registry = FunctionRegistry::new();
//! registry.define('a', "x^2-4").unwrap();
//! registry.define('b', "a'(x)").unwrap();
//!
//! // Zero crossings of a(x) = x^2 - 4.
//! let roots = RootFinder::new()
//!     .with_starting_points(2_001)
//!     .find_roots(registry.resolve('a').unwrap());
//! assert_eq!(roots.len(), 2);
//! ```
//!
//! ## When to Use
//! Use `calcgraph` when you need:
//! - Fast repeated evaluation of user-typed formulas of one real variable
//! - Numerical derivatives and multi-root searches over those formulas
//! - A registry of interdependent definitions with lossless save files
//!
//! ## License
//! Licensed under either **MIT** or **Apache-2.0** at your option.

pub mod builder;
pub mod builtins;
pub mod derivative;
pub mod error;
pub mod function;
pub mod lexer;
pub mod operators;
pub mod registry;
pub mod roots;
pub mod rpn;

/// The scalar type every expression evaluates in.
pub type Real = f64;

pub use error::{BuildError, CompileError, LexError, ParseError};
pub use function::CompiledFunction;
pub use registry::FunctionRegistry;
pub use roots::RootFinder;

/// Compiles a standalone expression into an executable function.
///
/// The expression may use literals, `x`, the binary operators, parentheses,
/// and built-in calls (including built-in derivatives such as `sin'(x)`).
/// User-defined functions live in a [`FunctionRegistry`]; an expression
/// compiled here cannot reference them.
///
/// # Arguments
///
/// * `expression` - The expression text to compile.
///
/// # Returns
///
/// On success, a reusable [`CompiledFunction`]; evaluating it does not
/// re-parse the formula. On failure, the [`CompileError`] of the stage that
/// rejected the input.
///
/// # Examples
///
/// ```rust
/// let f = calcgraph::compile("sin(x)/2 + 1").unwrap();
/// assert_eq!(f.eval(0.0), 1.0);
/// ```
pub fn compile(expression: &str) -> Result<CompiledFunction, CompileError> {
    let tokens = lexer::tokenize(expression)?;
    let postfix = rpn::to_postfix(tokens)?;
    let func = builder::build(&postfix, None, &std::collections::BTreeMap::new())?;
    Ok(func)
}

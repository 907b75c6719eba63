//! # builtins.rs
//!
//! Built-in mathematical functions available in every expression. Built-ins
//! are keyed by multi-character names, are never user-definable, and resolve
//! before any same-named user entry.

use phf::Map;
use phf_macros::phf_map;

use crate::Real;

/// Function pointer type implementing a built-in.
pub type UnaryFunc = fn(Real) -> Real;

/// A named built-in function.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    /// The function implementing the computation.
    function: UnaryFunc,
    /// Canonical name, used for lookup and display.
    name: &'static str,
}

impl Builtin {
    /// Applies the built-in to a value.
    pub fn apply(&self, x: Real) -> Real {
        (self.function)(x)
    }

    /// Returns the canonical name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        // Function pointer comparisons do not produce meaningful results since
        // their addresses are not guaranteed to be unique, so compare names.
        self.name == other.name
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Macro to define unary functions from method names on `Real`.
///
/// For example, `define_unary_func!(sin)` expands to
/// `fn sin(x: Real) -> Real { x.sin() }`.
macro_rules! define_unary_func {
    ($name:ident) => {
        fn $name(x: Real) -> Real {
            x.$name()
        }
    };
}

define_unary_func!(sin);
define_unary_func!(cos);
define_unary_func!(tan);
define_unary_func!(asin);
define_unary_func!(acos);
define_unary_func!(atan);
define_unary_func!(sinh);
define_unary_func!(cosh);
define_unary_func!(tanh);
define_unary_func!(asinh);
define_unary_func!(acosh);
define_unary_func!(atanh);
define_unary_func!(exp);
define_unary_func!(ln);
define_unary_func!(log10);
define_unary_func!(sqrt);
define_unary_func!(abs);

/// Map of built-in functions by their canonical name.
static BUILTINS: Map<&'static str, Builtin> = phf_map! {
    "sin"   => Builtin{ function: sin,      name: "sin" },
    "cos"   => Builtin{ function: cos,      name: "cos" },
    "tan"   => Builtin{ function: tan,      name: "tan" },
    "asin"  => Builtin{ function: asin,     name: "asin" },
    "acos"  => Builtin{ function: acos,     name: "acos" },
    "atan"  => Builtin{ function: atan,     name: "atan" },
    "sinh"  => Builtin{ function: sinh,     name: "sinh" },
    "cosh"  => Builtin{ function: cosh,     name: "cosh" },
    "tanh"  => Builtin{ function: tanh,     name: "tanh" },
    "asinh" => Builtin{ function: asinh,    name: "asinh" },
    "acosh" => Builtin{ function: acosh,    name: "acosh" },
    "atanh" => Builtin{ function: atanh,    name: "atanh" },
    "exp"   => Builtin{ function: exp,      name: "exp" },
    "ln"    => Builtin{ function: ln,       name: "ln" },
    "log10" => Builtin{ function: log10,    name: "log10" },
    "sqrt"  => Builtin{ function: sqrt,     name: "sqrt" },
    "abs"   => Builtin{ function: abs,      name: "abs" },
};

/// Looks up a built-in function by name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

/// Returns the available built-in function names, sorted.
///
/// Intended for completion lists, help screens, or error messages.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}

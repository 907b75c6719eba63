//! # registry.rs
//!
//! The registry of user-defined functions: single-character identifiers
//! bound to (source text, compiled function) pairs.
//!
//! `define` runs the whole compile pipeline and only replaces an entry when
//! every stage succeeds, so a failed redefinition leaves the previous
//! function intact and usable. The source text is kept verbatim next to the
//! compiled form, which makes export lossless: a save file round-trips
//! through `export_all` / `import_all` to an equivalent registry.
//!
//! A registry is meant for single-owner, synchronous use. The compiled
//! functions it hands out are immutable and independent of the registry's
//! later life, so they can outlive it and cross thread boundaries freely.

use std::collections::BTreeMap;

use crate::builder;
use crate::error::CompileError;
use crate::function::CompiledFunction;
use crate::lexer;
use crate::rpn;

/// Maps single-character identifiers to compiled functions and their source
/// text.
///
/// # Examples
///
/// ```rust
/// use calcgraph::FunctionRegistry;
///
/// let mut registry = FunctionRegistry::new();
/// registry.define('a', "x^2").unwrap();
/// registry.define('b', "a(x)+1").unwrap();
///
/// let b = registry.resolve('b').unwrap();
/// assert_eq!(b.eval(3.0), 10.0);
/// assert_eq!(registry.export_all(), vec!["ax^2", "ba(x)+1"]);
/// ```
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    compiled: BTreeMap<char, CompiledFunction>,
    sources: BTreeMap<char, String>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `source` and binds it to `identifier`.
    ///
    /// The body may call built-ins freely and user functions defined under a
    /// lexically smaller identifier. On success any previous entry for the
    /// identifier is replaced, source text included; on failure the registry
    /// is left exactly as it was and the triggering error is returned for
    /// display.
    ///
    /// # Errors
    ///
    /// Any [`CompileError`] from tokenizing, parsing, or building.
    pub fn define(&mut self, identifier: char, source: &str) -> Result<(), CompileError> {
        let tokens = lexer::tokenize(source)?;
        let postfix = rpn::to_postfix(tokens)?;
        let compiled = builder::build(&postfix, Some(identifier), &self.compiled)?;

        self.compiled.insert(identifier, compiled);
        self.sources.insert(identifier, source.to_string());
        Ok(())
    }

    /// Looks up a compiled function. No compilation takes place.
    pub fn resolve(&self, identifier: char) -> Option<&CompiledFunction> {
        self.compiled.get(&identifier)
    }

    /// Returns the source text an identifier was defined from.
    pub fn source(&self, identifier: char) -> Option<&str> {
        self.sources.get(&identifier).map(String::as_str)
    }

    /// Serializes every definition, one line per entry, ordered by ascending
    /// identifier.
    ///
    /// Each line is the identifier immediately followed by the original
    /// source text, with no delimiter: the identifier is always exactly the
    /// first character. The ordering is stable and deterministic so save
    /// files are reproducible.
    pub fn export_all(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|(identifier, source)| format!("{}{}", identifier, source))
            .collect()
    }

    /// Defines every line of a save file, in the given order.
    ///
    /// Earlier lines may be referenced by later ones, consistent with the
    /// identifier ordering rule. Blank lines are skipped. The first failing
    /// line aborts the import; lines defined before the failure remain
    /// defined.
    ///
    /// # Errors
    ///
    /// The [`CompileError`] of the first line that fails to compile.
    pub fn import_all<I, S>(&mut self, lines: I) -> Result<(), CompileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let line = line.as_ref();
            let mut chars = line.chars();
            let Some(identifier) = chars.next() else {
                continue;
            };
            self.define(identifier, chars.as_str())?;
        }
        Ok(())
    }

    /// Returns the number of defined functions.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Returns `true` if nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Removes every definition.
    pub fn clear(&mut self) {
        self.compiled.clear();
        self.sources.clear();
    }

    /// Iterates over `(identifier, source text)` pairs in ascending
    /// identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.sources.iter().map(|(id, source)| (*id, source.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, LexError};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_define_and_resolve() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x^2").unwrap();

        let a = registry.resolve('a').unwrap();
        assert_eq!(a.eval(4.0), 16.0);
        assert_eq!(registry.source('a'), Some("x^2"));
        assert!(registry.resolve('b').is_none());
    }

    #[test]
    fn test_redefinition_replaces_entry() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x").unwrap();
        registry.define('a', "x+1").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve('a').unwrap().eval(1.0), 2.0);
        assert_eq!(registry.source('a'), Some("x+1"));
    }

    #[test]
    fn test_reference_to_smaller_identifier() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x").unwrap();
        registry.define('b', "a(x)+1").unwrap();

        assert_eq!(registry.resolve('b').unwrap().eval(2.0), 3.0);
    }

    #[test]
    fn test_forward_reference_is_rejected_and_state_kept() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x").unwrap();

        // `f` is not a built-in and not lexically before `b`.
        let err = registry.define('b', "a(x)-f'(x)").unwrap_err();
        assert_eq!(
            err,
            CompileError::Build(BuildError::ForwardReference { callee: 'f', defining: 'b' })
        );

        // `a` survives, `b` was never created.
        assert_eq!(registry.resolve('a').unwrap().eval(5.0), 5.0);
        assert!(registry.resolve('b').is_none());
    }

    #[test]
    fn test_backward_reference_only() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x").unwrap();
        registry.define('b', "a(x)*2").unwrap();

        // Redefining `a` against `b` reverses the ordering and must fail.
        let err = registry.define('a', "b(x)").unwrap_err();
        assert_eq!(
            err,
            CompileError::Build(BuildError::ForwardReference { callee: 'b', defining: 'a' })
        );
        // The previous definition of `a` is untouched.
        assert_eq!(registry.resolve('a').unwrap().eval(7.0), 7.0);
    }

    #[test]
    fn test_failed_define_leaves_prior_entry() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x^2").unwrap();

        let err = registry.define('a', "1..2").unwrap_err();
        assert!(matches!(err, CompileError::Lex(LexError::DoubleDecimalPoint(_))));
        assert_eq!(registry.resolve('a').unwrap().eval(3.0), 9.0);
        assert_eq!(registry.source('a'), Some("x^2"));
    }

    #[test]
    fn test_redefinition_does_not_rewrite_captured_callees() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x").unwrap();
        registry.define('b', "a(x)+1").unwrap();
        registry.define('a', "x*10").unwrap();

        // `b` still calls the `a` it was compiled against.
        assert_eq!(registry.resolve('b').unwrap().eval(2.0), 3.0);
        // A fresh definition picks up the new `a`.
        registry.define('c', "a(x)").unwrap();
        assert_eq!(registry.resolve('c').unwrap().eval(2.0), 20.0);
    }

    #[test]
    fn test_export_is_sorted_by_identifier() {
        let mut registry = FunctionRegistry::new();
        registry.define('c', "1").unwrap();
        registry.define('a', "2").unwrap();

        assert_eq!(registry.export_all(), vec!["a2", "c1"]);
    }

    #[test]
    fn test_import_in_order() {
        let mut registry = FunctionRegistry::new();
        registry
            .import_all(["ax^2", "ba(x)+1"])
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve('b').unwrap().eval(2.0), 5.0);
    }

    #[test]
    fn test_import_skips_blank_lines() {
        let mut registry = FunctionRegistry::new();
        registry.import_all(["a1", "", "b2"]).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_import_is_fail_fast() {
        let mut registry = FunctionRegistry::new();
        // `b` is lexically before `c` but was never defined.
        let err = registry.import_all(["a1", "cb(x)", "d3"]).unwrap_err();
        assert_eq!(
            err,
            CompileError::Build(BuildError::UnknownIdentifier("b".into()))
        );

        // Lines before the failure are defined, lines after are not.
        assert!(registry.resolve('a').is_some());
        assert!(registry.resolve('c').is_none());
        assert!(registry.resolve('d').is_none());
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut registry = FunctionRegistry::new();
        registry.define('a', "x^2 - 4").unwrap();
        registry.define('b', "sin(a(x))").unwrap();
        registry.define('c', "b'(x) + 0.5").unwrap();

        let mut restored = FunctionRegistry::new();
        restored.import_all(registry.export_all()).unwrap();

        assert_eq!(restored.len(), registry.len());
        for x in [-2.0, -0.5, 0.0, 1.0, 3.25] {
            for id in ['a', 'b', 'c'] {
                let original = registry.resolve(id).unwrap().eval(x);
                let copy = restored.resolve(id).unwrap().eval(x);
                assert_abs_diff_eq!(original, copy, epsilon = 1.0e-12);
            }
        }
    }

    #[test]
    fn test_clear_and_len() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.is_empty());

        registry.define('a', "1").unwrap();
        registry.define('b', "2").unwrap();
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.resolve('a').is_none());
    }

    #[test]
    fn test_iter_order() {
        let mut registry = FunctionRegistry::new();
        registry.define('d', "4").unwrap();
        registry.define('b', "2").unwrap();

        let entries: Vec<(char, String)> =
            registry.iter().map(|(id, src)| (id, src.to_string())).collect();
        assert_eq!(entries, vec![('b', "2".to_string()), ('d', "4".to_string())]);
    }
}

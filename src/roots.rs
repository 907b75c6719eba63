//! # roots.rs
//!
//! Zero-crossing enumeration by multi-start Newton-Raphson.
//!
//! A [`RootFinder`] launches Newton's method from many uniformly spaced
//! starting points across a bounded domain and keeps every converged
//! endpoint. The searches are fully independent, since a compiled function
//! is immutable and touches no shared state, so the starts are sharded
//! across a rayon worker pool; the partial candidate lists are merged, sorted
//! ascending, and deduplicated so that no two reported roots lie closer than
//! the convergence epsilon.
//!
//! The finder never fails. Starts that diverge, walk out of the domain, hit
//! a near-horizontal tangent, or wander into `NaN` simply record nothing.

use rayon::prelude::*;

use crate::derivative::derivative;
use crate::function::CompiledFunction;
use crate::Real;

/// Multi-start Newton-Raphson search over a bounded domain.
///
/// The defaults match the interactive grapher: epsilon `1e-10`, at most 100
/// iterations per start, domain `[-50, 50]`, and 200 000 starting points
/// spanning the domain inclusive of both ends. The `with_*` methods exist
/// for callers that need a coarser sweep.
///
/// # Examples
///
/// ```rust
/// use calcgraph::{compile, RootFinder};
///
/// let f = compile("x^2-4").unwrap();
/// let roots = RootFinder::new().with_starting_points(2_001).find_roots(&f);
/// assert_eq!(roots.len(), 2);
/// assert!((roots[0] + 2.0).abs() < 1.0e-9);
/// assert!((roots[1] - 2.0).abs() < 1.0e-9);
/// ```
#[derive(Debug, Clone)]
pub struct RootFinder {
    epsilon: Real,
    max_iterations: usize,
    domain_min: Real,
    domain_max: Real,
    starting_points: usize,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self {
            epsilon: 1.0e-10,
            max_iterations: 100,
            domain_min: -50.0,
            domain_max: 50.0,
            starting_points: 200_000,
        }
    }
}

impl RootFinder {
    /// Creates a finder with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the convergence epsilon, also used as the dedup distance.
    pub fn with_epsilon(mut self, epsilon: Real) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the iteration budget per starting point.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the search domain. Iterates leaving `[min, max]` abort.
    pub fn with_domain(mut self, min: Real, max: Real) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    /// Sets the number of uniformly spaced starting points.
    pub fn with_starting_points(mut self, starting_points: usize) -> Self {
        self.starting_points = starting_points;
        self
    }

    /// Enumerates the roots of `f` over the domain.
    ///
    /// Returns a strictly increasing list with no two elements closer than
    /// the epsilon; empty if nothing converges.
    pub fn find_roots(&self, f: &CompiledFunction) -> Vec<Real> {
        let df = derivative(f);
        let count = self.starting_points;
        if count == 0 {
            return Vec::new();
        }
        let span = self.domain_max - self.domain_min;
        let spacing = count.saturating_sub(1).max(1) as Real;

        let mut roots: Vec<Real> = (0..count)
            .into_par_iter()
            .filter_map(|i| {
                let x0 = self.domain_min + span * i as Real / spacing;
                self.newton(f, &df, x0)
            })
            .fold(Vec::new, |mut found: Vec<Real>, root| {
                if !found.iter().any(|r| (r - root).abs() < self.epsilon) {
                    found.push(root);
                }
                found
            })
            .reduce(Vec::new, |mut merged, partial| {
                for root in partial {
                    if !merged.iter().any(|r| (r - root).abs() < self.epsilon) {
                        merged.push(root);
                    }
                }
                merged
            });

        roots.sort_by(Real::total_cmp);
        // Shards can still deliver neighbours within epsilon of each other.
        roots.dedup_by(|a, b| (*a - *b).abs() < self.epsilon);
        roots
    }

    /// Runs Newton's method from one starting point.
    ///
    /// Converges when `|f(x)|` or the step size drops below the epsilon;
    /// aborts on a near-horizontal tangent (the update would shoot far away)
    /// or when the iterate leaves the domain. `NaN` samples fail every
    /// comparison and therefore never converge.
    fn newton(&self, f: &CompiledFunction, df: &CompiledFunction, mut x: Real) -> Option<Real> {
        for _ in 0..self.max_iterations {
            let fx = f.eval(x);
            if fx.abs() < self.epsilon {
                return Some(x);
            }

            let dfx = df.eval(x);
            if dfx.abs() < self.epsilon {
                return None;
            }

            let delta = fx / dfx;
            x -= delta;

            if x < self.domain_min || x > self.domain_max {
                return None;
            }
            if delta.abs() < self.epsilon {
                return Some(x);
            }
        }
        None
    }
}

/// Formats a root list as an identifier-labeled text block: a line `a:`
/// followed by one root per line.
///
/// # Examples
///
/// ```rust
/// let lines = calcgraph::roots::format_report('a', &[-2.0, 2.0]);
/// assert_eq!(lines, vec!["a:", "-2", "2"]);
/// ```
pub fn format_report(identifier: char, roots: &[Real]) -> Vec<String> {
    let mut lines = Vec::with_capacity(roots.len() + 1);
    lines.push(format!("{}:", identifier));
    lines.extend(roots.iter().map(|root| root.to_string()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;

    #[test]
    fn test_quadratic_roots() {
        let f = compile("x^2-4").unwrap();
        let roots = RootFinder::new().with_starting_points(20_001).find_roots(&f);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] + 2.0).abs() < 1.0e-9);
        assert!((roots[1] - 2.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_roots_are_sorted_and_deduplicated() {
        let f = compile("x^2-4").unwrap();
        let roots = RootFinder::new().with_starting_points(20_001).find_roots(&f);
        for pair in roots.windows(2) {
            assert!(pair[1] - pair[0] >= 1.0e-10);
        }
    }

    #[test]
    fn test_no_real_roots() {
        let f = compile("x^2+1").unwrap();
        let roots = RootFinder::new().with_starting_points(2_000).find_roots(&f);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_constant_nonzero_never_converges() {
        let f = compile("5").unwrap();
        let roots = RootFinder::new().with_starting_points(1_000).find_roots(&f);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_line_has_single_root() {
        let f = compile("x-3").unwrap();
        let roots = RootFinder::new().with_starting_points(5_000).find_roots(&f);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 3.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_sine_roots_inside_narrow_domain() {
        let f = compile("sin(x)").unwrap();
        let roots = RootFinder::new()
            .with_domain(-5.0, 5.0)
            .with_starting_points(5_001)
            .find_roots(&f);
        // -pi, 0, pi
        assert_eq!(roots.len(), 3);
        assert!((roots[0] + std::f64::consts::PI).abs() < 1.0e-8);
        assert!(roots[1].abs() < 1.0e-8);
        assert!((roots[2] - std::f64::consts::PI).abs() < 1.0e-8);
    }

    #[test]
    fn test_non_finite_samples_are_skipped() {
        // 1/x never crosses zero and blows up at the origin.
        let f = compile("1/x").unwrap();
        let roots = RootFinder::new().with_starting_points(2_000).find_roots(&f);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_zero_starting_points() {
        let f = compile("x").unwrap();
        let roots = RootFinder::new().with_starting_points(0).find_roots(&f);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_format_report() {
        assert_eq!(format_report('c', &[]), vec!["c:"]);
        let lines = format_report('a', &[-2.0, 2.0]);
        assert_eq!(lines, vec!["a:", "-2", "2"]);
    }
}

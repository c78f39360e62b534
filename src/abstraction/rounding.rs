// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use derive_builder::Builder;

use crate::{cmp, Controls, VertexMap};

/// The contract every rounding scheme implements: produce one one-hot control
/// per vertex such that, for every category and at every prefix length of the
/// vertex order, the cumulative control count stays within
/// `max_control_deviation(D)` of the cumulative fractional sum.
///
/// The exact solver additionally minimizes the total switching cost among all
/// assignments satisfying that bound; the heuristic schemes only promise the
/// bound itself.
pub trait Rounding {
    /// Computes the rounded controls. Deterministic: identical inputs yield
    /// an identical result, and re-running on the same instance never changes
    /// the attained cost.
    fn solve(&mut self) -> VertexMap<Controls>;
}

/// The options shared by the rounding schemes.
///
/// # Examples:
/// ```
/// # use scarp::RoundingOptionsBuilder;
/// let options = RoundingOptionsBuilder::default()
///     .vanishing_constraints(true)
///     .build()
///     .unwrap();
/// assert!(options.vanishing_constraints);
/// ```
#[derive(Debug, Clone, Copy, Builder)]
pub struct RoundingOptions {
    /// When true, a category whose fractional weight is exactly zero at some
    /// vertex may not be selected at that vertex.
    #[builder(default = "false")]
    pub vanishing_constraints: bool,
    /// The tolerance used for every floating point comparison performed by
    /// the solver (convexity of the input, the deviation bound, zero tests
    /// of the vanishing constraints).
    #[builder(default = "crate::cmp::DEFAULT_EPS")]
    pub eps: f64,
}

impl Default for RoundingOptions {
    fn default() -> Self {
        Self { vanishing_constraints: false, eps: cmp::DEFAULT_EPS }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::{cmp, RoundingOptions, RoundingOptionsBuilder};

    #[test]
    fn the_default_options_disable_vanishing_constraints() {
        let options = RoundingOptions::default();
        assert!(!options.vanishing_constraints);
        assert_eq!(cmp::DEFAULT_EPS, options.eps);
    }

    #[test]
    fn the_builder_defaults_match_the_default_impl() {
        let built = RoundingOptionsBuilder::default().build().unwrap();
        let options = RoundingOptions::default();
        assert_eq!(options.vanishing_constraints, built.vanishing_constraints);
        assert_eq!(options.eps, built.eps);
    }
}

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

//! The control vectors attached to the vertices of an instance, and the
//! checks the solvers perform on them. A control is *convex* when it is a
//! nonnegative vector summing up to one: the fractional probability of
//! selecting each discrete control category at a vertex. The rounded result
//! is the one hot special case of a convex control.

use std::ops::{Index, IndexMut};

use crate::{cmp, Graph, VertexMap};

// ----------------------------------------------------------------------------
// --- CONTROLS ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// An ordered sequence of `D` control values, one per control category.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls(Vec<f64>);

impl Controls {
    /// The all zero vector of the given dimension (not convex; this is the
    /// scratch value overlays are initialized with).
    pub fn zeros(dimension: usize) -> Self {
        Self(vec![0.0; dimension])
    }

    /// The one hot vector selecting `category`.
    pub fn one_hot(dimension: usize, category: usize) -> Self {
        let mut controls = Self::zeros(dimension);
        controls[category] = 1.0;
        controls
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// True iff every value is nonnegative and the values sum up to one,
    /// both up to `eps`.
    pub fn is_convex(&self, eps: f64) -> bool {
        let mut sum = 0.0;
        for value in self.iter() {
            if cmp::neg(value, eps) {
                return false;
            }
            sum += value;
        }
        cmp::eq(sum, 1.0, eps)
    }

    /// True iff every value is integral up to `eps`.
    pub fn is_integral(&self, eps: f64) -> bool {
        self.iter().all(|value| cmp::integral(value, eps))
    }
}

impl From<Vec<f64>> for Controls {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Index<usize> for Controls {
    type Output = f64;

    #[inline]
    fn index(&self, category: usize) -> &f64 {
        &self.0[category]
    }
}

impl IndexMut<usize> for Controls {
    #[inline]
    fn index_mut(&mut self, category: usize) -> &mut f64 {
        &mut self.0[category]
    }
}

// ----------------------------------------------------------------------------
// --- DEVIATION BOUND AND INSTANCE WIDE CHECKS -------------------------------
// ----------------------------------------------------------------------------

/// The provable worst case rounding error of the sum up rounding scheme:
/// `Σ_{k=2}^{D} 1/k`, a pure function of the control dimension. Every
/// feasible rounding keeps each cumulative control count within this bound of
/// the cumulative fractional sum, at every prefix length.
///
/// # Examples:
/// ```
/// # use scarp::max_control_deviation;
/// assert_eq!(0.0, max_control_deviation(1));
/// assert_eq!(0.5, max_control_deviation(2));
/// ```
pub fn max_control_deviation(dimension: usize) -> f64 {
    let mut max_deviation = 0.0;

    for i in 2..=dimension {
        max_deviation += 1.0 / (i as f64);
    }

    max_deviation
}

/// True iff the control of every vertex is integral up to `eps`.
pub fn controls_are_integral(graph: &Graph, controls: &VertexMap<Controls>, eps: f64) -> bool {
    graph.vertices().all(|vertex| controls[vertex].is_integral(eps))
}

/// True iff the control of every vertex is convex up to `eps`.
pub fn controls_are_convex(graph: &Graph, controls: &VertexMap<Controls>, eps: f64) -> bool {
    graph.vertices().all(|vertex| controls[vertex].is_convex(eps))
}

/// The distance between two control assignments: the maximum over all
/// prefixes of the vertex order and all categories of the absolute difference
/// between the cumulative sums of the two assignments. The deviation bound of
/// a rounding is exactly this distance to the fractional controls.
pub fn control_distance(
    graph: &Graph,
    first_controls: &VertexMap<Controls>,
    second_controls: &VertexMap<Controls>,
) -> f64 {
    let source = graph.source();
    let dimension = first_controls[source].dimension();

    let mut first_sum = vec![0.0; dimension];
    let mut second_sum = vec![0.0; dimension];

    let mut max_deviation = f64::NEG_INFINITY;

    for vertex in graph.vertices() {
        for i in 0..dimension {
            first_sum[i] += first_controls[vertex][i];
            second_sum[i] += second_controls[vertex][i];
        }

        for i in 0..dimension {
            let deviation = (first_sum[i] - second_sum[i]).abs();

            if deviation > max_deviation {
                max_deviation = deviation;
            }
        }
    }

    max_deviation
}

/// The one hot category of an integral convex control, if any.
pub fn one_hot_category(controls: &Controls, eps: f64) -> Option<usize> {
    (0..controls.dimension()).find(|i| cmp::eq(controls[*i], 1.0, eps))
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::cmp::DEFAULT_EPS;
    use crate::*;

    #[test]
    fn deviation_bound_is_the_partial_harmonic_sum() {
        assert_eq!(0.0, max_control_deviation(1));
        assert_eq!(0.5, max_control_deviation(2));
        assert!(cmp::eq(0.5 + 1.0 / 3.0, max_control_deviation(3), DEFAULT_EPS));
    }

    #[test]
    fn one_hot_controls_are_convex_and_integral() {
        let controls = Controls::one_hot(3, 1);
        assert!(controls.is_convex(DEFAULT_EPS));
        assert!(controls.is_integral(DEFAULT_EPS));
        assert_eq!(Some(1), one_hot_category(&controls, DEFAULT_EPS));
    }

    #[test]
    fn negative_values_and_bad_sums_are_not_convex() {
        assert!(!Controls::from(vec![-0.5, 1.5]).is_convex(DEFAULT_EPS));
        assert!(!Controls::from(vec![0.3, 0.3]).is_convex(DEFAULT_EPS));
        assert!(Controls::from(vec![0.25, 0.75]).is_convex(DEFAULT_EPS));
    }

    #[test]
    fn distance_is_cumulative_not_pointwise() {
        // two vertices where both assignments select each category once but
        // in opposite orders: pointwise the difference is 1, cumulatively
        // it already shows after the first vertex
        let graph = Graph::new(2);

        let mut first = VertexMap::new(&graph, Controls::zeros(2));
        first[Vertex(0)] = Controls::one_hot(2, 0);
        first[Vertex(1)] = Controls::one_hot(2, 1);

        let mut second = VertexMap::new(&graph, Controls::zeros(2));
        second[Vertex(0)] = Controls::one_hot(2, 1);
        second[Vertex(1)] = Controls::one_hot(2, 0);

        assert_eq!(1.0, control_distance(&graph, &first, &second));
        assert_eq!(0.0, control_distance(&graph, &first, &first));
    }
}

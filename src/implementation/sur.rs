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

use tracing::info;

use crate::{
    cmp, controls_are_convex, controls_are_integral, Controls, Graph, Rounding, RoundingOptions,
    VertexMap,
};

/// Greedy sum up rounding: a single pass over the vertices in the total
/// order, always selecting the category whose cumulative fractional sum runs
/// furthest ahead of its count. This is the classical scheme behind the
/// deviation bound: its result never strays further than
/// `max_control_deviation(D)` from the relaxed solution, but it is blind to
/// the switching cost.
pub struct SumUpRounding<'a> {
    graph: &'a Graph,
    fractional_controls: &'a VertexMap<Controls>,
    options: RoundingOptions,
    dimension: usize,
}

impl<'a> SumUpRounding<'a> {
    pub fn new(graph: &'a Graph, fractional_controls: &'a VertexMap<Controls>) -> Self {
        Self::with_options(graph, fractional_controls, RoundingOptions::default())
    }

    pub fn with_options(
        graph: &'a Graph,
        fractional_controls: &'a VertexMap<Controls>,
        options: RoundingOptions,
    ) -> Self {
        let dimension = fractional_controls[graph.source()].dimension();

        assert!(
            fractional_controls.iter().all(|controls| controls.dimension() == dimension),
            "every vertex must carry a control of the same dimension"
        );
        assert!(
            controls_are_convex(graph, fractional_controls, options.eps),
            "the fractional controls must be convex"
        );

        Self { graph, fractional_controls, options, dimension }
    }
}

impl Rounding for SumUpRounding<'_> {
    fn solve(&mut self) -> VertexMap<Controls> {
        info!(
            "sum up rounding over {} vertices of dimension {}",
            self.graph.num_vertices(),
            self.dimension
        );

        let mut sur_controls = VertexMap::new(self.graph, Controls::zeros(self.dimension));

        let mut fractional_control_sums = vec![0.0; self.dimension];
        let mut control_sums = vec![0_usize; self.dimension];

        for vertex in self.graph.vertices() {
            for i in 0..self.dimension {
                fractional_control_sums[i] += self.fractional_controls[vertex][i];
            }

            let mut next_control = None;
            let mut next_value = f64::NEG_INFINITY;

            for i in 0..self.dimension {
                if self.options.vanishing_constraints
                    && cmp::zero(self.fractional_controls[vertex][i], self.options.eps)
                {
                    continue;
                }

                let value = fractional_control_sums[i] - (control_sums[i] as f64);
                if value > next_value {
                    next_value = value;
                    next_control = Some(i);
                }
            }

            // a convex control has at least one nonzero category, so the
            // vanishing rule can never exclude them all
            let next_control = next_control
                .expect("no admissible category: the controls are not convex");

            sur_controls[vertex][next_control] = 1.0;
            control_sums[next_control] += 1;
        }

        debug_assert!(controls_are_integral(self.graph, &sur_controls, self.options.eps));
        debug_assert!(controls_are_convex(self.graph, &sur_controls, self.options.eps));

        sur_controls
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::*;

    fn path(n: usize) -> Graph {
        let mut graph = Graph::new(n);
        for v in 1..n {
            graph.add_edge(Vertex(v - 1), Vertex(v));
        }
        graph
    }

    #[test]
    fn an_integral_instance_is_reproduced() {
        let graph = path(4);
        let fractional = VertexMap::new(&graph, Controls::from(vec![0.0, 1.0]));

        let rounded = SumUpRounding::new(&graph, &fractional).solve();

        for vertex in graph.vertices() {
            assert_eq!(Controls::one_hot(2, 1), rounded[vertex]);
        }
    }

    #[test]
    fn a_balanced_instance_alternates() {
        let graph = path(4);
        let fractional = VertexMap::new(&graph, Controls::from(vec![0.5, 0.5]));

        let rounded = SumUpRounding::new(&graph, &fractional).solve();

        // the first pick goes to the first category running ahead (both are
        // tied, the smaller index wins), after which the lag alternates
        assert_eq!(Controls::one_hot(2, 0), rounded[Vertex(0)]);
        assert_eq!(Controls::one_hot(2, 1), rounded[Vertex(1)]);
        assert_eq!(Controls::one_hot(2, 0), rounded[Vertex(2)]);
        assert_eq!(Controls::one_hot(2, 1), rounded[Vertex(3)]);
    }

    #[test]
    fn the_result_stays_within_the_deviation_bound() {
        let graph = path(9);
        let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.4, 0.35, 0.25]));
        fractional[Vertex(5)] = Controls::from(vec![0.05, 0.05, 0.9]);

        let rounded = SumUpRounding::new(&graph, &fractional).solve();

        assert!(cmp::le(
            control_distance(&graph, &fractional, &rounded),
            max_control_deviation(3),
            cmp::DEFAULT_EPS
        ));
    }

    #[test]
    fn vanishing_constraints_are_honored() {
        let graph = path(3);
        let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.5, 0.5]));
        fractional[Vertex(1)] = Controls::from(vec![0.0, 1.0]);

        let options =
            RoundingOptionsBuilder::default().vanishing_constraints(true).build().unwrap();
        let rounded = SumUpRounding::with_options(&graph, &fractional, options).solve();

        // category 0 may not be chosen at vertex 1 where its weight vanishes
        assert_eq!(Controls::one_hot(2, 1), rounded[Vertex(1)]);
    }
}

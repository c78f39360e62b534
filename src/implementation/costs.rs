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

use crate::{CostFunction, Edge};

/// The standard switching cost: `0.5 · scale · |previous − current|` per
/// category. Summed over the categories of two one-hot vectors this charges
/// `scale` for every switch and nothing for staying on the same category. The
/// scale factor is conventionally the reciprocal of the grid length.
#[derive(Debug, Clone, Copy)]
pub struct VariationalCosts {
    scale_factor: f64,
}

impl VariationalCosts {
    pub fn new(scale_factor: f64) -> Self {
        Self { scale_factor }
    }
}

impl Default for VariationalCosts {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CostFunction for VariationalCosts {
    fn cost(&self, _edge: Edge, previous: f64, current: f64) -> f64 {
        0.5 * self.scale_factor * (previous - current).abs()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::{Controls, CostFunction, Graph, VariationalCosts, Vertex};

    #[test]
    fn a_switch_costs_the_scale_factor() {
        let mut graph = Graph::new(2);
        let edge = graph.add_edge(Vertex(0), Vertex(1));

        let costs = VariationalCosts::new(0.25);
        let a = Controls::one_hot(3, 0);
        let b = Controls::one_hot(3, 2);

        assert_eq!(0.25, costs.edge_cost(edge, &a, &b));
        assert_eq!(0.0, costs.edge_cost(edge, &a, &a));
    }

    #[test]
    fn fractional_arguments_are_accepted() {
        let mut graph = Graph::new(2);
        let edge = graph.add_edge(Vertex(0), Vertex(1));

        let costs = VariationalCosts::default();
        let a = Controls::from(vec![0.5, 0.5]);
        let b = Controls::one_hot(2, 0);

        assert_eq!(0.5, costs.edge_cost(edge, &a, &b));
    }
}

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

use crate::{Controls, Edge, Graph, VertexMap};

/// The switching cost of an instance. An implementation only has to say what
/// it costs to move between two scalar control values across one edge; the
/// vector and whole assignment sums are derived from that single method. The
/// same function is applied to discrete (0/1) and to fractional arguments,
/// which is what lets the solvers compare a rounding against the relaxed
/// solution it came from.
pub trait CostFunction {
    /// The cost contribution of one control category across `edge`, given
    /// the value this category takes at the source (`previous`) and at the
    /// target (`current`) of the edge. Must be nonnegative.
    fn cost(&self, edge: Edge, previous: f64, current: f64) -> f64;

    /// The cost of moving between two control vectors across `edge`: the sum
    /// of the per category costs.
    fn edge_cost(&self, edge: Edge, previous: &Controls, current: &Controls) -> f64 {
        assert_eq!(previous.dimension(), current.dimension());

        (0..previous.dimension())
            .map(|i| self.cost(edge, previous[i], current[i]))
            .sum()
    }

    /// The total cost of a complete control assignment: the sum of the edge
    /// costs over all edges of the graph.
    fn evaluate(&self, graph: &Graph, controls: &VertexMap<Controls>) -> f64 {
        graph
            .edges()
            .map(|edge| self.edge_cost(edge, &controls[edge.source()], &controls[edge.target()]))
            .sum()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::{Controls, CostFunction, Edge, Graph, Vertex, VertexMap};

    struct UnitSwitch;
    impl CostFunction for UnitSwitch {
        fn cost(&self, _edge: Edge, previous: f64, current: f64) -> f64 {
            0.5 * (previous - current).abs()
        }
    }

    #[test]
    fn edge_cost_is_the_sum_over_categories() {
        let mut graph = Graph::new(2);
        let edge = graph.add_edge(Vertex(0), Vertex(1));

        let a = Controls::one_hot(2, 0);
        let b = Controls::one_hot(2, 1);

        // switching categories costs one unit, staying costs nothing
        assert_eq!(1.0, UnitSwitch.edge_cost(edge, &a, &b));
        assert_eq!(0.0, UnitSwitch.edge_cost(edge, &a, &a));
    }

    #[test]
    fn evaluate_sums_over_all_edges() {
        let mut graph = Graph::new(3);
        graph.add_edge(Vertex(0), Vertex(1));
        graph.add_edge(Vertex(1), Vertex(2));

        let mut controls = VertexMap::new(&graph, Controls::one_hot(2, 0));
        controls[Vertex(1)] = Controls::one_hot(2, 1);

        // both edges witness one switch
        assert_eq!(2.0, UnitSwitch.evaluate(&graph, &controls));
    }
}

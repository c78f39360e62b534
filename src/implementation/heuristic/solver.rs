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

use std::rc::Rc;

use fxhash::FxHashMap;
use tracing::debug;

use super::label::{HeuristicLabel, LabelFrontier, LabelKey, LabelSet};
use crate::{
    cmp, control_distance, controls_are_convex, controls_are_integral, max_control_deviation,
    Controls, CostFunction, Edge, Graph, Rounding, RoundingOptions, Vertex, VertexMap,
};

/// The heuristic labeling solver. Structurally the twin of the exact solver
/// (seed, sweep, prune, merge, extract) with the coarser dominance key of
/// `HeuristicLabel`: a merge may discard the label a cheaper completion would
/// have extended, so the attained cost is an upper bound on the optimum. The
/// deviation bound on the other hand is enforced exactly as in the exact
/// scheme.
pub struct HeuristicSolver<'a, C> {
    graph: &'a Graph,
    costs: &'a C,
    fractional_controls: &'a VertexMap<Controls>,
    options: RoundingOptions,

    dimension: usize,
    upper_bound: f64,

    frontiers: VertexMap<LabelFrontier>,
    fractional_control_sums: Vec<f64>,
    num_labels: usize,
}

impl<'a, C: CostFunction> HeuristicSolver<'a, C> {
    pub fn new(
        graph: &'a Graph,
        costs: &'a C,
        fractional_controls: &'a VertexMap<Controls>,
    ) -> Self {
        Self::with_options(graph, costs, fractional_controls, RoundingOptions::default())
    }

    pub fn with_options(
        graph: &'a Graph,
        costs: &'a C,
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

        Self {
            graph,
            costs,
            fractional_controls,
            options,
            dimension,
            upper_bound: max_control_deviation(dimension),
            frontiers: VertexMap::new(graph, vec![LabelSet::default(); dimension]),
            fractional_control_sums: vec![0.0; dimension],
            num_labels: 0,
        }
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    fn clear(&mut self) {
        self.num_labels = 0;

        for sum in self.fractional_control_sums.iter_mut() {
            *sum = 0.0;
        }

        // expansion takes consumed frontiers out wholesale, so the bucket
        // structure must be rebuilt, not just emptied
        let dimension = self.dimension;
        for frontier in self.frontiers.iter_mut() {
            frontier.clear();
            frontier.resize_with(dimension, LabelSet::default);
        }
    }

    fn create_initial_labels(&mut self) {
        let source = self.graph.source();

        for i in 0..self.dimension {
            let fractional_control = self.fractional_controls[source][i];

            if self.options.vanishing_constraints && cmp::zero(fractional_control, self.options.eps)
            {
                continue;
            }
            if !cmp::le((1.0 - fractional_control).abs(), self.upper_bound, self.options.eps) {
                continue;
            }

            let label = HeuristicLabel::root(i, source, self.dimension);
            self.frontiers[source][i].insert(LabelKey(Rc::new(label)));
            self.num_labels += 1;
        }
    }

    fn add_fractional_controls(&mut self, vertex: Vertex) {
        for i in 0..self.dimension {
            self.fractional_control_sums[i] += self.fractional_controls[vertex][i];
        }
    }

    fn is_feasible(&self, control_sums: &[usize], choice: usize) -> bool {
        for k in 0..self.dimension {
            let control_sum = (control_sums[k] + usize::from(choice == k)) as f64;
            let deviation = (control_sum - self.fractional_control_sums[k]).abs();

            if !cmp::le(deviation, self.upper_bound, self.options.eps) {
                return false;
            }
        }
        true
    }

    fn expand(&mut self, source: Vertex, target: Vertex) {
        let mut previous_controls = Controls::zeros(self.dimension);
        let mut next_controls = Controls::zeros(self.dimension);

        let mut predecessors: FxHashMap<Vertex, Edge> = FxHashMap::default();
        for incoming in self.graph.incoming(target) {
            predecessors.insert(incoming.source(), incoming);
        }
        let num_predecessors = predecessors.len();

        let source_frontier = std::mem::take(&mut self.frontiers[source]);

        for bucket in &source_frontier {
            for entry in bucket {
                let label = &entry.0;

                for j in 0..self.dimension {
                    if self.options.vanishing_constraints
                        && cmp::zero(self.fractional_controls[target][j], self.options.eps)
                    {
                        continue;
                    }
                    if !self.is_feasible(label.control_sums(), j) {
                        continue;
                    }

                    next_controls[j] = 1.0;

                    let mut additional_cost = 0.0;
                    let mut remaining = num_predecessors;
                    let mut current = Some(label.as_ref());
                    while let Some(ancestor) = current {
                        if remaining == 0 {
                            break;
                        }
                        if let Some(edge) = predecessors.get(&ancestor.vertex()) {
                            previous_controls[ancestor.current_control()] = 1.0;

                            additional_cost +=
                                self.costs.edge_cost(*edge, &previous_controls, &next_controls);

                            previous_controls[ancestor.current_control()] = 0.0;
                            remaining -= 1;
                        }
                        current = ancestor.predecessor().map(|p| p.as_ref());
                    }
                    debug_assert_eq!(0, remaining);

                    let next_label = Rc::new(HeuristicLabel::extend(
                        label,
                        j,
                        target,
                        label.cost() + additional_cost,
                    ));

                    let target_bucket = &mut self.frontiers[target][j];
                    let key = LabelKey(next_label);
                    match target_bucket.get(&key).map(|kept| kept.0.cost()) {
                        None => {
                            target_bucket.insert(key);
                            self.num_labels += 1;
                        }
                        Some(kept_cost) if kept_cost > key.0.cost() => {
                            target_bucket.replace(key);
                        }
                        Some(_) => {}
                    }

                    next_controls[j] = 0.0;
                }
            }
        }
    }

    fn expand_all(&mut self) {
        self.add_fractional_controls(self.graph.source());

        for target_id in 1..self.graph.num_vertices() {
            let source = Vertex(target_id - 1);
            let target = Vertex(target_id);

            self.add_fractional_controls(target);

            self.expand(source, target);
        }
    }

    /// The cheapest terminal label, with the same deterministic tie break as
    /// the exact solver minus the window: smaller control index first, then
    /// lexicographically smaller control sums.
    fn best_terminal_label(&self) -> Rc<HeuristicLabel> {
        let terminal = self.graph.sink();

        let mut best: Option<&Rc<HeuristicLabel>> = None;
        for bucket in &self.frontiers[terminal] {
            for entry in bucket {
                let candidate = &entry.0;

                let better = match best {
                    None => true,
                    Some(kept) if candidate.cost() != kept.cost() => {
                        candidate.cost() < kept.cost()
                    }
                    Some(kept) => {
                        (candidate.current_control(), candidate.control_sums())
                            < (kept.current_control(), kept.control_sums())
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
        }

        assert!(
            best.is_some(),
            "empty terminal frontier: the instance violates the convexity precondition"
        );
        Rc::clone(best.unwrap())
    }

    fn controls_of(&self, label: &Rc<HeuristicLabel>) -> VertexMap<Controls> {
        let mut controls = VertexMap::new(self.graph, Controls::zeros(self.dimension));

        let mut current = Some(label.as_ref());
        while let Some(lab) = current {
            controls[lab.vertex()][lab.current_control()] = 1.0;
            current = lab.predecessor().map(|p| p.as_ref());
        }

        controls
    }
}

impl<C: CostFunction> Rounding for HeuristicSolver<'_, C> {
    fn solve(&mut self) -> VertexMap<Controls> {
        self.clear();
        self.create_initial_labels();
        self.expand_all();

        let best = self.best_terminal_label();

        debug!("created {} labels", self.num_labels);

        let rounded_controls = self.controls_of(&best);

        debug_assert!(controls_are_integral(self.graph, &rounded_controls, self.options.eps));
        debug_assert!(controls_are_convex(self.graph, &rounded_controls, self.options.eps));
        debug_assert!(cmp::le(
            control_distance(self.graph, self.fractional_controls, &rounded_controls),
            self.upper_bound,
            self.options.eps
        ));

        rounded_controls
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
    fn an_integral_instance_is_reproduced_at_zero_cost() {
        let graph = path(5);
        let fractional = VertexMap::new(&graph, Controls::from(vec![1.0, 0.0, 0.0]));
        let costs = VariationalCosts::default();

        let rounded = HeuristicSolver::new(&graph, &costs, &fractional).solve();

        for vertex in graph.vertices() {
            assert_eq!(Controls::one_hot(3, 0), rounded[vertex]);
        }
    }

    #[test]
    fn the_result_stays_within_the_deviation_bound() {
        let graph = path(6);
        let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.6, 0.4]));
        fractional[Vertex(2)] = Controls::from(vec![0.1, 0.9]);
        let costs = VariationalCosts::default();

        let rounded = HeuristicSolver::new(&graph, &costs, &fractional).solve();

        assert!(controls_are_integral(&graph, &rounded, cmp::DEFAULT_EPS));
        assert!(controls_are_convex(&graph, &rounded, cmp::DEFAULT_EPS));
        assert!(cmp::le(
            control_distance(&graph, &fractional, &rounded),
            max_control_deviation(2),
            cmp::DEFAULT_EPS
        ));
    }

    #[test]
    fn the_heuristic_never_beats_the_exact_optimum() {
        let graph = path(8);
        let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.5, 0.3, 0.2]));
        fractional[Vertex(4)] = Controls::from(vec![0.2, 0.2, 0.6]);
        let costs = VariationalCosts::default();

        let exact = ExactSolver::new(&graph, &costs, &fractional).solve();
        let heuristic = HeuristicSolver::new(&graph, &costs, &fractional).solve();

        assert!(cmp::le(
            costs.evaluate(&graph, &exact),
            costs.evaluate(&graph, &heuristic),
            cmp::DEFAULT_EPS
        ));
    }
}

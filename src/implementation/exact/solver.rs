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

use super::label::{ExactLabel, LabelFrontier, LabelKey, LabelSet};
use crate::{
    cmp, control_distance, controls_are_convex, controls_are_integral, max_control_deviation,
    Controls, CostFunction, Edge, Graph, Rounding, RoundingOptions, Vertex, VertexMap,
};

/// The minimal look back window every label at a vertex must retain. A vertex
/// must remember at least as far back as its own incoming edges span, and it
/// may need to remember further because a later vertex's cost accounting can
/// still reach across it: the reverse sweep propagates a decreasing window
/// requirement towards the source, with an early exit as soon as a committed
/// window is already large enough (the committed values only ever shrink
/// towards the source, so nothing earlier can still be affected).
fn compute_prefix_map(graph: &Graph) -> VertexMap<usize> {
    let mut prefix_map = VertexMap::new(graph, 0_usize);

    for vertex in graph.vertices() {
        for incoming in graph.incoming(vertex) {
            prefix_map[vertex] = prefix_map[vertex].max(incoming.span());
        }
    }

    for vertex in graph.vertices().rev() {
        let mut window = prefix_map[vertex];

        if window == 0 {
            prefix_map[vertex] = 1;
            continue;
        }

        let mut earlier = vertex.id();
        window -= 1;
        while window > 0 && earlier > 0 {
            earlier -= 1;

            if window <= prefix_map[Vertex(earlier)] {
                break;
            }
            prefix_map[Vertex(earlier)] = window;

            window -= 1;
        }
    }

    prefix_map
}

/// The exact label setting solver: sweeps the graph front by front in the
/// total vertex order, expanding every live label with every admissible
/// control of the next vertex, pruning the extensions that violate the
/// deviation bound and merging the ones that collide on their dominance key.
/// The cheapest label of the terminal frontier is provably the optimal
/// rounding of the instance.
///
/// Construction binds the instance and computes the prefix windows once;
/// `solve` may then be called any number of times (it resets the frontiers
/// and the running sums each time and deterministically reproduces the same
/// result).
pub struct ExactSolver<'a, C> {
    graph: &'a Graph,
    costs: &'a C,
    fractional_controls: &'a VertexMap<Controls>,
    options: RoundingOptions,

    dimension: usize,
    upper_bound: f64,
    prefix_map: VertexMap<usize>,

    frontiers: VertexMap<LabelFrontier>,
    /// Cumulative fractional control sums through the vertex currently being
    /// expanded into.
    fractional_control_sums: Vec<f64>,
    num_labels: usize,
}

impl<'a, C: CostFunction> ExactSolver<'a, C> {
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
            prefix_map: compute_prefix_map(graph),
            frontiers: VertexMap::new(graph, vec![LabelSet::default(); dimension]),
            fractional_control_sums: vec![0.0; dimension],
            num_labels: 0,
        }
    }

    /// The number of labels created by the last call to `solve`.
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

    /// Seeds the source frontier with one label per admissible control: a
    /// control is admissible when it does not fall under the vanishing
    /// constraint rule and its one hot deviation from the fractional control
    /// respects the bound. For a convex control the deviation of the other
    /// categories is then within the bound as well.
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

            let label = ExactLabel::root(i, source, self.dimension, self.prefix_map[source]);
            self.frontiers[source][i].insert(LabelKey(Rc::new(label)));
            self.num_labels += 1;
        }
    }

    fn add_fractional_controls(&mut self, vertex: Vertex) {
        for i in 0..self.dimension {
            self.fractional_control_sums[i] += self.fractional_controls[vertex][i];
        }
    }

    /// Whether extending a label with the given `control_sums` by `choice`
    /// keeps every cumulative count within the deviation bound. Counts are
    /// monotone, so a violation can never be repaired later: the branch is
    /// pruned for good.
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

    /// Expands the frontier of `source` into `target` and releases it.
    fn expand(&mut self, source: Vertex, target: Vertex) {
        let mut previous_controls = Controls::zeros(self.dimension);
        let mut next_controls = Controls::zeros(self.dimension);

        let mut predecessors: FxHashMap<Vertex, Edge> = FxHashMap::default();
        for incoming in self.graph.incoming(target) {
            predecessors.insert(incoming.source(), incoming);
        }
        let num_predecessors = predecessors.len();

        let prefix_length = self.prefix_map[target];

        // taking the frontier out is what releases it: once the expansion
        // into `target` is done, nothing holds these sets anymore
        let source_frontier = std::mem::take(&mut self.frontiers[source]);

        for (i, bucket) in source_frontier.iter().enumerate() {
            for entry in bucket {
                let label = &entry.0;
                debug_assert_eq!(i, label.current_control());

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

                    // walk the ancestry to locate the control held at every
                    // predecessor vertex of `target`; the walk stops as soon
                    // as all predecessor edges are accounted for
                    let mut additional_cost = 0.0;
                    let mut remaining = num_predecessors;
                    let mut current = Some(label.as_ref());
                    while let Some(ancestor) = current {
                        if remaining == 0 {
                            break;
                        }
                        if let Some(edge) = predecessors.get(&ancestor.vertex()) {
                            previous_controls[ancestor.current_control()] = 1.0;

                            let edge_cost =
                                self.costs.edge_cost(*edge, &previous_controls, &next_controls);
                            debug_assert!(edge_cost >= 0.0);
                            additional_cost += edge_cost;

                            previous_controls[ancestor.current_control()] = 0.0;
                            remaining -= 1;
                        }
                        current = ancestor.predecessor().map(|p| p.as_ref());
                    }
                    debug_assert_eq!(0, remaining);

                    let next_label = Rc::new(ExactLabel::extend(
                        label,
                        j,
                        target,
                        label.cost() + additional_cost,
                        prefix_length,
                    ));

                    debug_assert!(cmp::eq(
                        self.recompute_cost(&next_label),
                        next_label.cost(),
                        self.options.eps
                    ));
                    debug_assert_eq!(
                        self.recompute_control_sums(&next_label),
                        next_label.control_sums()
                    );

                    // dominance merge: keep whichever of the two colliding
                    // labels is cheaper; every lookup goes through the bucket
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

            if cfg!(debug_assertions) {
                for bucket in &self.frontiers[source] {
                    for entry in bucket {
                        debug_assert!(cmp::le(
                            self.label_deviation(&entry.0),
                            self.upper_bound,
                            self.options.eps
                        ));
                    }
                }
            }

            self.add_fractional_controls(target);

            self.expand(source, target);
        }
    }

    /// The cheapest label of the terminal frontier. Ties are broken by a
    /// deterministic total order: smaller control index first, then the
    /// lexicographically smaller prefix window (an entry reaching back past
    /// the source sorts before any actual choice), then the lexicographically
    /// smaller control sums.
    ///
    /// An empty terminal frontier means every branch was pruned, which cannot
    /// happen for a valid convex instance: the deviation bound is
    /// constructively achievable, so this is an invariant violation rather
    /// than a normal failure.
    fn best_terminal_label(&self) -> Rc<ExactLabel> {
        let terminal = self.graph.sink();

        let mut best: Option<&Rc<ExactLabel>> = None;
        for bucket in &self.frontiers[terminal] {
            for entry in bucket {
                let candidate = &entry.0;

                let better = match best {
                    None => true,
                    Some(kept) if candidate.cost() != kept.cost() => {
                        candidate.cost() < kept.cost()
                    }
                    Some(kept) => {
                        (candidate.current_control(), candidate.prefix(), candidate.control_sums())
                            < (kept.current_control(), kept.prefix(), kept.control_sums())
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

    /// Reconstructs the one hot assignment of a terminal label by walking its
    /// predecessor chain back to the source.
    fn controls_of(&self, label: &Rc<ExactLabel>) -> VertexMap<Controls> {
        let mut controls = VertexMap::new(self.graph, Controls::zeros(self.dimension));

        let mut current = Some(label.as_ref());
        while let Some(lab) = current {
            controls[lab.vertex()][lab.current_control()] = 1.0;
            current = lab.predecessor().map(|p| p.as_ref());
        }

        controls
    }

    /// Recomputes the cost of a label from scratch by replaying its ancestry
    /// over the edges of the graph. Only used to cross check the
    /// incrementally maintained costs in debug builds.
    fn recompute_cost(&self, label: &ExactLabel) -> f64 {
        let mut vertex_controls: VertexMap<Option<usize>> = VertexMap::new(self.graph, None);

        let mut current = Some(label);
        while let Some(lab) = current {
            vertex_controls[lab.vertex()] = Some(lab.current_control());
            current = lab.predecessor().map(|p| p.as_ref());
        }

        let mut total_cost = 0.0;

        for edge in self.graph.edges() {
            if let (Some(source_control), Some(target_control)) =
                (vertex_controls[edge.source()], vertex_controls[edge.target()])
            {
                total_cost += self.costs.edge_cost(
                    edge,
                    &Controls::one_hot(self.dimension, source_control),
                    &Controls::one_hot(self.dimension, target_control),
                );
            }
        }

        total_cost
    }

    /// Recomputes the control histogram of a label from scratch; the debug
    /// counterpart of the incrementally maintained `control_sums`.
    fn recompute_control_sums(&self, label: &ExactLabel) -> Vec<usize> {
        let mut control_sums = vec![0; self.dimension];

        let mut current = Some(label);
        while let Some(lab) = current {
            control_sums[lab.current_control()] += 1;
            current = lab.predecessor().map(|p| p.as_ref());
        }

        control_sums
    }

    /// The largest deviation between the cumulative counts and the cumulative
    /// fractional sums over every prefix of a label's assignment.
    fn label_deviation(&self, label: &ExactLabel) -> f64 {
        let mut chain = vec![];

        let mut current = Some(label);
        while let Some(lab) = current {
            chain.push((lab.vertex(), lab.current_control()));
            current = lab.predecessor().map(|p| p.as_ref());
        }
        chain.reverse();

        let mut control_sums = vec![0.0; self.dimension];
        let mut fractional_sums = vec![0.0; self.dimension];

        let mut distance: f64 = 0.0;

        for (vertex, control) in chain {
            for i in 0..self.dimension {
                fractional_sums[i] += self.fractional_controls[vertex][i];
            }
            control_sums[control] += 1.0;

            for i in 0..self.dimension {
                distance = distance.max((control_sums[i] - fractional_sums[i]).abs());
            }
        }

        distance
    }
}

impl<C: CostFunction> Rounding for ExactSolver<'_, C> {
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
        debug_assert!(cmp::eq(
            self.costs.evaluate(self.graph, &rounded_controls),
            best.cost(),
            self.options.eps
        ));

        rounded_controls
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_prefix_map {
    use super::compute_prefix_map;
    use crate::{Graph, Vertex};

    fn path(n: usize) -> Graph {
        let mut graph = Graph::new(n);
        for v in 1..n {
            graph.add_edge(Vertex(v - 1), Vertex(v));
        }
        graph
    }

    #[test]
    fn a_path_needs_a_window_of_one_everywhere() {
        let graph = path(5);
        let prefix_map = compute_prefix_map(&graph);

        assert!(graph.vertices().all(|v| prefix_map[v] == 1));
    }

    #[test]
    fn an_isolated_vertex_still_gets_a_window_of_one() {
        let graph = Graph::new(1);
        let prefix_map = compute_prefix_map(&graph);
        assert_eq!(1, prefix_map[Vertex(0)]);
    }

    #[test]
    fn a_spanning_edge_raises_the_window_and_back_propagates() {
        // path 0-1-2-3-4 plus a diagonal edge 1-4 spanning 3 positions:
        // vertex 4 must remember 3 choices back, and vertex 3 must keep one
        // extra entry alive for the lookup to survive until vertex 4
        let mut graph = path(5);
        graph.add_edge(Vertex(1), Vertex(4));

        let prefix_map = compute_prefix_map(&graph);

        assert_eq!(1, prefix_map[Vertex(0)]);
        assert_eq!(1, prefix_map[Vertex(1)]);
        assert_eq!(1, prefix_map[Vertex(2)]);
        assert_eq!(2, prefix_map[Vertex(3)]);
        assert_eq!(3, prefix_map[Vertex(4)]);
    }
}

#[cfg(test)]
mod test_solver {
    use crate::*;

    /// A path graph over `n` vertices with edges between consecutive ones.
    fn path(n: usize) -> Graph {
        let mut graph = Graph::new(n);
        for v in 1..n {
            graph.add_edge(Vertex(v - 1), Vertex(v));
        }
        graph
    }

    /// The 2x2 grid: (0,0) -> (0,1), (0,0) -> (1,0), (0,1) -> (1,1),
    /// (1,0) -> (1,1), with the vertices in row major order.
    fn square() -> Graph {
        let mut graph = Graph::new(4);
        graph.add_edge(Vertex(0), Vertex(1));
        graph.add_edge(Vertex(0), Vertex(2));
        graph.add_edge(Vertex(1), Vertex(3));
        graph.add_edge(Vertex(2), Vertex(3));
        graph
    }

    fn uniform_controls(graph: &Graph, values: Vec<f64>) -> VertexMap<Controls> {
        VertexMap::new(graph, Controls::from(values))
    }

    #[test]
    fn an_integral_instance_is_reproduced_at_zero_cost() {
        let graph = path(5);
        let fractional = uniform_controls(&graph, vec![1.0, 0.0, 0.0]);
        let costs = VariationalCosts::default();

        let rounded = ExactSolver::new(&graph, &costs, &fractional).solve();

        for vertex in graph.vertices() {
            assert_eq!(Controls::one_hot(3, 0), rounded[vertex]);
        }
        assert_eq!(0.0, costs.evaluate(&graph, &rounded));
    }

    #[test]
    fn a_balanced_square_rounds_at_zero_cost_within_the_bound() {
        let graph = square();
        let fractional = uniform_controls(&graph, vec![0.5, 0.5]);
        let costs = VariationalCosts::new(0.0);

        let rounded = ExactSolver::new(&graph, &costs, &fractional).solve();

        assert!(controls_are_integral(&graph, &rounded, cmp::DEFAULT_EPS));
        assert!(controls_are_convex(&graph, &rounded, cmp::DEFAULT_EPS));
        assert!(cmp::le(
            control_distance(&graph, &fractional, &rounded),
            max_control_deviation(2),
            cmp::DEFAULT_EPS
        ));
        assert_eq!(0.0, costs.evaluate(&graph, &rounded));
    }

    #[test]
    fn switching_costs_are_minimized_not_only_bounded() {
        // on a path with a balanced relaxation the bound forces one vertex
        // of each category per pair, so each pair switches once internally;
        // the optimum chains the pairs without switching in between
        let graph = path(6);
        let fractional = uniform_controls(&graph, vec![0.5, 0.5]);
        let costs = VariationalCosts::default();

        let mut solver = ExactSolver::new(&graph, &costs, &fractional);
        let rounded = solver.solve();

        // e.g. 011001: three switches, none at a pair boundary
        assert_eq!(3.0, costs.evaluate(&graph, &rounded));
    }

    #[test]
    fn solving_twice_yields_the_same_result() {
        let graph = square();
        let fractional = uniform_controls(&graph, vec![0.5, 0.5]);
        let costs = VariationalCosts::new(0.0);

        let mut solver = ExactSolver::new(&graph, &costs, &fractional);
        let first = solver.solve();
        let second = solver.solve();

        assert_eq!(first, second);
    }

    #[test]
    fn ties_are_broken_towards_the_smaller_terminal_control() {
        // both 0 then 1 and 1 then 0 are optimal at zero cost; the
        // documented order picks the terminal label with the smaller control
        let graph = path(2);
        let fractional = uniform_controls(&graph, vec![0.5, 0.5]);
        let costs = VariationalCosts::new(0.0);

        let rounded = ExactSolver::new(&graph, &costs, &fractional).solve();

        assert_eq!(Controls::one_hot(2, 1), rounded[Vertex(0)]);
        assert_eq!(Controls::one_hot(2, 0), rounded[Vertex(1)]);
    }

    #[test]
    fn vanishing_constraints_forbid_zero_weight_categories() {
        let graph = path(2);
        let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.0, 1.0]));
        fractional[Vertex(1)] = Controls::from(vec![1.0, 0.0]);
        let costs = VariationalCosts::default();

        let options =
            RoundingOptionsBuilder::default().vanishing_constraints(true).build().unwrap();
        let rounded =
            ExactSolver::with_options(&graph, &costs, &fractional, options).solve();

        assert_eq!(Controls::one_hot(2, 1), rounded[Vertex(0)]);
        assert_eq!(Controls::one_hot(2, 0), rounded[Vertex(1)]);
    }

    #[test]
    #[should_panic]
    fn non_convex_controls_are_a_caller_error() {
        let graph = path(2);
        let fractional = uniform_controls(&graph, vec![0.3, 0.3]);
        let costs = VariationalCosts::default();

        let _ = ExactSolver::new(&graph, &costs, &fractional);
    }

    #[test]
    #[should_panic]
    fn dimension_mismatches_are_a_caller_error() {
        let graph = path(2);
        let mut fractional = uniform_controls(&graph, vec![0.5, 0.5]);
        fractional[Vertex(1)] = Controls::from(vec![0.5, 0.25, 0.25]);
        let costs = VariationalCosts::default();

        let _ = ExactSolver::new(&graph, &costs, &fractional);
    }

    #[test]
    fn the_deviation_bound_holds_at_every_prefix_length() {
        // skewed fractional controls on a path: whatever the cost function
        // rewards, every prefix of the result must stay within the bound
        let graph = path(7);
        let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.7, 0.2, 0.1]));
        fractional[Vertex(3)] = Controls::from(vec![0.1, 0.8, 0.1]);
        fractional[Vertex(4)] = Controls::from(vec![0.2, 0.2, 0.6]);
        let costs = VariationalCosts::default();

        let rounded = ExactSolver::new(&graph, &costs, &fractional).solve();

        let bound = max_control_deviation(3);
        let mut count = [0.0; 3];
        let mut frac = [0.0; 3];
        for vertex in graph.vertices() {
            for k in 0..3 {
                count[k] += rounded[vertex][k];
                frac[k] += fractional[vertex][k];
                assert!(cmp::le((count[k] - frac[k]).abs(), bound, cmp::DEFAULT_EPS));
            }
        }
    }

    #[test]
    fn diagonal_predecessors_are_all_charged() {
        // vertex 3 of the square has two predecessors, so its expansion must
        // charge both incoming edges
        let graph = square();
        let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.5, 0.5]));
        fractional[Vertex(0)] = Controls::from(vec![1.0, 0.0]);
        fractional[Vertex(3)] = Controls::from(vec![0.0, 1.0]);
        let costs = VariationalCosts::default();

        let rounded = ExactSolver::new(&graph, &costs, &fractional).solve();
        let cost = costs.evaluate(&graph, &rounded);

        // the bound pins vertex 0 to category 0, vertex 3 to category 1 and
        // splits the middle vertices; either split crosses two of the four
        // edges, and both crossings must show up in the cost
        assert!(cmp::eq(cost, 2.0, cmp::DEFAULT_EPS));
    }
}

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

//! # SCARP
//! SCARP rounds the fractional (simplex valued) controls attached to the
//! vertices of a totally ordered grid DAG into binary, one hot controls.
//! Such relaxed controls typically come out of a mixed integer optimal
//! control problem discretized on a grid: the relaxation assigns every
//! vertex a probability vector over the discrete control categories, and the
//! rounding must pick one category per vertex while staying close to the
//! relaxation and switching categories as rarely as the cost function asks.
//!
//! Every scheme in this crate guarantees the *sum up rounding* bound: for
//! every control category and at every prefix of the vertex order, the
//! cumulative number of times the category was picked differs from its
//! cumulative fractional weight by at most `max_control_deviation(D)`, a
//! pure function of the control dimension. On top of that bound,
//!
//! * [`ExactSolver`] minimizes the total switching cost among all bounded
//!   roundings with a label setting dynamic program,
//! * [`HeuristicSolver`] runs the same sweep with a coarser dominance rule,
//!   trading optimality for a smaller frontier,
//! * [`SumUpRounding`] is the classical greedy pass, fastest and blind to
//!   the cost function.
//!
//! ## Quick Example
//! ```
//! use scarp::*;
//!
//! // a three vertex path whose relaxed controls lean left once, right twice
//! let mut graph = Graph::new(3);
//! graph.add_edge(Vertex(0), Vertex(1));
//! graph.add_edge(Vertex(1), Vertex(2));
//!
//! let mut fractional = VertexMap::new(&graph, Controls::from(vec![0.75, 0.25]));
//! fractional[Vertex(1)] = Controls::from(vec![0.25, 0.75]);
//! fractional[Vertex(2)] = Controls::from(vec![0.25, 0.75]);
//!
//! let costs = VariationalCosts::default();
//! let mut solver = ExactSolver::new(&graph, &costs, &fractional);
//! let rounded = solver.solve();
//!
//! // one category per vertex, within the deviation bound of the relaxation
//! assert!(controls_are_integral(&graph, &rounded, cmp::DEFAULT_EPS));
//! assert!(control_distance(&graph, &fractional, &rounded) <= max_control_deviation(2));
//! ```
//!
//! Instances stored in the CSV grid format are parsed and written by the
//! [`io`] module.

mod abstraction;
pub mod cmp;
mod common;
mod controls;
mod graph;
mod implementation;
pub mod io;

pub use abstraction::*;
pub use common::*;
pub use controls::*;
pub use graph::*;
pub use implementation::*;

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

//! This module defines the grid DAG the solvers operate on, along with the
//! associative overlays (`VertexMap`, `EdgeMap`) used to attach payloads to
//! its vertices and edges without modifying the graph itself.

mod edge_map;
mod grid;
mod vertex_map;

pub use edge_map::EdgeMap;
pub use grid::grid_length;
pub use vertex_map::VertexMap;

use crate::{Edge, Vertex};

/// A DAG whose vertices are totally ordered by their index and whose edges
/// all go forward in that order (`source < target`). The incoming and
/// outgoing adjacency of every vertex is kept as lists of edge ids so that
/// overlays can stay plain vectors.
///
/// The ordering invariant is what makes the front-by-front sweep of the
/// solvers possible; `add_edge` treats a violation as a fatal caller error.
#[derive(Debug, Clone)]
pub struct Graph {
    num_vertices: usize,
    edges: Vec<Edge>,
    incoming: Vec<Vec<usize>>,
    outgoing: Vec<Vec<usize>>,
}

impl Graph {
    /// Creates a graph over `num_vertices` vertices and no edges yet.
    pub fn new(num_vertices: usize) -> Self {
        assert!(num_vertices > 0, "a graph must have at least one vertex");
        Self {
            num_vertices,
            edges: vec![],
            incoming: vec![vec![]; num_vertices],
            outgoing: vec![vec![]; num_vertices],
        }
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all vertices in the total order. The iterator is double
    /// ended, which is what the reverse sweep of the prefix window
    /// computation relies on.
    pub fn vertices(&self) -> impl DoubleEndedIterator<Item = Vertex> + Clone {
        (0..self.num_vertices).map(Vertex)
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// The first vertex in the total order.
    #[inline]
    pub fn source(&self) -> Vertex {
        Vertex(0)
    }

    /// The last vertex in the total order.
    #[inline]
    pub fn sink(&self) -> Vertex {
        Vertex(self.num_vertices - 1)
    }

    /// Adds an edge between the two given vertices and returns it. The
    /// vertices must be distinct, in bounds, and `source < target`.
    pub fn add_edge(&mut self, source: Vertex, target: Vertex) -> Edge {
        assert!(source < target, "edges must go forward in the vertex order");
        assert!(target.id() < self.num_vertices, "target out of bounds");

        let edge = Edge::new(self.edges.len(), source, target);
        self.edges.push(edge);
        self.outgoing[source.id()].push(edge.id());
        self.incoming[target.id()].push(edge.id());
        edge
    }

    pub fn incoming(&self, vertex: Vertex) -> impl Iterator<Item = Edge> + '_ {
        self.incoming[vertex.id()].iter().map(move |id| self.edges[*id])
    }

    pub fn outgoing(&self, vertex: Vertex) -> impl Iterator<Item = Edge> + '_ {
        self.outgoing[vertex.id()].iter().map(move |id| self.edges[*id])
    }

    #[inline]
    pub fn in_degree(&self, vertex: Vertex) -> usize {
        self.incoming[vertex.id()].len()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::{Graph, Vertex};

    #[test]
    fn adjacency_is_tracked_on_both_endpoints() {
        let mut graph = Graph::new(4);
        graph.add_edge(Vertex(0), Vertex(1));
        graph.add_edge(Vertex(0), Vertex(2));
        graph.add_edge(Vertex(1), Vertex(3));
        graph.add_edge(Vertex(2), Vertex(3));

        assert_eq!(4, graph.num_edges());
        assert_eq!(0, graph.in_degree(Vertex(0)));
        assert_eq!(1, graph.in_degree(Vertex(1)));
        assert_eq!(2, graph.in_degree(Vertex(3)));

        let targets: Vec<_> = graph.outgoing(Vertex(0)).map(|e| e.target()).collect();
        assert_eq!(vec![Vertex(1), Vertex(2)], targets);

        let sources: Vec<_> = graph.incoming(Vertex(3)).map(|e| e.source()).collect();
        assert_eq!(vec![Vertex(1), Vertex(2)], sources);
    }

    #[test]
    fn source_and_sink_are_the_extremes_of_the_order() {
        let graph = Graph::new(5);
        assert_eq!(Vertex(0), graph.source());
        assert_eq!(Vertex(4), graph.sink());
    }

    #[test]
    #[should_panic]
    fn backward_edges_are_rejected() {
        let mut graph = Graph::new(3);
        graph.add_edge(Vertex(2), Vertex(1));
    }

    #[test]
    #[should_panic]
    fn self_loops_are_rejected() {
        let mut graph = Graph::new(3);
        graph.add_edge(Vertex(1), Vertex(1));
    }
}

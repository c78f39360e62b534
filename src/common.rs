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

//! This module defines the most basic data types that are used throughout all
//! the code of our library: the vertices and edges of the grid DAG, and the
//! grid coordinates attached to the vertices.

// ----------------------------------------------------------------------------
// --- VERTEX -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes one vertex of the grid DAG. Each vertex is identified
/// with an integer ranging from 0 until `graph.num_vertices()`, and the total
/// order on the vertices is the order on these indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Vertex(pub usize);
impl Vertex {
    #[inline]
    /// This function retruns the id (numeric value) of the vertex.
    ///
    /// # Examples:
    /// ```
    /// # use scarp::Vertex;
    /// assert_eq!(0, Vertex(0).id());
    /// assert_eq!(1, Vertex(1).id());
    /// assert_eq!(2, Vertex(2).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- EDGE -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// An edge of the grid DAG. Edges are directed and always go forward in the
/// total order of the vertices: `source < target`. The `id` indicates the
/// position of the edge in the 'edges' vector of the graph, and is what the
/// edge overlays are indexed on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Edge {
    id: usize,
    source: Vertex,
    target: Vertex,
}
impl Edge {
    /// Creates a new edge; only the graph is ever supposed to do this.
    pub(crate) fn new(id: usize, source: Vertex, target: Vertex) -> Self {
        Self { id, source, target }
    }
    #[inline]
    pub fn id(self) -> usize {
        self.id
    }
    #[inline]
    pub fn source(self) -> Vertex {
        self.source
    }
    #[inline]
    pub fn target(self) -> Vertex {
        self.target
    }
    /// The number of positions this edge jumps over in the total order of the
    /// vertices. An edge between consecutive vertices has span 1; a diagonal
    /// edge of the grid spans further.
    #[inline]
    pub fn span(self) -> usize {
        self.target.id() - self.source.id()
    }
}

// ----------------------------------------------------------------------------
// --- POINT ------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A grid coordinate. Every vertex of a grid instance maps to exactly one
/// point; the mapping is populated once when the graph is built.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Point {
    pub i: usize,
    pub j: usize,
}
impl Point {
    pub fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_vertex {
    use crate::Vertex;

    #[test]
    fn test_vertex_id() {
        assert_eq!(0, Vertex(0).id());
        assert_eq!(1, Vertex(1).id());
        assert_eq!(2, Vertex(2).id());
        assert_eq!(3, Vertex(3).id());
    }

    #[test]
    fn vertices_are_ordered_by_id() {
        assert!(Vertex(0) < Vertex(1));
        assert!(Vertex(5) > Vertex(2));
    }
}

#[cfg(test)]
mod test_edge {
    use crate::{Edge, Vertex};

    #[test]
    fn test_edge_span() {
        assert_eq!(1, Edge::new(0, Vertex(0), Vertex(1)).span());
        assert_eq!(3, Edge::new(1, Vertex(2), Vertex(5)).span());
    }
}

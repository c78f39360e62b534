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

use std::ops::{Index, IndexMut};

use crate::{Graph, Vertex};

/// An associative overlay attaching one payload of type `T` to every vertex
/// of a graph. Because the vertices are identified with a dense range of
/// indices, this is nothing but a vector indexed by vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexMap<T> {
    values: Vec<T>,
}

impl<T: Clone> VertexMap<T> {
    /// Creates an overlay for the given graph where every vertex initially
    /// maps to a clone of `default`.
    pub fn new(graph: &Graph, default: T) -> Self {
        Self { values: vec![default; graph.num_vertices()] }
    }
}

impl<T> VertexMap<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.values.iter_mut()
    }
}

impl<T> Index<Vertex> for VertexMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, vertex: Vertex) -> &T {
        &self.values[vertex.id()]
    }
}

impl<T> IndexMut<Vertex> for VertexMap<T> {
    #[inline]
    fn index_mut(&mut self, vertex: Vertex) -> &mut T {
        &mut self.values[vertex.id()]
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::{Graph, Vertex, VertexMap};

    #[test]
    fn every_vertex_starts_with_the_default() {
        let graph = Graph::new(3);
        let map = VertexMap::new(&graph, 42);
        assert!(graph.vertices().all(|v| map[v] == 42));
    }

    #[test]
    fn updates_are_local_to_one_vertex() {
        let graph = Graph::new(3);
        let mut map = VertexMap::new(&graph, 0);
        map[Vertex(1)] = 7;

        assert_eq!(0, map[Vertex(0)]);
        assert_eq!(7, map[Vertex(1)]);
        assert_eq!(0, map[Vertex(2)]);
    }
}

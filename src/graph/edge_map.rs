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

use crate::{Edge, Graph};

/// The edge counterpart of `VertexMap`: one payload of type `T` per edge of
/// the graph, indexed on the edge id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap<T> {
    values: Vec<T>,
}

impl<T: Clone> EdgeMap<T> {
    pub fn new(graph: &Graph, default: T) -> Self {
        Self { values: vec![default; graph.num_edges()] }
    }
}

impl<T> EdgeMap<T> {
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
}

impl<T> Index<Edge> for EdgeMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, edge: Edge) -> &T {
        &self.values[edge.id()]
    }
}

impl<T> IndexMut<Edge> for EdgeMap<T> {
    #[inline]
    fn index_mut(&mut self, edge: Edge) -> &mut T {
        &mut self.values[edge.id()]
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::{EdgeMap, Graph, Vertex};

    #[test]
    fn payloads_follow_the_edges() {
        let mut graph = Graph::new(3);
        let a = graph.add_edge(Vertex(0), Vertex(1));
        let b = graph.add_edge(Vertex(1), Vertex(2));

        let mut map = EdgeMap::new(&graph, 0.0);
        map[a] = 1.5;
        map[b] = 2.5;

        assert_eq!(1.5, map[a]);
        assert_eq!(2.5, map[b]);
        assert_eq!(2, map.len());
    }
}

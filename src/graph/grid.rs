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

use crate::{Graph, Point, VertexMap};

/// The extent of the bounding box of the grid coordinates, that is
/// `1 + max(Δi, Δj)`. The conventional scale factor of the variational cost
/// function is the reciprocal of this length.
pub fn grid_length(graph: &Graph, coordinates: &VertexMap<Point>) -> usize {
    let mut min_i = usize::MAX;
    let mut max_i = usize::MIN;

    let mut min_j = usize::MAX;
    let mut max_j = usize::MIN;

    for vertex in graph.vertices() {
        let coordinate = coordinates[vertex];

        max_i = max_i.max(coordinate.i);
        min_i = min_i.min(coordinate.i);

        max_j = max_j.max(coordinate.j);
        min_j = min_j.min(coordinate.j);
    }

    1 + (max_i - min_i).max(max_j - min_j)
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use crate::{grid_length, Graph, Point, Vertex, VertexMap};

    #[test]
    fn a_single_point_has_length_one() {
        let graph = Graph::new(1);
        let coordinates = VertexMap::new(&graph, Point::new(3, 7));
        assert_eq!(1, grid_length(&graph, &coordinates));
    }

    #[test]
    fn length_is_the_larger_extent_of_the_bounding_box() {
        let graph = Graph::new(4);
        let mut coordinates = VertexMap::new(&graph, Point::default());
        coordinates[Vertex(0)] = Point::new(0, 0);
        coordinates[Vertex(1)] = Point::new(0, 1);
        coordinates[Vertex(2)] = Point::new(0, 2);
        coordinates[Vertex(3)] = Point::new(1, 0);

        assert_eq!(3, grid_length(&graph, &coordinates));
    }
}

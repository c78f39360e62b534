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

//! This module contains everything that is necessary to parse a rounding
//! instance and turn it into structs usable in Rust, along with the writer
//! emitting a result in the same format. An instance is a CSV file with one
//! row per grid cell: `i,j,c_0,...,c_{D-1}` where `(i, j)` is the cell
//! coordinate and the `c_k` are the fractional control values. The row order
//! of the file defines the total order of the vertices; every cell of the
//! bounding grid must be present, and neighboring cells are connected by
//! edges oriented along the vertex order.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::num::ParseFloatError;
use std::path::Path;

use fxhash::FxHashMap;
use tracing::{debug, info};

use crate::{cmp, controls_are_convex, Controls, Graph, Point, Vertex, VertexMap};

/// This enumeration simply groups the kind of errors that might occur when
/// parsing an instance. There can be io errors (file unavailable ?), format
/// errors (e.g. the file is not an instance at all), or parse errors (the
/// parser expected a number but got ... something else).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The parser expected to read a number but got some garbage
    #[error("parse float {0}")]
    ParseFloat(#[from] ParseFloatError),
    /// The file was not properly formatted.
    #[error("ill formed instance")]
    Format,
    /// The instance comprises fewer than two grid cells.
    #[error("the instance is too small")]
    TooSmall,
    /// The fractional controls of some cell are not convex.
    #[error("the controls are not convex")]
    NotConvex,
}

/// A parsed instance: the grid DAG, the fractional control attached to every
/// vertex, and the coordinate every vertex came from.
pub struct Instance {
    pub graph: Graph,
    pub fractional_controls: VertexMap<Controls>,
    pub coordinates: VertexMap<Point>,
}

struct Entry {
    i: usize,
    j: usize,
    values: Vec<f64>,
}

fn read_entries<R: BufRead>(input: R) -> Result<Vec<Entry>, Error> {
    let mut entries = vec![];
    let mut dimension = None;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(',').collect();
        if tokens.len() <= 2 {
            return Err(Error::Format);
        }

        let i = tokens[0].trim().parse::<f64>()? as usize;
        let j = tokens[1].trim().parse::<f64>()? as usize;

        let values = tokens[2..]
            .iter()
            .map(|token| token.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, ParseFloatError>>()?;

        match dimension {
            None => dimension = Some(values.len()),
            Some(dimension) if dimension != values.len() => return Err(Error::Format),
            Some(_) => {}
        }

        entries.push(Entry { i, j, values });
    }

    debug!("read {} entries", entries.len());

    Ok(entries)
}

/// Reads an instance from any buffered source. The graph is assembled from
/// the grid coordinates: every cell is connected to its left and upper
/// neighbor, with the edge oriented along the total order the file rows
/// define.
pub fn read_from<R: BufRead>(input: R) -> Result<Instance, Error> {
    let entries = read_entries(input)?;

    if entries.len() < 2 {
        return Err(Error::TooSmall);
    }

    let mut m = 0;
    let mut n = 0;
    for entry in &entries {
        m = m.max(entry.i);
        n = n.max(entry.j);
    }

    let num_vertices = (m + 1) * (n + 1);
    if entries.len() != num_vertices {
        return Err(Error::Format);
    }

    let mut graph = Graph::new(num_vertices);

    let mut vertices_by_point: FxHashMap<Point, Vertex> = FxHashMap::default();
    let mut coordinates = VertexMap::new(&graph, Point::default());
    let mut fractional_controls = VertexMap::new(&graph, Controls::zeros(0));

    for (p, entry) in entries.into_iter().enumerate() {
        let point = Point::new(entry.i, entry.j);
        let vertex = Vertex(p);

        if vertices_by_point.insert(point, vertex).is_some() {
            return Err(Error::Format);
        }
        coordinates[vertex] = point;
        fractional_controls[vertex] = Controls::from(entry.values);
    }

    for p in 0..num_vertices {
        let vertex = Vertex(p);
        let point = coordinates[vertex];

        let connect = |graph: &mut Graph, neighbor: Point| -> Result<(), Error> {
            let other = *vertices_by_point.get(&neighbor).ok_or(Error::Format)?;
            if other < vertex {
                graph.add_edge(other, vertex);
            } else {
                graph.add_edge(vertex, other);
            }
            Ok(())
        };

        // only look left and up so that every neighboring pair is connected
        // exactly once
        if point.i > 0 {
            connect(&mut graph, Point::new(point.i - 1, point.j))?;
        }
        if point.j > 0 {
            connect(&mut graph, Point::new(point.i, point.j - 1))?;
        }
    }

    if !controls_are_convex(&graph, &fractional_controls, cmp::DEFAULT_EPS) {
        return Err(Error::NotConvex);
    }

    info!(
        "read a graph with {} vertices and {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );

    Ok(Instance { graph, fractional_controls, coordinates })
}

/// Reads an instance from a file.
pub fn read_instance<P: AsRef<Path>>(fname: P) -> Result<Instance, Error> {
    let file = File::open(fname)?;
    read_from(BufReader::new(file))
}

/// Writes a control assignment in the instance format, one row per vertex in
/// the total order.
pub fn write_controls<W: Write>(
    out: &mut W,
    graph: &Graph,
    coordinates: &VertexMap<Point>,
    controls: &VertexMap<Controls>,
) -> std::io::Result<()> {
    for vertex in graph.vertices() {
        let point = coordinates[vertex];

        write!(out, "{},{}", point.i, point.j)?;
        for value in controls[vertex].iter() {
            write!(out, ",{:.6}", value)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
